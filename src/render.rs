//! Incremental in-place repaint of the current line.
//!
//! Reconciles the on-screen line with `current` using only backspace,
//! space, and character writes — never a full-line clear — so redraw cost
//! is proportional to the size of the change.

use crate::error::Result;
use crate::terminal::RawTerminal;
use crate::util::utf8_lead_len;

/// The column-position bookkeeping a render call needs from one call to the
/// next; lives on [`crate::Editor`] alongside the buffer and cursor.
#[derive(Debug, Default, Clone)]
pub struct RenderState {
    /// Column the cursor currently occupies on screen.
    pub fmt_cursor: usize,
    /// Total columns occupied by the last rendered line.
    pub fmt_len: usize,
    /// The `(current, cursor)` pair painted by the last call, so an
    /// unchanged call is a byte-level no-op rather than a backspace/repaint
    /// round trip to the same place.
    last: Option<(Vec<u8>, usize)>,
}

impl RenderState {
    /// Repaints `current` (with the logical cursor at byte offset `cursor`)
    /// onto `terminal`, reconciling against what was last painted.
    pub fn render<T: RawTerminal>(
        &mut self,
        terminal: &mut T,
        current: &[u8],
        cursor: usize,
    ) -> Result<()> {
        if self.last.as_ref().map(|(b, c)| (b.as_slice(), *c)) == Some((current, cursor)) {
            return Ok(());
        }
        self.last = Some((current.to_vec(), cursor));

        let old_fmt_len = self.fmt_len;

        for _ in 0..self.fmt_cursor {
            terminal.write(b"\x08")?;
        }

        let mut fmt_cursor = None;
        let mut fmt_len = 0usize;
        let mut i = 0usize;
        let end = current.len();

        while i < end {
            if i == cursor {
                fmt_cursor = Some(fmt_len);
            }
            let c = current[i];
            if c < 0x20 {
                terminal.write(&[b'^', c + 0x40])?;
                fmt_len += 2;
                i += 1;
            } else if c < 0x80 {
                terminal.write(&[c])?;
                fmt_len += 1;
                i += 1;
            } else {
                let seq_len = utf8_lead_len(c);
                match seq_len {
                    Some(n) if i + n <= end => {
                        terminal.write(&current[i..i + n])?;
                        fmt_len += 1;
                        i += n;
                    }
                    Some(_) => {
                        // Truncated trailing sequence: stop, matching the
                        // original's "not enough bytes left" early exit.
                        break;
                    }
                    None => {
                        // Malformed lead byte. This intentionally emits
                        // non-canonical hex for nibbles >= 10 (yields `:`-`?`
                        // instead of `A`-`F`), preserved as specified.
                        terminal.write(b"\\x")?;
                        terminal.write(&[b'0' + (c >> 4), b'0' + (c & 0xF)])?;
                        fmt_len += 4;
                        i += 1;
                    }
                }
            }
        }

        let fmt_cursor = fmt_cursor.unwrap_or(fmt_len);

        let mut tail = fmt_len;
        while tail < old_fmt_len {
            terminal.write(b" ")?;
            tail += 1;
        }
        while tail > fmt_cursor {
            terminal.write(b"\x08")?;
            tail -= 1;
        }

        self.fmt_cursor = fmt_cursor;
        self.fmt_len = fmt_len;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RecordingTerminal {
        out: Vec<u8>,
    }

    impl RawTerminal for RecordingTerminal {
        fn read_byte(&mut self) -> Result<u8> {
            unreachable!("render never reads")
        }
        fn write(&mut self, data: &[u8]) -> Result<()> {
            self.out.extend_from_slice(data);
            Ok(())
        }
        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
        fn enter_raw_mode(&mut self) -> Result<()> {
            Ok(())
        }
        fn leave_raw_mode(&mut self) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn plain_ascii_cursor_at_end() {
        let mut term = RecordingTerminal { out: Vec::new() };
        let mut state = RenderState::default();
        state.render(&mut term, b"abc", 3).unwrap();
        assert_eq!(term.out, b"abc");
        assert_eq!(state.fmt_cursor, 3);
        assert_eq!(state.fmt_len, 3);
    }

    #[test]
    fn control_byte_escaped_as_caret_letter() {
        let mut term = RecordingTerminal { out: Vec::new() };
        let mut state = RenderState::default();
        state.render(&mut term, &[0x01], 0).unwrap();
        // "^A" written, then walked back to the cursor at column 0.
        assert_eq!(term.out, [b"^A".as_slice(), &[0x08, 0x08]].concat());
        assert_eq!(state.fmt_len, 2);
        assert_eq!(state.fmt_cursor, 0);
    }

    #[test]
    fn malformed_lead_byte_uses_non_canonical_hex() {
        let mut term = RecordingTerminal { out: Vec::new() };
        let mut state = RenderState::default();
        // 0xFF is not a valid UTF-8 lead of any length.
        state.render(&mut term, &[0xFF], 1).unwrap();
        // high nibble 0xF -> '0'+15 = ':' + 2 ('0'+15 = 63 = '?'); low nibble
        // 0xF -> '?' as well, both intentionally non-hex for nibble 15.
        assert_eq!(term.out, b"\\x??");
        assert_eq!(state.fmt_len, 4);
    }

    #[test]
    fn shrinking_line_overwrites_leftovers_with_spaces() {
        let mut term = RecordingTerminal { out: Vec::new() };
        let mut state = RenderState::default();
        state.render(&mut term, b"hello", 5).unwrap();
        term.out.clear();
        state.render(&mut term, b"hi", 2).unwrap();
        // 5 backspaces to col 0, "hi", 3 spaces to cover leftover "llo", 3
        // backspaces back to the cursor at column 2.
        assert_eq!(
            term.out,
            [vec![0x08; 5], b"hi".to_vec(), vec![b' '; 3], vec![0x08; 3]].concat()
        );
    }

    #[test]
    fn repeated_render_with_same_state_is_idempotent() {
        let mut term = RecordingTerminal { out: Vec::new() };
        let mut state = RenderState::default();
        state.render(&mut term, b"hello", 2).unwrap();
        term.out.clear();
        // Same (current, cursor) as last call: a byte-level no-op.
        state.render(&mut term, b"hello", 2).unwrap();
        assert_eq!(term.out, Vec::<u8>::new());
    }
}
