//! The editor core: owns the buffer, clipboard, cursor, history and key
//! bindings, and runs the read loop that ties the FSM, commands and
//! renderer together.

use std::path::PathBuf;

use crate::buffer::EditBuffer;
use crate::commands::default_bindings;
use crate::error::Result;
use crate::fsm::{Binding, CommandId, FeedResult, Fsm};
use crate::history::History;
use crate::render::RenderState;
use crate::terminal::RawTerminal;

/// What a command's execution means for the read loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Keep reading more input.
    Continue,
    /// The command refused to execute (e.g. a motion at a boundary); the
    /// editor emits a BEL and keeps reading.
    Refuse,
    /// The line is complete; `read` should return it to the host.
    Accept,
}

/// Builder assembling buffer/history capacities, an optional history file,
/// and a key-binding table into an [`Editor`].
///
/// Generalizes the teacher's `LineEditor::new(buffer_capacity,
/// history_capacity)` the way `rustyline`'s `Config`/`Builder` split
/// generalizes a handful of constructor arguments.
pub struct EditorBuilder {
    buffer_capacity: usize,
    history_capacity: usize,
    history_file: Option<PathBuf>,
    bindings: Vec<Binding>,
}

impl Default for EditorBuilder {
    fn default() -> Self {
        Self {
            buffer_capacity: 256,
            history_capacity: 100,
            history_file: None,
            bindings: default_bindings(),
        }
    }
}

impl EditorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Initial capacity (bytes) of the line buffer and clipboard.
    pub fn buffer_capacity(mut self, capacity: usize) -> Self {
        self.buffer_capacity = capacity;
        self
    }

    /// Maximum number of entries kept in the in-memory history ring.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.history_capacity = capacity;
        self
    }

    /// Persists history to `path`, loading any existing entries at
    /// [`EditorBuilder::build`] time.
    pub fn history_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.history_file = Some(path.into());
        self
    }

    /// Replaces the default key-binding table. Bindings are matched as a
    /// flat list; later entries in `bindings` override earlier ones on
    /// exact conflicts.
    pub fn key_bindings(mut self, bindings: Vec<Binding>) -> Self {
        self.bindings = bindings;
        self
    }

    /// Builds the editor against `terminal`, eagerly loading the history
    /// file if one was configured.
    pub fn build<T: RawTerminal>(self, terminal: T) -> Result<Editor<T>> {
        let mut history = History::new(self.history_capacity);
        if let Some(path) = &self.history_file {
            history.read(path)?;
        }

        Ok(Editor {
            terminal,
            buffer: EditBuffer::with_capacity(self.buffer_capacity),
            clipboard: EditBuffer::with_capacity(self.buffer_capacity),
            cursor: 0,
            render: RenderState::default(),
            focus: history.size(),
            last_command: None,
            bindings: Fsm::new(&self.bindings),
            history,
            history_file: self.history_file,
            started: false,
        })
    }
}

/// The single-line editor. Owns a [`RawTerminal`] and everything needed to
/// read one edited, history-aware line at a time.
pub struct Editor<T: RawTerminal> {
    pub(crate) terminal: T,
    pub(crate) buffer: EditBuffer,
    pub(crate) clipboard: EditBuffer,
    pub(crate) cursor: usize,
    pub(crate) render: RenderState,
    pub(crate) focus: usize,
    pub(crate) last_command: Option<CommandId>,
    bindings: Fsm,
    pub(crate) history: History,
    pub(crate) history_file: Option<PathBuf>,
    started: bool,
}

/// Window large enough for every default binding's longest sequence (the
/// 4-byte `ESC [ 3 ~` CSI tails) with headroom; the spec notes 8 bytes
/// suffices for ANSI CSI tails in general.
const FEED_WINDOW: usize = 8;

impl<T: RawTerminal> Editor<T> {
    /// The byte sequence currently on display: the in-progress buffer, or
    /// a history entry if the user has navigated with previous/next
    /// history and not yet edited it.
    pub(crate) fn current_bytes(&self) -> &[u8] {
        if self.focus == self.history.size() {
            self.buffer.as_bytes()
        } else {
            self.history.index(self.focus).as_bytes()
        }
    }

    /// Copy-on-write: if a history entry is being viewed, promotes it into
    /// the editable buffer and resets focus to the fresh line. Returns
    /// whether a pop actually happened.
    pub(crate) fn pop(&mut self) -> bool {
        if self.focus == self.history.size() {
            return false;
        }
        let bytes = self.history.index(self.focus).as_bytes().to_vec();
        self.buffer.assign(&bytes);
        self.focus = self.history.size();
        true
    }

    /// Inserts `bytes` at the cursor, popping first; advances the cursor
    /// past the inserted bytes.
    pub(crate) fn insert_literal(&mut self, bytes: &[u8]) {
        self.pop();
        self.buffer.insert(self.cursor, bytes);
        self.cursor += bytes.len();
    }

    pub(crate) fn render_now(&mut self) -> Result<()> {
        let current = self.current_bytes().to_vec();
        let cursor = self.cursor;
        self.render.render(&mut self.terminal, &current, cursor)
    }

    /// Reads one edited line, with full key-sequence recognition, editing,
    /// and history support. `prompt` is emitted verbatim, followed by a
    /// separating space.
    pub fn read(&mut self, prompt: &str) -> Result<String> {
        if !self.started {
            self.terminal.enter_raw_mode()?;
            self.started = true;
            log::debug!("editor: entered raw mode for the first read()");
        }

        self.buffer.clear();
        self.cursor = 0;
        self.render = RenderState::default();
        self.focus = self.history.size();
        self.last_command = None;

        self.terminal.write(prompt.as_bytes())?;
        self.terminal.write(b" ")?;
        self.terminal.flush()?;

        loop {
            self.render_now()?;
            self.terminal.flush()?;

            let mut window = [0u8; FEED_WINDOW];
            let mut len = 0usize;
            let resolved = loop {
                let byte = self.terminal.read_byte()?;
                window[len] = byte;
                len += 1;
                match self.bindings.feed(byte) {
                    FeedResult::Final(cmd) => break Some(cmd),
                    FeedResult::None => break None,
                    FeedResult::Inner if len == window.len() => {
                        // Window exhausted without resolving: degrade to
                        // literal input rather than reading forever.
                        self.bindings.reset();
                        break None;
                    }
                    FeedResult::Inner => continue,
                }
            };

            match resolved {
                Some(cmd) => {
                    log::debug!("editor: dispatch {cmd:?}");
                    let outcome = self.exec(cmd)?;
                    self.last_command = Some(cmd);
                    match outcome {
                        Outcome::Continue => {}
                        Outcome::Refuse => {
                            self.terminal.write(b"\x07")?;
                        }
                        Outcome::Accept => {
                            self.render_now()?;
                            self.terminal.write(b"\n")?;
                            self.terminal.flush()?;
                            // Malformed UTF-8 in the buffer is never fatal;
                            // lossily convert rather than erroring.
                            return Ok(String::from_utf8_lossy(self.buffer.as_bytes()).into_owned());
                        }
                    }
                }
                None => {
                    self.insert_literal(&window[..len]);
                    self.last_command = None;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use std::collections::VecDeque;

    pub struct MockTerminal {
        pub input: VecDeque<u8>,
        pub output: Vec<u8>,
        pub raw_entered: bool,
    }

    impl MockTerminal {
        pub fn with_input(bytes: &[u8]) -> Self {
            Self {
                input: bytes.iter().copied().collect(),
                output: Vec::new(),
                raw_entered: false,
            }
        }
    }

    impl RawTerminal for MockTerminal {
        fn read_byte(&mut self) -> Result<u8> {
            self.input
                .pop_front()
                .ok_or_else(|| Error::Io(std::io::Error::from(std::io::ErrorKind::UnexpectedEof)))
        }
        fn write(&mut self, data: &[u8]) -> Result<()> {
            self.output.extend_from_slice(data);
            Ok(())
        }
        fn flush(&mut self) -> Result<()> {
            Ok(())
        }
        fn enter_raw_mode(&mut self) -> Result<()> {
            self.raw_entered = true;
            Ok(())
        }
        fn leave_raw_mode(&mut self) -> Result<()> {
            self.raw_entered = false;
            Ok(())
        }
    }

    fn editor_with(input: &[u8]) -> Editor<MockTerminal> {
        EditorBuilder::new()
            .buffer_capacity(64)
            .history_capacity(8)
            .build(MockTerminal::with_input(input))
            .unwrap()
    }

    #[test]
    fn types_a_word_and_accepts() {
        let mut ed = editor_with(b"hello\n");
        let line = ed.read("$").unwrap();
        assert_eq!(line, "hello");
        assert!(ed.terminal.raw_entered);
    }

    #[test]
    fn backward_char_at_start_emits_bel() {
        // C-b (0x02) at column 0 refuses; then type "a" and Enter.
        let mut ed = editor_with(b"\x02a\n");
        let line = ed.read("$").unwrap();
        assert_eq!(line, "a");
        assert!(ed.terminal.output.contains(&0x07));
    }

    #[test]
    fn multibyte_utf8_cursor_motion() {
        // "héllo" then Home, then three C-f (forward-char).
        let mut input = "héllo".as_bytes().to_vec();
        input.push(0x01); // beginning-of-line
        input.extend_from_slice(&[0x06, 0x06, 0x06]); // forward-char x3
        input.push(0x0A); // accept-line
        let mut ed = editor_with(&input);
        let line = ed.read("$").unwrap();
        assert_eq!(line, "héllo");
        // cursor should now sit right after 'l' (byte offset 4: h(1) + é(2) + l(1))
        assert_eq!(ed.cursor, 4);
    }

    #[test]
    fn history_up_then_edit_does_not_mutate_stored_entry() {
        let mut ed = editor_with(b"a\n");
        ed.read("$").unwrap();
        ed.terminal.input = b"b\n".iter().copied().collect();
        ed.read("$").unwrap();
        ed.terminal.input = b"c\n".iter().copied().collect();
        ed.read("$").unwrap();

        // Type "x", press Up twice (land on "b"), then backspace, then accept.
        ed.terminal.input = b"x\x10\x10\x08\x0A".iter().copied().collect();
        let line = ed.read("$").unwrap();
        assert_eq!(line, "");
        // Copy-on-write: editing the viewed entry never mutated it in place.
        assert_eq!(ed.history.index(1), "b");
    }

    #[test]
    fn backward_kill_word_chains_by_prepending() {
        let mut input = b"foo bar baz".to_vec();
        input.push(0x17); // backward-kill-word -> clipboard "baz"
        input.push(0x17); // backward-kill-word again -> prepend "bar baz"
        input.push(0x0A);
        let mut ed = editor_with(&input);
        let line = ed.read("$").unwrap();
        assert_eq!(line, "foo ");
        assert_eq!(ed.clipboard.as_bytes(), b"bar baz");
    }

    #[test]
    fn verbatim_inserts_next_raw_byte_literally() {
        // C-v (0x16) then a raw 0x03 (normally bound to terminate), then Enter.
        let mut ed = editor_with(b"\x16\x03\n");
        let line = ed.read("$").unwrap();
        assert_eq!(line.as_bytes(), &[0x03]);
    }

    #[test]
    fn lone_malformed_utf8_lead_byte_accepts_without_panic_or_error() {
        // A lone 0xC3 (a 2-byte UTF-8 lead with no continuation) has no FSM
        // binding, so it is inserted literally as a single byte. Accepting
        // it must not error even though the buffer is not valid UTF-8.
        let mut ed = editor_with(&[0xC3, 0x0A]);
        let line = ed.read("$").unwrap();
        assert_eq!(line.as_bytes(), &[0xEF, 0xBF, 0xBD]); // U+FFFD replacement
    }

    #[test]
    fn delete_char_on_truncated_multibyte_lead_does_not_panic() {
        // A lone 0xC3 (2-byte lead, no continuation) sits alone in the
        // buffer; Ctrl-D (end-of-file) with a non-empty buffer runs
        // delete-char rather than terminating, and must not panic trying
        // to erase 2 bytes when only 1 remains.
        let mut ed = editor_with(&[0xC3, 0x01, 0x04]); // insert, Home, EOF/delete-char
        let result = ed.read("$");
        // The mock terminal then runs out of input (no more keys after the
        // delete); what matters is that delete-char itself didn't panic.
        assert!(result.is_err());
        assert!(ed.current_bytes().is_empty());
    }
}
