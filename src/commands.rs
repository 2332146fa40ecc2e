//! Editing commands: the ~20 operations a bound key sequence can resolve
//! to, implemented as methods on [`Editor`] and dispatched from `exec`.

use crate::editor::{Editor, Outcome};
use crate::error::Result;
use crate::fsm::{Binding, CommandId};
use crate::terminal::RawTerminal;
use crate::util::{codepoint_len, is_word_byte};

use CommandId::*;

/// The built-in key bindings, reproduced bit-exact from the default table.
pub fn default_bindings() -> Vec<Binding> {
    vec![
        (vec![0x01], BeginningOfLine),
        (vec![0x02], BackwardChar),
        (vec![0x03], Terminate),
        (vec![0x04], EndOfFile),
        (vec![0x05], EndOfLine),
        (vec![0x06], ForwardChar),
        (vec![0x08], BackwardDeleteChar),
        (vec![0x0A], AcceptLine),
        (vec![0x0B], ForwardKillLine),
        (vec![0x0E], NextHistory),
        (vec![0x10], PreviousHistory),
        (vec![0x15], BackwardKillLine),
        (vec![0x16], Verbatim),
        (vec![0x17], BackwardKillWord),
        (vec![0x19], Yank),
        (vec![0x1B, b'b'], BackwardWord),
        (vec![0x1B, b'f'], ForwardWord),
        (vec![0x1B, b'[', b'A'], PreviousHistory),
        (vec![0x1B, b'[', b'B'], NextHistory),
        (vec![0x1B, b'[', b'C'], ForwardChar),
        (vec![0x1B, b'[', b'D'], BackwardChar),
        (vec![0x1B, b'[', b'3', b'~'], DeleteChar),
        (vec![0x1B, b'[', b'7', b'~'], BeginningOfLine),
        (vec![0x1B, b'[', b'8', b'~'], EndOfLine),
        (vec![0x7F], BackwardDeleteChar),
    ]
}

impl<T: RawTerminal> Editor<T> {
    /// Dispatches a resolved command to its implementation.
    pub(crate) fn exec(&mut self, cmd: CommandId) -> Result<Outcome> {
        Ok(match cmd {
            BackwardChar => self.backward_char(),
            ForwardChar => self.forward_char(),
            BackwardWord => self.backward_word(),
            ForwardWord => self.forward_word(),
            BeginningOfLine => {
                self.cursor = 0;
                Outcome::Continue
            }
            EndOfLine => {
                self.cursor = self.current_bytes().len();
                Outcome::Continue
            }
            PreviousHistory => self.previous_history(),
            NextHistory => self.next_history(),
            BeginningOfHistory => self.beginning_of_history(),
            EndOfHistory => self.end_of_history(),
            DeleteChar => self.delete_char(),
            BackwardDeleteChar => self.backward_delete_char(),
            ForwardKillLine => self.forward_kill_line(),
            BackwardKillLine => self.backward_kill_line(),
            ForwardKillWord => self.forward_kill_word(),
            BackwardKillWord => self.backward_kill_word(),
            Yank => self.yank(),
            Verbatim => return self.verbatim(),
            AcceptLine => return self.accept_line(),
            Terminate => return self.terminate(),
            EndOfFile => return self.end_of_file(),
        })
    }

    fn backward_char(&mut self) -> Outcome {
        if self.cursor == 0 {
            return Outcome::Refuse;
        }
        let bytes = self.current_bytes();
        let mut i = self.cursor - 1;
        while i > 0 && crate::util::is_continuation(bytes[i]) {
            i -= 1;
        }
        self.cursor = i;
        Outcome::Continue
    }

    fn forward_char(&mut self) -> Outcome {
        let bytes = self.current_bytes();
        if self.cursor >= bytes.len() {
            return Outcome::Refuse;
        }
        let len = bytes.len();
        let mut i = self.cursor + 1;
        while i < len && crate::util::is_continuation(bytes[i]) {
            i += 1;
        }
        self.cursor = i;
        Outcome::Continue
    }

    /// Two-phase scan: skip non-word bytes, then word bytes, matching the
    /// original's `backward_word` exactly.
    fn backward_word(&mut self) -> Outcome {
        if self.cursor == 0 {
            return Outcome::Refuse;
        }
        let bytes = self.current_bytes();
        let mut i: isize = self.cursor as isize - 1;
        while i >= 0 && !is_word_byte(bytes[i as usize]) {
            i -= 1;
        }
        while i >= 0 && is_word_byte(bytes[i as usize]) {
            i -= 1;
        }
        self.cursor = (i + 1) as usize;
        Outcome::Continue
    }

    /// Three-phase scan: skip non-word, then word, then non-word bytes
    /// again, landing on the next word's first character — deliberately
    /// asymmetric with `backward_word`, matching the original.
    fn forward_word(&mut self) -> Outcome {
        let bytes = self.current_bytes();
        let len = bytes.len();
        if self.cursor >= len {
            return Outcome::Refuse;
        }
        let mut i = self.cursor;
        while i < len && !is_word_byte(bytes[i]) {
            i += 1;
        }
        while i < len && is_word_byte(bytes[i]) {
            i += 1;
        }
        while i < len && !is_word_byte(bytes[i]) {
            i += 1;
        }
        self.cursor = i;
        Outcome::Continue
    }

    fn previous_history(&mut self) -> Outcome {
        if self.focus == 0 {
            return Outcome::Refuse;
        }
        self.focus -= 1;
        self.cursor = self.current_bytes().len();
        Outcome::Continue
    }

    fn next_history(&mut self) -> Outcome {
        if self.focus == self.history.size() {
            return Outcome::Refuse;
        }
        self.focus += 1;
        self.cursor = self.current_bytes().len();
        Outcome::Continue
    }

    fn beginning_of_history(&mut self) -> Outcome {
        self.focus = 0;
        self.cursor = self.current_bytes().len();
        Outcome::Continue
    }

    fn end_of_history(&mut self) -> Outcome {
        self.focus = self.history.size();
        self.cursor = self.current_bytes().len();
        Outcome::Continue
    }

    fn delete_char(&mut self) -> Outcome {
        let bytes = self.current_bytes();
        if self.cursor >= bytes.len() {
            return Outcome::Refuse;
        }
        let n = codepoint_len(bytes[self.cursor]);
        self.pop();
        self.buffer.erase(self.cursor, n);
        Outcome::Continue
    }

    fn backward_delete_char(&mut self) -> Outcome {
        if self.cursor == 0 {
            return Outcome::Refuse;
        }
        self.backward_char();
        self.delete_char()
    }

    /// Line kills always replace the clipboard (never chain), independent
    /// of what the prior command was.
    fn forward_kill_line(&mut self) -> Outcome {
        let len = self.current_bytes().len();
        if self.cursor >= len {
            return Outcome::Continue;
        }
        self.pop();
        let killed = self.buffer.as_bytes()[self.cursor..].to_vec();
        let from = self.cursor;
        let count = self.buffer.len() - from;
        self.clipboard.assign(&killed);
        self.buffer.erase(from, count);
        Outcome::Continue
    }

    fn backward_kill_line(&mut self) -> Outcome {
        if self.cursor == 0 {
            return Outcome::Continue;
        }
        self.pop();
        let killed = self.buffer.as_bytes()[..self.cursor].to_vec();
        self.clipboard.assign(&killed);
        self.buffer.erase(0, self.cursor);
        self.cursor = 0;
        Outcome::Continue
    }

    fn forward_kill_word(&mut self) -> Outcome {
        if self.cursor >= self.current_bytes().len() {
            return Outcome::Continue;
        }
        self.pop();
        let begin = self.cursor;
        self.forward_word();
        let end = self.cursor;
        let killed = self.buffer.as_bytes()[begin..end].to_vec();
        if self.last_command == Some(ForwardKillWord) {
            self.clipboard.append(&killed);
        } else {
            self.clipboard.assign(&killed);
        }
        self.buffer.erase(begin, end - begin);
        self.cursor = begin;
        Outcome::Continue
    }

    fn backward_kill_word(&mut self) -> Outcome {
        if self.cursor == 0 {
            return Outcome::Continue;
        }
        self.pop();
        let end = self.cursor;
        self.backward_word();
        let begin = self.cursor;
        let killed = self.buffer.as_bytes()[begin..end].to_vec();
        if self.last_command == Some(BackwardKillWord) {
            self.clipboard.prepend(&killed);
        } else {
            self.clipboard.assign(&killed);
        }
        self.buffer.erase(begin, end - begin);
        Outcome::Continue
    }

    fn yank(&mut self) -> Outcome {
        if !self.clipboard.is_empty() {
            let bytes = self.clipboard.as_bytes().to_vec();
            self.insert_literal(&bytes);
        }
        Outcome::Continue
    }

    fn verbatim(&mut self) -> Result<Outcome> {
        self.render_now()?;
        let byte = self.terminal.read_byte()?;
        self.insert_literal(&[byte]);
        Ok(Outcome::Continue)
    }

    fn accept_line(&mut self) -> Result<Outcome> {
        self.pop();
        // Malformed UTF-8 in the buffer is never fatal here; lossily
        // convert rather than propagating a `Utf8Error` out of `read()`.
        let line = String::from_utf8_lossy(self.buffer.as_bytes()).into_owned();
        self.history.push(&line);
        if let Some(path) = self.history_file.clone() {
            self.history.write(&path)?;
        }
        Ok(Outcome::Accept)
    }

    fn terminate(&mut self) -> Result<Outcome> {
        self.terminal.write(b"\n")?;
        self.terminal.flush()?;
        self.terminal.leave_raw_mode()?;
        log::warn!("editor: terminate invoked, exiting process");
        std::process::exit(1);
    }

    fn end_of_file(&mut self) -> Result<Outcome> {
        if self.current_bytes().is_empty() {
            self.terminate()
        } else {
            Ok(self.delete_char())
        }
    }
}
