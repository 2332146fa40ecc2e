//! Gap-free edit buffer.
//!
//! A growable byte sequence with insert/erase/assign/append/prepend at byte
//! offsets. No codepoint awareness lives here; callers (the editor core and
//! the commands) are responsible for keeping offsets aligned on codepoint
//! boundaries.

/// Mutable line contents, shared by the in-progress buffer and the
/// clipboard.
#[derive(Debug, Default, Clone)]
pub struct EditBuffer {
    bytes: Vec<u8>,
}

impl EditBuffer {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn as_str(&self) -> Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.bytes)
    }

    /// Replaces the whole buffer with `bytes`.
    pub fn assign(&mut self, bytes: &[u8]) {
        self.bytes.clear();
        self.bytes.extend_from_slice(bytes);
    }

    /// Inserts `bytes` at `offset`, shifting the remainder right.
    pub fn insert(&mut self, offset: usize, bytes: &[u8]) {
        self.bytes.splice(offset..offset, bytes.iter().copied());
    }

    /// Inserts a single byte at `offset`.
    pub fn insert_char(&mut self, offset: usize, byte: u8) {
        self.bytes.insert(offset, byte);
    }

    /// Removes up to `count` bytes starting at `offset`, clamped to the
    /// bytes actually available (a malformed UTF-8 lead byte can claim a
    /// codepoint length that runs past the end of the buffer).
    pub fn erase(&mut self, offset: usize, count: usize) {
        let end = (offset + count).min(self.bytes.len());
        self.bytes.drain(offset..end);
    }

    /// Appends `bytes` to the end.
    pub fn append(&mut self, bytes: &[u8]) {
        self.bytes.extend_from_slice(bytes);
    }

    /// Inserts `bytes` at the beginning.
    pub fn prepend(&mut self, bytes: &[u8]) {
        self.bytes.splice(0..0, bytes.iter().copied());
    }

    pub fn clear(&mut self) {
        self.bytes.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_and_erase() {
        let mut buf = EditBuffer::with_capacity(8);
        buf.assign(b"helo");
        buf.insert(3, b"l");
        assert_eq!(buf.as_bytes(), b"hello");
        buf.erase(0, 1);
        assert_eq!(buf.as_bytes(), b"ello");
    }

    #[test]
    fn append_and_prepend() {
        let mut buf = EditBuffer::with_capacity(8);
        buf.assign(b"bar");
        buf.prepend(b"foo ");
        buf.append(b" baz");
        assert_eq!(buf.as_bytes(), b"foo bar baz");
    }

    #[test]
    fn insert_char_shifts_tail() {
        let mut buf = EditBuffer::with_capacity(4);
        buf.assign(b"ac");
        buf.insert_char(1, b'b');
        assert_eq!(buf.as_bytes(), b"abc");
    }
}
