//! The abstract raw-mode session: everything the editor core needs from a
//! concrete terminal, and nothing else. Multi-byte key *recognition* is the
//! FSM's job (see [`crate::fsm`]); this trait only moves bytes.

use crate::error::Result;

/// Platform abstraction for a single controlling terminal.
///
/// Implement this for any byte-oriented input/output device: a real
/// terminal, a UART, a mock used in tests, or a pty.
pub trait RawTerminal {
    /// Reads one byte, blocking until one is available.
    fn read_byte(&mut self) -> Result<u8>;

    /// Writes raw bytes to the output.
    fn write(&mut self, data: &[u8]) -> Result<()>;

    /// Flushes any buffered output.
    fn flush(&mut self) -> Result<()>;

    /// Disables line buffering and local echo, saving prior settings so
    /// [`RawTerminal::leave_raw_mode`] can restore them.
    fn enter_raw_mode(&mut self) -> Result<()>;

    /// Restores the settings saved by [`RawTerminal::enter_raw_mode`].
    fn leave_raw_mode(&mut self) -> Result<()>;
}
