//! Windows raw-mode session using the Console API.

use std::io::{self, Write};

use winapi::um::consoleapi::{GetConsoleMode, SetConsoleMode};
use winapi::um::fileapi::ReadFile;
use winapi::um::handleapi::INVALID_HANDLE_VALUE;
use winapi::um::processenv::GetStdHandle;
use winapi::um::winbase::STD_INPUT_HANDLE;
use winapi::um::wincon::{ENABLE_ECHO_INPUT, ENABLE_LINE_INPUT, ENABLE_PROCESSED_INPUT};
use winapi::um::winnt::HANDLE;

use crate::error::{Error, Result};
use crate::terminal::RawTerminal;

/// stdin/stdout under a Console-mode raw session.
pub struct StdioTerminal {
    stdin_handle: HANDLE,
    original_mode: Option<u32>,
}

impl StdioTerminal {
    /// Matches the Unix constructor's infallible shape (`StdioTerminal::new()
    /// -> Self`); an invalid console handle surfaces as an `Err` from
    /// [`RawTerminal::enter_raw_mode`] instead of from construction.
    pub fn new() -> Self {
        let stdin_handle = unsafe { GetStdHandle(STD_INPUT_HANDLE) };
        Self {
            stdin_handle,
            original_mode: None,
        }
    }
}

impl Default for StdioTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl RawTerminal for StdioTerminal {
    fn read_byte(&mut self) -> Result<u8> {
        let mut buf = [0u8; 1];
        let mut bytes_read: u32 = 0;

        unsafe {
            if ReadFile(
                self.stdin_handle,
                buf.as_mut_ptr() as *mut _,
                1,
                &mut bytes_read,
                std::ptr::null_mut(),
            ) == 0
            {
                return Err(Error::Io(io::Error::last_os_error()));
            }
        }

        if bytes_read == 0 {
            return Err(Error::Io(io::Error::new(io::ErrorKind::UnexpectedEof, "EOF")));
        }

        Ok(buf[0])
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        io::stdout().write_all(data).map_err(Error::Io)
    }

    fn flush(&mut self) -> Result<()> {
        io::stdout().flush().map_err(Error::Io)
    }

    fn enter_raw_mode(&mut self) -> Result<()> {
        if self.stdin_handle == INVALID_HANDLE_VALUE {
            return Err(Error::Io(io::Error::last_os_error()));
        }

        unsafe {
            let mut mode: u32 = 0;
            if GetConsoleMode(self.stdin_handle, &mut mode) == 0 {
                return Err(Error::Io(io::Error::last_os_error()));
            }

            self.original_mode = Some(mode);

            let new_mode = mode & !(ENABLE_LINE_INPUT | ENABLE_ECHO_INPUT | ENABLE_PROCESSED_INPUT);

            if SetConsoleMode(self.stdin_handle, new_mode) == 0 {
                return Err(Error::Io(io::Error::last_os_error()));
            }
        }

        Ok(())
    }

    fn leave_raw_mode(&mut self) -> Result<()> {
        if let Some(original) = self.original_mode.take() {
            unsafe {
                if SetConsoleMode(self.stdin_handle, original) == 0 {
                    return Err(Error::Io(io::Error::last_os_error()));
                }
            }
        }

        Ok(())
    }
}

impl Drop for StdioTerminal {
    fn drop(&mut self) {
        let _ = self.leave_raw_mode();
    }
}
