//! Unix raw-mode session using termios.

use std::io::{self, Read, Write};
use std::os::unix::io::AsRawFd;

use crate::error::{Error, Result};
use crate::terminal::RawTerminal;

/// stdin/stdout under termios raw mode.
pub struct StdioTerminal {
    stdin: io::Stdin,
    stdout: io::Stdout,
    original_termios: Option<libc::termios>,
}

impl StdioTerminal {
    pub fn new() -> Self {
        Self {
            stdin: io::stdin(),
            stdout: io::stdout(),
            original_termios: None,
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
        self.stdin.read_exact(&mut buf).map_err(Error::Io)?;
        Ok(buf[0])
    }

    fn write(&mut self, data: &[u8]) -> Result<()> {
        self.stdout.write_all(data).map_err(Error::Io)
    }

    fn flush(&mut self) -> Result<()> {
        self.stdout.flush().map_err(Error::Io)
    }

    fn enter_raw_mode(&mut self) -> Result<()> {
        let fd = self.stdin.as_raw_fd();

        unsafe {
            let mut termios: libc::termios = std::mem::zeroed();

            if libc::tcgetattr(fd, &mut termios) != 0 {
                return Err(Error::Io(io::Error::last_os_error()));
            }

            self.original_termios = Some(termios);

            termios.c_lflag &= !(libc::ECHO | libc::ICANON);
            termios.c_cc[libc::VMIN] = 1;
            termios.c_cc[libc::VTIME] = 0;

            if libc::tcsetattr(fd, libc::TCSAFLUSH, &termios) != 0 {
                return Err(Error::Io(io::Error::last_os_error()));
            }
        }

        Ok(())
    }

    fn leave_raw_mode(&mut self) -> Result<()> {
        if let Some(original) = self.original_termios.take() {
            let fd = self.stdin.as_raw_fd();

            unsafe {
                if libc::tcsetattr(fd, libc::TCSAFLUSH, &original) != 0 {
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
