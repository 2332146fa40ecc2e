//! Crate-wide error type.
//!
//! The core editing logic is infallible; everything that can fail does so
//! at the I/O boundary: the raw-mode session, stdout, and history file
//! persistence. This enum is the single currency for all of it.

use std::path::PathBuf;

/// Errors produced by [`crate::Editor`] and its collaborators.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A read or write against the terminal or the history file failed.
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    /// The line buffer or a history entry contained bytes that are not
    /// valid UTF-8 where a `str` was required.
    #[error("invalid utf-8: {0}")]
    InvalidUtf8(#[from] std::str::Utf8Error),

    /// Loading or saving the history file failed; carries the path for
    /// diagnostics since the underlying `io::Error` does not.
    #[error("history file {path:?}: {source}")]
    HistoryFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the crate in place of `std::io::Result`.
pub type Result<T> = std::result::Result<T, Error>;
