//! A platform-agnostic single-line editor with history, key bindings and
//! full editing capabilities.
//!
//! Complete separation of I/O from editing logic via the [`RawTerminal`]
//! trait: the editor core never touches a real terminal directly, so hosts
//! can swap in any byte-oriented session (a real tty, a pty, a mock) and
//! tests run without one at all.
//!
//! ```no_run
//! use keyline::{EditorBuilder, terminals::StdioTerminal};
//!
//! # fn main() -> keyline::Result<()> {
//! let mut editor = EditorBuilder::new()
//!     .history_file("/tmp/keyline-demo.history")
//!     .build(StdioTerminal::new())?;
//!
//! let line = editor.read("keyline>")?;
//! println!("you typed: {line}");
//! # Ok(())
//! # }
//! ```

mod buffer;
mod commands;
mod editor;
mod error;
mod fsm;
mod history;
mod render;
mod terminal;
pub mod terminals;
mod util;

pub use buffer::EditBuffer;
pub use editor::{Editor, EditorBuilder, Outcome};
pub use error::{Error, Result};
pub use fsm::{Binding, CommandId, FeedResult, Fsm};
pub use history::History;
pub use render::RenderState;
pub use terminal::RawTerminal;
