//! Padterm Terminal Engine Library
//!
//! VT100/VT52 terminal emulation for a line-oriented screen editor. The
//! engine consumes the byte stream of a child shell, keeps a line-based
//! screen with rendition runs and a scroll region, hands scrolled-out lines
//! to a history store, and translates key presses back into escape
//! sequences.
//!
//! - `core`: screen model, lines, renditions, terminal state, snapshots
//! - `parser`: byte-level escape sequence dispatcher
//! - `extract`: recovery of inline renditions from history lines
//! - `input`: key translation
//! - `terminal`: the engine tying the above together
//! - `session`: switching an editing session in and out of terminal mode
//! - `host`: the seam to the window and the child process

pub mod app;
pub mod core;
pub mod error;
pub mod extract;
pub mod host;
pub mod input;
pub mod parser;
pub mod session;
pub mod terminal;

pub use app::{DeviceIdentity, TermConfig};
pub use error::{SessionError, TermError};
pub use host::{Host, RecordingHost};
pub use session::{Mode, Session, Transition};
pub use terminal::Terminal;
