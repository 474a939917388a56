//! Escape sequence dispatcher
//!
//! A byte-at-a-time state machine that applies the child's output to the
//! screen: printable bytes are inserted, control characters act, and
//! ESC / CSI sequences are dispatched through fixed tables. Replies to
//! status requests go back to the child through the host.

mod csi;
mod esc;
mod state;

pub use csi::{Params, MAX_PARAMS};
pub use state::{Dispatcher, MAX_PENDING};
