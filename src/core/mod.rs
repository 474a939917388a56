//! Terminal Core Module
//!
//! Screen-side state of the terminal engine. This module contains:
//! - Renditions and per-line rendition runs
//! - Live screen lines and their conversion to history lines
//! - The screen model, cursor motion and dirty-range tracking
//! - Modes, margins and tab stops
//! - The line store seam to the editor's buffer
//! - Deterministic snapshot generation
//!
//! Nothing here parses bytes; the dispatcher in `parser` drives it.

mod line;
mod rendition;
mod screen;
mod snapshot;
mod state;
mod store;

pub use line::{HistoryLine, LiveScreenLine, Truncated};
pub use rendition::{apply_sgr, Color, ColorPair, ColorTable, Rendition, RenditionRun, RunList};
pub use screen::{Axis, Cursor, CursorMove, DirtyRange, EraseKind, Screen};
pub use snapshot::{LineSnapshot, ModeSnapshot, RunSnapshot, Snapshot};
pub use state::{SavedCursor, TabStops, TerminalState, MAX_TAB_STOPS, TAB_WIDTH};
pub use store::{LineStore, VecLineStore};
