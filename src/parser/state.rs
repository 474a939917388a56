//! Dispatcher State Machine
//!
//! Walks the child's byte stream one byte at a time. Control characters
//! act immediately, printable bytes go to the screen, and escape sequences
//! are collected until complete and then dispatched through the ESC and
//! CSI tables.
//!
//! States:
//! - Ground: normal text processing
//! - Escape: after ESC, waiting for the command byte
//! - Csi: after ESC [, collecting parameters up to a terminator
//! - CsiIgnore: malformed CSI, discarding through the next final byte
//! - Charset: after ESC ( ) * +, one designator byte follows
//! - Hash: after ESC #, one byte follows
//! - Select: after ESC %, one byte follows
//! - Vt52Address: after VT52 ESC Y, row and column bytes follow
//!
//! The bytes of a sequence in progress are held in `pending`, so a sequence
//! cut off at the end of a chunk simply resumes with the next chunk. Feeding
//! a stream in pieces therefore behaves exactly like feeding it whole.

use super::csi::{self, Params};
use super::esc;
use crate::app::DeviceIdentity;
use crate::core::{CursorMove, DirtyRange, Screen, TerminalState};
use crate::error::{escape_for_log, TermError};
use crate::host::Host;

const ESC: u8 = 0x1b;

/// Longest sequence held in `pending`; longer ones are discarded
pub const MAX_PENDING: usize = 256;

/// Dispatcher state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Ground,
    Escape,
    Csi,
    CsiIgnore,
    Charset,
    Hash,
    Select,
    Vt52Address,
}

/// Everything a dispatched command may touch
pub(crate) struct Ctx<'a> {
    pub state: &'a mut TerminalState,
    pub screen: &'a mut Screen,
    pub host: &'a mut dyn Host,
    pub identity: DeviceIdentity,
}

impl Ctx<'_> {
    pub fn move_cursor(&mut self, mv: CursorMove) {
        self.screen.move_cursor(self.state, mv);
    }

    /// Line feed, optionally returning the carriage as well
    pub fn linefeed(&mut self, carriage_return: bool) {
        let mut mv = CursorMove::by(1, 0).scrolling();
        if carriage_return {
            mv = CursorMove {
                col: crate::core::Axis::To(0),
                ..mv
            };
        }
        self.move_cursor(mv);
    }

    pub fn reverse_index(&mut self) {
        self.move_cursor(CursorMove::by(-1, 0).scrolling());
    }

    /// Cursor to the origin: the top margin in relative origin mode
    pub fn home(&mut self) {
        let row = if self.state.origin_relative {
            self.state.top_margin()
        } else {
            0
        };
        self.move_cursor(CursorMove::to(row, 0));
    }

    /// Absolute positioning with 1-based `row` and `col`
    pub fn cursor_to(&mut self, row: usize, col: usize) {
        let row = row.max(1) - 1;
        let col = col.max(1) - 1;
        if self.state.origin_relative {
            let row = self.state.top_margin() + row;
            self.move_cursor(CursorMove::to(row, col).clamped());
        } else {
            self.move_cursor(CursorMove::to(row, col));
        }
    }

    pub fn save_cursor(&mut self) {
        let cursor = self.screen.cursor();
        self.state.saved_cursor = Some(crate::core::SavedCursor {
            row: cursor.row,
            col: cursor.col,
            origin_relative: self.state.origin_relative,
        });
    }

    /// Restore the saved cursor; with nothing saved the cursor goes home
    pub fn restore_cursor(&mut self) {
        match self.state.saved_cursor {
            Some(saved) => {
                self.state.origin_relative = saved.origin_relative;
                self.move_cursor(CursorMove::to(saved.row, saved.col));
            },
            None => {
                self.state.origin_relative = false;
                self.move_cursor(CursorMove::to(0, 0));
            },
        }
    }

    pub fn reply(&mut self, bytes: &[u8]) {
        tracing::trace!(reply = %escape_for_log(bytes), "replying to child");
        self.host.send_to_child(bytes);
    }

    /// Report an error the user should see
    pub fn report(&mut self, err: TermError) {
        tracing::warn!(%err, "terminal error");
        self.host.notify_error(&err);
    }

    /// Recognized but not implemented
    pub fn unsupported(&self, seq: &[u8]) {
        let err = TermError::Unsupported(escape_for_log(seq));
        tracing::debug!(%err, "ignoring sequence");
    }

    /// Power-on reset of modes, margins and screen
    pub fn full_reset(&mut self) {
        self.state.reset();
        self.screen.erase_area(crate::core::EraseKind::All, true);
        self.move_cursor(CursorMove::to(0, 0));
    }
}

/// The escape-sequence dispatcher for one terminal session
#[derive(Debug)]
pub struct Dispatcher {
    state: State,
    /// Bytes of the escape sequence in progress, starting at its ESC
    pending: Vec<u8>,
    identity: DeviceIdentity,
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(DeviceIdentity::default())
    }
}

impl Dispatcher {
    /// Create a new dispatcher in the ground state
    pub fn new(identity: DeviceIdentity) -> Self {
        Self {
            state: State::Ground,
            pending: Vec::with_capacity(32),
            identity,
        }
    }

    /// Drop any partial sequence
    pub fn reset(&mut self) {
        self.state = State::Ground;
        self.pending.clear();
    }

    /// The incomplete sequence held over from the previous chunk
    pub fn pending(&self) -> &[u8] {
        &self.pending
    }

    /// Interpret a chunk of child output
    ///
    /// Returns the part of the screen that changed.
    pub fn process(
        &mut self,
        chunk: &[u8],
        state: &mut TerminalState,
        screen: &mut Screen,
        host: &mut dyn Host,
    ) -> DirtyRange {
        let mut ctx = Ctx {
            state,
            screen,
            host,
            identity: self.identity,
        };
        for &byte in chunk {
            self.process_byte(byte, &mut ctx);
        }
        ctx.screen.take_dirty()
    }

    fn process_byte(&mut self, byte: u8, ctx: &mut Ctx<'_>) {
        if self.state == State::Ground {
            self.process_ground(byte, ctx);
            return;
        }

        match byte {
            ESC => {
                tracing::warn!(
                    sequence = %escape_for_log(&self.pending),
                    "escape sequence interrupted by ESC"
                );
                self.begin_escape();
            },
            // CAN, SUB abort the sequence
            0x18 | 0x1a => self.finish(),
            // Other controls act without disturbing the sequence
            0x00..=0x1f => execute_control(byte, ctx),
            0x7f => {},
            _ => {
                if self.pending.len() < MAX_PENDING {
                    self.pending.push(byte);
                } else if self.state == State::Csi {
                    self.state = State::CsiIgnore;
                }
                match self.state {
                    // handled above
                    State::Ground => {},
                    State::Escape => self.process_escape(byte, ctx),
                    State::Csi => self.process_csi(byte, ctx),
                    State::CsiIgnore => self.process_csi_ignore(byte),
                    State::Charset | State::Hash | State::Select => {
                        ctx.unsupported(&self.pending);
                        self.finish();
                    },
                    State::Vt52Address => self.process_vt52_address(ctx),
                }
            },
        }
    }

    fn process_ground(&mut self, byte: u8, ctx: &mut Ctx<'_>) {
        match byte {
            ESC => self.begin_escape(),
            0x00..=0x1f | 0x7f => execute_control(byte, ctx),
            _ => {
                if let Err(err) = ctx.screen.insert_char(ctx.state, byte) {
                    ctx.report(err);
                }
            },
        }
    }

    fn process_escape(&mut self, byte: u8, ctx: &mut Ctx<'_>) {
        match byte {
            b'[' if !ctx.state.vt52 => self.state = State::Csi,
            b'(' | b')' | b'*' | b'+' => self.state = State::Charset,
            b'#' => self.state = State::Hash,
            b'%' => self.state = State::Select,
            b'Y' if ctx.state.vt52 => self.state = State::Vt52Address,
            _ => {
                self.finish();
                esc::dispatch(byte, ctx);
            },
        }
    }

    fn process_csi(&mut self, byte: u8, ctx: &mut Ctx<'_>) {
        match byte {
            b'0'..=b'9' | b';' => {},
            // Private marker directly after ESC [
            b'?' if self.pending.len() == 3 => {},
            b' ' | 0x40..=0x7e => {
                let body = &self.pending[2..self.pending.len() - 1];
                let params = Params::parse(body);
                let sequence = std::mem::take(&mut self.pending);
                self.finish();
                csi::dispatch(byte, &params, &sequence, ctx);
            },
            _ => self.state = State::CsiIgnore,
        }
    }

    fn process_csi_ignore(&mut self, byte: u8) {
        if (0x40..=0x7e).contains(&byte) {
            let err = TermError::BadSequence(escape_for_log(&self.pending));
            tracing::warn!(%err, "discarding malformed control sequence");
            self.finish();
        }
    }

    fn process_vt52_address(&mut self, ctx: &mut Ctx<'_>) {
        // ESC Y <row + 32> <col + 32>
        if self.pending.len() < 4 {
            return;
        }
        let row = self.pending[2].saturating_sub(32) as usize;
        let col = self.pending[3].saturating_sub(32) as usize;
        self.finish();
        ctx.move_cursor(CursorMove::to(row, col));
    }

    fn begin_escape(&mut self) {
        self.pending.clear();
        self.pending.push(ESC);
        self.state = State::Escape;
    }

    fn finish(&mut self) {
        self.state = State::Ground;
        self.pending.clear();
    }
}

/// Execute a C0 control character
fn execute_control(byte: u8, ctx: &mut Ctx<'_>) {
    match byte {
        // NUL
        0x00 => {},
        // BEL
        0x07 => ctx.host.bell(),
        // BS
        0x08 => ctx.move_cursor(CursorMove::by(0, -1)),
        // HT
        0x09 => ctx.screen.tab_forward(ctx.state, 1),
        // LF, VT
        0x0a | 0x0b => {
            let newline = ctx.state.linefeed_is_newline;
            ctx.linefeed(newline);
        },
        // FF
        0x0c => {
            let err = TermError::Unsupported("form feed".to_string());
            tracing::warn!(%err, "rejecting control character");
        },
        // CR
        0x0d => ctx.move_cursor(CursorMove::to_col(0)),
        // SO, SI: character sets are not switched
        0x0e | 0x0f => {},
        _ => tracing::trace!(byte, "ignoring control character"),
    }
}
