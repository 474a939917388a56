//! Control sequence (CSI) dispatch
//!
//! A complete `ESC [ params final` sequence is looked up by its final byte
//! in a fixed table of handlers. Parameters are decimal, `;`-separated, and
//! default to 0 when omitted; counts treat 0 as 1. A leading `?` marks a
//! DEC private sequence, which only set/reset mode understands.

use super::state::Ctx;
use crate::core::{apply_sgr, Axis, CursorMove, EraseKind};
use crate::error::{escape_for_log, TermError};

/// Maximum number of parameters kept; extra ones are dropped
pub const MAX_PARAMS: usize = 16;

/// Parsed CSI parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Params {
    values: Vec<u16>,
    private: bool,
}

impl Params {
    /// Parse the bytes between `ESC [` and the final byte
    pub fn parse(body: &[u8]) -> Self {
        let (private, body) = match body.first() {
            Some(b'?') => (true, &body[1..]),
            _ => (false, body),
        };

        let values = if body.is_empty() {
            Vec::new()
        } else {
            body.split(|&b| b == b';')
                .take(MAX_PARAMS)
                .map(|field| {
                    field
                        .iter()
                        .filter(|b| b.is_ascii_digit())
                        .fold(0u16, |acc, &d| {
                            acc.saturating_mul(10).saturating_add(u16::from(d - b'0'))
                        })
                })
                .collect()
        };

        Self { values, private }
    }

    /// Parameter `index`, 0 if omitted
    pub fn get(&self, index: usize) -> u16 {
        self.values.get(index).copied().unwrap_or(0)
    }

    /// Parameter `index` as a count: omitted or 0 means 1
    pub fn count(&self, index: usize) -> usize {
        self.get(index).max(1) as usize
    }

    pub fn values(&self) -> &[u16] {
        &self.values
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// DEC private sequence (`ESC [ ?`)
    pub fn is_private(&self) -> bool {
        self.private
    }
}

type Handler = fn(&Params, &mut Ctx<'_>);

/// The CSI table, keyed by final byte
fn handler(final_byte: u8) -> Option<Handler> {
    let handler: Handler = match final_byte {
        b'@' => insert_chars,
        b'A' => cursor_up,
        b'B' => cursor_down,
        b'C' => cursor_forward,
        b'D' => cursor_backward,
        b'E' => next_line,
        b'F' => previous_line,
        b'G' => cursor_column,
        b'H' | b'f' => cursor_position,
        b'I' => forward_tab,
        b'J' => erase_display,
        b'K' => erase_line,
        b'L' => insert_lines,
        b'M' => delete_lines,
        b'P' => delete_chars,
        b'R' => cursor_report,
        b'S' => scroll_up,
        b'T' => scroll_down,
        b'X' => erase_chars,
        b'Z' => backward_tab,
        b'c' => device_attributes,
        b'd' => cursor_row,
        b'g' => tab_clear,
        b'h' => set_mode,
        b'l' => reset_mode,
        b'm' => select_rendition,
        b'n' => device_status,
        b'q' => load_leds,
        b'r' => set_margins,
        b's' => save_cursor,
        b'u' => restore_cursor,
        b' ' => ignore,
        _ => return None,
    };
    Some(handler)
}

/// Run the handler for a complete control sequence
///
/// `sequence` is the full sequence text, used for diagnostics.
pub(crate) fn dispatch(final_byte: u8, params: &Params, sequence: &[u8], ctx: &mut Ctx<'_>) {
    if params.is_private() && !matches!(final_byte, b'h' | b'l') {
        ctx.unsupported(sequence);
        return;
    }
    match handler(final_byte) {
        Some(handler) => handler(params, ctx),
        None => {
            let err = TermError::BadSequence(escape_for_log(sequence));
            tracing::warn!(%err, "unrecognized control sequence");
        },
    }
}

fn ignore(_params: &Params, _ctx: &mut Ctx<'_>) {}

fn signed(n: usize) -> isize {
    n.min(isize::MAX as usize) as isize
}

fn cursor_up(params: &Params, ctx: &mut Ctx<'_>) {
    let n = signed(params.count(0));
    ctx.move_cursor(CursorMove::by(-n, 0).clamped());
}

fn cursor_down(params: &Params, ctx: &mut Ctx<'_>) {
    let n = signed(params.count(0));
    ctx.move_cursor(CursorMove::by(n, 0).clamped());
}

fn cursor_forward(params: &Params, ctx: &mut Ctx<'_>) {
    let n = signed(params.count(0));
    ctx.move_cursor(CursorMove::by(0, n));
}

fn cursor_backward(params: &Params, ctx: &mut Ctx<'_>) {
    let n = signed(params.count(0));
    ctx.move_cursor(CursorMove::by(0, -n));
}

fn next_line(params: &Params, ctx: &mut Ctx<'_>) {
    let n = signed(params.count(0));
    ctx.move_cursor(CursorMove {
        col: Axis::To(0),
        ..CursorMove::by(n, 0).clamped()
    });
}

fn previous_line(params: &Params, ctx: &mut Ctx<'_>) {
    let n = signed(params.count(0));
    ctx.move_cursor(CursorMove {
        col: Axis::To(0),
        ..CursorMove::by(-n, 0).clamped()
    });
}

fn cursor_column(params: &Params, ctx: &mut Ctx<'_>) {
    ctx.move_cursor(CursorMove::to_col(params.count(0) - 1));
}

fn cursor_row(params: &Params, ctx: &mut Ctx<'_>) {
    let row = params.count(0) - 1;
    let mv = if ctx.state.origin_relative {
        CursorMove {
            row: Axis::To(ctx.state.top_margin() + row),
            col: Axis::By(0),
            clamp_to_region: true,
            scroll: false,
        }
    } else {
        CursorMove {
            row: Axis::To(row),
            col: Axis::By(0),
            clamp_to_region: false,
            scroll: false,
        }
    };
    ctx.move_cursor(mv);
}

fn cursor_position(params: &Params, ctx: &mut Ctx<'_>) {
    ctx.cursor_to(params.count(0), params.count(1));
}

fn forward_tab(params: &Params, ctx: &mut Ctx<'_>) {
    ctx.screen.tab_forward(ctx.state, params.count(0));
}

fn backward_tab(params: &Params, ctx: &mut Ctx<'_>) {
    ctx.screen.tab_backward(ctx.state, params.count(0));
}

fn erase(params: &Params, ctx: &mut Ctx<'_>, whole_screen: bool) {
    match EraseKind::from_param(params.get(0)) {
        Some(kind) => ctx.screen.erase_area(kind, whole_screen),
        None => tracing::debug!(param = params.get(0), whole_screen, "unsupported erase"),
    }
}

fn erase_display(params: &Params, ctx: &mut Ctx<'_>) {
    erase(params, ctx, true);
}

fn erase_line(params: &Params, ctx: &mut Ctx<'_>) {
    erase(params, ctx, false);
}

fn insert_lines(params: &Params, ctx: &mut Ctx<'_>) {
    ctx.screen.insert_lines(ctx.state, params.count(0));
}

fn delete_lines(params: &Params, ctx: &mut Ctx<'_>) {
    ctx.screen.delete_lines(ctx.state, params.count(0));
}

fn insert_chars(params: &Params, ctx: &mut Ctx<'_>) {
    if let Err(err) = ctx.screen.insert_blanks(params.count(0)) {
        ctx.report(err);
    }
}

fn delete_chars(params: &Params, ctx: &mut Ctx<'_>) {
    ctx.screen.delete_chars(params.count(0));
}

fn erase_chars(params: &Params, ctx: &mut Ctx<'_>) {
    ctx.screen.erase_chars(params.count(0));
}

fn scroll_up(params: &Params, ctx: &mut Ctx<'_>) {
    ctx.screen.scroll_up(ctx.state, params.count(0));
}

fn scroll_down(params: &Params, ctx: &mut Ctx<'_>) {
    ctx.screen.scroll_down(ctx.state, params.count(0));
}

fn tab_clear(params: &Params, ctx: &mut Ctx<'_>) {
    match params.get(0) {
        0 => {
            let col = ctx.screen.cursor().col;
            ctx.state.tab_stops.clear(col);
        },
        3 => ctx.state.tab_stops.clear_all(),
        other => tracing::debug!(param = other, "unsupported tab clear"),
    }
}

fn select_rendition(params: &Params, ctx: &mut Ctx<'_>) {
    ctx.state.rendition = apply_sgr(ctx.state.rendition, params.values());
}

fn device_attributes(params: &Params, ctx: &mut Ctx<'_>) {
    if params.get(0) == 0 {
        let reply = ctx.identity.attributes_reply();
        ctx.reply(reply);
    }
}

fn device_status(params: &Params, ctx: &mut Ctx<'_>) {
    match params.get(0) {
        // Terminal OK
        5 => ctx.reply(b"\x1b[0n"),
        // Cursor position report, relative to the origin
        6 => {
            let cursor = ctx.screen.cursor();
            let row = if ctx.state.origin_relative {
                cursor.row.saturating_sub(ctx.state.top_margin())
            } else {
                cursor.row
            };
            let reply = format!("\x1b[{};{}R", row + 1, cursor.col + 1);
            ctx.reply(reply.as_bytes());
        },
        other => tracing::debug!(param = other, "unsupported status request"),
    }
}

fn cursor_report(_params: &Params, _ctx: &mut Ctx<'_>) {
    tracing::debug!("ignoring cursor position report from child");
}

fn load_leds(params: &Params, _ctx: &mut Ctx<'_>) {
    tracing::debug!(params = ?params.values(), "ignoring LED request");
}

fn set_margins(params: &Params, ctx: &mut Ctx<'_>) {
    if params.is_empty() {
        ctx.state.reset_margins();
    } else {
        let top = params.count(0) - 1;
        let bottom = match params.get(1) {
            0 => ctx.state.rows(),
            n => n as usize,
        };
        if !ctx.state.set_margins(top, bottom - 1) {
            return;
        }
    }
    ctx.home();
}

fn save_cursor(_params: &Params, ctx: &mut Ctx<'_>) {
    ctx.save_cursor();
}

fn restore_cursor(_params: &Params, ctx: &mut Ctx<'_>) {
    ctx.restore_cursor();
}

fn set_mode(params: &Params, ctx: &mut Ctx<'_>) {
    apply_modes(params, ctx, true);
}

fn reset_mode(params: &Params, ctx: &mut Ctx<'_>) {
    apply_modes(params, ctx, false);
}

fn apply_modes(params: &Params, ctx: &mut Ctx<'_>, on: bool) {
    for &mode in params.values() {
        if params.is_private() {
            set_dec_mode(mode, on, ctx);
        } else {
            set_ansi_mode(mode, on, ctx);
        }
    }
}

fn set_dec_mode(mode: u16, on: bool, ctx: &mut Ctx<'_>) {
    match mode {
        // DECCKM
        1 => ctx.state.cursor_key_mode = on,
        // DECANM: reset selects VT52
        2 => ctx.state.vt52 = !on,
        // DECCOLM
        3 => {
            ctx.state.column132 = on;
            ctx.state.reset_margins();
            ctx.screen.erase_area(EraseKind::All, true);
            ctx.move_cursor(CursorMove::to(0, 0));
        },
        // DECOM
        6 => {
            ctx.state.origin_relative = on;
            ctx.home();
        },
        // DECAWM
        7 => ctx.state.autowrap = on,
        _ => tracing::debug!(mode, on, "unsupported DEC private mode"),
    }
}

fn set_ansi_mode(mode: u16, on: bool, ctx: &mut Ctx<'_>) {
    match mode {
        // KAM
        2 => ctx.state.keyboard_locked = on,
        // IRM
        4 => ctx.state.overstrike = !on,
        // SRM: reset turns local echo on
        12 => ctx.state.local_echo = !on,
        // LNM
        20 => ctx.state.linefeed_is_newline = on,
        _ => tracing::debug!(mode, on, "unsupported ANSI mode"),
    }
}
