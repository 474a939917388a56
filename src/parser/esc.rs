//! Two-byte escape sequences
//!
//! `ESC x` is looked up in one of two tables depending on whether the
//! terminal is in ANSI or VT52 mode. Sequences that take further bytes
//! (`ESC [`, `ESC (`, `ESC #`, VT52 `ESC Y`) are routed by the state machine
//! before they get here.

use super::state::Ctx;
use crate::core::{CursorMove, EraseKind};

/// Reply to VT52 identify (`ESC Z`)
const VT52_IDENTITY: &[u8] = b"\x1b/Z";

pub(crate) fn dispatch(byte: u8, ctx: &mut Ctx<'_>) {
    if ctx.state.vt52 {
        vt52(byte, ctx);
    } else {
        ansi(byte, ctx);
    }
}

fn ansi(byte: u8, ctx: &mut Ctx<'_>) {
    match byte {
        // IND
        b'D' => ctx.linefeed(false),
        // NEL
        b'E' => ctx.linefeed(true),
        // RI
        b'M' => ctx.reverse_index(),
        // HTS
        b'H' => {
            let col = ctx.screen.cursor().col;
            if !ctx.state.tab_stops.set(col) {
                tracing::debug!(col, "tab stop table full");
            }
        },
        // DECSC / DECRC
        b'7' => ctx.save_cursor(),
        b'8' => ctx.restore_cursor(),
        // DECKPAM / DECKPNM
        b'=' => ctx.state.application_keypad = true,
        b'>' => ctx.state.application_keypad = false,
        // DECID
        b'Z' => {
            let reply = ctx.identity.attributes_reply();
            ctx.reply(reply);
        },
        // RIS
        b'c' => ctx.full_reset(),
        // Single and locking shifts
        b'N' | b'O' | b'n' | b'o' | b'~' | b'}' | b'|' => ctx.unsupported(&[0x1b, byte]),
        _ => tracing::warn!(byte = %(byte as char), "unrecognized escape sequence"),
    }
}

fn vt52(byte: u8, ctx: &mut Ctx<'_>) {
    match byte {
        b'A' => ctx.move_cursor(CursorMove::by(-1, 0)),
        b'B' => ctx.move_cursor(CursorMove::by(1, 0)),
        b'C' => ctx.move_cursor(CursorMove::by(0, 1)),
        b'D' => ctx.move_cursor(CursorMove::by(0, -1)),
        b'H' => ctx.move_cursor(CursorMove::to(0, 0)),
        // Reverse line feed
        b'I' => ctx.reverse_index(),
        b'J' => ctx.screen.erase_area(EraseKind::ToEnd, true),
        b'K' => ctx.screen.erase_area(EraseKind::ToEnd, false),
        b'Z' => ctx.reply(VT52_IDENTITY),
        b'=' => ctx.state.application_keypad = true,
        b'>' => ctx.state.application_keypad = false,
        // Back to ANSI mode
        b'<' => ctx.state.vt52 = false,
        // Graphics character set
        b'F' | b'G' => ctx.unsupported(&[0x1b, byte]),
        _ => tracing::warn!(byte = %(byte as char), "unrecognized VT52 escape sequence"),
    }
}
