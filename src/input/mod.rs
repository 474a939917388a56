//! Key Translation Module
//!
//! Translates local key presses into the byte sequences the child expects.
//! The result depends on three terminal modes:
//! - VT52 vs ANSI escape syntax
//! - Application keypad mode (DECKPAM/DECKPNM)
//! - Cursor key mode (DECCKM)
//!
//! Cursor keys are governed by VT52 and cursor key mode alone; keypad and
//! PF keys by VT52 and application keypad mode. Translation never mutates
//! terminal state.

use crate::core::TerminalState;

/// Keys the translator knows about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    // Cursor keys
    Up,
    Down,
    Left,
    Right,

    // PF1-PF4
    F1,
    F2,
    F3,
    F4,

    // Function keys
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Editing keypad
    Home,
    End,
    Insert,
    Delete,
    PageUp,
    PageDown,

    // Numeric keypad
    Keypad0,
    Keypad1,
    Keypad2,
    Keypad3,
    Keypad4,
    Keypad5,
    Keypad6,
    Keypad7,
    Keypad8,
    Keypad9,
    KeypadMinus,
    KeypadComma,
    KeypadPeriod,
    KeypadEnter,

    Backspace,
    Tab,
    Return,
    Escape,
    /// Any other byte, sent as is
    Char(u8),
}

/// The modes key translation depends on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct KeyModes {
    pub vt52: bool,
    pub application_keypad: bool,
    pub cursor_key_mode: bool,
    /// Return sends CR LF
    pub newline: bool,
}

impl From<&TerminalState> for KeyModes {
    fn from(state: &TerminalState) -> Self {
        KeyModes {
            vt52: state.vt52,
            application_keypad: state.application_keypad,
            cursor_key_mode: state.cursor_key_mode,
            newline: state.linefeed_is_newline,
        }
    }
}

/// Translate a key press into the bytes to send to the child
///
/// Returns `None` for keys with no meaning in the current mode.
pub fn translate_key(key: Key, modes: KeyModes) -> Option<Vec<u8>> {
    let bytes = match key {
        Key::Up => cursor_key(b'A', modes),
        Key::Down => cursor_key(b'B', modes),
        Key::Right => cursor_key(b'C', modes),
        Key::Left => cursor_key(b'D', modes),

        Key::F1 => pf_key(b'P', modes),
        Key::F2 => pf_key(b'Q', modes),
        Key::F3 => pf_key(b'R', modes),
        Key::F4 => pf_key(b'S', modes),

        Key::Home => tilde_key(1, modes)?,
        Key::Insert => tilde_key(2, modes)?,
        Key::Delete => tilde_key(3, modes)?,
        Key::End => tilde_key(4, modes)?,
        Key::PageUp => tilde_key(5, modes)?,
        Key::PageDown => tilde_key(6, modes)?,
        Key::F5 => tilde_key(15, modes)?,
        Key::F6 => tilde_key(17, modes)?,
        Key::F7 => tilde_key(18, modes)?,
        Key::F8 => tilde_key(19, modes)?,
        Key::F9 => tilde_key(20, modes)?,
        Key::F10 => tilde_key(21, modes)?,
        Key::F11 => tilde_key(23, modes)?,
        Key::F12 => tilde_key(24, modes)?,

        Key::Keypad0 => keypad_key(b'0', b'p', modes),
        Key::Keypad1 => keypad_key(b'1', b'q', modes),
        Key::Keypad2 => keypad_key(b'2', b'r', modes),
        Key::Keypad3 => keypad_key(b'3', b's', modes),
        Key::Keypad4 => keypad_key(b'4', b't', modes),
        Key::Keypad5 => keypad_key(b'5', b'u', modes),
        Key::Keypad6 => keypad_key(b'6', b'v', modes),
        Key::Keypad7 => keypad_key(b'7', b'w', modes),
        Key::Keypad8 => keypad_key(b'8', b'x', modes),
        Key::Keypad9 => keypad_key(b'9', b'y', modes),
        Key::KeypadMinus => keypad_key(b'-', b'm', modes),
        Key::KeypadComma => keypad_key(b',', b'l', modes),
        Key::KeypadPeriod => keypad_key(b'.', b'n', modes),
        Key::KeypadEnter => {
            if modes.application_keypad {
                keypad_key(b'\r', b'M', modes)
            } else {
                return_key(modes)
            }
        },

        Key::Backspace => vec![0x7f],
        Key::Tab => vec![0x09],
        Key::Return => return_key(modes),
        Key::Escape => vec![0x1b],
        Key::Char(b) => vec![b],
    };
    Some(bytes)
}

/// Arrow keys: `ESC A` in VT52, `ESC O A` in cursor key mode, else `ESC [ A`
fn cursor_key(code: u8, modes: KeyModes) -> Vec<u8> {
    if modes.vt52 {
        vec![0x1b, code]
    } else if modes.cursor_key_mode {
        vec![0x1b, b'O', code]
    } else {
        vec![0x1b, b'[', code]
    }
}

fn pf_key(code: u8, modes: KeyModes) -> Vec<u8> {
    if modes.vt52 {
        vec![0x1b, code]
    } else {
        vec![0x1b, b'O', code]
    }
}

/// `ESC [ n ~`; VT52 has no such keys
fn tilde_key(n: u8, modes: KeyModes) -> Option<Vec<u8>> {
    if modes.vt52 {
        return None;
    }
    Some(format!("\x1b[{n}~").into_bytes())
}

/// Numeric keypad: the plain character, or `ESC ? x` / `ESC O x` in
/// application keypad mode
fn keypad_key(plain: u8, code: u8, modes: KeyModes) -> Vec<u8> {
    match (modes.application_keypad, modes.vt52) {
        (false, _) => vec![plain],
        (true, true) => vec![0x1b, b'?', code],
        (true, false) => vec![0x1b, b'O', code],
    }
}

fn return_key(modes: KeyModes) -> Vec<u8> {
    if modes.newline {
        vec![b'\r', b'\n']
    } else {
        vec![b'\r']
    }
}
