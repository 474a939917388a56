//! Error types
//!
//! Nothing the terminal engine does is fatal: protocol problems are logged
//! and parsing carries on. `TermError` exists so those log records (and the
//! single user-visible case, an over-long line) share one formatting.

/// Errors raised while interpreting the child's byte stream
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TermError {
    #[error("line {row} too long (max {max} characters)")]
    LineTooLong { row: usize, max: usize },

    #[error("unsupported sequence: {0}")]
    Unsupported(String),

    #[error("bad escape sequence: {0}")]
    BadSequence(String),
}

/// Errors from the mode transition controller
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("session is not in terminal mode")]
    NotInTerminalMode,
}

/// Render raw sequence bytes the way they show up in log records,
/// e.g. `ESC[1;2x`.
pub fn escape_for_log(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() + 4);
    for &b in bytes {
        match b {
            0x1b => out.push_str("ESC"),
            0x20..=0x7e => out.push(b as char),
            _ => out.push_str(&format!("\\x{b:02x}")),
        }
    }
    out
}
