//! Deterministic snapshot generation
//!
//! Snapshots capture the screen, modes and history size in a serializable
//! format for testing and debugging. Given the same byte stream, the
//! terminal must produce identical snapshots however the stream was split
//! into chunks.

use serde::{Deserialize, Serialize};

use super::line::LiveScreenLine;
use super::rendition::{ColorTable, RenditionRun};
use super::screen::{Cursor, Screen};
use super::state::TerminalState;
use super::store::LineStore;

/// A complete snapshot of the terminal state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Screen dimensions
    pub rows: usize,
    pub cols: usize,
    /// Live lines, top to bottom
    pub lines: Vec<LineSnapshot>,
    pub cursor: Cursor,
    /// Scroll region (0-based, inclusive)
    pub top_margin: usize,
    pub bottom_margin: usize,
    pub modes: ModeSnapshot,
    /// Lines handed to history so far
    pub history_len: usize,
}

/// Snapshot of one live line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineSnapshot {
    pub text: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub runs: Vec<RunSnapshot>,
}

/// Snapshot of a rendition run `[first_col, end_col)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSnapshot {
    pub first_col: usize,
    pub end_col: usize,
    /// Color-pair label, e.g. `red-on-default`
    pub pair: String,
}

/// Snapshot of terminal modes
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSnapshot {
    #[serde(default, skip_serializing_if = "is_false")]
    pub vt52: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub autowrap: bool,
    /// False means insert mode
    pub overstrike: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub cursor_key_mode: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub application_keypad: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub origin_relative: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub column132: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub local_echo: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub linefeed_is_newline: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub keyboard_locked: bool,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl From<&TerminalState> for ModeSnapshot {
    fn from(state: &TerminalState) -> Self {
        ModeSnapshot {
            vt52: state.vt52,
            autowrap: state.autowrap,
            overstrike: state.overstrike,
            cursor_key_mode: state.cursor_key_mode,
            application_keypad: state.application_keypad,
            origin_relative: state.origin_relative,
            column132: state.column132,
            local_echo: state.local_echo,
            linefeed_is_newline: state.linefeed_is_newline,
            keyboard_locked: state.keyboard_locked,
        }
    }
}

impl RunSnapshot {
    fn new(run: &RenditionRun, table: &ColorTable) -> Self {
        RunSnapshot {
            first_col: run.first_col,
            end_col: run.end_col,
            pair: run.rendition.label(table),
        }
    }
}

impl LineSnapshot {
    fn new(line: &LiveScreenLine, table: &ColorTable) -> Self {
        LineSnapshot {
            text: String::from_utf8_lossy(line.text()).into_owned(),
            runs: line.runs().iter().map(|run| RunSnapshot::new(run, table)).collect(),
        }
    }
}

impl Snapshot {
    /// Capture `screen` and `state`, labelling runs through `table`
    pub fn capture(screen: &Screen, state: &TerminalState, table: &ColorTable) -> Self {
        Snapshot {
            rows: screen.rows(),
            cols: screen.cols(),
            lines: screen
                .lines()
                .iter()
                .map(|line| LineSnapshot::new(line, table))
                .collect(),
            cursor: screen.cursor(),
            top_margin: state.top_margin(),
            bottom_margin: state.bottom_margin(),
            modes: ModeSnapshot::from(state),
            history_len: screen.history().total_lines(),
        }
    }

    /// Convert snapshot to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Parse snapshot from JSON string
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Plain text of the live lines, one per row, trailing blank rows dropped
    pub fn to_text(&self) -> String {
        let mut result = String::new();
        for line in &self.lines {
            result.push_str(line.text.trim_end_matches(' '));
            result.push('\n');
        }
        while result.ends_with("\n\n") {
            result.pop();
        }
        result
    }
}
