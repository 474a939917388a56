//! Terminal state
//!
//! The mode flags, scroll margins, tab stops, saved cursor and current
//! rendition of one terminal session. Every other component reads and
//! mutates this record; nothing here is global.

use serde::{Deserialize, Serialize};

use super::rendition::Rendition;

/// Maximum number of tab stops a terminal tracks
pub const MAX_TAB_STOPS: usize = 32;

/// Distance between power-on tab stops
pub const TAB_WIDTH: usize = 8;

/// Sorted set of tab-stop columns
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabStops {
    stops: Vec<usize>,
}

impl TabStops {
    /// Stops at every 8th column of a `cols`-wide screen
    pub fn power_on(cols: usize) -> Self {
        Self {
            stops: (TAB_WIDTH..cols)
                .step_by(TAB_WIDTH)
                .take(MAX_TAB_STOPS)
                .collect(),
        }
    }

    /// Add a stop at `col`; returns false if the set is full
    pub fn set(&mut self, col: usize) -> bool {
        match self.stops.binary_search(&col) {
            Ok(_) => true,
            Err(_) if self.stops.len() >= MAX_TAB_STOPS => {
                tracing::debug!(col, "tab stop table full, stop not set");
                false
            },
            Err(pos) => {
                self.stops.insert(pos, col);
                true
            },
        }
    }

    pub fn clear(&mut self, col: usize) {
        if let Ok(pos) = self.stops.binary_search(&col) {
            self.stops.remove(pos);
        }
    }

    pub fn clear_all(&mut self) {
        self.stops.clear();
    }

    /// First stop strictly right of `col`
    pub fn next_after(&self, col: usize) -> Option<usize> {
        self.stops.iter().copied().find(|&stop| stop > col)
    }

    /// Last stop strictly left of `col`
    pub fn prev_before(&self, col: usize) -> Option<usize> {
        self.stops.iter().rev().copied().find(|&stop| stop < col)
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.stops
    }
}

/// Cursor snapshot taken by "save cursor"
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedCursor {
    pub row: usize,
    pub col: usize,
    pub origin_relative: bool,
}

/// Modes, margins, tab stops and rendition of one terminal session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TerminalState {
    /// DECAWM - wrap to the next line after the last column
    pub autowrap: bool,
    /// DECANM reset - VT52 escape dispatch
    pub vt52: bool,
    /// IRM reset - characters replace rather than shift the line right
    pub overstrike: bool,
    /// DECCKM - cursor keys send `ESC O` sequences
    pub cursor_key_mode: bool,
    /// DECCOLM - 132 column mode requested
    pub column132: bool,
    /// SRM reset - typed keys are echoed locally
    pub local_echo: bool,
    /// DECKPAM - keypad sends application sequences
    pub application_keypad: bool,
    /// DECOM - cursor addressing relative to the top margin
    pub origin_relative: bool,
    /// LNM - line feed also returns the carriage
    pub linefeed_is_newline: bool,
    /// KAM - keyboard locked
    pub keyboard_locked: bool,

    top_margin: usize,
    bottom_margin: usize,
    margins_explicit: bool,

    pub tab_stops: TabStops,
    pub saved_cursor: Option<SavedCursor>,
    /// Rendition for newly inserted characters; `None` is default video
    pub rendition: Option<Rendition>,

    rows: usize,
    cols: usize,
    autowrap_default: bool,
}

impl TerminalState {
    pub fn new(rows: usize, cols: usize, autowrap_default: bool) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            autowrap: autowrap_default,
            vt52: false,
            overstrike: true,
            cursor_key_mode: false,
            column132: false,
            local_echo: false,
            application_keypad: false,
            origin_relative: false,
            linefeed_is_newline: false,
            keyboard_locked: false,
            top_margin: 0,
            bottom_margin: rows - 1,
            margins_explicit: false,
            tab_stops: TabStops::power_on(cols),
            saved_cursor: None,
            rendition: None,
            rows,
            cols,
            autowrap_default,
        }
    }

    /// Back to power-on defaults for the same screen size
    pub fn reset(&mut self) {
        *self = Self::new(self.rows, self.cols, self.autowrap_default);
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn top_margin(&self) -> usize {
        self.top_margin
    }

    pub fn bottom_margin(&self) -> usize {
        self.bottom_margin
    }

    /// True when the current margins came from an explicit margin command
    pub fn margins_explicitly_set(&self) -> bool {
        self.margins_explicit
    }

    /// Set the scroll region to rows `top..=bottom` (0-based)
    ///
    /// A region smaller than two lines is rejected and the margins are left
    /// alone. Returns whether the margins changed.
    pub fn set_margins(&mut self, top: usize, bottom: usize) -> bool {
        let bottom = bottom.min(self.rows - 1);
        if top >= bottom {
            tracing::debug!(top, bottom, "rejecting scroll region");
            return false;
        }
        self.top_margin = top;
        self.bottom_margin = bottom;
        self.margins_explicit = true;
        true
    }

    /// Full-screen scroll region, as at power-on
    pub fn reset_margins(&mut self) {
        self.top_margin = 0;
        self.bottom_margin = self.rows - 1;
        self.margins_explicit = false;
    }

    /// True if `row` lies within the scroll region
    pub fn in_region(&self, row: usize) -> bool {
        self.top_margin <= row && row <= self.bottom_margin
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_power_on_tab_stops() {
        let tabs = TabStops::power_on(80);
        assert_eq!(tabs.as_slice(), &[8, 16, 24, 32, 40, 48, 56, 64, 72]);
        assert_eq!(tabs.next_after(0), Some(8));
        assert_eq!(tabs.next_after(8), Some(16));
        assert_eq!(tabs.next_after(72), None);
        assert_eq!(tabs.prev_before(17), Some(16));
        assert_eq!(tabs.prev_before(8), None);
    }

    #[test]
    fn test_tab_stops_stay_sorted_and_bounded() {
        let mut tabs = TabStops::power_on(0);
        assert!(tabs.set(20));
        assert!(tabs.set(3));
        assert!(tabs.set(20));
        assert_eq!(tabs.as_slice(), &[3, 20]);

        tabs.clear_all();
        for col in 0..MAX_TAB_STOPS {
            assert!(tabs.set(col * 2));
        }
        assert!(!tabs.set(1000));
        assert_eq!(tabs.as_slice().len(), MAX_TAB_STOPS);
    }

    #[test]
    fn test_defaults() {
        let state = TerminalState::new(24, 80, true);
        assert!(state.autowrap);
        assert!(state.overstrike);
        assert!(!state.vt52);
        assert_eq!(state.top_margin(), 0);
        assert_eq!(state.bottom_margin(), 23);
        assert!(!state.margins_explicitly_set());
        assert_eq!(state.rendition, None);
    }

    #[test]
    fn test_margins() {
        let mut state = TerminalState::new(24, 80, false);
        assert!(state.set_margins(1, 9));
        assert!(state.margins_explicitly_set());
        assert!(state.in_region(5));
        assert!(!state.in_region(10));

        assert!(!state.set_margins(5, 5));
        assert_eq!(state.top_margin(), 1);

        assert!(state.set_margins(0, 100));
        assert_eq!(state.bottom_margin(), 23);
        assert!(state.margins_explicitly_set());

        state.reset_margins();
        assert!(!state.margins_explicitly_set());
    }

    #[test]
    fn test_reset_keeps_geometry_and_autowrap_default() {
        let mut state = TerminalState::new(10, 40, false);
        state.autowrap = true;
        state.vt52 = true;
        state.set_margins(2, 5);
        state.reset();
        assert!(!state.autowrap);
        assert!(!state.vt52);
        assert_eq!(state.bottom_margin(), 9);
        assert_eq!(state.tab_stops.as_slice(), &[8, 16, 24, 32]);
    }
}
