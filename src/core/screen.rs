//! Screen model implementation
//!
//! The screen is the live terminal view: `rows` live lines, the cursor, and
//! the scratch history store that lines scrolled out of the view are handed
//! to. All cursor motion funnels through [`Screen::move_cursor`]; every
//! mutation records what needs redrawing in a [`DirtyRange`].

use serde::{Deserialize, Serialize};

use super::line::LiveScreenLine;
use super::rendition::ColorTable;
use super::state::TerminalState;
use super::store::{LineStore, VecLineStore};
use crate::error::TermError;
use crate::extract::{extract, ColorEncoding};

/// Region of the screen that needs redrawing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DirtyRange {
    /// Nothing changed
    #[default]
    Clean,
    /// One line changed from `first_col` onward
    Line { row: usize, first_col: usize },
    /// Rows `first..=last` changed
    Rows { first: usize, last: usize },
}

impl DirtyRange {
    pub fn is_clean(&self) -> bool {
        matches!(self, DirtyRange::Clean)
    }

    /// Smallest range covering both `self` and `other`
    pub fn merge(self, other: DirtyRange) -> DirtyRange {
        match (self, other) {
            (DirtyRange::Clean, range) | (range, DirtyRange::Clean) => range,
            (
                DirtyRange::Line { row: a, first_col: ca },
                DirtyRange::Line { row: b, first_col: cb },
            ) if a == b => DirtyRange::Line {
                row: a,
                first_col: ca.min(cb),
            },
            (a, b) => {
                let (a_first, a_last) = a.row_span();
                let (b_first, b_last) = b.row_span();
                DirtyRange::Rows {
                    first: a_first.min(b_first),
                    last: a_last.max(b_last),
                }
            },
        }
    }

    fn row_span(&self) -> (usize, usize) {
        match *self {
            DirtyRange::Clean => (usize::MAX, 0),
            DirtyRange::Line { row, .. } => (row, row),
            DirtyRange::Rows { first, last } => (first, last),
        }
    }
}

/// Cursor position (0-based)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Cursor {
    pub row: usize,
    pub col: usize,
}

/// One coordinate of a cursor move
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// Absolute position
    To(usize),
    /// Offset from the current position
    By(isize),
}

/// A cursor motion request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorMove {
    pub row: Axis,
    pub col: Axis,
    /// Keep the row inside the scroll region
    pub clamp_to_region: bool,
    /// Scroll the region instead of stopping at its edge
    pub scroll: bool,
}

impl CursorMove {
    pub fn to(row: usize, col: usize) -> Self {
        Self {
            row: Axis::To(row),
            col: Axis::To(col),
            clamp_to_region: false,
            scroll: false,
        }
    }

    pub fn by(rows: isize, cols: isize) -> Self {
        Self {
            row: Axis::By(rows),
            col: Axis::By(cols),
            clamp_to_region: false,
            scroll: false,
        }
    }

    pub fn to_col(col: usize) -> Self {
        Self {
            row: Axis::By(0),
            col: Axis::To(col),
            clamp_to_region: false,
            scroll: false,
        }
    }

    pub fn clamped(mut self) -> Self {
        self.clamp_to_region = true;
        self
    }

    pub fn scrolling(mut self) -> Self {
        self.scroll = true;
        self
    }
}

/// Which part of a line or of the screen an erase covers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EraseKind {
    /// Cursor to end
    ToEnd,
    /// Start through cursor
    FromStart,
    /// Everything
    All,
}

impl EraseKind {
    pub fn from_param(param: u16) -> Option<Self> {
        match param {
            0 => Some(EraseKind::ToEnd),
            1 => Some(EraseKind::FromStart),
            2 => Some(EraseKind::All),
            _ => None,
        }
    }
}

/// The live terminal view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Screen {
    rows: usize,
    cols: usize,
    max_line_len: usize,
    /// Re-encode runs as inline SGR when lines move to history
    history_renditions: bool,
    lines: Vec<LiveScreenLine>,
    history: VecLineStore,
    cursor: Cursor,
    dirty: DirtyRange,
}

impl Screen {
    pub fn new(rows: usize, cols: usize, max_line_len: usize) -> Self {
        let rows = rows.max(1);
        let cols = cols.max(1);
        Self {
            rows,
            cols,
            max_line_len: max_line_len.max(cols),
            history_renditions: true,
            lines: (0..rows).map(|_| LiveScreenLine::new()).collect(),
            history: VecLineStore::new(),
            cursor: Cursor::default(),
            dirty: DirtyRange::Clean,
        }
    }

    pub fn set_history_renditions(&mut self, keep: bool) {
        self.history_renditions = keep;
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn max_line_len(&self) -> usize {
        self.max_line_len
    }

    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn line(&self, row: usize) -> Option<&LiveScreenLine> {
        self.lines.get(row)
    }

    pub fn lines(&self) -> &[LiveScreenLine] {
        &self.lines
    }

    /// Text of a live row, lossily decoded (for tests and snapshots)
    pub fn row_text(&self, row: usize) -> String {
        self.lines
            .get(row)
            .map(|line| String::from_utf8_lossy(line.text()).into_owned())
            .unwrap_or_default()
    }

    /// Lines that have scrolled out of the view during this session
    pub fn history(&self) -> &VecLineStore {
        &self.history
    }

    /// A history line with its inline renditions recovered
    pub fn history_colored(
        &self,
        line: usize,
        table: &ColorTable,
    ) -> Option<(Vec<u8>, Option<ColorEncoding>)> {
        self.history.get(line).map(|text| extract(text, table))
    }

    /// Accumulated dirty range, resetting it to clean
    pub fn take_dirty(&mut self) -> DirtyRange {
        std::mem::take(&mut self.dirty)
    }

    fn mark(&mut self, range: DirtyRange) {
        self.dirty = self.dirty.merge(range);
    }

    fn mark_line(&mut self, row: usize, first_col: usize) {
        self.mark(DirtyRange::Line { row, first_col });
    }

    fn mark_rows(&mut self, first: usize, last: usize) {
        self.mark(DirtyRange::Rows { first, last });
    }

    /// Replace the first line with `prompt` and park the cursor after it
    ///
    /// A prompt filling the whole width leaves the cursor at the start of
    /// the next line, as if it had been typed with autowrap.
    pub fn seed_prompt(&mut self, prompt: Vec<u8>) {
        self.cursor = if prompt.len() < self.cols {
            Cursor { row: 0, col: prompt.len() }
        } else if self.rows > 1 {
            Cursor { row: 1, col: 0 }
        } else {
            Cursor { row: 0, col: self.cols - 1 }
        };
        self.lines[0] = LiveScreenLine::from_text(prompt);
        self.mark_rows(0, self.rows - 1);
    }

    /// Move the cursor
    ///
    /// The column is clamped to the screen. The row is clamped to the scroll
    /// region when requested (for relative moves only while the cursor is
    /// inside the region), otherwise to the screen. With `scroll` set, a move
    /// that starts inside the region and would leave it scrolls the region
    /// instead.
    pub fn move_cursor(&mut self, state: &TerminalState, mv: CursorMove) {
        let old = self.cursor;
        let top = state.top_margin();
        let bottom = state.bottom_margin().min(self.rows - 1);

        let mut row = match mv.row {
            Axis::To(r) => r as isize,
            Axis::By(d) => old.row as isize + d,
        };
        let col = match mv.col {
            Axis::To(c) => c as isize,
            Axis::By(d) => old.col as isize + d,
        };
        let col = col.clamp(0, self.cols as isize - 1) as usize;

        if mv.scroll && state.in_region(old.row) {
            if row > bottom as isize {
                self.scroll_up(state, (row - bottom as isize) as usize);
                row = bottom as isize;
            } else if row < top as isize {
                self.scroll_down(state, (top as isize - row) as usize);
                row = top as isize;
            }
        }

        let use_region = mv.clamp_to_region
            && (matches!(mv.row, Axis::To(_)) || state.in_region(old.row));
        let (lo, hi) = if use_region {
            (top, bottom)
        } else {
            (0, self.rows - 1)
        };
        let row = row.clamp(lo as isize, hi as isize) as usize;

        self.cursor = Cursor { row, col };
        if row != old.row {
            self.mark_line(old.row, old.col);
        }
        self.mark_line(row, col.min(old.col));
    }

    /// Put a printable byte at the cursor and advance it
    ///
    /// Overstrike mode replaces the character under the cursor; insert mode
    /// shifts the rest of the line right. The character takes the current
    /// rendition. With autowrap the cursor wraps to the next line (scrolling
    /// if needed) as soon as the last column has been written.
    pub fn insert_char(&mut self, state: &TerminalState, byte: u8) -> Result<(), TermError> {
        let Cursor { row, col } = self.cursor;
        let max = self.max_line_len;
        let line = &mut self.lines[row];
        let written = if state.overstrike {
            line.overwrite(col, byte, state.rendition, max)
        } else {
            line.insert(col, byte, state.rendition, max)
        };
        self.mark_line(row, col);

        if col + 1 >= self.cols {
            if state.autowrap {
                self.move_cursor(
                    state,
                    CursorMove {
                        row: Axis::By(1),
                        col: Axis::To(0),
                        clamp_to_region: false,
                        scroll: true,
                    },
                );
            }
        } else {
            self.cursor.col = col + 1;
        }

        written.map_err(|_| TermError::LineTooLong { row, max })
    }

    /// Insert `count` blanks at the cursor, shifting the line right
    pub fn insert_blanks(&mut self, count: usize) -> Result<(), TermError> {
        let Cursor { row, col } = self.cursor;
        let max = self.max_line_len;
        let result = self.lines[row].insert_blanks(col, count, max);
        self.mark_line(row, col);
        result.map_err(|_| TermError::LineTooLong { row, max })
    }

    /// Delete `count` characters at the cursor; the rest shifts left
    pub fn delete_chars(&mut self, count: usize) {
        let Cursor { row, col } = self.cursor;
        self.lines[row].delete(col, count);
        self.mark_line(row, col);
    }

    /// Blank `count` characters from the cursor, continuing onto the
    /// following lines when `count` runs past the end of the screen line
    pub fn erase_chars(&mut self, count: usize) {
        let Cursor { row: first_row, col: first_col } = self.cursor;
        let mut remaining = count;
        let mut row = first_row;
        let mut col = first_col;

        while remaining > 0 && row < self.rows {
            let span = remaining.min(self.cols.saturating_sub(col));
            self.lines[row].erase(col, span);
            remaining -= span;
            row += 1;
            col = 0;
        }

        if row <= first_row + 1 {
            self.mark_line(first_row, first_col);
        } else {
            self.mark_rows(first_row, row - 1);
        }
    }

    /// Erase part of the current line, or of the whole screen
    pub fn erase_area(&mut self, kind: EraseKind, whole_screen: bool) {
        let Cursor { row, col } = self.cursor;
        match kind {
            EraseKind::ToEnd => {
                self.lines[row].clear_from(col);
                if whole_screen {
                    for line in &mut self.lines[row + 1..] {
                        line.clear();
                    }
                    self.mark_rows(row, self.rows - 1);
                } else {
                    self.mark_line(row, col);
                }
            },
            EraseKind::FromStart => {
                self.lines[row].clear_to(col);
                if whole_screen {
                    for line in &mut self.lines[..row] {
                        line.clear();
                    }
                    self.mark_rows(0, row);
                } else {
                    self.mark_line(row, 0);
                }
            },
            EraseKind::All => {
                if whole_screen {
                    for line in &mut self.lines {
                        line.clear();
                    }
                    self.mark_rows(0, self.rows - 1);
                } else {
                    self.lines[row].clear();
                    self.mark_line(row, 0);
                }
            },
        }
    }

    /// Insert `count` blank lines at the cursor row, pushing lines below it
    /// off the bottom margin; ignored outside the scroll region
    pub fn insert_lines(&mut self, state: &TerminalState, count: usize) {
        let row = self.cursor.row;
        if !state.in_region(row) {
            return;
        }
        let bottom = state.bottom_margin().min(self.rows - 1);
        let count = count.min(bottom - row + 1);
        for _ in 0..count {
            self.lines.remove(bottom);
            self.lines.insert(row, LiveScreenLine::new());
        }
        self.mark_rows(row, bottom);
    }

    /// Delete `count` lines at the cursor row, pulling blank lines in at the
    /// bottom margin; ignored outside the scroll region
    pub fn delete_lines(&mut self, state: &TerminalState, count: usize) {
        let row = self.cursor.row;
        if !state.in_region(row) {
            return;
        }
        let bottom = state.bottom_margin().min(self.rows - 1);
        let count = count.min(bottom - row + 1);
        for _ in 0..count {
            self.lines.remove(row);
            self.lines.insert(bottom, LiveScreenLine::new());
        }
        self.mark_rows(row, bottom);
    }

    /// Scroll the region up: the line at the top margin goes to history and
    /// a blank line appears at the bottom margin
    pub fn scroll_up(&mut self, state: &TerminalState, count: usize) {
        let top = state.top_margin();
        let bottom = state.bottom_margin().min(self.rows - 1);
        let count = count.min(bottom - top + 1);
        for _ in 0..count {
            let line = self.lines.remove(top);
            let history = line.into_history(self.history_renditions);
            self.history.append(history.into_text());
            self.lines.insert(bottom, LiveScreenLine::new());
        }
        if count > 0 {
            self.mark_rows(top, bottom);
        }
    }

    /// Scroll the region down: the line at the bottom margin is discarded
    /// and a blank line appears at the top margin
    pub fn scroll_down(&mut self, state: &TerminalState, count: usize) {
        let top = state.top_margin();
        let bottom = state.bottom_margin().min(self.rows - 1);
        let count = count.min(bottom - top + 1);
        for _ in 0..count {
            self.lines.remove(bottom);
            self.lines.insert(top, LiveScreenLine::new());
        }
        if count > 0 {
            self.mark_rows(top, bottom);
        }
    }

    /// Advance to the `count`th next tab stop, or the last column
    pub fn tab_forward(&mut self, state: &TerminalState, count: usize) {
        let mut col = self.cursor.col;
        for _ in 0..count {
            col = state
                .tab_stops
                .next_after(col)
                .unwrap_or(self.cols - 1)
                .min(self.cols - 1);
        }
        self.move_cursor(state, CursorMove::to_col(col));
    }

    /// Back up to the `count`th previous tab stop, or the first column
    pub fn tab_backward(&mut self, state: &TerminalState, count: usize) {
        let mut col = self.cursor.col;
        for _ in 0..count {
            col = state.tab_stops.prev_before(col).unwrap_or(0);
        }
        self.move_cursor(state, CursorMove::to_col(col));
    }

    /// Drop the rendition runs of every live line
    pub fn clear_runs(&mut self) {
        for line in &mut self.lines {
            line.clear_runs();
        }
        self.mark_rows(0, self.rows - 1);
    }

    /// Everything this session produced, oldest first: the history lines,
    /// then the live lines through the last used row, as plain text
    pub fn into_lines(self) -> Vec<Vec<u8>> {
        let last_used = self
            .lines
            .iter()
            .rposition(|line| !line.is_blank())
            .unwrap_or(0)
            .max(self.cursor.row);

        let mut out = self.history.into_lines();
        out.extend(
            self.lines
                .into_iter()
                .take(last_used + 1)
                .map(|line| line.into_history(false).into_text()),
        );
        out
    }
}
