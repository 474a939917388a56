//! Screen lines
//!
//! A line is either live (part of the terminal view, text plus rendition
//! runs) or history (text only). Scrolling a line out of the view is the
//! single conversion point between the two: [`LiveScreenLine::into_history`].
//!
//! Text is a byte string: one byte per column, no padding past the last
//! written column.

use serde::{Deserialize, Serialize};

use super::rendition::{Rendition, RunList};

/// A write did not fit within the maximum line length
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Truncated;

/// A line that is part of the live terminal view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiveScreenLine {
    text: Vec<u8>,
    runs: RunList,
}

impl LiveScreenLine {
    pub fn new() -> Self {
        Self::default()
    }

    /// A live line holding `text` in default video
    pub fn from_text(text: Vec<u8>) -> Self {
        Self {
            text,
            runs: RunList::new(),
        }
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn runs(&self) -> &RunList {
        &self.runs
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True if the line holds nothing but spaces
    pub fn is_blank(&self) -> bool {
        self.text.iter().all(|&b| b == b' ')
    }

    /// Write `byte` at `col`, replacing what is there
    pub fn overwrite(
        &mut self,
        col: usize,
        byte: u8,
        rendition: Option<Rendition>,
        max_len: usize,
    ) -> Result<(), Truncated> {
        if col >= max_len {
            return Err(Truncated);
        }
        self.pad_to(col + 1);
        self.text[col] = byte;
        self.runs.paint(col, col + 1, rendition);
        Ok(())
    }

    /// Insert `byte` at `col`, shifting the rest of the line right
    ///
    /// When the line is already full the last character falls off the end
    /// and `Truncated` is reported after the insertion.
    pub fn insert(
        &mut self,
        col: usize,
        byte: u8,
        rendition: Option<Rendition>,
        max_len: usize,
    ) -> Result<(), Truncated> {
        if col >= max_len {
            return Err(Truncated);
        }
        self.pad_to(col);
        self.text.insert(col, byte);
        self.runs.insert_gap(col, 1);
        self.runs.paint(col, col + 1, rendition);

        if self.text.len() > max_len {
            self.text.truncate(max_len);
            self.runs.truncate(max_len);
            return Err(Truncated);
        }
        Ok(())
    }

    /// Insert `count` blanks at `col` in default video
    pub fn insert_blanks(&mut self, col: usize, count: usize, max_len: usize) -> Result<(), Truncated> {
        if col >= self.text.len() || count == 0 {
            return Ok(());
        }
        self.text
            .splice(col..col, std::iter::repeat(b' ').take(count));
        self.runs.insert_gap(col, count);

        if self.text.len() > max_len {
            self.text.truncate(max_len);
            self.runs.truncate(max_len);
            return Err(Truncated);
        }
        Ok(())
    }

    /// Delete `count` characters at `col`; the rest of the line shifts left
    pub fn delete(&mut self, col: usize, count: usize) {
        if col >= self.text.len() {
            return;
        }
        let end = col.saturating_add(count).min(self.text.len());
        self.text.drain(col..end);
        self.runs.remove(col, count);
        self.runs.truncate(self.text.len());
    }

    /// Blank `count` characters in place starting at `col`
    pub fn erase(&mut self, col: usize, count: usize) {
        let end = col.saturating_add(count);
        let text_end = end.min(self.text.len());
        if col < text_end {
            self.text[col..text_end].fill(b' ');
        }
        self.runs.paint(col, end, None);
    }

    /// Erase from `col` to the end of the line
    pub fn clear_from(&mut self, col: usize) {
        self.text.truncate(col);
        self.runs.truncate(col);
    }

    /// Erase from the start of the line through `col` inclusive
    pub fn clear_to(&mut self, col: usize) {
        self.erase(0, col + 1);
    }

    /// Erase the whole line, discarding its runs
    pub fn clear(&mut self) {
        self.text.clear();
        self.runs.clear();
    }

    pub fn clear_runs(&mut self) {
        self.runs.clear();
    }

    /// Hollow the line into history
    ///
    /// With `keep_renditions` the runs are re-encoded as inline SGR
    /// sequences so the rendition can be recovered from the text later;
    /// otherwise the history line is plain text.
    pub fn into_history(self, keep_renditions: bool) -> HistoryLine {
        if !keep_renditions || self.runs.is_empty() {
            return HistoryLine::new(self.text);
        }

        let mut text = Vec::with_capacity(self.text.len() + self.runs.len() * 8);
        let mut col = 0;
        for run in self.runs.iter() {
            let first = run.first_col.min(self.text.len());
            let end = run.end_col.min(self.text.len());
            if first >= end {
                continue;
            }
            text.extend_from_slice(&self.text[col..first]);
            text.extend_from_slice(&run.rendition.to_sgr());
            text.extend_from_slice(&self.text[first..end]);
            text.extend_from_slice(b"\x1b[0m");
            col = end;
        }
        text.extend_from_slice(&self.text[col..]);
        HistoryLine::new(text)
    }

    fn pad_to(&mut self, len: usize) {
        if self.text.len() < len {
            self.text.resize(len, b' ');
        }
    }
}

/// A line that has left the live view
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryLine {
    text: Vec<u8>,
}

impl HistoryLine {
    pub fn new(text: Vec<u8>) -> Self {
        Self { text }
    }

    pub fn text(&self) -> &[u8] {
        &self.text
    }

    pub fn into_text(self) -> Vec<u8> {
        self.text
    }
}
