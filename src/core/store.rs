//! Line stores
//!
//! The editor keeps its text in a line-numbered store. The terminal engine
//! only needs the handful of operations below; [`VecLineStore`] is the
//! in-memory implementation used for the terminal's scratch history.

use serde::{Deserialize, Serialize};

/// Line-numbered text storage (0-based line numbers)
pub trait LineStore {
    /// Text of line `line`, if it exists
    fn get(&self, line: usize) -> Option<&[u8]>;

    /// Replace line `line`; returns false if it does not exist
    fn put(&mut self, line: usize, text: Vec<u8>) -> bool;

    /// Insert a line before `line`; positions past the end append
    fn insert(&mut self, line: usize, text: Vec<u8>);

    /// Remove line `line`, returning its text
    fn delete(&mut self, line: usize) -> Option<Vec<u8>>;

    fn total_lines(&self) -> usize;

    fn append(&mut self, text: Vec<u8>) {
        let end = self.total_lines();
        self.insert(end, text);
    }
}

/// A line store backed by a vector
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct VecLineStore {
    lines: Vec<Vec<u8>>,
}

impl VecLineStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines<I, L>(lines: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<Vec<u8>>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &[u8]> {
        self.lines.iter().map(Vec::as_slice)
    }

    pub fn into_lines(self) -> Vec<Vec<u8>> {
        self.lines
    }
}

impl LineStore for VecLineStore {
    fn get(&self, line: usize) -> Option<&[u8]> {
        self.lines.get(line).map(Vec::as_slice)
    }

    fn put(&mut self, line: usize, text: Vec<u8>) -> bool {
        match self.lines.get_mut(line) {
            Some(slot) => {
                *slot = text;
                true
            },
            None => false,
        }
    }

    fn insert(&mut self, line: usize, text: Vec<u8>) {
        let line = line.min(self.lines.len());
        self.lines.insert(line, text);
    }

    fn delete(&mut self, line: usize) -> Option<Vec<u8>> {
        if line < self.lines.len() {
            Some(self.lines.remove(line))
        } else {
            None
        }
    }

    fn total_lines(&self) -> usize {
        self.lines.len()
    }
}
