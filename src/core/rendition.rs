//! Renditions and rendition runs
//!
//! A [`Rendition`] is the color-attribute handle applied to newly inserted
//! characters. It records what the child asked for (an SGR color index and
//! the reverse-video flag); the session's [`ColorTable`] is consulted only
//! when a rendition is turned into a displayable color-pair label.
//!
//! A [`RunList`] is the per-line overlay of column ranges sharing one
//! rendition. Runs are kept sorted by first column, never overlap, are never
//! empty, and adjacent runs with the same rendition are coalesced.

use serde::{Deserialize, Serialize};

/// Names of the eight base SGR colors, in SGR order
const COLOR_NAMES: [&str; 8] = [
    "black", "red", "green", "yellow", "blue", "magenta", "cyan", "white",
];

/// A color selected by SGR
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Color {
    /// The window's default foreground or background
    #[default]
    Default,
    /// Base (0-7) or bright (8-15) color index
    Indexed(u8),
}

impl Color {
    /// Human-readable name, e.g. `red` or `bright-blue`
    pub fn name(&self) -> String {
        match *self {
            Color::Default => "default".to_string(),
            Color::Indexed(i) if i < 8 => COLOR_NAMES[i as usize].to_string(),
            Color::Indexed(i) => format!("bright-{}", COLOR_NAMES[(i % 8) as usize]),
        }
    }
}

/// A foreground/background pair of color names, as configured by the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorPair {
    pub fg: String,
    pub bg: String,
}

impl ColorPair {
    pub fn new(fg: impl Into<String>, bg: impl Into<String>) -> Self {
        Self {
            fg: fg.into(),
            bg: bg.into(),
        }
    }
}

/// Session-configured substitutions for the eight SGR colors
///
/// When slot `i` is set, SGR 3i/9i select the whole pair and SGR 4i selects
/// the pair's background.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorTable(pub [Option<ColorPair>; 8]);

impl ColorTable {
    pub fn get(&self, index: u8) -> Option<&ColorPair> {
        self.0.get((index % 8) as usize).and_then(Option::as_ref)
    }

    pub fn set(&mut self, index: u8, pair: ColorPair) {
        if let Some(slot) = self.0.get_mut(index as usize) {
            *slot = Some(pair);
        }
    }
}

/// The color-attribute handle carried by runs and by the terminal state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rendition {
    pub fg: Color,
    pub bg: Color,
    pub reverse: bool,
}

impl Rendition {
    /// True when this rendition is indistinguishable from default video
    pub fn is_plain(&self) -> bool {
        *self == Rendition::default()
    }

    /// The color pair label, e.g. `red-on-default`
    ///
    /// Reverse video swaps the pair; a defaulted side is then named after
    /// the window color it borrows (`background-on-foreground`).
    pub fn label(&self, table: &ColorTable) -> String {
        let mut fg = "default".to_string();
        let mut bg = "default".to_string();

        if let Color::Indexed(i) = self.fg {
            match table.get(i) {
                Some(pair) => {
                    fg = pair.fg.clone();
                    bg = pair.bg.clone();
                },
                None => fg = self.fg.name(),
            }
        }
        if let Color::Indexed(i) = self.bg {
            bg = match table.get(i) {
                Some(pair) => pair.bg.clone(),
                None => self.bg.name(),
            };
        }

        if self.reverse {
            let fg = if fg == "default" { "foreground".to_string() } else { fg };
            let bg = if bg == "default" { "background".to_string() } else { bg };
            format!("{bg}-on-{fg}")
        } else {
            format!("{fg}-on-{bg}")
        }
    }

    /// SGR parameters that reproduce this rendition from a reset state
    pub fn sgr_params(&self) -> Vec<u16> {
        let mut params = Vec::with_capacity(3);
        if self.reverse {
            params.push(7);
        }
        if let Color::Indexed(i) = self.fg {
            params.push(if i < 8 { 30 + i as u16 } else { 90 + (i - 8) as u16 });
        }
        if let Color::Indexed(i) = self.bg {
            params.push(40 + (i % 8) as u16);
        }
        params
    }

    /// The `ESC [ ... m` sequence selecting this rendition
    pub fn to_sgr(&self) -> Vec<u8> {
        let params: Vec<String> = self.sgr_params().iter().map(u16::to_string).collect();
        format!("\x1b[{}m", params.join(";")).into_bytes()
    }
}

/// Fold SGR parameters into the current rendition
///
/// An empty parameter list behaves like `0`. Returns `None` for default video.
/// Unrecognized parameters are logged and skipped.
pub fn apply_sgr(current: Option<Rendition>, params: &[u16]) -> Option<Rendition> {
    if params.is_empty() {
        return None;
    }

    let mut rendition = current.unwrap_or_default();
    for &param in params {
        match param {
            0 | 27 => rendition = Rendition::default(),
            7 => rendition.reverse = true,
            30..=37 => rendition.fg = Color::Indexed((param - 30) as u8),
            90..=97 => rendition.fg = Color::Indexed((param - 90 + 8) as u8),
            40..=47 => rendition.bg = Color::Indexed((param - 40) as u8),
            _ => tracing::debug!(param, "ignoring unrecognized SGR parameter"),
        }
    }

    if rendition.is_plain() {
        None
    } else {
        Some(rendition)
    }
}

/// A column range `[first_col, end_col)` drawn with one rendition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenditionRun {
    pub first_col: usize,
    pub end_col: usize,
    pub rendition: Rendition,
}

impl RenditionRun {
    pub fn new(first_col: usize, end_col: usize, rendition: Rendition) -> Self {
        Self {
            first_col,
            end_col,
            rendition,
        }
    }
}

/// Ordered, non-overlapping rendition runs of one screen line
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunList {
    runs: Vec<RenditionRun>,
}

impl RunList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn len(&self) -> usize {
        self.runs.len()
    }

    pub fn runs(&self) -> &[RenditionRun] {
        &self.runs
    }

    pub fn iter(&self) -> impl Iterator<Item = &RenditionRun> {
        self.runs.iter()
    }

    pub fn clear(&mut self) {
        self.runs.clear();
    }

    /// Give columns `[first, end)` the rendition `rendition`
    ///
    /// Runs straddling the range are split; `None` just carves the range out.
    /// If the list cannot grow the call is abandoned and the old runs stay.
    pub fn paint(&mut self, first: usize, end: usize, rendition: Option<Rendition>) {
        if first >= end {
            return;
        }

        let mut out: Vec<RenditionRun> = Vec::new();
        if out.try_reserve(self.runs.len() + 2).is_err() {
            tracing::debug!("out of memory painting rendition run, highlighting dropped");
            return;
        }

        let mut placed = rendition.is_none();
        for run in &self.runs {
            if run.end_col <= first || run.first_col >= end {
                if !placed && run.first_col >= end {
                    if let Some(r) = rendition {
                        out.push(RenditionRun::new(first, end, r));
                    }
                    placed = true;
                }
                out.push(*run);
                continue;
            }
            if run.first_col < first {
                out.push(RenditionRun::new(run.first_col, first, run.rendition));
            }
            if !placed {
                if let Some(r) = rendition {
                    out.push(RenditionRun::new(first, end, r));
                }
                placed = true;
            }
            if run.end_col > end {
                out.push(RenditionRun::new(end, run.end_col, run.rendition));
            }
        }
        if !placed {
            if let Some(r) = rendition {
                out.push(RenditionRun::new(first, end, r));
            }
        }

        self.runs = out;
        self.coalesce();
    }

    /// Open a gap of `count` columns at `col`, shifting later runs right
    ///
    /// A run straddling `col` is split around the gap.
    pub fn insert_gap(&mut self, col: usize, count: usize) {
        if count == 0 {
            return;
        }

        let mut out = Vec::with_capacity(self.runs.len() + 1);
        for run in &self.runs {
            if run.first_col >= col {
                out.push(RenditionRun::new(
                    run.first_col + count,
                    run.end_col + count,
                    run.rendition,
                ));
            } else if run.end_col > col {
                out.push(RenditionRun::new(run.first_col, col, run.rendition));
                out.push(RenditionRun::new(col + count, run.end_col + count, run.rendition));
            } else {
                out.push(*run);
            }
        }
        self.runs = out;
    }

    /// Remove `count` columns at `col`, shifting later runs left
    pub fn remove(&mut self, col: usize, count: usize) {
        if count == 0 {
            return;
        }

        let end = col.saturating_add(count);
        let map = |x: usize| {
            if x <= col {
                x
            } else if x >= end {
                x - count
            } else {
                col
            }
        };

        self.runs = self
            .runs
            .iter()
            .map(|run| RenditionRun::new(map(run.first_col), map(run.end_col), run.rendition))
            .filter(|run| run.first_col < run.end_col)
            .collect();
        self.coalesce();
    }

    /// Drop everything at or beyond `col`
    pub fn truncate(&mut self, col: usize) {
        self.runs.retain(|run| run.first_col < col);
        if let Some(last) = self.runs.last_mut() {
            last.end_col = last.end_col.min(col);
        }
    }

    /// True if the list is sorted, non-overlapping and has no empty runs
    pub fn is_well_formed(&self) -> bool {
        self.runs.iter().all(|run| run.first_col < run.end_col)
            && self
                .runs
                .windows(2)
                .all(|pair| pair[0].end_col <= pair[1].first_col)
    }

    fn coalesce(&mut self) {
        let mut merged: Vec<RenditionRun> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            if run.first_col >= run.end_col {
                continue;
            }
            match merged.last_mut() {
                Some(prev) if prev.end_col == run.first_col && prev.rendition == run.rendition => {
                    prev.end_col = run.end_col;
                },
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}
