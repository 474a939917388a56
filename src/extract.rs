//! Inline rendition extraction
//!
//! History lines may still carry the SGR sequences that colored them. This
//! module strips those sequences out of a line and turns them into the
//! column-range color encoding understood by the editor's color store.
//!
//! Each SGR change yields one record `{first_col, MAX, pair}` anchored at
//! the output column reached so far. Records are kept newest first and are
//! resolved first-match-wins, so a later change overrides an earlier one
//! from its own column onward.

use std::fmt;

use crate::core::{apply_sgr, ColorTable, Rendition};

/// One open-ended color change
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorRecord {
    pub first_col: usize,
    /// Last column covered; `None` stands for "to the end of the line"
    pub last_col: Option<usize>,
    pub pair: String,
    /// True when the change returns to default video
    pub is_default: bool,
}

/// A resolved, non-overlapping colored span `[first_col, end_col)`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorSpan {
    pub first_col: usize,
    pub end_col: usize,
    pub pair: String,
}

/// Color encoding of one line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorEncoding {
    records: Vec<ColorRecord>,
    line_len: usize,
}

impl ColorEncoding {
    /// Records in first-match-wins order (newest first)
    pub fn records(&self) -> &[ColorRecord] {
        &self.records
    }

    /// Resolve the records into colored spans, dropping default video
    pub fn spans(&self) -> Vec<ColorSpan> {
        let mut spans: Vec<ColorSpan> = Vec::new();
        let discovered: Vec<&ColorRecord> = self.records.iter().rev().collect();

        for (i, record) in discovered.iter().enumerate() {
            let end = discovered
                .get(i + 1)
                .map_or(self.line_len, |next| next.first_col)
                .min(record.last_col.map_or(usize::MAX, |last| last.saturating_add(1)));
            if record.is_default || record.first_col >= end {
                continue;
            }
            match spans.last_mut() {
                Some(prev) if prev.end_col == record.first_col && prev.pair == record.pair => {
                    prev.end_col = end;
                },
                _ => spans.push(ColorSpan {
                    first_col: record.first_col,
                    end_col: end,
                    pair: record.pair.clone(),
                }),
            }
        }
        spans
    }
}

impl fmt::Display for ColorEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for span in self.spans() {
            write!(f, "{},{},{};", span.first_col, span.end_col, span.pair)?;
        }
        Ok(())
    }
}

/// Strip SGR sequences from `line`, returning the plain text and, if any
/// SGR sequence was present, its color encoding
///
/// Escape sequences other than `ESC [ ... m` are copied through untouched.
pub fn extract(line: &[u8], table: &ColorTable) -> (Vec<u8>, Option<ColorEncoding>) {
    let mut plain = Vec::with_capacity(line.len());
    let mut records: Vec<ColorRecord> = Vec::new();
    let mut rendition: Option<Rendition> = None;

    let mut i = 0;
    while i < line.len() {
        if let Some((params, len)) = sgr_at(&line[i..]) {
            rendition = apply_sgr(rendition, &params);
            let shown = rendition.unwrap_or_default();
            records.insert(
                0,
                ColorRecord {
                    first_col: plain.len(),
                    last_col: None,
                    pair: shown.label(table),
                    is_default: rendition.is_none(),
                },
            );
            i += len;
        } else {
            plain.push(line[i]);
            i += 1;
        }
    }

    if records.is_empty() {
        return (plain, None);
    }
    let line_len = plain.len();
    (plain, Some(ColorEncoding { records, line_len }))
}

/// Parse a complete `ESC [ <digits and ;> m` at the start of `bytes`
fn sgr_at(bytes: &[u8]) -> Option<(Vec<u16>, usize)> {
    if bytes.len() < 3 || bytes[0] != 0x1b || bytes[1] != b'[' {
        return None;
    }
    let body_len = bytes[2..]
        .iter()
        .position(|&b| !(b.is_ascii_digit() || b == b';'))?;
    if bytes[2 + body_len] != b'm' {
        return None;
    }

    let body = &bytes[2..2 + body_len];
    let params = if body.is_empty() {
        Vec::new()
    } else {
        body.split(|&b| b == b';')
            .map(|field| {
                field.iter().fold(0u16, |acc, &d| {
                    acc.saturating_mul(10).saturating_add(u16::from(d - b'0'))
                })
            })
            .collect()
    };
    Some((params, body_len + 3))
}
