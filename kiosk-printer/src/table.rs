//! Fixed-width table rendering
//!
//! Columns are declared as data (share of the line width plus alignment) and
//! every cell is padded to its column, so callers never hand-count spaces.
//!
//! Left-aligned cells are cut to fit. Right-aligned cells carry numbers and
//! are never cut: an overflowing value takes the padding in front of it,
//! keeping one space of separation, and widens the row only if that is not
//! enough.

use crate::encoding::{pad_text, text_width};

/// Horizontal alignment of a cell within its column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Right,
}

/// Column layout: width fraction and alignment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Column {
    /// Share of the line width, `0.0..=1.0`
    pub fraction: f64,
    pub align: Align,
}

impl Column {
    pub const fn left(fraction: f64) -> Self {
        Self {
            fraction,
            align: Align::Left,
        }
    }

    pub const fn right(fraction: f64) -> Self {
        Self {
            fraction,
            align: Align::Right,
        }
    }
}

/// A table layout resolved against a concrete line width
#[derive(Debug, Clone)]
pub struct Table {
    widths: Vec<usize>,
    aligns: Vec<Align>,
}

impl Table {
    /// Resolve column fractions to character widths (rounded down)
    pub fn new(columns: &[Column], line_width: usize) -> Self {
        let widths = columns
            .iter()
            .map(|c| (c.fraction.clamp(0.0, 1.0) * line_width as f64).floor() as usize)
            .collect();
        let aligns = columns.iter().map(|c| c.align).collect();
        Self { widths, aligns }
    }

    /// Column widths in characters
    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// Render one row
    ///
    /// Missing cells render blank, extra cells are ignored.
    pub fn row<S: AsRef<str>>(&self, cells: &[S]) -> String {
        let mut line = String::with_capacity(self.widths.iter().sum());
        for (i, (&width, &align)) in self.widths.iter().zip(&self.aligns).enumerate() {
            let cell = cells.get(i).map(AsRef::as_ref).unwrap_or("");
            let overflow = text_width(cell).saturating_sub(width);

            if align == Align::Right && overflow > 0 {
                let padding = line.len() - line.trim_end_matches(' ').len();
                if padding == 0 && !line.is_empty() {
                    line.push(' ');
                } else {
                    let borrow = overflow.min(padding.saturating_sub(1));
                    line.truncate(line.len() - borrow);
                }
                line.push_str(cell);
            } else {
                line.push_str(&pad_text(cell, width, align == Align::Right));
            }
        }
        line
    }
}
