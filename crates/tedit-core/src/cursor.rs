//! Cursor positions.

use std::cmp::Ordering;

use crate::width::effective_col_for;

/// A logical position in the document plus its tab-expanded visual column.
///
/// `row`/`col` are byte precise; `effective_col` is derived from them and kept in sync by every
/// buffer mutation and motion. Equality and ordering only look at `(row, col)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cursor {
    /// Zero-based line index.
    pub row: usize,
    /// Byte column within the line (always on a character boundary).
    pub col: usize,
    /// Tab-expanded visual column of `col`.
    pub effective_col: usize,
}

impl Cursor {
    /// Create a cursor whose effective column equals `col` (exact for lines without tabs).
    pub fn new(row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            effective_col: col,
        }
    }

    /// Create a cursor on `line`, deriving `effective_col` from the line contents.
    pub fn on_line(line: &str, row: usize, col: usize) -> Self {
        Self {
            row,
            col,
            effective_col: effective_col_for(line, col),
        }
    }

    /// The cursor's logical position as a `(row, col)` pair.
    pub fn point(&self) -> (usize, usize) {
        (self.row, self.col)
    }
}

impl PartialEq for Cursor {
    fn eq(&self, other: &Self) -> bool {
        self.point() == other.point()
    }
}

impl Eq for Cursor {}

impl Ord for Cursor {
    fn cmp(&self, other: &Self) -> Ordering {
        self.row
            .cmp(&other.row)
            .then_with(|| self.col.cmp(&other.col))
    }
}

impl PartialOrd for Cursor {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl std::fmt::Display for Cursor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.row, self.col)
    }
}

/// Order two cursors as `(min, max)`.
pub fn ordered(a: Cursor, b: Cursor) -> (Cursor, Cursor) {
    if b < a { (b, a) } else { (a, b) }
}
