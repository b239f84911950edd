//! Visual width utilities.
//!
//! Converts between byte columns and effective (tab-expanded) columns, and splits a logical line
//! into fixed-width visual chunks for wrap-aware cursor motion.
//!
//! Width model: `'\t'` occupies [`TAB_WIDTH`] cells, every other character occupies one cell.

use std::ops::Range;

/// Number of cells a tab character occupies.
pub const TAB_WIDTH: usize = 4;

/// Visual width (in cells) of a single character.
pub fn symbol_width(ch: char) -> usize {
    if ch == '\t' { TAB_WIDTH } else { 1 }
}

/// Total visual width of a string.
pub fn effective_width(s: &str) -> usize {
    s.chars().map(symbol_width).sum()
}

/// Effective column of byte column `col` within `line`.
///
/// `col` must lie on a character boundary of `line`.
pub fn effective_col_for(line: &str, col: usize) -> usize {
    effective_width(&line[..col])
}

/// The largest byte column in `segment` whose effective offset does not exceed `effective`.
///
/// Returns `segment.len()` when the whole segment fits.
pub fn col_for_effective(segment: &str, effective: usize) -> usize {
    let mut x = 0usize;
    for (idx, ch) in segment.char_indices() {
        let w = symbol_width(ch);
        if x + w > effective {
            return idx;
        }
        x += w;
    }
    segment.len()
}

/// Byte range of one visual chunk of a logical line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk {
    /// First byte of the chunk (inclusive).
    pub start: usize,
    /// One past the last byte of the chunk.
    pub end: usize,
}

impl Chunk {
    /// The chunk as a byte range into its line.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end
    }
}

/// Split `line` into visual chunks of at most `columns` cells.
///
/// A character that would overflow the current chunk starts the next one. A character wider
/// than `columns` gets a chunk of its own. An empty line yields a single empty chunk.
pub fn visual_chunks(line: &str, columns: usize) -> Vec<Chunk> {
    let columns = columns.max(1);
    let mut chunks = Vec::new();
    let mut start = 0usize;
    let mut width = 0usize;

    for (idx, ch) in line.char_indices() {
        let w = symbol_width(ch);
        if width > 0 && width + w > columns {
            chunks.push(Chunk { start, end: idx });
            start = idx;
            width = 0;
        }
        width += w;
    }
    chunks.push(Chunk {
        start,
        end: line.len(),
    });
    chunks
}

/// Index of the chunk that displays byte column `col`.
///
/// A column sitting exactly on a chunk boundary belongs to the later chunk (the cursor is drawn
/// at the start of the next visual row); the end of the line belongs to the last chunk.
pub fn chunk_index_for_col(chunks: &[Chunk], col: usize) -> usize {
    chunks
        .iter()
        .position(|chunk| col < chunk.end)
        .unwrap_or(chunks.len().saturating_sub(1))
}

/// Largest byte column that still displays on `chunk`.
///
/// For the final chunk this is the end of the line. For an earlier chunk, its end offset is
/// already drawn on the following row, so the limit is the start of its last character.
pub fn last_col_in_chunk(line: &str, chunk: Chunk, is_last: bool) -> usize {
    if is_last {
        return chunk.end;
    }
    line[chunk.range()]
        .char_indices()
        .next_back()
        .map(|(idx, _)| chunk.start + idx)
        .unwrap_or(chunk.start)
}
