//! Movement engine
//!
//! Pure cursor transitions (`Cursor -> Cursor`) over a borrowed [`TextBuffer`]: character
//! motion, word-boundary motion, and vertical motion in either wrap mode.
//!
//! Vertical motion with wrapping treats each logical line as a sequence of visual chunks of
//! `columns` cells (see [`visual_chunks`]). Moving up or down keeps the cursor's visual offset
//! inside its chunk and lands on the neighbouring chunk, crossing into the adjacent logical line
//! only from the first/last chunk.

use serde::{Deserialize, Serialize};

use crate::buffer::TextBuffer;
use crate::cursor::Cursor;
use crate::width::{
    Chunk, chunk_index_for_col, col_for_effective, effective_width, last_col_in_chunk,
    symbol_width, visual_chunks,
};

/// How logical lines map onto visual rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapMode {
    /// Long lines wrap into fixed-width chunks.
    #[default]
    Wrap,
    /// Each logical line is one visual row.
    NoWrap,
}

/// A single cursor motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Motion {
    /// One character left.
    Left,
    /// One character right.
    Right,
    /// One visual row up.
    Up,
    /// One visual row down.
    Down,
    /// To the previous word boundary.
    WordLeft,
    /// To the next word boundary.
    WordRight,
}

/// Character classes used by word-boundary motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Letters, digits and `_`.
    Word,
    /// Whitespace, including the implicit newline at the end of a line.
    Whitespace,
    /// Everything else (punctuation, operators).
    Other,
}

impl CharClass {
    /// Classify a character; `None` (end of line) counts as whitespace.
    pub fn of(ch: Option<char>) -> Self {
        match ch {
            None => Self::Whitespace,
            Some(c) if c.is_whitespace() => Self::Whitespace,
            Some(c) if c.is_alphanumeric() || c == '_' => Self::Word,
            Some(_) => Self::Other,
        }
    }
}

/// Cursor motion over a borrowed buffer.
#[derive(Debug, Clone, Copy)]
pub struct MovementEngine<'a> {
    buffer: &'a TextBuffer,
    wrap_mode: WrapMode,
    columns: usize,
}

impl<'a> MovementEngine<'a> {
    /// Create an engine for `buffer` with the given wrap mode and viewport width (in cells).
    pub fn new(buffer: &'a TextBuffer, wrap_mode: WrapMode, columns: usize) -> Self {
        Self {
            buffer,
            wrap_mode,
            columns: columns.max(1),
        }
    }

    /// The buffer this engine moves over.
    pub fn buffer(&self) -> &'a TextBuffer {
        self.buffer
    }

    /// Apply `motion` to `p`.
    pub fn apply(&self, motion: Motion, p: Cursor) -> Cursor {
        match motion {
            Motion::Left => self.move_left(p),
            Motion::Right => self.move_right(p),
            Motion::Up => self.move_up(p),
            Motion::Down => self.move_down(p),
            Motion::WordLeft => self.move_left_over_boundary(p),
            Motion::WordRight => self.move_right_over_boundary(p),
        }
    }

    /// One character left; from column 0 moves to the end of the previous line.
    pub fn move_left(&self, p: Cursor) -> Cursor {
        if let Some(ch) = self.buffer.char_before(p) {
            Cursor {
                row: p.row,
                col: p.col - ch.len_utf8(),
                effective_col: p.effective_col.saturating_sub(symbol_width(ch)),
            }
        } else if p.row > 0 {
            self.buffer.end_of_line(p.row - 1)
        } else {
            p
        }
    }

    /// One character right; from the end of a line moves to the start of the next one.
    pub fn move_right(&self, p: Cursor) -> Cursor {
        if let Some(ch) = self.buffer.char_at(p) {
            Cursor {
                row: p.row,
                col: p.col + ch.len_utf8(),
                effective_col: p.effective_col + symbol_width(ch),
            }
        } else if p.row + 1 < self.buffer.line_count() {
            Cursor::new(p.row + 1, 0)
        } else {
            p
        }
    }

    /// One visual row up.
    pub fn move_up(&self, p: Cursor) -> Cursor {
        match self.wrap_mode {
            WrapMode::NoWrap => {
                if p.row == 0 {
                    return p;
                }
                self.clamped(p.row - 1, p.col)
            }
            WrapMode::Wrap => {
                let line = self.buffer.line_at(p.row);
                let chunks = visual_chunks(line, self.columns);
                let current = chunk_index_for_col(&chunks, p.col);
                let offset = effective_width(&line[chunks[current].start..p.col]);

                if current > 0 {
                    return self.col_in_chunk(p.row, &chunks, current - 1, offset);
                }
                if p.row == 0 {
                    return Cursor::new(0, 0);
                }

                let row = p.row - 1;
                let above = visual_chunks(self.buffer.line_at(row), self.columns);
                self.col_in_chunk(row, &above, above.len() - 1, offset)
            }
        }
    }

    /// One visual row down.
    pub fn move_down(&self, p: Cursor) -> Cursor {
        match self.wrap_mode {
            WrapMode::NoWrap => {
                if p.row + 1 >= self.buffer.line_count() {
                    return p;
                }
                self.clamped(p.row + 1, p.col)
            }
            WrapMode::Wrap => {
                let line = self.buffer.line_at(p.row);
                let chunks = visual_chunks(line, self.columns);
                let current = chunk_index_for_col(&chunks, p.col);
                let offset = effective_width(&line[chunks[current].start..p.col]);

                if current + 1 < chunks.len() {
                    return self.col_in_chunk(p.row, &chunks, current + 1, offset);
                }
                if p.row + 1 >= self.buffer.line_count() {
                    return self.buffer.end_of_line(p.row);
                }

                let row = p.row + 1;
                let below = visual_chunks(self.buffer.line_at(row), self.columns);
                self.col_in_chunk(row, &below, 0, offset)
            }
        }
    }

    /// Skip right over a run of same-class characters.
    ///
    /// At the end of a line the cursor first crosses onto the next line (once), then skips the
    /// run starting there.
    pub fn move_right_over_boundary(&self, p: Cursor) -> Cursor {
        let mut cursor = p;
        if self.buffer.char_at(cursor).is_none() && cursor.row + 1 < self.buffer.line_count() {
            cursor = self.move_right(cursor);
        }

        let skip = CharClass::of(self.buffer.char_at(cursor));
        while let Some(ch) = self.buffer.char_at(cursor) {
            if CharClass::of(Some(ch)) != skip {
                break;
            }
            cursor = self.move_right(cursor);
        }
        cursor
    }

    /// Skip left over a run of same-class characters.
    ///
    /// At column 0 the cursor first crosses onto the end of the previous line (once); the
    /// crossed newline counts as whitespace, so trailing whitespace there is skipped too.
    pub fn move_left_over_boundary(&self, p: Cursor) -> Cursor {
        let skip = if p.col == 0 && p.row > 0 {
            CharClass::Whitespace
        } else {
            CharClass::of(self.buffer.char_before(p))
        };
        let mut cursor = self.move_left(p);

        while cursor.col > 0 {
            if CharClass::of(self.buffer.char_before(cursor)) != skip {
                break;
            }
            cursor = self.move_left(cursor);
        }
        cursor
    }

    fn clamped(&self, row: usize, col: usize) -> Cursor {
        let line = self.buffer.line_at(row);
        let mut col = col.min(line.len());
        while !line.is_char_boundary(col) {
            col -= 1;
        }
        Cursor::on_line(line, row, col)
    }

    fn col_in_chunk(&self, row: usize, chunks: &[Chunk], idx: usize, offset: usize) -> Cursor {
        let line = self.buffer.line_at(row);
        let chunk = chunks[idx];
        let is_last = idx + 1 == chunks.len();
        let col = (chunk.start + col_for_effective(&line[chunk.range()], offset))
            .min(last_col_in_chunk(line, chunk, is_last));
        Cursor::on_line(line, row, col)
    }
}
