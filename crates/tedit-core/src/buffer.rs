//! Text buffer
//!
//! Owns the ordered line sequence and the [`LineSizeIndex`] that mirrors it. Every public
//! mutation keeps the two in lock-step:
//!
//! 1. the index holds exactly one entry per line;
//! 2. entry `r` holds `len(line[r]) + 1`, or `len(line[r])` for the last line;
//! 3. hence `byte_offset_at(r)` is the byte offset of line `r` in the `'\n'`-joined document.
//!
//! The buffer is never empty: it always holds at least one (possibly empty) line.
//!
//! Cursors handed to the mutation API must be valid (row in range, column on a character
//! boundary within the line). An invalid cursor is a caller bug and panics.

use tracing::debug;

use crate::cursor::Cursor;
use crate::line_size_index::LineSizeIndex;
use crate::width::{effective_width, symbol_width};

/// Mutable multi-line text store with an O(log n) line ↔ byte-offset index.
#[derive(Debug)]
pub struct TextBuffer {
    lines: Vec<String>,
    index: LineSizeIndex,
}

impl TextBuffer {
    /// Create a buffer holding a single empty line.
    pub fn new() -> Self {
        Self::with_index(LineSizeIndex::new())
    }

    /// Create a buffer from `text` (split on `'\n'`).
    pub fn from_text(text: &str) -> Self {
        let mut buffer = Self::new();
        buffer.load_contents(text);
        buffer
    }

    /// Create an empty buffer around a caller-provided index (e.g. a seeded one).
    pub fn with_index(mut index: LineSizeIndex) -> Self {
        index.clear();
        index.insert_before_position(0, 0);
        Self {
            lines: vec![String::new()],
            index,
        }
    }

    /// Replace the whole document with `text`, rebuilding lines and index from scratch.
    pub fn load_contents(&mut self, text: &str) {
        self.lines = text.split('\n').map(str::to_string).collect();
        self.index.clear();
        for row in 0..self.lines.len() {
            self.index.insert_before_position(row, self.line_size(row));
        }
        debug!(
            lines = self.lines.len(),
            bytes = self.index.total_bytes(),
            "loaded buffer contents"
        );
    }

    // ---------------------------------------------------------------------
    // Read interface
    // ---------------------------------------------------------------------

    /// Number of lines (always at least 1).
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Text of line `row` (without its newline).
    ///
    /// # Panics
    ///
    /// Panics if `row >= self.line_count()`.
    pub fn line_at(&self, row: usize) -> &str {
        &self.lines[row]
    }

    /// Up to `count` lines starting at `row`; clipped at the end of the document.
    pub fn lines_in_range(&self, row: usize, count: usize) -> Vec<&str> {
        self.lines
            .iter()
            .skip(row)
            .take(count)
            .map(String::as_str)
            .collect()
    }

    /// Every line, in order (the persistence layer joins them with `'\n'`).
    pub fn view(&self) -> Vec<&str> {
        self.lines.iter().map(String::as_str).collect()
    }

    /// The whole document as a single string.
    pub fn contents(&self) -> String {
        self.lines.join("\n")
    }

    /// Total byte length of the document (newlines included).
    pub fn byte_len(&self) -> usize {
        self.index.total_bytes()
    }

    /// Read-only access to the line-size index.
    pub fn index(&self) -> &LineSizeIndex {
        &self.index
    }

    /// Byte length of line `row` plus its implicit newline (none on the last line).
    pub fn line_size(&self, row: usize) -> usize {
        self.lines[row].len() + usize::from(row + 1 < self.lines.len())
    }

    /// Build a cursor at `(row, col)` with its effective column derived from the line.
    pub fn cursor_at(&self, row: usize, col: usize) -> Cursor {
        let cursor = Cursor::new(row, col);
        self.assert_cursor(cursor);
        Cursor::on_line(&self.lines[row], row, col)
    }

    /// Cursor at the end of line `row`.
    pub fn end_of_line(&self, row: usize) -> Cursor {
        self.cursor_at(row, self.lines[row].len())
    }

    /// Cursor at the very end of the document.
    pub fn end_of_document(&self) -> Cursor {
        self.end_of_line(self.lines.len() - 1)
    }

    /// Character at `cursor`, or `None` when the cursor sits at the end of its line.
    pub fn char_at(&self, cursor: Cursor) -> Option<char> {
        self.lines[cursor.row][cursor.col..].chars().next()
    }

    /// Character immediately before `cursor` on the same line.
    pub fn char_before(&self, cursor: Cursor) -> Option<char> {
        self.lines[cursor.row][..cursor.col].chars().next_back()
    }

    /// Byte offset of `cursor` in the `'\n'`-joined document. O(log n).
    pub fn get_offset_from_point(&self, cursor: Cursor) -> usize {
        self.assert_cursor(cursor);
        self.index.byte_offset_at(cursor.row) + cursor.col
    }

    /// Cursor at document byte offset `byte_offset` (clamped to the end of the document).
    pub fn point_from_offset(&self, byte_offset: usize) -> Cursor {
        let row = self.index.line_containing_offset(byte_offset);
        let line = &self.lines[row];
        let mut col = byte_offset
            .saturating_sub(self.index.byte_offset_at(row))
            .min(line.len());
        while !line.is_char_boundary(col) {
            col -= 1;
        }
        Cursor::on_line(line, row, col)
    }

    /// Text in `[lp, rp)` as line fragments; empty when `rp <= lp`.
    pub fn get_lines(&self, lp: Cursor, rp: Cursor) -> Vec<String> {
        if rp <= lp {
            return Vec::new();
        }
        self.assert_cursor(lp);
        self.assert_cursor(rp);

        if lp.row == rp.row {
            return vec![self.lines[lp.row][lp.col..rp.col].to_string()];
        }

        (lp.row..=rp.row)
            .map(|row| {
                let line = self.lines[row].as_str();
                let start = if row == lp.row { lp.col } else { 0 };
                let end = if row == rp.row { rp.col } else { line.len() };
                line[start..end].to_string()
            })
            .collect()
    }

    // ---------------------------------------------------------------------
    // Streaming reads (used by parse bridges)
    // ---------------------------------------------------------------------

    /// Bytes available at `(row, col)` without crossing a line boundary.
    ///
    /// Returns the rest of the line, a lone `"\n"` at the end of a non-final line, or an empty
    /// slice at the end of the document.
    pub fn read_chunk_at_point(&self, row: usize, col: usize) -> &[u8] {
        let Some(line) = self.lines.get(row) else {
            return &[];
        };
        let bytes = line.as_bytes();
        if col < bytes.len() {
            &bytes[col..]
        } else if col == bytes.len() && row + 1 < self.lines.len() {
            b"\n"
        } else {
            &[]
        }
    }

    /// Bytes available at document offset `byte_offset`; see
    /// [`read_chunk_at_point`](Self::read_chunk_at_point).
    pub fn read_chunk_at(&self, byte_offset: usize) -> &[u8] {
        if byte_offset >= self.index.total_bytes() {
            return &[];
        }
        let row = self.index.line_containing_offset(byte_offset);
        let col = byte_offset - self.index.byte_offset_at(row);
        self.read_chunk_at_point(row, col)
    }

    /// The byte range `[start, end)` of the document as a sequence of borrowed chunks.
    pub fn chunks_in_range(&self, start: usize, end: usize) -> Vec<&[u8]> {
        let mut out = Vec::new();
        let mut pos = start;
        while pos < end {
            let chunk = self.read_chunk_at(pos);
            if chunk.is_empty() {
                break;
            }
            let take = chunk.len().min(end - pos);
            out.push(&chunk[..take]);
            pos += take;
        }
        out
    }

    // ---------------------------------------------------------------------
    // Mutation
    // ---------------------------------------------------------------------

    /// Insert `ch` at `cursor` and advance the cursor past it.
    ///
    /// `'\n'` is treated as [`insert_newline_at`](Self::insert_newline_at).
    pub fn insert_char_at(&mut self, cursor: &mut Cursor, ch: char) {
        if ch == '\n' {
            self.insert_newline_at(cursor);
            return;
        }
        self.assert_cursor(*cursor);

        self.lines[cursor.row].insert(cursor.col, ch);
        cursor.col += ch.len_utf8();
        cursor.effective_col += symbol_width(ch);
        self.refresh_size(cursor.row);
    }

    /// Split the line at `cursor`; the cursor moves to the start of the new line.
    pub fn insert_newline_at(&mut self, cursor: &mut Cursor) {
        self.assert_cursor(*cursor);

        let tail = self.lines[cursor.row].split_off(cursor.col);
        self.lines.insert(cursor.row + 1, tail);
        self.refresh_size(cursor.row);
        self.index
            .insert_before_position(cursor.row + 1, self.line_size(cursor.row + 1));

        *cursor = Cursor::new(cursor.row + 1, 0);
    }

    /// Delete the character before `cursor`, merging with the previous line at column 0.
    ///
    /// The cursor moves to where the deleted character was. No-op at the document start.
    pub fn insert_backspace_at(&mut self, cursor: &mut Cursor) {
        self.assert_cursor(*cursor);

        if let Some(ch) = self.char_before(*cursor) {
            cursor.col -= ch.len_utf8();
            cursor.effective_col = cursor.effective_col.saturating_sub(symbol_width(ch));
            self.lines[cursor.row].remove(cursor.col);
            self.refresh_size(cursor.row);
        } else if cursor.row > 0 {
            let current = self.lines.remove(cursor.row);
            self.index.remove_position(cursor.row);

            let row = cursor.row - 1;
            let prev = &mut self.lines[row];
            let col = prev.len();
            let effective_col = effective_width(prev);
            prev.push_str(&current);
            self.refresh_size(row);

            *cursor = Cursor {
                row,
                col,
                effective_col,
            };
        }
    }

    /// Delete the character at `cursor`, merging the next line in at the end of a line.
    ///
    /// The cursor does not move. No-op at the document end.
    pub fn insert_delete_at(&mut self, cursor: Cursor) {
        self.assert_cursor(cursor);

        if cursor.col < self.lines[cursor.row].len() {
            self.lines[cursor.row].remove(cursor.col);
            self.refresh_size(cursor.row);
        } else if cursor.row + 1 < self.lines.len() {
            let next = self.lines.remove(cursor.row + 1);
            self.index.remove_position(cursor.row + 1);
            self.lines[cursor.row].push_str(&next);
            self.refresh_size(cursor.row);
        }
    }

    /// Splice `lines` in at `cursor`, returning the cursor at the end of the inserted text.
    ///
    /// # Panics
    ///
    /// Panics if `lines` is empty, a line contains `\n`, or `cursor` is invalid.
    pub fn insert_text_at<S: AsRef<str>>(&mut self, cursor: Cursor, lines: &[S]) -> Cursor {
        assert!(!lines.is_empty(), "insert_text_at requires at least one line");
        self.assert_cursor(cursor);
        assert!(
            lines.iter().all(|l| !l.as_ref().contains('\n')),
            "insert_text_at lines must not contain '\\n'"
        );

        let row = cursor.row;
        let first = lines[0].as_ref();

        if lines.len() == 1 {
            self.lines[row].insert_str(cursor.col, first);
            self.refresh_size(row);
            let col = cursor.col + first.len();
            return Cursor::on_line(&self.lines[row], row, col);
        }

        let tail = self.lines[row].split_off(cursor.col);
        self.lines[row].push_str(first);

        let mut inserted: Vec<String> = lines[1..]
            .iter()
            .map(|line| line.as_ref().to_string())
            .collect();
        let end_col = inserted.last().map_or(0, String::len);
        if let Some(last) = inserted.last_mut() {
            last.push_str(&tail);
        }
        let added = inserted.len();
        self.lines.splice(row + 1..row + 1, inserted);

        self.refresh_size(row);
        for new_row in row + 1..=row + added {
            self.index
                .insert_before_position(new_row, self.line_size(new_row));
        }

        let end_row = row + added;
        Cursor::on_line(&self.lines[end_row], end_row, end_col)
    }

    /// Remove the half-open range `[lp, rp)`.
    ///
    /// # Panics
    ///
    /// Panics if `rp < lp` or either cursor is invalid.
    pub fn remove_text_at(&mut self, lp: Cursor, rp: Cursor) {
        assert!(lp <= rp, "remove_text_at: range end {rp} precedes start {lp}");
        self.assert_cursor(lp);
        self.assert_cursor(rp);

        if lp.row == rp.row {
            self.lines[lp.row].replace_range(lp.col..rp.col, "");
            self.refresh_size(lp.row);
            return;
        }

        let tail = self.lines[rp.row].split_off(rp.col);
        let first = &mut self.lines[lp.row];
        first.truncate(lp.col);
        first.push_str(&tail);

        self.lines.drain(lp.row + 1..=rp.row);
        for _ in lp.row + 1..=rp.row {
            self.index.remove_position(lp.row + 1);
        }
        self.refresh_size(lp.row);
    }

    /// Remove `[lp, rp)` and insert `lines` in its place; returns the end of the inserted text.
    pub fn replace_text_at<S: AsRef<str>>(&mut self, lp: Cursor, rp: Cursor, lines: &[S]) -> Cursor {
        self.remove_text_at(lp, rp);
        self.insert_text_at(lp, lines)
    }

    /// Move lines `[start, end)` up by one row; the line above the block moves below it.
    ///
    /// # Panics
    ///
    /// Panics unless `0 < start < end <= line_count`.
    pub fn shift_lines_up(&mut self, start: usize, end: usize) {
        assert!(
            start > 0 && start < end && end <= self.lines.len(),
            "shift_lines_up: invalid block {start}..{end} for {} lines",
            self.lines.len()
        );
        self.lines[start - 1..end].rotate_left(1);
        for row in start - 1..end {
            self.refresh_size(row);
        }
    }

    /// Move lines `[start, end)` down by one row; the line below the block moves above it.
    ///
    /// # Panics
    ///
    /// Panics unless `start < end < line_count`.
    pub fn shift_lines_down(&mut self, start: usize, end: usize) {
        assert!(
            start < end && end < self.lines.len(),
            "shift_lines_down: invalid block {start}..{end} for {} lines",
            self.lines.len()
        );
        self.lines[start..=end].rotate_right(1);
        for row in start..=end {
            self.refresh_size(row);
        }
    }

    fn refresh_size(&mut self, row: usize) {
        let size = self.line_size(row);
        self.index.update_position_value(row, size);
    }

    fn assert_cursor(&self, cursor: Cursor) {
        assert!(
            cursor.row < self.lines.len(),
            "cursor row {} out of range for {} lines",
            cursor.row,
            self.lines.len()
        );
        let line = &self.lines[cursor.row];
        assert!(
            line.is_char_boundary(cursor.col),
            "cursor column {} invalid for row {} ({} bytes)",
            cursor.col,
            cursor.row,
            line.len()
        );
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn linear_offset(buffer: &TextBuffer, cursor: Cursor) -> usize {
        (0..cursor.row)
            .map(|row| buffer.line_at(row).len() + 1)
            .sum::<usize>()
            + cursor.col
    }

    fn assert_index_consistent(buffer: &TextBuffer) {
        assert_eq!(buffer.index().size(), buffer.line_count());
        for row in 0..buffer.line_count() {
            let start = Cursor::new(row, 0);
            assert_eq!(
                buffer.get_offset_from_point(start),
                linear_offset(buffer, start),
                "row {row}"
            );
            assert_eq!(buffer.index().line_size_at(row), buffer.line_size(row));
        }
        assert_eq!(buffer.byte_len(), buffer.contents().len());
    }

    #[test]
    fn test_new_buffer_has_one_empty_line() {
        let buffer = TextBuffer::new();
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.line_at(0), "");
        assert_index_consistent(&buffer);
    }

    #[test]
    fn test_load_contents_round_trip() {
        for text in ["", "one", "a\nb", "a\n", "\n\n", "x\n\ty\nz"] {
            let buffer = TextBuffer::from_text(text);
            assert_eq!(buffer.view().join("\n"), text);
            assert_index_consistent(&buffer);
        }
    }

    #[test]
    fn test_insert_char_advances_cursor() {
        let mut buffer = TextBuffer::from_text("ac");
        let mut cursor = Cursor::new(0, 1);
        buffer.insert_char_at(&mut cursor, 'b');
        assert_eq!(buffer.line_at(0), "abc");
        assert_eq!(cursor, Cursor::new(0, 2));

        buffer.insert_char_at(&mut cursor, '\t');
        assert_eq!(cursor.effective_col, 6);
        assert_index_consistent(&buffer);
    }

    #[test]
    fn test_insert_newline_splits_line() {
        let mut buffer = TextBuffer::from_text("abc");
        let mut cursor = Cursor::new(0, 1);
        buffer.insert_newline_at(&mut cursor);

        assert_eq!(buffer.view(), vec!["a", "bc"]);
        assert_eq!(cursor, Cursor::new(1, 0));
        assert_eq!(buffer.index().byte_offset_at(0), 0);
        assert_eq!(buffer.index().byte_offset_at(1), 2);
        assert_index_consistent(&buffer);
    }

    #[test]
    fn test_backspace_merges_lines() {
        let mut buffer = TextBuffer::from_text("ab\ncd");
        let mut cursor = Cursor::new(1, 0);
        buffer.insert_backspace_at(&mut cursor);
        assert_eq!(buffer.view(), vec!["abcd"]);
        assert_eq!(cursor, Cursor::new(0, 2));
        assert_index_consistent(&buffer);
    }

    #[test]
    fn test_backspace_at_document_start_is_noop() {
        let mut buffer = TextBuffer::from_text("ab");
        let mut cursor = Cursor::new(0, 0);
        buffer.insert_backspace_at(&mut cursor);
        assert_eq!(buffer.view(), vec!["ab"]);
        assert_eq!(cursor, Cursor::new(0, 0));
    }

    #[test]
    fn test_delete_merges_next_line() {
        let mut buffer = TextBuffer::from_text("ab\ncd\nef");
        buffer.insert_delete_at(Cursor::new(1, 2));
        assert_eq!(buffer.view(), vec!["ab", "cdef"]);
        assert_index_consistent(&buffer);

        buffer.insert_delete_at(Cursor::new(1, 4));
        assert_eq!(buffer.view(), vec!["ab", "cdef"]);

        buffer.insert_delete_at(Cursor::new(0, 0));
        assert_eq!(buffer.view(), vec!["b", "cdef"]);
        assert_index_consistent(&buffer);
    }

    #[test]
    fn test_insert_text_single_line() {
        let mut buffer = TextBuffer::from_text("helld");
        let end = buffer.insert_text_at(Cursor::new(0, 3), &["lo wor"]);
        assert_eq!(buffer.line_at(0), "hello world");
        assert_eq!(end, Cursor::new(0, 9));
        assert_index_consistent(&buffer);
    }

    #[test]
    fn test_insert_text_multi_line() {
        let mut buffer = TextBuffer::from_text("start|end");
        let end = buffer.insert_text_at(Cursor::new(0, 6), &["one", "two", "three"]);
        assert_eq!(buffer.view(), vec!["start|one", "two", "threeend"]);
        assert_eq!(end, Cursor::new(2, 5));
        assert_index_consistent(&buffer);
    }

    #[test]
    fn test_insert_text_at_end_of_last_line() {
        let mut buffer = TextBuffer::from_text("a\nb");
        let end = buffer.insert_text_at(Cursor::new(1, 1), &["", ""]);
        assert_eq!(buffer.view(), vec!["a", "b", ""]);
        assert_eq!(end, Cursor::new(2, 0));
        assert_index_consistent(&buffer);
    }

    #[test]
    #[should_panic]
    fn test_insert_text_empty_lines_panics() {
        let mut buffer = TextBuffer::new();
        let empty: [&str; 0] = [];
        buffer.insert_text_at(Cursor::new(0, 0), &empty);
    }

    #[test]
    #[should_panic]
    fn test_insert_text_embedded_newline_panics() {
        let mut buffer = TextBuffer::from_text("ab");
        buffer.insert_text_at(Cursor::new(0, 1), &["x\ny"]);
    }

    #[test]
    fn test_remove_text_same_line() {
        let mut buffer = TextBuffer::from_text("hello world");
        buffer.remove_text_at(Cursor::new(0, 5), Cursor::new(0, 11));
        assert_eq!(buffer.view(), vec!["hello"]);
        assert_index_consistent(&buffer);
    }

    #[test]
    fn test_remove_text_across_lines() {
        let mut buffer = TextBuffer::from_text("aaa\nbbb\nccc\nddd");
        buffer.remove_text_at(Cursor::new(0, 1), Cursor::new(2, 2));
        assert_eq!(buffer.view(), vec!["ac", "ddd"]);
        assert_index_consistent(&buffer);
    }

    #[test]
    fn test_remove_text_to_end_of_document() {
        let mut buffer = TextBuffer::from_text("aaa\nbbb");
        buffer.remove_text_at(Cursor::new(0, 2), Cursor::new(1, 3));
        assert_eq!(buffer.view(), vec!["aa"]);
        assert_index_consistent(&buffer);
    }

    #[test]
    #[should_panic]
    fn test_remove_text_reversed_range_panics() {
        let mut buffer = TextBuffer::from_text("abc");
        buffer.remove_text_at(Cursor::new(0, 2), Cursor::new(0, 1));
    }

    #[test]
    fn test_get_lines() {
        let buffer = TextBuffer::from_text("abc\ndef\nghi");
        assert_eq!(
            buffer.get_lines(Cursor::new(0, 1), Cursor::new(2, 2)),
            vec!["bc", "def", "gh"]
        );
        assert_eq!(
            buffer.get_lines(Cursor::new(1, 1), Cursor::new(1, 3)),
            vec!["ef"]
        );
        assert_eq!(
            buffer.get_lines(Cursor::new(0, 3), Cursor::new(1, 0)),
            vec!["", ""]
        );
        assert!(buffer.get_lines(Cursor::new(1, 0), Cursor::new(0, 2)).is_empty());
        assert!(buffer.get_lines(Cursor::new(1, 0), Cursor::new(1, 0)).is_empty());
    }

    #[test]
    fn test_point_from_offset() {
        let buffer = TextBuffer::from_text("abc\nde\n");
        assert_eq!(buffer.point_from_offset(0), Cursor::new(0, 0));
        assert_eq!(buffer.point_from_offset(3), Cursor::new(0, 3));
        assert_eq!(buffer.point_from_offset(4), Cursor::new(1, 0));
        assert_eq!(buffer.point_from_offset(7), Cursor::new(2, 0));
        assert_eq!(buffer.point_from_offset(99), Cursor::new(2, 0));
    }

    #[test]
    fn test_read_chunks() {
        let buffer = TextBuffer::from_text("ab\ncd");
        assert_eq!(buffer.read_chunk_at(0), b"ab");
        assert_eq!(buffer.read_chunk_at(1), b"b");
        assert_eq!(buffer.read_chunk_at(2), b"\n");
        assert_eq!(buffer.read_chunk_at(3), b"cd");
        assert_eq!(buffer.read_chunk_at(5), b"");
        assert_eq!(buffer.read_chunk_at_point(9, 0), b"");

        let joined: Vec<u8> = buffer.chunks_in_range(1, 4).concat();
        assert_eq!(joined, b"b\nc");
    }

    #[test]
    fn test_shift_lines() {
        let mut buffer = TextBuffer::from_text("one\ntwo\nthree\nfour");
        buffer.shift_lines_up(2, 4);
        assert_eq!(buffer.view(), vec!["one", "three", "four", "two"]);
        assert_index_consistent(&buffer);

        buffer.shift_lines_down(0, 2);
        assert_eq!(buffer.view(), vec!["four", "one", "three", "two"]);
        assert_index_consistent(&buffer);
    }

    #[test]
    fn test_cursor_at_derives_effective_col() {
        let buffer = TextBuffer::from_text("\t\tx");
        assert_eq!(buffer.cursor_at(0, 2).effective_col, 8);
        assert_eq!(buffer.end_of_document().effective_col, 9);
    }

    #[test]
    #[should_panic]
    fn test_invalid_cursor_panics() {
        let buffer = TextBuffer::from_text("abc");
        buffer.get_offset_from_point(Cursor::new(0, 4));
    }
}
