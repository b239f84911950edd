//! Parse bridge interface.
//!
//! The core does not depend on any particular parser. An incremental parser plugs in by
//! implementing [`ParseBridge`]: it pulls bytes lazily from the [`TextBuffer`] (see
//! [`TextBuffer::read_chunk_at`]), receives a [`BufferEdit`] after every mutation, and answers
//! highlight queries with [`Capture`]s.
//!
//! `tedit-treesitter` provides the Tree-sitter implementation.

use crate::buffer::TextBuffer;
use crate::cursor::Cursor;

/// A tagged sub-range of the document produced by a parse bridge (for highlighting only).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capture {
    /// Start of the range (inclusive).
    pub start: Cursor,
    /// End of the range (exclusive).
    pub end: Cursor,
    /// Capture name, e.g. `"keyword"` or `"string"`.
    pub tag: String,
}

/// Description of one buffer mutation, in both point and byte coordinates.
///
/// `start_*` and `old_end_*` describe the replaced range in the document *before* the edit;
/// `new_end_*` is the end of the inserted text in the document *after* it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferEdit {
    /// Start of the edited range.
    pub start_point: Cursor,
    /// End of the replaced range, before the edit.
    pub old_end_point: Cursor,
    /// End of the inserted text, after the edit.
    pub new_end_point: Cursor,
    /// Byte offset of `start_point`.
    pub start_byte: usize,
    /// Byte offset of `old_end_point` (pre-edit document).
    pub old_end_byte: usize,
    /// Byte offset of `new_end_point` (post-edit document).
    pub new_end_byte: usize,
}

impl BufferEdit {
    /// Returns `true` if the edit neither removed nor inserted anything.
    pub fn is_empty(&self) -> bool {
        self.start_byte == self.old_end_byte && self.start_byte == self.new_end_byte
    }
}

/// An incremental parser kept in lock-step with a [`TextBuffer`].
pub trait ParseBridge {
    /// Display name of the selected language (e.g. for a status line).
    fn language_name(&self) -> &str;

    /// Parse the whole buffer from scratch, discarding any previous tree.
    fn parse_buffer(&mut self, buffer: &TextBuffer);

    /// Record `edit` against the previous tree and reparse incrementally.
    ///
    /// `buffer` already contains the post-edit text.
    fn edit(&mut self, buffer: &TextBuffer, edit: &BufferEdit);

    /// Captures intersecting `[start, end)`, in document order.
    fn captures_within(&self, buffer: &TextBuffer, start: Cursor, end: Cursor) -> Vec<Capture>;
}
