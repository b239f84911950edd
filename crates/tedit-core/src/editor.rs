//! Editor context.
//!
//! [`EditorContext`] is the single owner of everything one editing session mutates: the text
//! buffer, the cursor and selection anchor, the clipboard, the motion settings and the optional
//! parse bridge. It is constructed explicitly and passed by reference; nothing here is global.
//!
//! Every mutating command follows the same sequence: compute the replaced range and its byte
//! offsets, mutate the buffer, compute the new end, then forward the resulting [`BufferEdit`] to
//! the parse bridge before the next command is accepted.

use std::fmt;

use tracing::{debug, trace};

use crate::buffer::TextBuffer;
use crate::commands::{ClipboardCommand, Command, CursorCommand, EditCommand};
use crate::config::EditorConfig;
use crate::cursor::{Cursor, ordered};
use crate::keymap::{KeyInput, command_for};
use crate::movement::{Motion, MovementEngine, WrapMode};
use crate::parse::{BufferEdit, Capture, ParseBridge};

/// One editing session: buffer, cursor, selection, clipboard and parse bridge.
pub struct EditorContext {
    buffer: TextBuffer,
    cursor: Cursor,
    anchor: Option<Cursor>,
    clipboard: Vec<String>,
    config: EditorConfig,
    bridge: Option<Box<dyn ParseBridge>>,
}

impl EditorContext {
    /// Create an empty session.
    pub fn new(config: EditorConfig) -> Self {
        Self {
            buffer: TextBuffer::new(),
            cursor: Cursor::default(),
            anchor: None,
            clipboard: Vec::new(),
            config,
            bridge: None,
        }
    }

    /// Create a session over `text` with the default configuration.
    pub fn with_text(text: &str) -> Self {
        let mut editor = Self::new(EditorConfig::default());
        editor.load_contents(text);
        editor
    }

    /// Replace the document. The cursor returns to the start and the selection is dropped; an
    /// attached parse bridge reparses from scratch.
    pub fn load_contents(&mut self, text: &str) {
        self.buffer.load_contents(text);
        self.cursor = Cursor::default();
        self.anchor = None;
        if let Some(bridge) = self.bridge.as_mut() {
            bridge.parse_buffer(&self.buffer);
        }
    }

    /// The text buffer.
    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    /// The current cursor.
    pub fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// The selection anchor, if a selection is in progress.
    pub fn anchor(&self) -> Option<Cursor> {
        self.anchor
    }

    /// The active selection as `(min, max)`. A zero-length selection counts as none.
    pub fn selection(&self) -> Option<(Cursor, Cursor)> {
        self.anchor
            .filter(|anchor| *anchor != self.cursor)
            .map(|anchor| ordered(anchor, self.cursor))
    }

    /// Clipboard contents, one entry per line.
    pub fn clipboard(&self) -> &[String] {
        &self.clipboard
    }

    /// Replace the clipboard contents.
    pub fn set_clipboard(&mut self, lines: Vec<String>) {
        self.clipboard = lines;
    }

    /// Current configuration.
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Replace the configuration.
    pub fn set_config(&mut self, config: EditorConfig) {
        self.config = config;
    }

    /// Switch between wrapped and unwrapped vertical motion.
    pub fn set_wrap_mode(&mut self, wrap_mode: WrapMode) {
        self.config.wrap_mode = wrap_mode;
    }

    /// Set the viewport width used as the wrap chunk width.
    ///
    /// # Panics
    ///
    /// Panics if `columns` is zero.
    pub fn set_viewport_columns(&mut self, columns: usize) {
        assert!(columns > 0, "viewport must be at least one column wide");
        self.config.viewport_columns = columns;
    }

    /// Place the cursor at `(row, col)` and drop the selection.
    ///
    /// # Panics
    ///
    /// Panics if the position is not valid in the buffer.
    pub fn set_cursor(&mut self, row: usize, col: usize) {
        self.cursor = self.buffer.cursor_at(row, col);
        self.anchor = None;
    }

    /// Select from `anchor` to `cursor` (the cursor is the moving end).
    ///
    /// # Panics
    ///
    /// Panics if either position is not valid in the buffer.
    pub fn set_selection(&mut self, anchor: (usize, usize), cursor: (usize, usize)) {
        let anchor = self.buffer.cursor_at(anchor.0, anchor.1);
        self.cursor = self.buffer.cursor_at(cursor.0, cursor.1);
        self.anchor = (anchor != self.cursor).then_some(anchor);
    }

    /// Attach a parse bridge and run its first full parse.
    pub fn set_parse_bridge(&mut self, mut bridge: Box<dyn ParseBridge>) {
        bridge.parse_buffer(&self.buffer);
        debug!(language = bridge.language_name(), "attached parse bridge");
        self.bridge = Some(bridge);
    }

    /// Detach the parse bridge; capture queries return nothing afterwards.
    pub fn clear_parse_bridge(&mut self) -> Option<Box<dyn ParseBridge>> {
        self.bridge.take()
    }

    /// Display name of the active language, if a parse bridge is attached.
    pub fn language_name(&self) -> Option<&str> {
        self.bridge.as_deref().map(|bridge| bridge.language_name())
    }

    /// Highlight captures intersecting `[start, end)`; empty without a parse bridge.
    pub fn captures_within(&self, start: Cursor, end: Cursor) -> Vec<Capture> {
        match self.bridge.as_deref() {
            Some(bridge) => bridge.captures_within(&self.buffer, start, end),
            None => Vec::new(),
        }
    }

    /// Run the command bound to `input`. Unbound keys do nothing.
    pub fn handle_key(&mut self, input: KeyInput) -> Option<BufferEdit> {
        let command = command_for(input)?;
        self.execute(command)
    }

    /// Execute `command`, returning the edit it made to the document (if any).
    pub fn execute(&mut self, command: Command) -> Option<BufferEdit> {
        match command {
            Command::Cursor(cmd) => {
                self.execute_cursor(cmd);
                None
            }
            Command::Edit(cmd) => self.execute_edit(cmd),
            Command::Clipboard(cmd) => self.execute_clipboard(cmd),
        }
    }

    fn engine(&self) -> MovementEngine<'_> {
        MovementEngine::new(
            &self.buffer,
            self.config.wrap_mode,
            self.config.viewport_columns,
        )
    }

    fn execute_cursor(&mut self, command: CursorCommand) {
        match command {
            CursorCommand::Select(motion) => {
                let anchor = self.anchor.unwrap_or(self.cursor);
                self.cursor = self.engine().apply(motion, self.cursor);
                self.anchor = (anchor != self.cursor).then_some(anchor);
            }
            CursorCommand::Move(motion) => {
                let engine = self.engine();
                let next = match (self.selection(), motion) {
                    (Some((min, _)), Motion::Left) => min,
                    (Some((_, max)), Motion::Right) => max,
                    (Some((min, _)), Motion::Up) => engine.move_up(min),
                    (Some((_, max)), Motion::Down) => engine.move_down(max),
                    _ => engine.apply(motion, self.cursor),
                };
                self.cursor = next;
                self.anchor = None;
            }
        }
    }

    fn execute_edit(&mut self, command: EditCommand) -> Option<BufferEdit> {
        match command {
            EditCommand::InsertChar('\n') | EditCommand::InsertNewline => {
                let (start, old_end) = self.replaced_range();
                self.replace(start, old_end, |buffer| {
                    let mut cursor = start;
                    buffer.insert_newline_at(&mut cursor);
                    cursor
                })
            }
            EditCommand::InsertChar(ch) => {
                let (start, old_end) = self.replaced_range();
                self.replace(start, old_end, |buffer| {
                    let mut cursor = start;
                    buffer.insert_char_at(&mut cursor, ch);
                    cursor
                })
            }
            EditCommand::InsertText(text) => {
                let lines: Vec<&str> = text.split('\n').collect();
                self.insert_lines(&lines)
            }
            EditCommand::Backspace => match self.selection() {
                Some((min, max)) => self.remove(min, max),
                None => {
                    let cursor = self.cursor;
                    let start = self.engine().move_left(cursor);
                    self.apply_edit(start, cursor, |buffer| {
                        let mut cursor = cursor;
                        buffer.insert_backspace_at(&mut cursor);
                        cursor
                    })
                }
            },
            EditCommand::Delete => match self.selection() {
                Some((min, max)) => self.remove(min, max),
                None => {
                    let cursor = self.cursor;
                    let old_end = self.engine().move_right(cursor);
                    self.apply_edit(cursor, old_end, |buffer| {
                        buffer.insert_delete_at(cursor);
                        cursor
                    })
                }
            },
            EditCommand::DeleteWordLeft => {
                let (start, old_end) = self.selection().unwrap_or_else(|| {
                    let engine = self.engine();
                    (engine.move_left_over_boundary(self.cursor), self.cursor)
                });
                self.remove(start, old_end)
            }
            EditCommand::DeleteWordRight => {
                let (start, old_end) = self.selection().unwrap_or_else(|| {
                    let engine = self.engine();
                    (self.cursor, engine.move_right_over_boundary(self.cursor))
                });
                self.remove(start, old_end)
            }
            EditCommand::ShiftLinesUp => self.shift_lines(true),
            EditCommand::ShiftLinesDown => self.shift_lines(false),
        }
    }

    fn execute_clipboard(&mut self, command: ClipboardCommand) -> Option<BufferEdit> {
        match command {
            ClipboardCommand::Copy => {
                if let Some((min, max)) = self.selection() {
                    self.clipboard = self.buffer.get_lines(min, max);
                }
                None
            }
            ClipboardCommand::Cut => {
                let (min, max) = self.selection()?;
                self.clipboard = self.buffer.get_lines(min, max);
                self.remove(min, max)
            }
            ClipboardCommand::Paste => {
                if self.clipboard.is_empty() {
                    return None;
                }
                let lines = self.clipboard.clone();
                self.insert_lines(&lines)
            }
        }
    }

    /// The range a typed insertion replaces: the selection, or the empty range at the cursor.
    fn replaced_range(&self) -> (Cursor, Cursor) {
        self.selection().unwrap_or((self.cursor, self.cursor))
    }

    fn insert_lines<S: AsRef<str>>(&mut self, lines: &[S]) -> Option<BufferEdit> {
        let (start, old_end) = self.replaced_range();
        self.replace(start, old_end, |buffer| buffer.insert_text_at(start, lines))
    }

    fn remove(&mut self, start: Cursor, old_end: Cursor) -> Option<BufferEdit> {
        self.replace(start, old_end, |_| start)
    }

    /// Remove `[start, old_end)`, then run `insert` at `start`.
    fn replace<F>(&mut self, start: Cursor, old_end: Cursor, insert: F) -> Option<BufferEdit>
    where
        F: FnOnce(&mut TextBuffer) -> Cursor,
    {
        self.apply_edit(start, old_end, |buffer| {
            if start != old_end {
                buffer.remove_text_at(start, old_end);
            }
            insert(buffer)
        })
    }

    /// Run `mutate`, which turns `[start, old_end)` into `[start, new_end)` and returns
    /// `new_end`. The cursor lands on `new_end` and the selection is dropped.
    fn apply_edit<F>(&mut self, start: Cursor, old_end: Cursor, mutate: F) -> Option<BufferEdit>
    where
        F: FnOnce(&mut TextBuffer) -> Cursor,
    {
        let start_byte = self.buffer.get_offset_from_point(start);
        let old_end_byte = self.buffer.get_offset_from_point(old_end);

        let new_end = mutate(&mut self.buffer);

        self.cursor = new_end;
        self.anchor = None;
        self.publish(BufferEdit {
            start_point: start,
            old_end_point: old_end,
            new_end_point: new_end,
            start_byte,
            old_end_byte,
            new_end_byte: self.buffer.get_offset_from_point(new_end),
        })
    }

    /// Move the cursor's row (or every row the selection touches) one line up or down. The
    /// cursor and anchor travel with their lines.
    fn shift_lines(&mut self, up: bool) -> Option<BufferEdit> {
        let (first, last) = match self.selection() {
            Some((min, max)) => (min.row, max.row),
            None => (self.cursor.row, self.cursor.row),
        };
        let end = last + 1;

        let (span_first, span_last) = if up {
            if first == 0 {
                return None;
            }
            (first - 1, last)
        } else {
            if end >= self.buffer.line_count() {
                return None;
            }
            (first, end)
        };

        let start = Cursor::new(span_first, 0);
        let old_end = self.buffer.end_of_line(span_last);
        let start_byte = self.buffer.get_offset_from_point(start);
        let old_end_byte = self.buffer.get_offset_from_point(old_end);

        if up {
            self.buffer.shift_lines_up(first, end);
        } else {
            self.buffer.shift_lines_down(first, end);
        }

        let travel = |cursor: Cursor| Cursor {
            row: if up { cursor.row - 1 } else { cursor.row + 1 },
            ..cursor
        };
        self.cursor = travel(self.cursor);
        self.anchor = self.anchor.map(travel);

        let new_end = self.buffer.end_of_line(span_last);
        self.publish(BufferEdit {
            start_point: start,
            old_end_point: old_end,
            new_end_point: new_end,
            start_byte,
            old_end_byte,
            new_end_byte: self.buffer.get_offset_from_point(new_end),
        })
    }

    fn publish(&mut self, edit: BufferEdit) -> Option<BufferEdit> {
        if edit.is_empty() {
            return None;
        }
        trace!(
            start_byte = edit.start_byte,
            old_end_byte = edit.old_end_byte,
            new_end_byte = edit.new_end_byte,
            "buffer edited"
        );
        if let Some(bridge) = self.bridge.as_mut() {
            bridge.edit(&self.buffer, &edit);
        }
        Some(edit)
    }
}

impl Default for EditorContext {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl fmt::Debug for EditorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EditorContext")
            .field("buffer", &self.buffer)
            .field("cursor", &self.cursor)
            .field("anchor", &self.anchor)
            .field("clipboard_lines", &self.clipboard.len())
            .field("config", &self.config)
            .field("language", &self.language_name())
            .finish()
    }
}
