//! Command definitions
//!
//! Every user-level action the editing core understands. Commands are plain data; they are
//! executed by [`EditorContext::execute`](crate::EditorContext::execute).
//!
//! # Example
//!
//! ```rust
//! use tedit_core::{Command, CursorCommand, EditCommand, EditorContext, Motion};
//!
//! let mut editor = EditorContext::with_text("abc");
//! editor.execute(Command::Cursor(CursorCommand::Move(Motion::Right)));
//! editor.execute(Command::Edit(EditCommand::InsertChar('X')));
//! assert_eq!(editor.buffer().line_at(0), "aXbc");
//! ```

use crate::movement::Motion;

/// Cursor motion commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorCommand {
    /// Move the cursor. An active selection is collapsed first for character/line motions.
    Move(Motion),
    /// Move the cursor while extending the selection from an anchor.
    Select(Motion),
}

/// Text editing commands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditCommand {
    /// Type one character (replacing the selection, if any).
    InsertChar(char),
    /// Split the line at the cursor (replacing the selection, if any).
    InsertNewline,
    /// Insert possibly multi-line text at the cursor (replacing the selection, if any).
    InsertText(String),
    /// Delete the selection or the character before the cursor.
    Backspace,
    /// Delete the selection or the character at the cursor.
    Delete,
    /// Delete the selection or back to the previous word boundary.
    DeleteWordLeft,
    /// Delete the selection or forward to the next word boundary.
    DeleteWordRight,
    /// Move the cursor's line (or the selected rows) up by one.
    ShiftLinesUp,
    /// Move the cursor's line (or the selected rows) down by one.
    ShiftLinesDown,
}

/// Clipboard commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardCommand {
    /// Copy the selection.
    Copy,
    /// Copy the selection and remove it.
    Cut,
    /// Insert the clipboard at the cursor (replacing the selection, if any).
    Paste,
}

/// Any command the editing core can execute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Cursor motion.
    Cursor(CursorCommand),
    /// Text editing.
    Edit(EditCommand),
    /// Clipboard.
    Clipboard(ClipboardCommand),
}
