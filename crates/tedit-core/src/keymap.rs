//! Key bindings.
//!
//! Maps a key press to a [`Command`] through a single `match`. Keys without a binding map to
//! `None`; there is no placeholder handler.

use tracing::trace;

use crate::commands::{ClipboardCommand, Command, CursorCommand, EditCommand};
use crate::movement::Motion;

/// A key, independent of the terminal backend that produced it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    /// A printable character.
    Char(char),
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Backspace.
    Backspace,
    /// Forward delete.
    Delete,
    /// Enter / Return.
    Enter,
    /// Tab.
    Tab,
    /// Escape.
    Esc,
}

/// Modifier keys held during a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    /// Shift.
    pub shift: bool,
    /// Control.
    pub ctrl: bool,
    /// Alt / Option.
    pub alt: bool,
}

impl Modifiers {
    /// No modifier.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };
    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };
    /// Control only.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };
    /// Alt only.
    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };
    /// Control + Shift.
    pub const CTRL_SHIFT: Self = Self {
        shift: true,
        ctrl: true,
        alt: false,
    };
}

/// A key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyInput {
    /// The key.
    pub code: KeyCode,
    /// Held modifiers.
    pub modifiers: Modifiers,
}

impl KeyInput {
    /// A key press with the given modifiers.
    pub fn new(code: KeyCode, modifiers: Modifiers) -> Self {
        Self { code, modifiers }
    }

    /// A key press without modifiers.
    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, Modifiers::NONE)
    }
}

fn arrow_motion(code: KeyCode, by_word: bool) -> Option<Motion> {
    match (code, by_word) {
        (KeyCode::Left, false) => Some(Motion::Left),
        (KeyCode::Right, false) => Some(Motion::Right),
        (KeyCode::Up, false) => Some(Motion::Up),
        (KeyCode::Down, false) => Some(Motion::Down),
        (KeyCode::Left, true) => Some(Motion::WordLeft),
        (KeyCode::Right, true) => Some(Motion::WordRight),
        _ => None,
    }
}

/// The command bound to `input`, if any.
pub fn command_for(input: KeyInput) -> Option<Command> {
    let KeyInput { code, modifiers } = input;

    let command = match (modifiers, code) {
        (m, KeyCode::Char(ch)) if !m.ctrl && !m.alt => {
            Some(Command::Edit(EditCommand::InsertChar(ch)))
        }
        (Modifiers::NONE, KeyCode::Tab) => Some(Command::Edit(EditCommand::InsertChar('\t'))),
        (Modifiers::NONE, KeyCode::Enter) => Some(Command::Edit(EditCommand::InsertNewline)),
        (Modifiers::NONE, KeyCode::Backspace) => Some(Command::Edit(EditCommand::Backspace)),
        (Modifiers::NONE, KeyCode::Delete) => Some(Command::Edit(EditCommand::Delete)),
        (Modifiers::CTRL, KeyCode::Backspace) => {
            Some(Command::Edit(EditCommand::DeleteWordLeft))
        }
        (Modifiers::CTRL, KeyCode::Delete) => Some(Command::Edit(EditCommand::DeleteWordRight)),

        (Modifiers::NONE, arrow) => {
            arrow_motion(arrow, false).map(|m| Command::Cursor(CursorCommand::Move(m)))
        }
        (Modifiers::SHIFT, arrow) => {
            arrow_motion(arrow, false).map(|m| Command::Cursor(CursorCommand::Select(m)))
        }
        (Modifiers::CTRL, KeyCode::Left | KeyCode::Right) => {
            arrow_motion(code, true).map(|m| Command::Cursor(CursorCommand::Move(m)))
        }
        (Modifiers::CTRL_SHIFT, KeyCode::Left | KeyCode::Right) => {
            arrow_motion(code, true).map(|m| Command::Cursor(CursorCommand::Select(m)))
        }
        (Modifiers::ALT, KeyCode::Up) => Some(Command::Edit(EditCommand::ShiftLinesUp)),
        (Modifiers::ALT, KeyCode::Down) => Some(Command::Edit(EditCommand::ShiftLinesDown)),

        (Modifiers::CTRL, KeyCode::Char('c' | 'C')) => {
            Some(Command::Clipboard(ClipboardCommand::Copy))
        }
        (Modifiers::CTRL, KeyCode::Char('x' | 'X')) => {
            Some(Command::Clipboard(ClipboardCommand::Cut))
        }
        (Modifiers::CTRL, KeyCode::Char('v' | 'V')) => {
            Some(Command::Clipboard(ClipboardCommand::Paste))
        }
        _ => None,
    };

    if command.is_none() {
        trace!(?input, "no binding for key");
    }
    command
}
