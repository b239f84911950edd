#![warn(missing_docs)]
//! tedit core - the editing kernel of a terminal text editor
//!
//! # Overview
//!
//! `tedit-core` owns the document and everything that moves over it. It does no rendering, no
//! file I/O and no terminal handling; a front end drives it through [`Command`]s (or raw
//! [`KeyInput`]s) and reads back lines, the cursor, the selection and highlight captures.
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  EditorContext + Commands + Key map         │  ← Public API
//! ├─────────────────────────────────────────────┤
//! │  Movement Engine (char / word / wrapped)    │  ← Cursor motion
//! ├─────────────────────────────────────────────┤
//! │  Text Buffer                  ParseBridge ──┼─→ incremental parser
//! ├─────────────────────────────────────────────┤
//! │  Line-Size Index (implicit-key treap)       │  ← Line ↔ byte offset
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use tedit_core::{Command, CursorCommand, EditCommand, EditorContext, Motion};
//!
//! let mut editor = EditorContext::with_text("hello world");
//!
//! editor.execute(Command::Cursor(CursorCommand::Move(Motion::WordRight)));
//! assert_eq!(editor.cursor().point(), (0, 5));
//!
//! editor.execute(Command::Edit(EditCommand::InsertChar(',')));
//! assert_eq!(editor.buffer().line_at(0), "hello, world");
//! ```
//!
//! # Module Description
//!
//! - [`line_size_index`] - treap mapping line numbers to byte offsets
//! - [`width`] - tab-expanded widths and wrap chunks
//! - [`buffer`] - line storage and cursor-addressed mutation
//! - [`cursor`] - cursor positions
//! - [`movement`] - cursor motion
//! - [`parse`] - the parse-bridge seam
//! - [`commands`] / [`keymap`] / [`editor`] - command execution
//! - [`config`] - editor settings

pub mod buffer;
pub mod commands;
pub mod config;
pub mod cursor;
pub mod editor;
pub mod keymap;
pub mod line_size_index;
pub mod movement;
pub mod parse;
pub mod width;

pub use buffer::TextBuffer;
pub use commands::{ClipboardCommand, Command, CursorCommand, EditCommand};
pub use config::{ConfigError, DEFAULT_VIEWPORT_COLUMNS, EditorConfig};
pub use cursor::{Cursor, ordered};
pub use editor::EditorContext;
pub use keymap::{KeyCode, KeyInput, Modifiers, command_for};
pub use line_size_index::LineSizeIndex;
pub use movement::{CharClass, Motion, MovementEngine, WrapMode};
pub use parse::{BufferEdit, Capture, ParseBridge};
pub use width::{TAB_WIDTH, effective_width, symbol_width, visual_chunks};
