#![warn(missing_docs)]
//! `tedit-treesitter` - Tree-sitter parse bridge for `tedit-core`.
//!
//! [`TreeSitterBridge`] implements [`tedit_core::ParseBridge`]: it parses a
//! [`TextBuffer`](tedit_core::TextBuffer) by pulling line chunks lazily, applies every
//! [`BufferEdit`](tedit_core::BufferEdit) to its tree before re-parsing incrementally, and answers
//! highlight queries with [`Capture`](tedit_core::Capture)s tagged by capture name.
//!
//! ```rust
//! use tedit_core::{Cursor, EditorContext};
//! use tedit_treesitter::TreeSitterBridge;
//!
//! let mut editor = EditorContext::with_text("fn main() {}");
//! editor.set_parse_bridge(Box::new(TreeSitterBridge::for_name("rust").unwrap()));
//!
//! let captures = editor.captures_within(Cursor::new(0, 0), Cursor::new(0, 12));
//! assert_eq!(captures[0].tag, "keyword");
//! ```

mod bridge;
mod language;

pub use bridge::{BridgeError, TreeSitterBridge, TreeSitterUpdateMode};
pub use language::SyntaxLanguage;
