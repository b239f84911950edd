use std::fmt;

use streaming_iterator::StreamingIterator;
use tedit_core::{BufferEdit, Capture, Cursor, ParseBridge, TextBuffer};
use thiserror::Error;
use tracing::{debug, trace};
use tree_sitter::{InputEdit, Node, Parser, Point, Query, QueryCursor, Tree};

use crate::language::SyntaxLanguage;

const PLAIN_TEXT: &str = "Plain Text";

/// Errors produced by [`TreeSitterBridge`].
#[derive(Debug, Error)]
pub enum BridgeError {
    /// No grammar is registered under this name.
    #[error("unknown language: {0}")]
    UnknownLanguage(String),
    /// The parser rejected the grammar (ABI mismatch).
    #[error("tree-sitter language error: {0}")]
    Language(String),
    /// The highlight query failed to compile.
    #[error("tree-sitter query error: {0}")]
    Query(String),
}

/// How the bridge updated its parse tree most recently.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeSitterUpdateMode {
    /// Parsed the whole buffer without a previous tree.
    Full,
    /// Applied an edit to the previous tree and re-parsed incrementally.
    Incremental,
    /// No work was performed (no language selected).
    Skipped,
}

struct Syntax {
    language: SyntaxLanguage,
    highlights: Query,
}

/// Incremental Tree-sitter parser kept in lock-step with a [`TextBuffer`].
///
/// The parser reads the buffer through [`TextBuffer::read_chunk_at`], so the document is never
/// copied into one contiguous string. Without a language the bridge is inert: parsing does
/// nothing and capture queries return an empty list.
pub struct TreeSitterBridge {
    parser: Parser,
    syntax: Option<Syntax>,
    tree: Option<Tree>,
    last_update_mode: TreeSitterUpdateMode,
}

impl TreeSitterBridge {
    /// Create an inert bridge (no language selected).
    pub fn new() -> Self {
        Self {
            parser: Parser::new(),
            syntax: None,
            tree: None,
            last_update_mode: TreeSitterUpdateMode::Skipped,
        }
    }

    /// Create a bridge for `language`.
    pub fn with_language(language: SyntaxLanguage) -> Result<Self, BridgeError> {
        let mut bridge = Self::new();
        bridge.set_language(language)?;
        Ok(bridge)
    }

    /// Create a bridge for the language called `name` (see [`SyntaxLanguage::from_name`]).
    pub fn for_name(name: &str) -> Result<Self, BridgeError> {
        Self::with_language(SyntaxLanguage::from_name(name)?)
    }

    /// Select `language`. The previous tree is dropped; call
    /// [`parse_buffer`](ParseBridge::parse_buffer) afterwards.
    pub fn set_language(&mut self, language: SyntaxLanguage) -> Result<(), BridgeError> {
        let grammar = language.language();
        let highlights = Query::new(&grammar, language.highlights_query())
            .map_err(|e| BridgeError::Query(e.to_string()))?;
        self.parser
            .set_language(&grammar)
            .map_err(|e| BridgeError::Language(e.to_string()))?;

        debug!(language = language.name(), "selected syntax language");
        self.syntax = Some(Syntax {
            language,
            highlights,
        });
        self.tree = None;
        Ok(())
    }

    /// Return to the inert state.
    pub fn clear_language(&mut self) {
        self.parser.reset();
        self.syntax = None;
        self.tree = None;
    }

    /// The selected language.
    pub fn language(&self) -> Option<SyntaxLanguage> {
        self.syntax.as_ref().map(|syntax| syntax.language)
    }

    /// The current parse tree.
    pub fn tree(&self) -> Option<&Tree> {
        self.tree.as_ref()
    }

    /// How the tree was last updated (useful for tests and instrumentation).
    pub fn last_update_mode(&self) -> TreeSitterUpdateMode {
        self.last_update_mode
    }
}

impl Default for TreeSitterBridge {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TreeSitterBridge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TreeSitterBridge")
            .field("language", &self.language())
            .field("has_tree", &self.tree.is_some())
            .field("last_update_mode", &self.last_update_mode)
            .finish()
    }
}

fn point(cursor: Cursor) -> Point {
    Point::new(cursor.row, cursor.col)
}

fn parse(parser: &mut Parser, buffer: &TextBuffer, old_tree: Option<&Tree>) -> Option<Tree> {
    parser.parse_with_options(
        &mut |byte, _point| buffer.read_chunk_at(byte),
        old_tree,
        None,
    )
}

impl ParseBridge for TreeSitterBridge {
    fn language_name(&self) -> &str {
        self.syntax
            .as_ref()
            .map_or(PLAIN_TEXT, |syntax| syntax.language.name())
    }

    fn parse_buffer(&mut self, buffer: &TextBuffer) {
        if self.syntax.is_none() {
            self.last_update_mode = TreeSitterUpdateMode::Skipped;
            return;
        }
        self.tree = parse(&mut self.parser, buffer, None);
        self.last_update_mode = TreeSitterUpdateMode::Full;
        debug!(
            language = self.language_name(),
            bytes = buffer.byte_len(),
            "parsed buffer"
        );
    }

    fn edit(&mut self, buffer: &TextBuffer, edit: &BufferEdit) {
        let Some(tree) = self.tree.as_mut() else {
            self.parse_buffer(buffer);
            return;
        };

        tree.edit(&InputEdit {
            start_byte: edit.start_byte,
            old_end_byte: edit.old_end_byte,
            new_end_byte: edit.new_end_byte,
            start_position: point(edit.start_point),
            old_end_position: point(edit.old_end_point),
            new_end_position: point(edit.new_end_point),
        });
        trace!(
            start_byte = edit.start_byte,
            old_end_byte = edit.old_end_byte,
            new_end_byte = edit.new_end_byte,
            "reparsing after edit"
        );

        self.tree = parse(&mut self.parser, buffer, self.tree.as_ref());
        self.last_update_mode = TreeSitterUpdateMode::Incremental;
    }

    fn captures_within(&self, buffer: &TextBuffer, start: Cursor, end: Cursor) -> Vec<Capture> {
        let (Some(syntax), Some(tree)) = (self.syntax.as_ref(), self.tree.as_ref()) else {
            return Vec::new();
        };

        let start_byte = buffer.get_offset_from_point(start);
        let end_byte = buffer.get_offset_from_point(end);
        if end_byte <= start_byte {
            return Vec::new();
        }

        let mut cursor = QueryCursor::new();
        cursor.set_byte_range(start_byte..end_byte);

        let names = syntax.highlights.capture_names();
        let text = |node: Node<'_>| {
            buffer
                .chunks_in_range(node.start_byte(), node.end_byte())
                .into_iter()
        };

        let mut spans = Vec::new();
        let mut captures = cursor.captures(&syntax.highlights, tree.root_node(), text);
        while let Some((mat, capture_idx)) = captures.next() {
            let capture = &mat.captures[*capture_idx];
            let node = capture.node;
            let (node_start, node_end) = (node.start_byte(), node.end_byte());
            if node_end <= node_start || node_end <= start_byte || node_start >= end_byte {
                continue;
            }
            spans.push((node_start, node_end, capture.index as usize));
        }

        spans.sort_by_key(|(start, end, _)| (*start, *end));
        spans.dedup();
        spans
            .into_iter()
            .map(|(node_start, node_end, index)| Capture {
                start: buffer.point_from_offset(node_start),
                end: buffer.point_from_offset(node_end),
                tag: names[index].to_string(),
            })
            .collect()
    }
}
