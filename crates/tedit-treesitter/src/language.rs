use std::fmt;
use std::str::FromStr;

use crate::BridgeError;

const RUST_HIGHLIGHTS: &str = r#"
(line_comment) @comment
(block_comment) @comment
(string_literal) @string
(char_literal) @string
(integer_literal) @number
(float_literal) @number
(primitive_type) @type
(type_identifier) @type
(function_item name: (identifier) @function)
[
  "fn" "let" "if" "else" "return" "struct" "impl" "pub" "use"
  "match" "for" "while" "loop" "enum" "mod"
] @keyword
"#;

const CPP_HIGHLIGHTS: &str = r#"
(comment) @comment
(string_literal) @string
(char_literal) @string
(number_literal) @number
(primitive_type) @type
(type_identifier) @type
(function_declarator declarator: (identifier) @function)
[
  "if" "else" "return" "for" "while" "class" "struct" "namespace" "template"
] @keyword
"#;

/// Languages with a built-in grammar and highlight query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SyntaxLanguage {
    /// Rust (`tree-sitter-rust`).
    Rust,
    /// C++ (`tree-sitter-cpp`).
    Cpp,
}

impl SyntaxLanguage {
    /// Every supported language.
    pub const ALL: [SyntaxLanguage; 2] = [SyntaxLanguage::Rust, SyntaxLanguage::Cpp];

    /// Look a language up by name or file extension (case-insensitive).
    pub fn from_name(name: &str) -> Result<Self, BridgeError> {
        match name.trim().to_ascii_lowercase().as_str() {
            "rust" | "rs" => Ok(Self::Rust),
            "cpp" | "c++" | "cc" | "cxx" | "hpp" => Ok(Self::Cpp),
            _ => Err(BridgeError::UnknownLanguage(name.to_string())),
        }
    }

    /// Display name for status lines.
    pub fn name(self) -> &'static str {
        match self {
            Self::Rust => "Rust",
            Self::Cpp => "C++",
        }
    }

    /// The Tree-sitter grammar.
    pub fn language(self) -> tree_sitter::Language {
        match self {
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Cpp => tree_sitter_cpp::LANGUAGE.into(),
        }
    }

    /// Highlight query source; capture names become [`Capture`](tedit_core::Capture) tags.
    pub fn highlights_query(self) -> &'static str {
        match self {
            Self::Rust => RUST_HIGHLIGHTS,
            Self::Cpp => CPP_HIGHLIGHTS,
        }
    }
}

impl fmt::Display for SyntaxLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SyntaxLanguage {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s)
    }
}
