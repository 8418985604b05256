//! Formatter options.
//!
//! Owned by the resolved configuration; the excluded config-loading layer
//! deserializes these and the core only reads them.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndentStyle {
    Spaces,
    Tabs,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuoteStyle {
    Single,
    Double,
}

impl QuoteStyle {
    pub fn char(&self) -> char {
        match self {
            QuoteStyle::Single => '\'',
            QuoteStyle::Double => '"',
        }
    }
}

/// Whether statement terminators are inserted, stripped, or left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SemicolonPolicy {
    Always,
    Never,
    Preserve,
}

/// End-of-file newline policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinalNewline {
    One,
    None,
    Preserve,
}

/// All knobs of the formatting pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatOptions {
    pub indent_style: IndentStyle,
    pub indent_width: usize,
    pub quote_style: QuoteStyle,
    pub semicolons: SemicolonPolicy,
    pub trim_trailing_whitespace: bool,
    /// Longest run of blank lines allowed to survive.
    pub max_blank_lines: usize,
    pub final_newline: FinalNewline,
}

impl Default for FormatOptions {
    fn default() -> Self {
        FormatOptions {
            indent_style: IndentStyle::Spaces,
            indent_width: 2,
            quote_style: QuoteStyle::Single,
            semicolons: SemicolonPolicy::Preserve,
            trim_trailing_whitespace: true,
            max_blank_lines: 1,
            final_newline: FinalNewline::One,
        }
    }
}

impl FormatOptions {
    /// One level of indentation as text.
    pub fn indent_unit(&self) -> String {
        match self.indent_style {
            IndentStyle::Spaces => " ".repeat(self.indent_width),
            IndentStyle::Tabs => "\t".to_string(),
        }
    }
}
