//! Strigil syntax layer
//!
//! Lexical scanning and structural-fact extraction for C-family scripting
//! source. This crate provides:
//! - A total, panic-free scanner producing tokens and a region partition
//! - The region model (code vs. comment/string/template/regex text)
//! - Structural facts (imports, member lists, heritage clauses, bindings,
//!   conditional tests, regex capture groups) computed in one token pass
//!
//! No other crate re-parses raw source text: lint rules and the formatter
//! both work from the tokens, regions, and facts produced here.
//!
//! # Usage
//!
//! ```
//! use strigil_syntax::{extract, scan};
//!
//! let source = "let x = 10;";
//! let scanned = scan(source);
//! let facts = extract(source, &scanned);
//! assert_eq!(facts.bindings.len(), 1);
//! assert!(!facts.bindings[0].reassigned);
//! ```

#![warn(missing_docs)]

pub mod extract;
pub mod facts;
pub mod region;
pub mod scanner;
pub mod span;
pub mod token;

pub use extract::extract;
pub use facts::Facts;
pub use region::{offset_in_code, region_at, Region, RegionKind};
pub use scanner::{scan, ScanErrorKind, ScanIssue, ScanResult, MAX_TEMPLATE_DEPTH};
pub use span::{LineIndex, Position, Span};
pub use token::{keyword, matching_bracket, Token, TokenKind};
