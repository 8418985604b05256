//! Built-in rules.
//!
//! Four families: presence (forbidden constructs), ordering (sorted imports
//! and key lists), binding discipline (prefer-const and friends), and
//! formatting-adjacent structure plus regex safety. Each rule is a small
//! pattern-matcher over the token stream and structural facts; none of them
//! re-reads raw text outside the spans the scanner classified.

pub mod bindings;
pub mod ordering;
pub mod presence;
pub mod regex;
pub mod style;

use crate::registry::Rule;

/// Every built-in rule, in registry order.
pub fn all() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(presence::NoDebugger),
        Box::new(presence::NoConsole),
        Box::new(presence::NoCommonjs),
        Box::new(presence::NoTopLevelAwait),
        Box::new(presence::NoCondAssign),
        Box::new(presence::Curly),
        Box::new(ordering::SortImports),
        Box::new(ordering::SortImportSpecifiers),
        Box::new(ordering::SortKeys),
        Box::new(ordering::SortHeritageClauses),
        Box::new(bindings::PreferConst),
        Box::new(bindings::TopLevelFunction),
        Box::new(style::ConsistentChaining),
        Box::new(style::ConsistentListNewline),
        Box::new(style::IfNewline),
        Box::new(style::OneStatementPerLine),
        Box::new(regex::NoSuperLinearBacktracking),
        Box::new(regex::NoUnusedCapturingGroup),
    ]
}
