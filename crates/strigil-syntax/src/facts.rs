//! Structural facts.
//!
//! Narrow, rule-independent extractions computed once per file by the
//! extractor and read (never mutated) by lint rules. A fact records spans
//! back into the original source so fixes can rewrite exactly the text a
//! fact describes.

use crate::span::Span;

/// All facts for one file.
#[derive(Debug, Default)]
pub struct Facts {
    pub imports: Vec<ImportDecl>,
    pub member_lists: Vec<MemberList>,
    pub heritage_clauses: Vec<HeritageClause>,
    pub bindings: Vec<Binding>,
    pub conditional_tests: Vec<ConditionalTest>,
    pub top_level_bindings: Vec<TopLevelBinding>,
    pub regex_literals: Vec<RegexLiteralInfo>,
}

/// One name inside an import's `{ ... }` specifier list.
#[derive(Debug, Clone)]
pub struct ImportSpecifier {
    /// The imported name (the left side of `a as b`).
    pub name: String,
    /// Span of the name itself.
    pub span: Span,
    /// Span of the whole entry, e.g. `a as b`.
    pub entry_span: Span,
    /// Comment block attached directly above or before the entry, if any.
    /// Reordering fixes move the comment together with the entry.
    pub leading_comment: Option<Span>,
}

/// An `import` statement.
#[derive(Debug, Clone)]
pub struct ImportDecl {
    pub specifiers: Vec<ImportSpecifier>,
    /// Default-import name, if present.
    pub default_name: Option<String>,
    /// Whether the statement has a `* as ns` namespace clause.
    pub namespace: bool,
    /// Span of the module path string literal, quotes included.
    pub source_span: Option<Span>,
    /// From the `import` keyword through the terminating semicolon (or the
    /// last token of the statement when there is none).
    pub full_span: Span,
    pub leading_comment: Option<Span>,
    pub line: u32,
}

impl ImportDecl {
    /// The module path without its quotes, if the statement has one.
    pub fn source_text<'a>(&self, source: &'a str) -> Option<&'a str> {
        let span = self.source_span?;
        let raw = span.slice(source);
        Some(raw.trim_matches(|c| c == '"' || c == '\''))
    }
}

/// What kind of brace body a member list was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberListKind {
    ObjectLiteral,
    InterfaceBody,
}

/// One member of an object literal or interface body.
#[derive(Debug, Clone)]
pub struct MemberEntry {
    /// Sort key: the member name, `None` when the entry has no sortable name
    /// (spread, computed key). A `None` entry splits the sort group.
    pub key: Option<String>,
    pub key_span: Span,
    /// From the entry's first token through its last, separator excluded.
    pub entry_span: Span,
    pub leading_comment: Option<Span>,
    pub line: u32,
}

/// An object-literal or interface-body key list.
#[derive(Debug, Clone)]
pub struct MemberList {
    pub kind: MemberListKind,
    pub entries: Vec<MemberEntry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeritageKind {
    Extends,
    Implements,
}

/// One identifier (possibly dotted, possibly with type arguments) in a
/// heritage clause.
#[derive(Debug, Clone)]
pub struct HeritageIdent {
    pub name: String,
    pub span: Span,
}

/// An `extends`/`implements` identifier list on a class or interface header.
#[derive(Debug, Clone)]
pub struct HeritageClause {
    pub kind: HeritageKind,
    pub idents: Vec<HeritageIdent>,
    /// From the first identifier through the last.
    pub list_span: Span,
}

/// Which keyword declared a binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclaredKind {
    Let,
    Const,
    Var,
}

impl DeclaredKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeclaredKind::Let => "let",
            DeclaredKind::Const => "const",
            DeclaredKind::Var => "var",
        }
    }
}

/// A single declarator of a `let`/`const`/`var` declaration.
#[derive(Debug, Clone)]
pub struct Binding {
    pub name: String,
    pub declared_kind: DeclaredKind,
    /// Span of the declaring keyword token; the prefer-const fix replaces
    /// exactly this span.
    pub keyword_span: Span,
    pub name_span: Span,
    /// True once any later bare assignment, compound assignment, or
    /// increment/decrement targets the name while its scope is open.
    pub reassigned: bool,
    /// Declarators of one declaration statement share an id, so a fix can be
    /// withheld unless every declarator qualifies.
    pub decl_id: u32,
}

/// The parenthesized test of `if`/`while` or the middle clause of a
/// C-style `for`.
#[derive(Debug, Clone, Copy)]
pub struct ConditionalTest {
    pub span: Span,
    /// True when the top-level operator is a bare `=` and the test is not
    /// wrapped in the explicit `((...))` escape.
    pub is_assignment: bool,
}

/// A top-level `let`/`const`/`var` binding, for the function-declaration
/// preference rule.
#[derive(Debug, Clone)]
pub struct TopLevelBinding {
    pub name: String,
    pub span: Span,
    pub is_arrow_or_function_expr: bool,
    pub exported: bool,
    pub declared_kind: DeclaredKind,
}

/// One capturing group inside a regex literal.
#[derive(Debug, Clone)]
pub struct CaptureGroup {
    /// Span of the group in the original source, parens included.
    pub span: Span,
    /// 1-based group number.
    pub index: u32,
    /// Name for `(?<name>...)` groups.
    pub name: Option<String>,
    /// True when a backreference (`\1`, `\k<name>`) inside the literal, or a
    /// numeric index access in the rest of the statement, refers to it.
    pub referenced: bool,
}

/// Capture-group facts for one regex literal.
#[derive(Debug, Clone)]
pub struct RegexLiteralInfo {
    /// The whole literal, delimiters and flags included.
    pub span: Span,
    /// Just the pattern between the slashes.
    pub body_span: Span,
    pub capturing_groups: Vec<CaptureGroup>,
}
