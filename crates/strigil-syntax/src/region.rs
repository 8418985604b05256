//! Region classification.
//!
//! The scanner partitions every file into regions: runs of plain code,
//! comments, string/template bodies, template expression holes, and regex
//! literals. The region list is sorted, gap-free, and overlap-free, so
//! concatenating all region slices reconstructs the file exactly. Rules and
//! the formatter use regions to avoid reading code-shaped text inside
//! literals and comments.

use crate::span::Span;

/// Classification of a contiguous run of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RegionKind {
    /// Ordinary code, including whitespace between tokens.
    Code,
    /// A `//` comment up to (not including) the line break.
    LineComment,
    /// A `/* ... */` comment including both delimiters.
    BlockComment,
    /// A quoted string literal including both quotes.
    StringLiteral,
    /// A template-literal chunk: the backtick/`${`/`}` delimiters and the
    /// text between them. A template with holes produces several of these.
    TemplateLiteral,
    /// The interior of a `${...}` hole. Contains ordinary tokens; nested
    /// literals and comments inside the hole get their own regions.
    TemplateExpressionHole,
    /// A regular-expression literal including delimiters and flags.
    RegexLiteral,
}

impl RegionKind {
    /// Regions whose contents are tokens rather than opaque text.
    pub fn holds_tokens(&self) -> bool {
        matches!(self, RegionKind::Code | RegionKind::TemplateExpressionHole)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, RegionKind::LineComment | RegionKind::BlockComment)
    }
}

/// A classified span of source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    pub kind: RegionKind,
    pub span: Span,
}

impl Region {
    pub fn new(kind: RegionKind, span: Span) -> Self {
        Region { kind, span }
    }
}

/// Find the region containing a byte offset.
///
/// Offsets at the very end of the file fall past every region and return
/// `None`.
pub fn region_at(regions: &[Region], offset: usize) -> Option<&Region> {
    let idx = regions.partition_point(|r| r.span.end <= offset);
    regions.get(idx).filter(|r| r.span.contains(offset))
}

/// Whether the byte offset sits inside a `Code` region.
pub fn offset_in_code(regions: &[Region], offset: usize) -> bool {
    region_at(regions, offset).map_or(true, |r| r.kind == RegionKind::Code)
}
