//! Ordering rules: sorted import groups, specifier lists, member key lists,
//! and heritage clauses.
//!
//! All four compare identifiers by code-point order, case-sensitive and
//! ascending, with ties broken by original position. A fix is always a
//! whole-group rewrite: the group's span is replaced by the same items
//! re-emitted in sorted order, each item carrying its leading comment, with
//! the original separators reused positionally.

use crate::diagnostic::{Diagnostic, Fix, Severity};
use crate::registry::{Rule, RuleContext};
use strigil_syntax::facts::{ImportDecl, MemberEntry, MemberListKind};
use strigil_syntax::{LineIndex, Region, Span};

/// One sortable item: its key and the byte range to move (leading comment
/// included).
struct SortItem {
    key: String,
    start: usize,
    end: usize,
}

fn is_sorted(items: &[SortItem]) -> bool {
    items.windows(2).all(|w| w[0].key <= w[1].key)
}

/// Re-emit the items in sorted order, reusing the original separators
/// between consecutive positions. Returns `None` when already sorted.
fn sorted_rewrite(source: &str, items: &[SortItem]) -> Option<(usize, usize, String)> {
    if items.len() < 2 || is_sorted(items) {
        return None;
    }
    let mut order: Vec<usize> = (0..items.len()).collect();
    order.sort_by(|&a, &b| items[a].key.cmp(&items[b].key).then(a.cmp(&b)));
    let mut text = String::new();
    for (pos, &oi) in order.iter().enumerate() {
        text.push_str(&source[items[oi].start..items[oi].end]);
        if pos + 1 < items.len() {
            text.push_str(&source[items[pos].end..items[pos + 1].start]);
        }
    }
    Some((items[0].start, items.last().expect("non-empty").end, text))
}

fn offset_span(index: &LineIndex, source: &str, start: usize, end: usize) -> Span {
    let pos = index.position(source, start);
    Span::new(start, end, pos.line, pos.column)
}

/// End of an import statement extended over a trailing same-line comment.
fn trailing_comment_end(source: &str, regions: &[Region], end: usize) -> usize {
    let idx = regions.partition_point(|r| r.span.start < end);
    if let Some(r) = regions.get(idx) {
        if r.kind.is_comment() {
            let gap = &source[end..r.span.start];
            if gap.chars().all(|c| c == ' ' || c == '\t') {
                return r.span.end;
            }
        }
    }
    end
}

fn import_item_start(import: &ImportDecl) -> usize {
    import
        .leading_comment
        .map_or(import.full_span.start, |c| c.start)
}

/// Sorts contiguous groups of import statements by module path.
pub struct SortImports;

impl SortImports {
    fn evaluate(&self, ctx: &RuleContext<'_>, index: &LineIndex, group: &[&ImportDecl], out: &mut Vec<Diagnostic>) {
        if group.len() < 2 {
            return;
        }
        let items: Vec<SortItem> = group
            .iter()
            .map(|imp| SortItem {
                key: imp.source_text(ctx.source).unwrap_or_default().to_string(),
                start: import_item_start(imp),
                end: trailing_comment_end(ctx.source, ctx.regions, imp.full_span.end),
            })
            .collect();
        let Some((start, end, text)) = sorted_rewrite(ctx.source, &items) else {
            return;
        };
        let span = group[0].full_span.merge(&group[group.len() - 1].full_span);
        out.push(
            Diagnostic::warning(self.id(), "Import statements are not sorted by module path", span)
                .with_help("imports in a contiguous group sort by code-point order of their paths")
                .with_fix(Fix::replace(
                    offset_span(index, ctx.source, start, end),
                    text,
                )),
        );
    }
}

impl Rule for SortImports {
    fn id(&self) -> &'static str {
        "strigil/sort-imports"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn fixable(&self) -> bool {
        true
    }

    fn description(&self) -> &'static str {
        "require sorted import statements"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        let index = LineIndex::new(ctx.source);
        let mut group: Vec<&ImportDecl> = Vec::new();
        for import in &ctx.facts.imports {
            if import.source_span.is_none() {
                self.evaluate(ctx, &index, &group, &mut out);
                group.clear();
                continue;
            }
            if let Some(last) = group.last() {
                let prev_end = trailing_comment_end(ctx.source, ctx.regions, last.full_span.end);
                let next_start = import_item_start(import);
                let contiguous = prev_end <= next_start && {
                    let between = &ctx.source[prev_end..next_start];
                    between.chars().all(char::is_whitespace)
                        && between.matches('\n').count() <= 1
                };
                if !contiguous {
                    self.evaluate(ctx, &index, &group, &mut out);
                    group.clear();
                }
            }
            group.push(import);
        }
        self.evaluate(ctx, &index, &group, &mut out);
        out
    }
}

/// Sorts the names inside one import's `{ ... }` list.
pub struct SortImportSpecifiers;

impl Rule for SortImportSpecifiers {
    fn id(&self) -> &'static str {
        "strigil/sort-import-specifiers"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn fixable(&self) -> bool {
        true
    }

    fn description(&self) -> &'static str {
        "require sorted named-import specifiers"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        let index = LineIndex::new(ctx.source);
        for import in &ctx.facts.imports {
            if import.specifiers.len() < 2 {
                continue;
            }
            let items: Vec<SortItem> = import
                .specifiers
                .iter()
                .map(|s| SortItem {
                    key: s.name.clone(),
                    start: s.leading_comment.map_or(s.entry_span.start, |c| c.start),
                    end: s.entry_span.end,
                })
                .collect();
            let Some((start, end, text)) = sorted_rewrite(ctx.source, &items) else {
                continue;
            };
            let span = import.specifiers[0]
                .entry_span
                .merge(&import.specifiers[import.specifiers.len() - 1].entry_span);
            out.push(
                Diagnostic::warning(self.id(), "Named import specifiers are not sorted", span)
                    .with_help("specifiers sort by code-point order of the imported name")
                    .with_fix(Fix::replace(
                        offset_span(&index, ctx.source, start, end),
                        text,
                    )),
            );
        }
        out
    }
}

/// Sorts object-literal and interface-body keys within comment/blank-line
/// delimited runs.
pub struct SortKeys;

impl SortKeys {
    fn evaluate(
        &self,
        ctx: &RuleContext<'_>,
        index: &LineIndex,
        kind: MemberListKind,
        run: &[&MemberEntry],
        out: &mut Vec<Diagnostic>,
    ) {
        if run.len() < 2 {
            return;
        }
        let items: Vec<SortItem> = run
            .iter()
            .map(|e| SortItem {
                key: e.key.clone().unwrap_or_default(),
                start: e.leading_comment.map_or(e.entry_span.start, |c| c.start),
                end: e.entry_span.end,
            })
            .collect();
        let Some((start, end, text)) = sorted_rewrite(ctx.source, &items) else {
            return;
        };
        let message = match kind {
            MemberListKind::ObjectLiteral => "Object keys are not sorted",
            MemberListKind::InterfaceBody => "Interface members are not sorted",
        };
        let span = run[0].key_span.merge(&run[run.len() - 1].key_span);
        out.push(
            Diagnostic::warning(self.id(), message, span)
                .with_help("keys sort by code-point order; a blank line starts a new group")
                .with_fix(Fix::replace(
                    offset_span(index, ctx.source, start, end),
                    text,
                )),
        );
    }
}

impl Rule for SortKeys {
    fn id(&self) -> &'static str {
        "strigil/sort-keys"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn fixable(&self) -> bool {
        true
    }

    fn description(&self) -> &'static str {
        "require sorted object and interface keys"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        let index = LineIndex::new(ctx.source);
        for list in &ctx.facts.member_lists {
            let mut run: Vec<&MemberEntry> = Vec::new();
            for entry in &list.entries {
                if entry.key.is_none() {
                    // spreads and computed keys end the group
                    self.evaluate(ctx, &index, list.kind, &run, &mut out);
                    run.clear();
                    continue;
                }
                if let Some(prev) = run.last() {
                    let item_start = entry.leading_comment.map_or(entry.entry_span.start, |c| c.start);
                    let between = &ctx.source
                        [prev.entry_span.end.min(item_start)..item_start];
                    if between.matches('\n').count() >= 2 {
                        self.evaluate(ctx, &index, list.kind, &run, &mut out);
                        run.clear();
                    }
                }
                run.push(entry);
            }
            self.evaluate(ctx, &index, list.kind, &run, &mut out);
        }
        out
    }
}

/// Sorts the identifier list of an `extends`/`implements` clause.
pub struct SortHeritageClauses;

impl Rule for SortHeritageClauses {
    fn id(&self) -> &'static str {
        "strigil/sort-heritage-clauses"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn fixable(&self) -> bool {
        true
    }

    fn description(&self) -> &'static str {
        "require sorted heritage-clause identifiers"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        let index = LineIndex::new(ctx.source);
        for clause in &ctx.facts.heritage_clauses {
            if clause.idents.len() < 2 {
                continue;
            }
            let items: Vec<SortItem> = clause
                .idents
                .iter()
                .map(|i| SortItem {
                    key: i.name.clone(),
                    start: i.span.start,
                    end: i.span.end,
                })
                .collect();
            let Some((start, end, text)) = sorted_rewrite(ctx.source, &items) else {
                continue;
            };
            out.push(
                Diagnostic::warning(
                    self.id(),
                    "Heritage clause identifiers are not sorted",
                    clause.list_span,
                )
                .with_help("extends/implements lists sort by code-point order")
                .with_fix(Fix::replace(
                    offset_span(&index, ctx.source, start, end),
                    text,
                )),
            );
        }
        out
    }
}
