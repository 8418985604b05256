//! Regex-safety rules.
//!
//! Both rules inspect regex literal text structurally; no pattern is ever
//! compiled or executed. Detection is deliberately conservative: it may flag
//! a safe pattern, and a deeply obfuscated pathological one may escape.

use crate::diagnostic::{Diagnostic, Severity};
use crate::registry::{Rule, RuleContext};
use strigil_syntax::Span;

/// Hard cap on detector steps, so pathological literals cannot stall a file.
const MAX_DETECTOR_STEPS: usize = 10_000;

/// Flags regex shapes prone to super-linear backtracking: an unbounded
/// quantifier applied to a group whose content is itself unboundedly
/// quantified (`(a+)+`), or to a group with duplicate alternatives
/// (`(a|a)*`).
pub struct NoSuperLinearBacktracking;

impl Rule for NoSuperLinearBacktracking {
    fn id(&self) -> &'static str {
        "strigil/no-super-linear-backtracking"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "disallow regex shapes prone to catastrophic backtracking"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for info in &ctx.facts.regex_literals {
            let body = info.body_span.slice(ctx.source);
            let Some((rel_start, rel_end)) = detect_super_linear(body) else {
                continue;
            };
            let start = info.body_span.start + rel_start;
            let end = info.body_span.start + rel_end;
            let column =
                info.body_span.column + body[..rel_start].chars().count() as u32;
            let span = Span::new(start, end, info.body_span.line, column);
            out.push(
                Diagnostic::error(
                    self.id(),
                    "Quantified group may cause super-linear backtracking",
                    span,
                )
                .with_help(
                    "an unbounded quantifier over an unbounded group, like (x+)+, lets the \
                     engine retry exponentially many partitions; this check is structural \
                     and conservative",
                ),
            );
        }
        out
    }
}

/// Finds a quantified group with nested unbounded quantification or
/// duplicate alternatives. Returns the group's byte range within the body.
fn detect_super_linear(body: &str) -> Option<(usize, usize)> {
    let mut stack: Vec<usize> = Vec::new();
    let mut in_class = false;
    let mut steps = 0usize;
    let mut chars = body.char_indices().peekable();
    while let Some((bi, c)) = chars.next() {
        steps += 1;
        if steps > MAX_DETECTOR_STEPS {
            return None;
        }
        match c {
            '\\' => {
                chars.next();
            }
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => stack.push(bi),
            ')' if !in_class => {
                let start = stack.pop()?;
                let after = &body[bi + 1..];
                if !has_unbounded_quantifier_prefix(after) {
                    continue;
                }
                let inner = group_interior(&body[start..=bi]);
                if contains_unbounded_quantifier(inner) || has_duplicate_alternatives(inner) {
                    return Some((start, bi + 1));
                }
            }
            _ => {}
        }
    }
    None
}

/// Whether text begins with `+`, `*`, or an open-ended `{n,}` repetition.
fn has_unbounded_quantifier_prefix(text: &str) -> bool {
    match text.chars().next() {
        Some('+' | '*') => true,
        Some('{') => {
            let inner: String = text[1..].chars().take_while(|&c| c != '}').collect();
            inner.ends_with(',') && inner[..inner.len() - 1].chars().all(|c| c.is_ascii_digit())
        }
        _ => false,
    }
}

/// Strip the parens and any `?:`-style prefix from a group's text.
fn group_interior(group: &str) -> &str {
    let inner = &group[1..group.len().saturating_sub(1)];
    for prefix in ["?:", "?=", "?!", "?<=", "?<!"] {
        if let Some(rest) = inner.strip_prefix(prefix) {
            return rest;
        }
    }
    if let Some(rest) = inner.strip_prefix("?<") {
        if let Some(end) = rest.find('>') {
            return &rest[end + 1..];
        }
    }
    inner
}

/// Whether an unescaped unbounded quantifier appears outside a character
/// class.
fn contains_unbounded_quantifier(text: &str) -> bool {
    let mut in_class = false;
    let mut chars = text.char_indices().peekable();
    while let Some((bi, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '+' | '*' if !in_class => return true,
            '{' if !in_class => {
                if has_unbounded_quantifier_prefix(&text[bi..]) {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// Whether the group text has two textually identical top-level
/// alternatives, as in `(a|a)`.
fn has_duplicate_alternatives(text: &str) -> bool {
    let mut alternatives: Vec<&str> = Vec::new();
    let mut depth = 0i32;
    let mut in_class = false;
    let mut start = 0usize;
    let mut chars = text.char_indices().peekable();
    while let Some((bi, c)) = chars.next() {
        match c {
            '\\' => {
                chars.next();
            }
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => depth += 1,
            ')' if !in_class => depth -= 1,
            '|' if !in_class && depth == 0 => {
                alternatives.push(&text[start..bi]);
                start = bi + 1;
            }
            _ => {}
        }
    }
    alternatives.push(&text[start..]);
    if alternatives.len() < 2 {
        return false;
    }
    for (i, a) in alternatives.iter().enumerate() {
        if a.is_empty() {
            continue;
        }
        if alternatives[i + 1..].contains(a) {
            return true;
        }
    }
    false
}

/// Flags capturing groups with no backreference or index access. Never
/// auto-fixed: converting to `(?:` renumbers every later group.
pub struct NoUnusedCapturingGroup;

impl Rule for NoUnusedCapturingGroup {
    fn id(&self) -> &'static str {
        "strigil/no-unused-capturing-group"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn description(&self) -> &'static str {
        "disallow capturing groups whose captures go unused"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for info in &ctx.facts.regex_literals {
            for group in &info.capturing_groups {
                if group.referenced {
                    continue;
                }
                let label = match &group.name {
                    Some(name) => format!("'{name}'"),
                    None => format!("#{}", group.index),
                };
                out.push(
                    Diagnostic::warning(
                        self.id(),
                        format!("Capturing group {label} is never referenced"),
                        group.span,
                    )
                    .with_help(
                        "use a non-capturing group (?:...) if the capture is not needed; \
                         not auto-fixed because removing it would renumber later \
                         backreferences",
                    ),
                );
            }
        }
        out
    }
}
