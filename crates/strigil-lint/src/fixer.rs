//! Conflict-free fix application.
//!
//! Fixes are applied left to right; a fix whose range overlaps an already
//! accepted fix is rejected and its diagnostic stays reported. Rejection is
//! deterministic: first-by-position wins, ties broken by emission order.

use crate::diagnostic::{Diagnostic, Edit};

/// Upper bound on lint-fix-rescan iterations. Applying one fix can expose
/// another fixable finding (deleting a reassignment makes a binding
/// const-eligible), so the engine loops, but it must terminate even when
/// convergence never happens.
pub const MAX_FIX_PASSES: usize = 8;

/// Result of one fix application pass.
#[derive(Debug)]
pub struct FixOutcome {
    /// The rewritten text.
    pub text: String,
    /// Number of fixes applied.
    pub applied: usize,
    /// Diagnostics still standing: everything without a fix, plus fixes
    /// rejected by the overlap rule.
    pub unfixed: Vec<Diagnostic>,
}

/// Apply a maximal non-conflicting subset of the diagnostics' fixes to the
/// text they were produced for.
pub fn apply_fixes(source: &str, diagnostics: Vec<Diagnostic>) -> FixOutcome {
    let mut unfixed = Vec::new();
    let mut candidates: Vec<Diagnostic> = Vec::new();
    for diag in diagnostics {
        if diag.fix.is_some() {
            candidates.push(diag);
        } else {
            unfixed.push(diag);
        }
    }
    // stable: equal start positions keep emission order
    candidates.sort_by_key(|d| d.fix.as_ref().expect("candidate carries fix").start());

    let mut accepted_edits: Vec<Edit> = Vec::new();
    let mut applied = 0usize;
    let mut last_end = 0usize;
    let mut first = true;
    for diag in candidates {
        let fix = diag.fix.as_ref().expect("candidate carries fix");
        let start = fix.start();
        let end = fix.end();
        if first || start >= last_end {
            accepted_edits.extend(fix.edits.iter().cloned());
            last_end = end.max(last_end);
            applied += 1;
            first = false;
        } else {
            unfixed.push(diag);
        }
    }

    let text = splice(source, &accepted_edits);
    FixOutcome {
        text,
        applied,
        unfixed,
    }
}

/// Splice non-overlapping, position-sorted edits into the text.
fn splice(source: &str, edits: &[Edit]) -> String {
    let mut out = String::with_capacity(source.len());
    let mut pos = 0usize;
    for edit in edits {
        debug_assert!(edit.span.start >= pos, "edits must not overlap");
        out.push_str(&source[pos..edit.span.start]);
        out.push_str(&edit.replacement);
        pos = edit.span.end;
    }
    out.push_str(&source[pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagnostic::{Diagnostic, Fix};
    use strigil_syntax::Span;

    fn span(start: usize, end: usize) -> Span {
        Span::new(start, end, 1, start as u32 + 1)
    }

    fn fixed(rule: &'static str, s: usize, e: usize, replacement: &str) -> Diagnostic {
        Diagnostic::warning(rule, "m", span(s, e)).with_fix(Fix::replace(span(s, e), replacement))
    }

    #[test]
    fn test_non_overlapping_fixes_all_apply() {
        let source = "let a; let b;";
        let outcome = apply_fixes(
            source,
            vec![fixed("t/a", 0, 3, "const"), fixed("t/b", 7, 10, "const")],
        );
        assert_eq!(outcome.text, "const a; const b;");
        assert_eq!(outcome.applied, 2);
        assert!(outcome.unfixed.is_empty());
    }

    #[test]
    fn test_overlap_keeps_first_by_position() {
        let source = "abcdef";
        let outcome = apply_fixes(
            source,
            vec![fixed("t/late", 2, 5, "X"), fixed("t/early", 0, 3, "Y")],
        );
        assert_eq!(outcome.text, "Ydef");
        assert_eq!(outcome.applied, 1);
        assert_eq!(outcome.unfixed.len(), 1);
        assert_eq!(outcome.unfixed[0].rule_id, "t/late");
    }

    #[test]
    fn test_rejection_is_stable_across_runs() {
        let source = "abcdef";
        let diags = || {
            vec![
                fixed("t/one", 1, 4, "X"),
                fixed("t/two", 2, 5, "Y"),
                fixed("t/three", 4, 6, "Z"),
            ]
        };
        let a = apply_fixes(source, diags());
        let b = apply_fixes(source, diags());
        assert_eq!(a.text, b.text);
        assert_eq!(a.text, "aXZ");
        assert_eq!(a.unfixed[0].rule_id, "t/two");
    }

    #[test]
    fn test_diagnostics_without_fix_pass_through() {
        let source = "text";
        let outcome = apply_fixes(
            source,
            vec![Diagnostic::warning("t/plain", "m", span(0, 1))],
        );
        assert_eq!(outcome.text, "text");
        assert_eq!(outcome.applied, 0);
        assert_eq!(outcome.unfixed.len(), 1);
    }

    #[test]
    fn test_multi_edit_fix_is_atomic() {
        let source = "if (x) y();";
        // wrap-in-braces style fix: two inserts from one diagnostic
        let fix = Fix::replace(span(7, 7), "{ ").and_replace(span(11, 11), " }");
        let outcome = apply_fixes(
            source,
            vec![Diagnostic::warning("t/curly", "m", span(7, 10)).with_fix(fix)],
        );
        assert_eq!(outcome.text, "if (x) { y(); }");
    }
}
