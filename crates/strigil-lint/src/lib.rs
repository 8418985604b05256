//! Strigil lint engine
//!
//! Rule execution, fix application, and result aggregation for C-family
//! scripting source. This crate provides:
//! - The diagnostic model shared by every rule and the scan-issue adapter
//! - A constructed-once rule registry with per-rule failure isolation
//! - The built-in rule set (presence, ordering, binding discipline,
//!   formatting-adjacent structure, regex safety)
//! - The conflict-free fix applier with a capped fix-and-rescan loop
//! - Per-file reports and thread-safe batch aggregation
//!
//! # Usage
//!
//! ```
//! use strigil_lint::{lint_text, ResolvedConfig, RuleRegistry};
//!
//! let registry = RuleRegistry::builtin();
//! let config = ResolvedConfig::default();
//! let diagnostics = lint_text("debugger;\n", &config, &registry);
//! assert_eq!(diagnostics[0].rule_id, "strigil/no-debugger");
//! ```

#![warn(missing_docs)]

pub mod config;
pub mod diagnostic;
pub mod fixer;
pub mod registry;
pub mod report;
pub mod rules;
pub mod session;

pub use config::{ResolvedConfig, RuleLevel};
pub use diagnostic::{Diagnostic, Edit, Fix, JsonDiagnostic, Severity};
pub use fixer::{apply_fixes, FixOutcome, MAX_FIX_PASSES};
pub use registry::{run_rules, Rule, RuleContext, RuleRegistry, RULE_CRASH_ID};
pub use report::{Aggregator, FileReport, SourceFile, Summary};
pub use session::Session;

use strigil_syntax::{extract, scan, ScanIssue};

/// Rule id carried by diagnostics converted from scanner issues.
pub const SCAN_ISSUE_ID: &str = "strigil/scan";

fn scan_issue_diagnostic(issue: &ScanIssue) -> Diagnostic {
    Diagnostic::error(SCAN_ISSUE_ID, issue.kind.to_string(), issue.span)
        .with_help("the scanner recovered at a best-effort boundary and kept going")
}

/// Analyze one file's text: scan, extract facts, run every enabled rule.
///
/// Malformed input never aborts analysis; scanner issues surface as ordinary
/// diagnostics alongside rule findings, ordered by position.
pub fn lint_text(
    source: &str,
    config: &ResolvedConfig,
    registry: &RuleRegistry,
) -> Vec<Diagnostic> {
    let scanned = scan(source);
    let facts = extract(source, &scanned);
    let ctx = RuleContext {
        source,
        tokens: &scanned.tokens,
        regions: &scanned.regions,
        facts: &facts,
        config,
    };
    let mut diagnostics: Vec<Diagnostic> =
        scanned.issues.iter().map(scan_issue_diagnostic).collect();
    diagnostics.extend(run_rules(registry, &ctx));
    diagnostics.sort_by(|a, b| {
        (a.span.start, a.span.end, a.rule_id).cmp(&(b.span.start, b.span.end, b.rule_id))
    });
    diagnostics
}

/// Result of the iterative fix loop.
#[derive(Debug)]
pub struct FixResult {
    /// Best text obtained.
    pub text: String,
    /// Total fixes applied across all passes.
    pub applied: usize,
    /// Number of lint passes run.
    pub passes: usize,
    /// Diagnostics still standing against the final text.
    pub diagnostics: Vec<Diagnostic>,
}

/// Lint, fix, and re-scan until nothing more is fixable or the pass cap is
/// reached. Terminates even when fixes never converge.
pub fn lint_fix_all(
    source: &str,
    config: &ResolvedConfig,
    registry: &RuleRegistry,
) -> FixResult {
    let mut text = source.to_string();
    let mut applied_total = 0usize;
    for pass in 0..MAX_FIX_PASSES {
        let diagnostics = lint_text(&text, config, registry);
        let outcome = apply_fixes(&text, diagnostics);
        if outcome.applied == 0 {
            return FixResult {
                text,
                applied: applied_total,
                passes: pass + 1,
                diagnostics: outcome.unfixed,
            };
        }
        applied_total += outcome.applied;
        text = outcome.text;
    }
    let diagnostics = lint_text(&text, config, registry);
    FixResult {
        text,
        applied: applied_total,
        passes: MAX_FIX_PASSES,
        diagnostics,
    }
}

/// "Would the formatter change this file?" — check-mode entry point for the
/// reporting layer, which treats the answer as a single boolean finding.
pub fn format_check(source: &str, config: &ResolvedConfig) -> bool {
    strigil_fmt::check(source, &config.format)
}

/// Run the formatter pipeline with the configured options.
pub fn format_text(source: &str, config: &ResolvedConfig) -> String {
    strigil_fmt::format(source, &config.format)
}
