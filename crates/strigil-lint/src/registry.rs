//! Rule trait, registry, and the engine loop.
//!
//! The registry is a plain value built once and passed by reference into the
//! engine; there is no ambient registration. Rules are pure functions over
//! the scan output and facts, so per-file results are deterministic and
//! independent of registration order, and files can be analyzed in parallel
//! against one shared registry.

use crate::config::ResolvedConfig;
use crate::diagnostic::{Diagnostic, Severity};
use rustc_hash::FxHashSet;
use std::panic::{catch_unwind, AssertUnwindSafe};
use strigil_syntax::{Facts, Region, Token};

/// Rule id used for the synthetic diagnostic emitted when a rule panics.
pub const RULE_CRASH_ID: &str = "strigil/rule-crash";

/// Read-only inputs handed to every rule.
pub struct RuleContext<'a> {
    pub source: &'a str,
    pub tokens: &'a [Token],
    pub regions: &'a [Region],
    pub facts: &'a Facts,
    pub config: &'a ResolvedConfig,
}

/// A lint rule.
///
/// Rules must not hold state between files and never see another rule's
/// output. `check` returns diagnostics whose severity is overridden by the
/// engine from configuration.
pub trait Rule: Send + Sync {
    /// Stable namespaced id, e.g. `strigil/no-debugger`.
    fn id(&self) -> &'static str;

    /// Severity when configuration does not override it.
    fn default_severity(&self) -> Severity;

    /// Whether this rule's diagnostics can carry a fix.
    fn fixable(&self) -> bool {
        false
    }

    /// One-line description for registry listings.
    fn description(&self) -> &'static str;

    /// Evaluate the rule against one file.
    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic>;
}

/// An explicit, constructed-once collection of rules.
pub struct RuleRegistry {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        RuleRegistry { rules: Vec::new() }
    }

    /// All built-in rules.
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for rule in crate::rules::all() {
            registry.register(rule);
        }
        registry
    }

    /// Add a rule. Panics if the id is already taken: ids are a public
    /// contract and a collision is a programming error, not input.
    pub fn register(&mut self, rule: Box<dyn Rule>) {
        assert!(
            !self.rules.iter().any(|r| r.id() == rule.id()),
            "duplicate rule id: {}",
            rule.id()
        );
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Box<dyn Rule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Run every enabled rule over one file's context.
///
/// A panicking rule is isolated: it contributes a single synthetic
/// diagnostic naming the rule, and every other rule still runs.
pub fn run_rules(registry: &RuleRegistry, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
    let mut out = Vec::new();
    for rule in registry.rules() {
        let Some(severity) = ctx.config.rule_severity(rule.id(), rule.default_severity()) else {
            continue;
        };
        match catch_unwind(AssertUnwindSafe(|| rule.check(ctx))) {
            Ok(mut diagnostics) => {
                for diag in &mut diagnostics {
                    diag.severity = severity;
                }
                out.extend(diagnostics);
            }
            Err(_) => {
                let span = strigil_syntax::Span::new(0, 0, 1, 1);
                out.push(
                    Diagnostic::error(
                        RULE_CRASH_ID,
                        format!("rule '{}' failed internally and was skipped", rule.id()),
                        span,
                    )
                    .with_help("other rules still ran; this file's results are otherwise complete"),
                );
            }
        }
    }
    out.sort_by(|a, b| {
        (a.span.start, a.span.end, a.rule_id).cmp(&(b.span.start, b.span.end, b.rule_id))
    });
    out
}

/// Check that every registered rule id is unique and namespaced.
pub fn validate_registry(registry: &RuleRegistry) -> Result<(), String> {
    let mut seen = FxHashSet::default();
    for rule in registry.rules() {
        if !rule.id().contains('/') {
            return Err(format!("rule id '{}' is not namespaced", rule.id()));
        }
        if !seen.insert(rule.id()) {
            return Err(format!("duplicate rule id '{}'", rule.id()));
        }
    }
    Ok(())
}
