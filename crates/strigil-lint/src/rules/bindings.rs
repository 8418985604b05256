//! Binding-discipline rules.

use crate::diagnostic::{Diagnostic, Fix, Severity};
use crate::registry::{Rule, RuleContext};
use rustc_hash::{FxHashMap, FxHashSet};
use strigil_syntax::facts::DeclaredKind;

/// Flags `let`/`var` declarators that are never reassigned. The fix replaces
/// only the declaring keyword token, and only when every declarator of the
/// declaration qualifies.
pub struct PreferConst;

impl Rule for PreferConst {
    fn id(&self) -> &'static str {
        "strigil/prefer-const"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn fixable(&self) -> bool {
        true
    }

    fn description(&self) -> &'static str {
        "prefer const for never-reassigned bindings"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        let mut decl_all_eligible: FxHashMap<u32, bool> = FxHashMap::default();
        for b in &ctx.facts.bindings {
            let entry = decl_all_eligible.entry(b.decl_id).or_insert(true);
            *entry &= !b.reassigned;
        }
        let mut fix_attached: FxHashSet<u32> = FxHashSet::default();
        for b in &ctx.facts.bindings {
            if b.declared_kind == DeclaredKind::Const || b.reassigned {
                continue;
            }
            let mut diag = Diagnostic::warning(
                self.id(),
                format!(
                    "'{}' is never reassigned; use 'const' instead of '{}'",
                    b.name,
                    b.declared_kind.as_str()
                ),
                b.name_span,
            )
            .with_help("const makes the binding's immutability explicit");
            if decl_all_eligible.get(&b.decl_id).copied().unwrap_or(false)
                && fix_attached.insert(b.decl_id)
            {
                diag = diag.with_fix(Fix::replace(b.keyword_span, "const"));
            }
            out.push(diag);
        }
        out
    }
}

/// Suggests a function declaration for a top-level `const` bound directly to
/// an arrow or function expression. Never auto-fixed: the rewrite can change
/// `this`-binding and hoisting behavior.
pub struct TopLevelFunction;

impl Rule for TopLevelFunction {
    fn id(&self) -> &'static str {
        "strigil/top-level-function"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn description(&self) -> &'static str {
        "prefer function declarations at module top level"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        ctx.facts
            .top_level_bindings
            .iter()
            .filter(|b| {
                b.is_arrow_or_function_expr
                    && !b.exported
                    && b.declared_kind == DeclaredKind::Const
            })
            .map(|b| {
                Diagnostic::warning(
                    self.id(),
                    format!("Top-level '{}' hides a function behind a const binding", b.name),
                    b.span,
                )
                .with_help(
                    "a function declaration hoists and names itself in stack traces; \
                     not auto-fixed because this-binding may differ",
                )
            })
            .collect()
    }
}
