//! Behavior tests for the built-in rules.

use strigil_lint::{lint_text, Diagnostic, ResolvedConfig, RuleRegistry};

fn lint(source: &str) -> Vec<Diagnostic> {
    lint_text(source, &ResolvedConfig::default(), &RuleRegistry::builtin())
}

fn ids(diagnostics: &[Diagnostic]) -> Vec<&'static str> {
    diagnostics.iter().map(|d| d.rule_id).collect()
}

fn has(diagnostics: &[Diagnostic], id: &str) -> bool {
    diagnostics.iter().any(|d| d.rule_id == id)
}

#[test]
fn test_no_debugger_fires_with_fix() {
    let diagnostics = lint("debugger;\n");
    let diag = diagnostics
        .iter()
        .find(|d| d.rule_id == "strigil/no-debugger")
        .expect("debugger flagged");
    assert!(diag.is_fixable());
}

#[test]
fn test_no_console_flags_call() {
    let diagnostics = lint("console.log('hi');\n");
    let diag = diagnostics
        .iter()
        .find(|d| d.rule_id == "strigil/no-console")
        .expect("console flagged");
    assert!(diag.message.contains("console.log"));
    assert!(!diag.is_fixable(), "deleting a console call is a judgment call");
}

#[test]
fn test_no_console_skips_member_named_console() {
    let diagnostics = lint("app.console.log('hi');\n");
    assert!(!has(&diagnostics, "strigil/no-console"));
}

#[test]
fn test_no_commonjs_variants() {
    assert!(has(&lint("const fs = require('fs');\n"), "strigil/no-commonjs"));
    assert!(has(&lint("module.exports = thing;\n"), "strigil/no-commonjs"));
    assert!(has(&lint("exports.thing = thing;\n"), "strigil/no-commonjs"));
    assert!(!has(&lint("import fs from 'fs';\n"), "strigil/no-commonjs"));
}

#[test]
fn test_top_level_await_flagged() {
    assert!(has(&lint("await fetchData();\n"), "strigil/no-top-level-await"));
    assert!(has(
        &lint("if (ready) { await fetchData(); }\n"),
        "strigil/no-top-level-await"
    ));
}

#[test]
fn test_await_inside_functions_allowed() {
    assert!(!has(
        &lint("async function f() { await g(); }\n"),
        "strigil/no-top-level-await"
    ));
    assert!(!has(
        &lint("const f = async () => { await g(); };\n"),
        "strigil/no-top-level-await"
    ));
    assert!(!has(
        &lint("const f = async () => await g();\n"),
        "strigil/no-top-level-await"
    ));
}

#[test]
fn test_cond_assign_cases_from_corpus() {
    assert!(has(&lint("if (x = 10) { run(); }\n"), "strigil/no-cond-assign"));
    assert!(!has(&lint("if (x === 10) { run(); }\n"), "strigil/no-cond-assign"));
    assert!(!has(
        &lint("for (let j = 0; j < 10; j++) { use(j); }\n"),
        "strigil/no-cond-assign"
    ));
}

#[test]
fn test_curly_flags_braceless_body() {
    let diagnostics = lint("if (ready)\n  run();\n");
    assert!(has(&diagnostics, "strigil/curly"));
}

#[test]
fn test_curly_quiet_on_braced_body() {
    let diagnostics = lint("if (ready) {\n  run();\n}\n");
    assert!(!has(&diagnostics, "strigil/curly"));
}

#[test]
fn test_sort_import_specifiers_fires() {
    let diagnostics = lint("import { zebra, apple, banana } from './fruits';\n");
    let diag = diagnostics
        .iter()
        .find(|d| d.rule_id == "strigil/sort-import-specifiers")
        .expect("unsorted specifiers flagged");
    assert!(diag.is_fixable());
}

#[test]
fn test_sorted_specifiers_quiet() {
    let diagnostics = lint("import { apple, banana, zebra } from './fruits';\n");
    assert!(!has(&diagnostics, "strigil/sort-import-specifiers"));
}

#[test]
fn test_sort_imports_groups_split_by_blank_line() {
    // each group is independently sorted, so neither fires
    let source = "import { a } from 'delta';\n\nimport { b } from 'alpha';\n";
    assert!(!has(&lint(source), "strigil/sort-imports"));
    let contiguous = "import { a } from 'delta';\nimport { b } from 'alpha';\n";
    assert!(has(&lint(contiguous), "strigil/sort-imports"));
}

#[test]
fn test_sort_keys_object_literal() {
    assert!(has(&lint("const o = { b: 1, a: 2 };\n"), "strigil/sort-keys"));
    assert!(!has(&lint("const o = { a: 2, b: 1 };\n"), "strigil/sort-keys"));
}

#[test]
fn test_sort_keys_blank_line_starts_new_group() {
    let source = "const o = {\n  b: 1,\n\n  a: 2,\n};\n";
    assert!(!has(&lint(source), "strigil/sort-keys"));
}

#[test]
fn test_sort_heritage_clause() {
    assert!(has(
        &lint("class A implements Zeta, Alpha {\n}\n"),
        "strigil/sort-heritage-clauses"
    ));
    assert!(!has(
        &lint("class A implements Alpha, Zeta {\n}\n"),
        "strigil/sort-heritage-clauses"
    ));
}

#[test]
fn test_prefer_const_fires_and_fixes_keyword_only() {
    let diagnostics = lint("let x = 10;\nuse(x);\n");
    let diag = diagnostics
        .iter()
        .find(|d| d.rule_id == "strigil/prefer-const")
        .expect("prefer-const fires");
    let fix = diag.fix.as_ref().expect("fix attached");
    assert_eq!(fix.edits.len(), 1);
    assert_eq!(fix.edits[0].span.start, 0);
    assert_eq!(fix.edits[0].span.end, 3);
    assert_eq!(fix.edits[0].replacement, "const");
}

#[test]
fn test_prefer_const_quiet_on_reassignment() {
    let diagnostics = lint("let counter = 0;\ncounter++;\n");
    assert!(!has(&diagnostics, "strigil/prefer-const"));
}

#[test]
fn test_prefer_const_mixed_declarators_fix_withheld() {
    let diagnostics = lint("let a = 1, b = 2;\nb = 3;\n");
    let diag = diagnostics
        .iter()
        .find(|d| d.rule_id == "strigil/prefer-const")
        .expect("a is still flagged");
    assert!(
        diag.fix.is_none(),
        "no fix when a sibling declarator is reassigned"
    );
}

#[test]
fn test_top_level_function_suggestion() {
    let diagnostics = lint("const handler = (e) => consume(e);\n");
    let diag = diagnostics
        .iter()
        .find(|d| d.rule_id == "strigil/top-level-function")
        .expect("arrow const flagged");
    assert!(!diag.is_fixable(), "this-binding may differ; no auto-fix");
}

#[test]
fn test_top_level_function_quiet_on_export() {
    let diagnostics = lint("export const handler = (e) => consume(e);\n");
    assert!(!has(&diagnostics, "strigil/top-level-function"));
}

#[test]
fn test_super_linear_backtracking_corpus_pair() {
    assert!(has(
        &lint("const re = /(a+)+b/;\nre.test(s);\n"),
        "strigil/no-super-linear-backtracking"
    ));
    assert!(!has(
        &lint("const re = /(?:a+)b/;\nre.test(s);\n"),
        "strigil/no-super-linear-backtracking"
    ));
}

#[test]
fn test_unused_capturing_group_flagged_without_fix() {
    let diagnostics = lint("const re = /x(ab)y/;\nre.test(s);\n");
    let diag = diagnostics
        .iter()
        .find(|d| d.rule_id == "strigil/no-unused-capturing-group")
        .expect("unused group flagged");
    assert!(!diag.is_fixable(), "renumbering hazard; flagged only");
}

#[test]
fn test_backreferenced_group_not_flagged() {
    let diagnostics = lint("const re = /(ab)\\1/;\nre.test(s);\n");
    assert!(!has(&diagnostics, "strigil/no-unused-capturing-group"));
}

#[test]
fn test_comment_lookalikes_inside_literals_are_inert() {
    let source = "const s = '// this is not a real comment';\nconst re = /\\/\\/ looks like a comment/;\nmark(s, re);\n";
    let diagnostics = lint(source);
    assert!(
        diagnostics.is_empty(),
        "nothing should fire inside literal bodies: {:?}",
        ids(&diagnostics)
    );
}

#[test]
fn test_one_statement_per_line() {
    assert!(has(&lint("a(); b();\n"), "strigil/one-statement-per-line"));
    assert!(!has(&lint("a();\nb();\n"), "strigil/one-statement-per-line"));
    assert!(!has(
        &lint("for (let i = 0; i < 3; i++) { step(i); }\n"),
        "strigil/one-statement-per-line"
    ));
}

#[test]
fn test_if_newline() {
    assert!(has(&lint("if (ready) run();\n"), "strigil/if-newline"));
    assert!(!has(&lint("if (ready)\n  run();\n"), "strigil/if-newline"));
    assert!(!has(&lint("if (ready) { run(); }\n"), "strigil/if-newline"));
}

#[test]
fn test_consistent_list_newline() {
    let mixed = "build(\n  first,\n  second, third,\n);\n";
    assert!(has(&lint(mixed), "strigil/consistent-list-newline"));
    let consistent = "build(\n  first,\n  second,\n  third,\n);\n";
    assert!(!has(&lint(consistent), "strigil/consistent-list-newline"));
}

#[test]
fn test_consistent_chaining() {
    let mixed = "p.then(a)\n  .then(b).then(c)\n  .catch(d)\n  .finally(e);\n";
    assert!(has(&lint(mixed), "strigil/consistent-chaining"));
    let consistent = "p\n  .then(a)\n  .then(b)\n  .catch(d);\n";
    assert!(!has(&lint(consistent), "strigil/consistent-chaining"));
}

#[test]
fn test_rule_can_be_disabled() {
    let mut config = ResolvedConfig::default();
    config.disable("strigil/no-debugger");
    let diagnostics = lint_text("debugger;\n", &config, &RuleRegistry::builtin());
    assert!(!has(&diagnostics, "strigil/no-debugger"));
}

#[test]
fn test_severity_override() {
    let mut config = ResolvedConfig::default();
    config.set_level("strigil/no-console", strigil_lint::RuleLevel::Error);
    let diagnostics = lint_text("console.log(1);\n", &config, &RuleRegistry::builtin());
    let diag = diagnostics
        .iter()
        .find(|d| d.rule_id == "strigil/no-console")
        .unwrap();
    assert_eq!(diag.severity, strigil_lint::Severity::Error);
}

#[test]
fn test_unterminated_literal_degrades_to_diagnostic() {
    let diagnostics = lint("const s = \"oops\nrun();\n");
    assert!(has(&diagnostics, strigil_lint::SCAN_ISSUE_ID));
}
