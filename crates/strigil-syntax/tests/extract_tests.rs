//! Tests for the structural extractor.

use strigil_syntax::facts::{DeclaredKind, HeritageKind, MemberListKind};
use strigil_syntax::{extract, scan};

fn facts_of(source: &str) -> strigil_syntax::Facts {
    let scanned = scan(source);
    extract(source, &scanned)
}

#[test]
fn test_import_specifiers_collected() {
    let source = "import { zebra, apple, banana } from './fruits';\n";
    let facts = facts_of(source);
    assert_eq!(facts.imports.len(), 1);
    let import = &facts.imports[0];
    let names: Vec<&str> = import.specifiers.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["zebra", "apple", "banana"]);
    assert_eq!(import.source_text(source), Some("./fruits"));
}

#[test]
fn test_import_default_and_namespace() {
    let facts = facts_of("import def, * as ns from 'mod';\n");
    let import = &facts.imports[0];
    assert_eq!(import.default_name.as_deref(), Some("def"));
    assert!(import.namespace);
    assert!(import.specifiers.is_empty());
}

#[test]
fn test_import_alias_entry_span() {
    let source = "import { real as alias } from 'mod';\n";
    let facts = facts_of(source);
    let spec = &facts.imports[0].specifiers[0];
    assert_eq!(spec.name, "real");
    assert_eq!(spec.entry_span.slice(source), "real as alias");
}

#[test]
fn test_dynamic_import_is_not_an_import_decl() {
    let facts = facts_of("const m = import('mod');\n");
    assert!(facts.imports.is_empty());
}

#[test]
fn test_object_literal_members_with_leading_comment() {
    let source = "const o = {\n  b: 1,\n  // about a\n  a: 2,\n};\n";
    let facts = facts_of(source);
    assert_eq!(facts.member_lists.len(), 1);
    let list = &facts.member_lists[0];
    assert_eq!(list.kind, MemberListKind::ObjectLiteral);
    let keys: Vec<_> = list
        .entries
        .iter()
        .map(|e| e.key.as_deref().unwrap())
        .collect();
    assert_eq!(keys, vec!["b", "a"]);
    let comment = list.entries[1].leading_comment.expect("comment attached");
    assert_eq!(comment.slice(source), "// about a");
}

#[test]
fn test_trailing_comment_stays_with_its_entry() {
    let source = "const o = {\n  b: 1, // about b\n  a: 2,\n};\n";
    let facts = facts_of(source);
    let list = &facts.member_lists[0];
    // `// about b` sits on b's line, so it must not attach to `a`.
    assert!(list.entries[1].leading_comment.is_none());
}

#[test]
fn test_interface_body_members() {
    let source = "interface Shape {\n  width: number;\n  area: number;\n}\n";
    let facts = facts_of(source);
    assert_eq!(facts.member_lists.len(), 1);
    let list = &facts.member_lists[0];
    assert_eq!(list.kind, MemberListKind::InterfaceBody);
    let keys: Vec<_> = list
        .entries
        .iter()
        .map(|e| e.key.as_deref().unwrap())
        .collect();
    assert_eq!(keys, vec!["width", "area"]);
}

#[test]
fn test_nested_object_gets_its_own_list() {
    let source = "const o = { outer: { y: 1, x: 2 }, first: 3 };\n";
    let facts = facts_of(source);
    assert_eq!(facts.member_lists.len(), 2);
    // Inner list closes first.
    let inner = &facts.member_lists[0];
    assert_eq!(inner.entries.len(), 2);
    let outer = &facts.member_lists[1];
    assert_eq!(outer.entries[0].key.as_deref(), Some("outer"));
    assert_eq!(
        outer.entries[0].entry_span.slice(source),
        "outer: { y: 1, x: 2 }"
    );
}

#[test]
fn test_heritage_clause_multi_line() {
    let source = "class Widget\n  extends Base\n  implements Paintable, Sizable {\n}\n";
    let facts = facts_of(source);
    assert_eq!(facts.heritage_clauses.len(), 2);
    let ext = &facts.heritage_clauses[0];
    assert_eq!(ext.kind, HeritageKind::Extends);
    assert_eq!(ext.idents[0].name, "Base");
    let imp = &facts.heritage_clauses[1];
    assert_eq!(imp.kind, HeritageKind::Implements);
    let names: Vec<_> = imp.idents.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["Paintable", "Sizable"]);
}

#[test]
fn test_heritage_with_type_arguments() {
    let source = "interface Repo extends Store<Entry>, Closeable {\n}\n";
    let facts = facts_of(source);
    let clause = &facts.heritage_clauses[0];
    assert_eq!(clause.idents.len(), 2);
    assert_eq!(clause.idents[0].name, "Store");
    assert_eq!(clause.idents[0].span.slice(source), "Store<Entry>");
    assert_eq!(clause.idents[1].name, "Closeable");
}

#[test]
fn test_binding_never_reassigned() {
    let facts = facts_of("let x = 10;\nuse(x);\n");
    assert_eq!(facts.bindings.len(), 1);
    let b = &facts.bindings[0];
    assert_eq!(b.name, "x");
    assert_eq!(b.declared_kind, DeclaredKind::Let);
    assert!(!b.reassigned);
}

#[test]
fn test_binding_reassigned_by_increment() {
    let facts = facts_of("let counter = 0;\ncounter++;\n");
    assert!(facts.bindings[0].reassigned);
}

#[test]
fn test_binding_reassigned_by_compound_assignment() {
    let facts = facts_of("let total = 0;\ntotal += 5;\n");
    assert!(facts.bindings[0].reassigned);
}

#[test]
fn test_member_write_is_not_a_reassignment() {
    let facts = facts_of("let obj = make();\nobj.field = 1;\n");
    assert!(!facts.bindings[0].reassigned);
}

#[test]
fn test_for_header_binding_reassigned_in_update_clause() {
    let facts = facts_of("for (let j = 0; j < 10; j++) { use(j); }\n");
    let j = facts.bindings.iter().find(|b| b.name == "j").unwrap();
    assert!(j.reassigned);
}

#[test]
fn test_for_of_binding_not_reassigned() {
    let facts = facts_of("for (const item of items) { use(item); }\n");
    let item = facts.bindings.iter().find(|b| b.name == "item").unwrap();
    assert!(!item.reassigned);
}

#[test]
fn test_for_of_binding_reassigned_in_body() {
    let facts = facts_of("for (let item of items) { item = wrap(item); }\n");
    let item = facts.bindings.iter().find(|b| b.name == "item").unwrap();
    assert!(item.reassigned);
}

#[test]
fn test_shadowed_binding_tracked_separately() {
    let facts = facts_of("let x = 1;\n{\n  let x = 2;\n  x = 3;\n}\n");
    assert_eq!(facts.bindings.len(), 2);
    assert!(!facts.bindings[0].reassigned, "outer x is never written");
    assert!(facts.bindings[1].reassigned, "inner x is written");
}

#[test]
fn test_assignment_in_condition_flagged() {
    let facts = facts_of("if (x = 10) { run(); }\n");
    assert_eq!(facts.conditional_tests.len(), 1);
    assert!(facts.conditional_tests[0].is_assignment);
}

#[test]
fn test_equality_in_condition_not_flagged() {
    let facts = facts_of("if (x === 10) { run(); }\n");
    assert!(!facts.conditional_tests[0].is_assignment);
}

#[test]
fn test_double_paren_escape() {
    let facts = facts_of("while ((line = read())) { use(line); }\n");
    assert!(!facts.conditional_tests[0].is_assignment);
}

#[test]
fn test_for_middle_clause_not_an_assignment() {
    let facts = facts_of("for (let j = 0; j < 10; j++) { use(j); }\n");
    assert_eq!(facts.conditional_tests.len(), 1);
    assert!(!facts.conditional_tests[0].is_assignment);
}

#[test]
fn test_top_level_arrow_binding() {
    let facts = facts_of("const handler = (event) => consume(event);\n");
    assert_eq!(facts.top_level_bindings.len(), 1);
    let b = &facts.top_level_bindings[0];
    assert!(b.is_arrow_or_function_expr);
    assert!(!b.exported);
}

#[test]
fn test_exported_arrow_binding_marked() {
    let facts = facts_of("export const handler = () => run();\n");
    assert!(facts.top_level_bindings[0].exported);
}

#[test]
fn test_plain_top_level_binding_is_not_function() {
    let facts = facts_of("const limit = 10;\n");
    assert!(!facts.top_level_bindings[0].is_arrow_or_function_expr);
}

#[test]
fn test_regex_capture_groups_and_backref() {
    let source = r"const re = /(a)(b)\2/;";
    let facts = facts_of(source);
    let info = &facts.regex_literals[0];
    assert_eq!(info.capturing_groups.len(), 2);
    assert!(!info.capturing_groups[0].referenced);
    assert!(info.capturing_groups[1].referenced);
}

#[test]
fn test_regex_named_group_backref() {
    let source = r"const re = /(?<word>\w+)\k<word>/;";
    let facts = facts_of(source);
    let info = &facts.regex_literals[0];
    assert_eq!(info.capturing_groups.len(), 1);
    assert_eq!(info.capturing_groups[0].name.as_deref(), Some("word"));
    assert!(info.capturing_groups[0].referenced);
}

#[test]
fn test_regex_non_capturing_group_ignored() {
    let facts = facts_of("const re = /(?:ab)+c/;");
    assert!(facts.regex_literals[0].capturing_groups.is_empty());
}

#[test]
fn test_regex_index_access_marks_group_used() {
    let source = "const part = text.match(/(\\d+)-x/)[1];";
    let facts = facts_of(source);
    let info = &facts.regex_literals[0];
    assert!(info.capturing_groups[0].referenced);
}

#[test]
fn test_group_span_covers_parens() {
    let source = r"const re = /x(ab)y/;";
    let facts = facts_of(source);
    let group = &facts.regex_literals[0].capturing_groups[0];
    assert_eq!(group.span.slice(source), "(ab)");
}
