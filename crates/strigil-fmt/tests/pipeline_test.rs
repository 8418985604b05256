//! Whole-pipeline tests: ordering, region safety, idempotence.

use strigil_fmt::{
    check, format, FinalNewline, FormatOptions, IndentStyle, QuoteStyle, SemicolonPolicy,
};

fn options() -> FormatOptions {
    FormatOptions::default()
}

#[test]
fn test_pipeline_combines_transforms() {
    let source = "function f() {\nconst s = \"text\";   \n\n\n\nreturn s;\n}";
    let formatted = format(source, &options());
    assert_eq!(
        formatted,
        "function f() {\n  const s = 'text';\n\n  return s;\n}\n"
    );
}

#[test]
fn test_idempotent_on_mixed_source() {
    let samples = [
        "function f() {\nif (x) {\nrun();\n}\n}\n",
        "const o = {\n  a: 1,\n  b: `t${x}`,\n};\n",
        "const re = /(\\d+)-[a-z\\/]+/g;\nconst s = \"say \\\"hi\\\"\";\n",
        "/*\n * banner\n */\nclass W\n  extends Base {\n}\n",
        "import { a } from 'm';\n\n\nrun(a);",
    ];
    for source in samples {
        let once = format(source, &options());
        let twice = format(&once, &options());
        assert_eq!(once, twice, "pipeline not idempotent for {source:?}");
    }
}

#[test]
fn test_literal_bodies_never_rewritten() {
    // quote-shaped and blank-line-shaped content inside literals stays put
    let source = "const t = `a\n\n\n\nb \"deep\" c`;\nconst r = /\"quoted\"+/;\n";
    let formatted = format(source, &options());
    assert!(formatted.contains("`a\n\n\n\nb \"deep\" c`"));
    assert!(formatted.contains("/\"quoted\"+/"));
}

#[test]
fn test_tabs_indent_style() {
    let opts = FormatOptions {
        indent_style: IndentStyle::Tabs,
        ..options()
    };
    let formatted = format("function f() {\nrun();\n}\n", &opts);
    assert_eq!(formatted, "function f() {\n\trun();\n}\n");
}

#[test]
fn test_quote_style_double() {
    let opts = FormatOptions {
        quote_style: QuoteStyle::Double,
        ..options()
    };
    assert_eq!(format("const s = 'x';\n", &opts), "const s = \"x\";\n");
}

#[test]
fn test_semicolon_policies_via_pipeline() {
    let never = FormatOptions {
        semicolons: SemicolonPolicy::Never,
        ..options()
    };
    assert_eq!(
        format("const a = 1;\nrun(a);\n", &never),
        "const a = 1\nrun(a)\n"
    );
    let always = FormatOptions {
        semicolons: SemicolonPolicy::Always,
        ..options()
    };
    assert_eq!(
        format("const a = 1\nrun(a)\n", &always),
        "const a = 1;\nrun(a);\n"
    );
}

#[test]
fn test_for_header_semicolons_survive_never_policy() {
    let never = FormatOptions {
        semicolons: SemicolonPolicy::Never,
        ..options()
    };
    let formatted = format("for (let i = 0; i < 3; i++) {\nstep(i);\n}\n", &never);
    assert!(formatted.contains("for (let i = 0; i < 3; i++)"));
}

#[test]
fn test_final_newline_policies() {
    let none = FormatOptions {
        final_newline: FinalNewline::None,
        ..options()
    };
    assert_eq!(format("run();\n", &none), "run();");
    let preserve = FormatOptions {
        final_newline: FinalNewline::Preserve,
        ..options()
    };
    assert_eq!(format("run();", &preserve), "run();");
}

#[test]
fn test_check_mode() {
    assert!(check("const s = \"x\";\n", &options()));
    assert!(!check("const s = 'x';\n", &options()));
}

#[test]
fn test_empty_file() {
    assert_eq!(format("", &options()), "");
}
