//! String-quote normalization.
//!
//! Rewrites string delimiters to the configured preference, but only when
//! the flip needs no new escape: a literal whose content contains the
//! preferred quote character (escaped or not) is left alone. Escapes of the
//! old delimiter are unescaped, since the character no longer needs them.
//! Template literals are never requoted.

use crate::options::QuoteStyle;
use strigil_syntax::{scan, RegionKind};

pub fn normalize_quotes(source: &str, style: QuoteStyle) -> String {
    let scanned = scan(source);
    let preferred = style.char();
    let mut out = String::with_capacity(source.len());
    let mut pos = 0usize;
    for region in &scanned.regions {
        if region.kind != RegionKind::StringLiteral {
            continue;
        }
        let raw = region.span.slice(source);
        let Some(delim) = raw.chars().next() else { continue };
        if delim == preferred || !matches!(delim, '"' | '\'') {
            continue;
        }
        if raw.len() < 2 || !raw.ends_with(delim) {
            // unterminated literal, leave it for the diagnostics
            continue;
        }
        let content = &raw[1..raw.len() - 1];
        if content.contains(preferred) {
            continue;
        }
        out.push_str(&source[pos..region.span.start]);
        out.push(preferred);
        let mut chars = content.chars().peekable();
        while let Some(c) = chars.next() {
            if c == '\\' && chars.peek() == Some(&delim) {
                out.push(delim);
                chars.next();
            } else if c == '\\' {
                out.push('\\');
                if let Some(next) = chars.next() {
                    out.push(next);
                }
            } else {
                out.push(c);
            }
        }
        out.push(preferred);
        pos = region.span.end;
    }
    out.push_str(&source[pos..]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flips_to_single() {
        assert_eq!(
            normalize_quotes("const s = \"plain\";\n", QuoteStyle::Single),
            "const s = 'plain';\n"
        );
    }

    #[test]
    fn test_flips_to_double() {
        assert_eq!(
            normalize_quotes("const s = 'plain';\n", QuoteStyle::Double),
            "const s = \"plain\";\n"
        );
    }

    #[test]
    fn test_never_adds_escapes() {
        // content contains the preferred quote: leave alone
        let source = "const s = \"it's fine\";\n";
        assert_eq!(normalize_quotes(source, QuoteStyle::Single), source);
    }

    #[test]
    fn test_unescapes_old_delimiter() {
        assert_eq!(
            normalize_quotes(r#"const s = "say \"hi\"";"#, QuoteStyle::Single),
            r#"const s = 'say "hi"';"#
        );
    }

    #[test]
    fn test_template_untouched() {
        let source = "const t = `tpl`;\n";
        assert_eq!(normalize_quotes(source, QuoteStyle::Double), source);
    }

    #[test]
    fn test_comment_lookalike_string_untouched_inside() {
        let source = "const s = \"// not a comment\";\n";
        assert_eq!(
            normalize_quotes(source, QuoteStyle::Single),
            "const s = '// not a comment';\n"
        );
    }

    #[test]
    fn test_idempotent() {
        let source = "const a = \"x\"; const b = 'y';\n";
        let once = normalize_quotes(source, QuoteStyle::Single);
        assert_eq!(normalize_quotes(&once, QuoteStyle::Single), once);
    }
}
