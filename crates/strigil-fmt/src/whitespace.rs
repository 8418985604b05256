//! Carriage-level transforms: trailing whitespace, blank-line runs, final
//! newline.

use crate::options::FinalNewline;
use strigil_syntax::{offset_in_code, scan};

/// Strip trailing spaces and tabs from every line. Computed on raw lines
/// regardless of region: trailing whitespace is a carriage concern, not a
/// content concern.
pub fn trim_trailing(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    for line in source.split_inclusive('\n') {
        let (body, ending) = match line.strip_suffix("\r\n") {
            Some(body) => (body, "\r\n"),
            None => match line.strip_suffix('\n') {
                Some(body) => (body, "\n"),
                None => (line, ""),
            },
        };
        out.push_str(body.trim_end_matches([' ', '\t']));
        out.push_str(ending);
    }
    out
}

/// Collapse runs of blank lines longer than `max`, leaving runs inside
/// comments, templates, and other non-code regions untouched.
pub fn collapse_blank_lines(source: &str, max: usize) -> String {
    let scanned = scan(source);
    let mut out = String::with_capacity(source.len());
    let mut blanks_kept = 0usize;
    let mut offset = 0usize;
    for line in source.split_inclusive('\n') {
        let blank = line.trim().is_empty() && line.ends_with('\n');
        if blank && offset_in_code(&scanned.regions, offset) {
            if blanks_kept < max {
                out.push_str(line);
            }
            blanks_kept += 1;
        } else {
            out.push_str(line);
            blanks_kept = 0;
        }
        offset += line.len();
    }
    out
}

/// Apply the end-of-file newline policy. An empty file stays empty.
pub fn apply_final_newline(source: &str, policy: FinalNewline) -> String {
    match policy {
        FinalNewline::Preserve => source.to_string(),
        FinalNewline::None => source.trim_end_matches(['\n', '\r']).to_string(),
        FinalNewline::One => {
            let trimmed = source.trim_end_matches(['\n', '\r']);
            if trimmed.is_empty() {
                String::new()
            } else {
                format!("{trimmed}\n")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trim_trailing_keeps_crlf() {
        assert_eq!(trim_trailing("a  \r\nb\t\n"), "a\r\nb\n");
    }

    #[test]
    fn test_collapse_blank_lines() {
        let source = "a();\n\n\n\nb();\n";
        assert_eq!(collapse_blank_lines(source, 1), "a();\n\nb();\n");
        assert_eq!(collapse_blank_lines(source, 0), "a();\nb();\n");
    }

    #[test]
    fn test_blank_lines_in_template_untouched() {
        let source = "const t = `a\n\n\n\nb`;\n";
        assert_eq!(collapse_blank_lines(source, 1), source);
    }

    #[test]
    fn test_blank_lines_in_block_comment_untouched() {
        let source = "/* a\n\n\n\n b */\nrun();\n";
        assert_eq!(collapse_blank_lines(source, 1), source);
    }

    #[test]
    fn test_final_newline_one() {
        assert_eq!(apply_final_newline("a();", FinalNewline::One), "a();\n");
        assert_eq!(apply_final_newline("a();\n\n\n", FinalNewline::One), "a();\n");
        assert_eq!(apply_final_newline("", FinalNewline::One), "");
    }

    #[test]
    fn test_final_newline_none() {
        assert_eq!(apply_final_newline("a();\n", FinalNewline::None), "a();");
    }
}
