//! Re-indentation.
//!
//! Each line's leading whitespace is recomputed from bracket nesting depth
//! times the configured indent unit. Lines that begin inside a non-code
//! region (a template chunk, a block-comment continuation) keep their
//! original whitespace. Continuation lines of a multi-line expression (a
//! chained call, a heritage clause, a dangling operator) indent one extra
//! level relative to the statement they continue.

use crate::options::FormatOptions;
use strigil_syntax::{region_at, scan, RegionKind, Token, TokenKind};

fn delimiter_delta(kind: TokenKind) -> i32 {
    match kind {
        TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => 1,
        TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => -1,
        _ => 0,
    }
}

fn is_closer(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace
    )
}

/// Token kinds that mark the line they start as a continuation.
fn starts_continuation(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Dot
            | TokenKind::QuestionDot
            | TokenKind::QuestionQuestion
            | TokenKind::AmpAmp
            | TokenKind::PipePipe
            | TokenKind::Arrow
            | TokenKind::Extends
            | TokenKind::Implements
            | TokenKind::Question
            | TokenKind::Plus
            | TokenKind::Equal
    )
}

/// Token kinds that, ending a line, make the next line a continuation.
fn ends_continuation(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Equal
            | TokenKind::Arrow
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Star
            | TokenKind::Slash
            | TokenKind::Percent
            | TokenKind::AmpAmp
            | TokenKind::PipePipe
            | TokenKind::QuestionQuestion
            | TokenKind::Question
            | TokenKind::Dot
            | TokenKind::Extends
            | TokenKind::Implements
    )
}

/// Recompute every line's leading whitespace.
pub fn reindent(source: &str, options: &FormatOptions) -> String {
    let scanned = scan(source);
    let tokens: Vec<Token> = scanned
        .tokens
        .iter()
        .copied()
        .filter(|t| t.kind != TokenKind::Eof)
        .collect();
    let unit = options.indent_unit();

    let mut out = String::with_capacity(source.len());
    let mut depth = 0i32;
    let mut ti = 0usize;
    let mut offset = 0usize;
    let mut line_no = 0u32;
    for line in source.split_inclusive('\n') {
        line_no += 1;
        let (body, ending) = match line.strip_suffix("\r\n") {
            Some(body) => (body, "\r\n"),
            None => match line.strip_suffix('\n') {
                Some(body) => (body, "\n"),
                None => (line, ""),
            },
        };
        let blank = body.trim().is_empty();
        let in_code = region_at(&scanned.regions, offset)
            .map_or(true, |r| r.kind == RegionKind::Code);
        let first = (ti < tokens.len() && tokens[ti].span.line == line_no).then_some(ti);
        if blank || !in_code {
            out.push_str(body);
        } else {
            let mut effective = depth;
            if let Some(f) = first {
                let mut k = f;
                while k < tokens.len()
                    && tokens[k].span.line == line_no
                    && is_closer(tokens[k].kind)
                {
                    effective -= 1;
                    k += 1;
                }
            }
            let continuation = match first {
                Some(f) => {
                    starts_continuation(tokens[f].kind)
                        || f.checked_sub(1)
                            .is_some_and(|p| ends_continuation(tokens[p].kind))
                }
                None => false,
            };
            let levels = (effective.max(0) as usize) + usize::from(continuation);
            for _ in 0..levels {
                out.push_str(&unit);
            }
            out.push_str(body.trim_start_matches([' ', '\t']));
        }
        out.push_str(ending);
        // consume this line's tokens, tracking depth
        while ti < tokens.len() && tokens[ti].span.line <= line_no {
            depth += delimiter_delta(tokens[ti].kind);
            ti += 1;
        }
        offset += line.len();
    }
    out
}
