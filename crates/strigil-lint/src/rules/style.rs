//! Formatting-adjacent structural rules.
//!
//! These compare the presence of a line break at each candidate split point
//! against the majority pattern among its siblings in the same construct,
//! and flag the minority. With no majority (an even split) nothing fires.

use crate::diagnostic::{Diagnostic, Fix, Severity};
use crate::registry::{Rule, RuleContext};
use rustc_hash::FxHashSet;
use strigil_syntax::{matching_bracket, Span, Token, TokenKind};

fn gap<'a>(source: &'a str, prev: &Token, next: &Token) -> &'a str {
    &source[prev.span.end..next.span.start]
}

fn ws_only(text: &str) -> bool {
    text.chars().all(char::is_whitespace)
}

fn gap_span(prev: &Token, next: &Token) -> Span {
    Span::new(prev.span.end, next.span.start, prev.span.line, prev.span.column)
}

/// Method-chain split points must agree with the chain's majority.
pub struct ConsistentChaining;

impl Rule for ConsistentChaining {
    fn id(&self) -> &'static str {
        "strigil/consistent-chaining"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn fixable(&self) -> bool {
        true
    }

    fn description(&self) -> &'static str {
        "require consistent line breaks in method chains"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let tokens = ctx.tokens;
        let mut out = Vec::new();
        // start at 1: a split point needs a token on its left
        let mut i = 1;
        while i < tokens.len() {
            if !matches!(tokens[i].kind, TokenKind::Dot | TokenKind::QuestionDot) {
                i += 1;
                continue;
            }
            let mut dots = vec![i];
            let mut j = i + 1;
            loop {
                match tokens.get(j).map(|t| t.kind) {
                    Some(TokenKind::Identifier) => j += 1,
                    _ => break,
                }
                while matches!(
                    tokens.get(j).map(|t| t.kind),
                    Some(TokenKind::LeftParen | TokenKind::LeftBracket)
                ) {
                    match matching_bracket(tokens, j) {
                        Some(close) => j = close + 1,
                        None => break,
                    }
                }
                if matches!(
                    tokens.get(j).map(|t| t.kind),
                    Some(TokenKind::Dot | TokenKind::QuestionDot)
                ) {
                    dots.push(j);
                    j += 1;
                } else {
                    break;
                }
            }
            if dots.len() >= 3 {
                self.evaluate(ctx, &dots, &mut out);
            }
            i = j.max(i + 1);
        }
        out
    }
}

impl ConsistentChaining {
    fn evaluate(&self, ctx: &RuleContext<'_>, dots: &[usize], out: &mut Vec<Diagnostic>) {
        let tokens = ctx.tokens;
        let splits: Vec<bool> = dots
            .iter()
            .map(|&d| gap(ctx.source, &tokens[d - 1], &tokens[d]).contains('\n'))
            .collect();
        let broken = splits.iter().filter(|&&b| b).count();
        let inline = splits.len() - broken;
        if broken == 0 || inline == 0 || broken == inline {
            return;
        }
        let majority_broken = broken > inline;
        for (&d, &split) in dots.iter().zip(&splits) {
            if split == majority_broken {
                continue;
            }
            let mut diag = Diagnostic::warning(
                self.id(),
                if majority_broken {
                    "Chain link is on the same line while the rest of the chain breaks"
                } else {
                    "Chain link breaks the line while the rest of the chain is inline"
                },
                tokens[d].span,
            )
            .with_help("keep every link of one chain on the same side of a line break");
            let between = gap(ctx.source, &tokens[d - 1], &tokens[d]);
            if ws_only(between) {
                let replacement = if majority_broken { "\n" } else { "" };
                diag = diag.with_fix(Fix::replace(
                    gap_span(&tokens[d - 1], &tokens[d]),
                    replacement,
                ));
            }
            out.push(diag);
        }
    }
}

/// Items of one bracketed list must agree on inline-versus-newline layout.
pub struct ConsistentListNewline;

impl Rule for ConsistentListNewline {
    fn id(&self) -> &'static str {
        "strigil/consistent-list-newline"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn fixable(&self) -> bool {
        true
    }

    fn description(&self) -> &'static str {
        "require consistent line breaks between list items"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let tokens = ctx.tokens;
        let mut out = Vec::new();
        for i in 0..tokens.len() {
            if !matches!(
                tokens[i].kind,
                TokenKind::LeftParen | TokenKind::LeftBracket
            ) {
                continue;
            }
            let Some(close) = matching_bracket(tokens, i) else { continue };
            if close <= i + 1 {
                continue;
            }
            // (anchor, item) pairs: the open bracket or a separating comma,
            // and the first token of the item after it
            let mut pairs: Vec<(usize, usize)> = vec![(i, i + 1)];
            let mut depth = 0i32;
            let mut header = false;
            for j in i..close {
                match tokens[j].kind {
                    TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                        depth += 1
                    }
                    TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                        depth -= 1
                    }
                    TokenKind::Comma if depth == 1 => pairs.push((j, j + 1)),
                    TokenKind::Semicolon if depth == 1 => {
                        // a for-header, not a list
                        header = true;
                        break;
                    }
                    _ => {}
                }
            }
            if header {
                continue;
            }
            pairs.retain(|&(_, item)| item < close);
            if pairs.len() < 2 {
                continue;
            }
            self.evaluate(ctx, &pairs, &mut out);
        }
        out
    }
}

impl ConsistentListNewline {
    fn evaluate(&self, ctx: &RuleContext<'_>, pairs: &[(usize, usize)], out: &mut Vec<Diagnostic>) {
        let tokens = ctx.tokens;
        let splits: Vec<bool> = pairs
            .iter()
            .map(|&(a, b)| gap(ctx.source, &tokens[a], &tokens[b]).contains('\n'))
            .collect();
        let broken = splits.iter().filter(|&&b| b).count();
        let inline = splits.len() - broken;
        if broken == 0 || inline == 0 || broken == inline {
            return;
        }
        let majority_broken = broken > inline;
        for (&(a, b), &split) in pairs.iter().zip(&splits) {
            if split == majority_broken {
                continue;
            }
            let mut diag = Diagnostic::warning(
                self.id(),
                if majority_broken {
                    "List item is inline while the other items are on their own lines"
                } else {
                    "List item is on its own line while the other items are inline"
                },
                tokens[b].span,
            )
            .with_help("lay out every item of one list the same way");
            let between = gap(ctx.source, &tokens[a], &tokens[b]);
            if ws_only(between) {
                let replacement = if majority_broken { "\n" } else { " " };
                diag = diag.with_fix(Fix::replace(gap_span(&tokens[a], &tokens[b]), replacement));
            }
            out.push(diag);
        }
    }
}

/// A brace-free `if` body belongs on its own line.
pub struct IfNewline;

impl Rule for IfNewline {
    fn id(&self) -> &'static str {
        "strigil/if-newline"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn fixable(&self) -> bool {
        true
    }

    fn description(&self) -> &'static str {
        "require a newline after a brace-free if condition"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let tokens = ctx.tokens;
        let mut out = Vec::new();
        for (i, t) in tokens.iter().enumerate() {
            if t.kind != TokenKind::If {
                continue;
            }
            let open = i + 1;
            if tokens.get(open).map(|n| n.kind) != Some(TokenKind::LeftParen) {
                continue;
            }
            let Some(close) = matching_bracket(tokens, open) else { continue };
            let Some(body) = tokens.get(close + 1) else { continue };
            if matches!(
                body.kind,
                TokenKind::LeftBrace | TokenKind::Semicolon | TokenKind::Eof
            ) {
                continue;
            }
            if body.span.line != tokens[close].span.line {
                continue;
            }
            let mut diag = Diagnostic::warning(
                self.id(),
                "Expected a newline after the if condition",
                body.span,
            )
            .with_help("a brace-free body reads as part of the condition when inline");
            let between = gap(ctx.source, &tokens[close], body);
            if ws_only(between) {
                diag = diag.with_fix(Fix::replace(gap_span(&tokens[close], body), "\n"));
            }
            out.push(diag);
        }
        out
    }
}

/// Two statements on one line get flagged at the second statement.
pub struct OneStatementPerLine;

impl Rule for OneStatementPerLine {
    fn id(&self) -> &'static str {
        "strigil/one-statement-per-line"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn fixable(&self) -> bool {
        true
    }

    fn description(&self) -> &'static str {
        "limit each line to one statement"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let tokens = ctx.tokens;
        let mut out = Vec::new();
        let mut header_semis: FxHashSet<usize> = FxHashSet::default();
        for (i, t) in tokens.iter().enumerate() {
            if t.kind != TokenKind::For {
                continue;
            }
            let mut open = i + 1;
            if tokens.get(open).map(|n| n.kind) == Some(TokenKind::Await) {
                open += 1;
            }
            if tokens.get(open).map(|n| n.kind) != Some(TokenKind::LeftParen) {
                continue;
            }
            let Some(close) = matching_bracket(tokens, open) else { continue };
            let mut depth = 0i32;
            for j in open..=close {
                match tokens[j].kind {
                    TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => {
                        depth += 1
                    }
                    TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                        depth -= 1
                    }
                    TokenKind::Semicolon if depth == 1 => {
                        header_semis.insert(j);
                    }
                    _ => {}
                }
            }
        }
        for (i, t) in tokens.iter().enumerate() {
            if t.kind != TokenKind::Semicolon || header_semis.contains(&i) {
                continue;
            }
            let Some(next) = tokens.get(i + 1) else { continue };
            if matches!(
                next.kind,
                TokenKind::RightBrace | TokenKind::Semicolon | TokenKind::Eof
            ) {
                continue;
            }
            let between = gap(ctx.source, t, next);
            if between.contains('\n') {
                continue;
            }
            let mut diag =
                Diagnostic::warning(self.id(), "Only one statement per line", next.span)
                    .with_help("break the line after the semicolon");
            if ws_only(between) {
                diag = diag.with_fix(Fix::replace(gap_span(t, next), "\n"));
            }
            out.push(diag);
        }
        out
    }
}
