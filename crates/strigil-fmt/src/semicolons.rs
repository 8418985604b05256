//! Semicolon policy.
//!
//! Removal strips statement terminators that end their line; insertion adds
//! them at line ends that plainly finish a statement. Both sides are
//! deliberately conservative: any position where dropping or adding a
//! semicolon could change parsing (a next line opening with `(`, `[`, a
//! template, a regex, or an operator) is left untouched. The structural
//! semicolons of a `for(;;)` header are never touched.

use crate::options::SemicolonPolicy;
use std::collections::HashSet;
use strigil_syntax::{matching_bracket, offset_in_code, scan, Token, TokenKind};

pub fn apply_semicolon_policy(source: &str, policy: SemicolonPolicy) -> String {
    match policy {
        SemicolonPolicy::Preserve => source.to_string(),
        SemicolonPolicy::Never => remove_semicolons(source),
        SemicolonPolicy::Always => insert_semicolons(source),
    }
}

/// Token indices of the structural semicolons inside `for (...)` headers.
fn for_header_semicolons(tokens: &[Token]) -> HashSet<usize> {
    let mut out = HashSet::new();
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
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    depth -= 1
                }
                TokenKind::Semicolon if depth == 1 => {
                    out.insert(j);
                }
                _ => {}
            }
        }
    }
    out
}

/// Token kinds that make dropping the preceding semicolon unsafe.
fn hazardous_line_start(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::LeftParen
            | TokenKind::LeftBracket
            | TokenKind::Template
            | TokenKind::TemplateHead
            | TokenKind::Regex
            | TokenKind::Plus
            | TokenKind::Minus
            | TokenKind::Slash
    )
}

fn remove_semicolons(source: &str) -> String {
    let scanned = scan(source);
    let tokens = &scanned.tokens;
    let header = for_header_semicolons(tokens);
    let mut keep = vec![true; source.len() + 1];
    for (i, t) in tokens.iter().enumerate() {
        if t.kind != TokenKind::Semicolon || header.contains(&i) {
            continue;
        }
        if !offset_in_code(&scanned.regions, t.span.start) {
            continue;
        }
        let Some(next) = tokens.get(i + 1) else { continue };
        let same_line = !source[t.span.end..next.span.start].contains('\n');
        if same_line && !matches!(next.kind, TokenKind::RightBrace | TokenKind::Eof) {
            // a mid-line separator; removing it would merge statements
            continue;
        }
        if next.kind != TokenKind::Eof && hazardous_line_start(next.kind) {
            continue;
        }
        keep[t.span.start] = false;
    }
    source
        .char_indices()
        .filter(|&(i, _)| keep[i])
        .map(|(_, c)| c)
        .collect()
}

/// Token kinds that can open a fresh statement on a new line.
fn statement_starter(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Let
            | TokenKind::Const
            | TokenKind::Var
            | TokenKind::If
            | TokenKind::For
            | TokenKind::While
            | TokenKind::Do
            | TokenKind::Switch
            | TokenKind::Return
            | TokenKind::Break
            | TokenKind::Continue
            | TokenKind::Function
            | TokenKind::Class
            | TokenKind::Interface
            | TokenKind::Import
            | TokenKind::Export
            | TokenKind::Throw
            | TokenKind::Try
            | TokenKind::Identifier
            | TokenKind::This
            | TokenKind::New
            | TokenKind::Typeof
            | TokenKind::Delete
            | TokenKind::Void
            | TokenKind::Await
            | TokenKind::Async
            | TokenKind::Yield
            | TokenKind::Debugger
    )
}

fn insert_semicolons(source: &str) -> String {
    let scanned = scan(source);
    let tokens = &scanned.tokens;
    // control-statement headers: a `)` closing one never takes a semicolon
    let mut control_close: HashSet<usize> = HashSet::new();
    let mut paren_stack: Vec<bool> = Vec::new();
    for (i, t) in tokens.iter().enumerate() {
        match t.kind {
            TokenKind::LeftParen => {
                let control = i
                    .checked_sub(1)
                    .map(|p| {
                        matches!(
                            tokens[p].kind,
                            TokenKind::If
                                | TokenKind::For
                                | TokenKind::While
                                | TokenKind::Switch
                                | TokenKind::Catch
                                | TokenKind::Await
                        )
                    })
                    .unwrap_or(false);
                paren_stack.push(control);
            }
            TokenKind::RightParen => {
                if paren_stack.pop().unwrap_or(false) {
                    control_close.insert(i);
                }
            }
            _ => {}
        }
    }
    let mut inserts: Vec<usize> = Vec::new();
    for i in 0..tokens.len().saturating_sub(1) {
        let a = &tokens[i];
        let b = &tokens[i + 1];
        let ends_statement = a.kind.can_end_expression()
            || matches!(
                a.kind,
                TokenKind::Break | TokenKind::Continue | TokenKind::Debugger
            );
        if !ends_statement {
            continue;
        }
        if a.kind == TokenKind::RightParen
            && (control_close.contains(&i)
                || tokens.get(i + 1).map(|n| n.kind) == Some(TokenKind::Arrow))
        {
            continue;
        }
        if !offset_in_code(&scanned.regions, a.span.start) {
            continue;
        }
        if !source[a.span.end..b.span.start].contains('\n') {
            continue;
        }
        if !statement_starter(b.kind) && b.kind != TokenKind::Eof {
            continue;
        }
        inserts.push(a.span.end);
    }
    let mut out = String::with_capacity(source.len() + inserts.len());
    let mut pos = 0usize;
    for at in inserts {
        out.push_str(&source[pos..at]);
        out.push(';');
        pos = at;
    }
    out.push_str(&source[pos..]);
    out
}
