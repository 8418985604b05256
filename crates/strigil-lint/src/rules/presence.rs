//! Presence rules: constructs that should not appear at all.

use crate::diagnostic::{Diagnostic, Fix, Severity};
use crate::registry::{Rule, RuleContext};
use strigil_syntax::{matching_bracket, Span, TokenKind};

/// Flags `debugger` statements; the fix deletes the whole statement.
pub struct NoDebugger;

impl Rule for NoDebugger {
    fn id(&self) -> &'static str {
        "strigil/no-debugger"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn fixable(&self) -> bool {
        true
    }

    fn description(&self) -> &'static str {
        "disallow debugger statements"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for (i, t) in ctx.tokens.iter().enumerate() {
            if t.kind != TokenKind::Debugger {
                continue;
            }
            let mut end = t.span.end;
            if ctx.tokens.get(i + 1).map(|n| n.kind) == Some(TokenKind::Semicolon) {
                end = ctx.tokens[i + 1].span.end;
            }
            let stmt = Span::new(t.span.start, end, t.span.line, t.span.column);
            out.push(
                Diagnostic::error(self.id(), "Unexpected 'debugger' statement", t.span)
                    .with_help("remove the debugger statement before shipping")
                    .with_fix(Fix::delete(stmt)),
            );
        }
        out
    }
}

/// Flags `console.*` calls. No fix: whether to delete or route through a
/// logger is a judgment call.
pub struct NoConsole;

impl Rule for NoConsole {
    fn id(&self) -> &'static str {
        "strigil/no-console"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn description(&self) -> &'static str {
        "disallow console method calls"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for (i, t) in ctx.tokens.iter().enumerate() {
            if t.kind != TokenKind::Identifier || t.text(ctx.source) != "console" {
                continue;
            }
            let prev = i.checked_sub(1).map(|p| ctx.tokens[p].kind);
            if matches!(prev, Some(TokenKind::Dot | TokenKind::QuestionDot)) {
                continue;
            }
            if !matches!(
                ctx.tokens.get(i + 1).map(|n| n.kind),
                Some(TokenKind::Dot | TokenKind::QuestionDot)
            ) {
                continue;
            }
            let Some(method) = ctx.tokens.get(i + 2) else { continue };
            if method.kind != TokenKind::Identifier {
                continue;
            }
            let span = t.span.merge(&method.span);
            out.push(
                Diagnostic::warning(
                    self.id(),
                    format!("Unexpected console.{} call", method.text(ctx.source)),
                    span,
                )
                .with_help("route output through the project logger instead"),
            );
        }
        out
    }
}

/// Flags CommonJS module plumbing (`require()`, `module.exports`,
/// `exports.x =`) in ES-module source.
pub struct NoCommonjs;

impl Rule for NoCommonjs {
    fn id(&self) -> &'static str {
        "strigil/no-commonjs"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "disallow CommonJS require and exports"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        for (i, t) in ctx.tokens.iter().enumerate() {
            if t.kind != TokenKind::Identifier {
                continue;
            }
            let prev = i.checked_sub(1).map(|p| ctx.tokens[p].kind);
            if matches!(prev, Some(TokenKind::Dot | TokenKind::QuestionDot)) {
                continue;
            }
            let next = ctx.tokens.get(i + 1).map(|n| n.kind);
            match t.text(ctx.source) {
                "require" if next == Some(TokenKind::LeftParen) => {
                    out.push(
                        Diagnostic::error(self.id(), "Unexpected require() call", t.span)
                            .with_help("use an import declaration"),
                    );
                }
                "module" if next == Some(TokenKind::Dot) => {
                    let Some(prop) = ctx.tokens.get(i + 2) else { continue };
                    if prop.kind == TokenKind::Identifier && prop.text(ctx.source) == "exports" {
                        out.push(
                            Diagnostic::error(
                                self.id(),
                                "Unexpected module.exports assignment",
                                t.span.merge(&prop.span),
                            )
                            .with_help("use an export declaration"),
                        );
                    }
                }
                "exports"
                    if matches!(next, Some(TokenKind::Dot | TokenKind::Equal)) =>
                {
                    out.push(
                        Diagnostic::error(self.id(), "Unexpected CommonJS exports", t.span)
                            .with_help("use an export declaration"),
                    );
                }
                _ => {}
            }
        }
        out
    }
}

/// Flags `await` outside any function body.
pub struct NoTopLevelAwait;

impl Rule for NoTopLevelAwait {
    fn id(&self) -> &'static str {
        "strigil/no-top-level-await"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "disallow await at module top level"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        // Brace stack: true for function-like bodies (function declarations,
        // methods, arrow bodies), false for blocks.
        let mut braces: Vec<bool> = Vec::new();
        let mut paren_openers: Vec<Option<TokenKind>> = Vec::new();
        let mut last_closed_opener: Option<TokenKind> = None;
        let mut pending_fn = false;
        let mut arrow_expr = false;
        for (i, t) in ctx.tokens.iter().enumerate() {
            match t.kind {
                TokenKind::Function => pending_fn = true,
                TokenKind::Arrow => {
                    if ctx.tokens.get(i + 1).map(|n| n.kind) == Some(TokenKind::LeftBrace) {
                        pending_fn = true;
                    } else {
                        arrow_expr = true;
                    }
                }
                TokenKind::LeftParen => {
                    paren_openers.push(i.checked_sub(1).map(|p| ctx.tokens[p].kind));
                }
                TokenKind::RightParen => {
                    last_closed_opener = paren_openers.pop().flatten();
                }
                TokenKind::LeftBrace => {
                    let after_params = i
                        .checked_sub(1)
                        .map(|p| ctx.tokens[p].kind == TokenKind::RightParen)
                        .unwrap_or(false);
                    let control_header = matches!(
                        last_closed_opener,
                        Some(
                            TokenKind::If
                                | TokenKind::For
                                | TokenKind::While
                                | TokenKind::Switch
                                | TokenKind::Catch
                        )
                    );
                    let function_like = pending_fn || (after_params && !control_header);
                    braces.push(function_like);
                    pending_fn = false;
                }
                TokenKind::RightBrace => {
                    braces.pop();
                }
                TokenKind::Semicolon => arrow_expr = false,
                TokenKind::Await => {
                    let in_function = braces.iter().any(|&f| f);
                    if !in_function && !arrow_expr {
                        out.push(
                            Diagnostic::error(self.id(), "Unexpected top-level await", t.span)
                                .with_help(
                                    "wrap the awaited call in an async function",
                                ),
                        );
                    }
                }
                _ => {}
            }
        }
        out
    }
}

/// Flags a bare `=` in a conditional test.
pub struct NoCondAssign;

impl Rule for NoCondAssign {
    fn id(&self) -> &'static str {
        "strigil/no-cond-assign"
    }

    fn default_severity(&self) -> Severity {
        Severity::Error
    }

    fn description(&self) -> &'static str {
        "disallow assignment in conditional tests"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        ctx.facts
            .conditional_tests
            .iter()
            .filter(|t| t.is_assignment)
            .map(|t| {
                Diagnostic::error(self.id(), "Assignment inside a conditional test", t.span)
                    .with_help(
                        "use a comparison, or wrap the assignment in a second pair of \
                         parentheses to mark it intentional",
                    )
            })
            .collect()
    }
}

/// Requires braces on control-statement bodies. The fix wraps simple
/// single-line bodies; anything else is flagged without a fix.
pub struct Curly;

impl Rule for Curly {
    fn id(&self) -> &'static str {
        "strigil/curly"
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn fixable(&self) -> bool {
        true
    }

    fn description(&self) -> &'static str {
        "require braces around control-statement bodies"
    }

    fn check(&self, ctx: &RuleContext<'_>) -> Vec<Diagnostic> {
        let mut out = Vec::new();
        let tokens = ctx.tokens;
        for (i, t) in tokens.iter().enumerate() {
            let body = match t.kind {
                TokenKind::If | TokenKind::While | TokenKind::For => {
                    let mut open = i + 1;
                    if tokens.get(open).map(|n| n.kind) == Some(TokenKind::Await) {
                        open += 1;
                    }
                    if tokens.get(open).map(|n| n.kind) != Some(TokenKind::LeftParen) {
                        continue;
                    }
                    let Some(close) = matching_bracket(tokens, open) else { continue };
                    close + 1
                }
                TokenKind::Else => {
                    if tokens.get(i + 1).map(|n| n.kind) == Some(TokenKind::If) {
                        continue;
                    }
                    i + 1
                }
                TokenKind::Do => i + 1,
                _ => continue,
            };
            let Some(body_tok) = tokens.get(body) else { continue };
            // `Semicolon` also covers the tail of do-while, whose "body"
            // position holds the terminating semicolon.
            if matches!(
                body_tok.kind,
                TokenKind::LeftBrace | TokenKind::Semicolon | TokenKind::Eof
            ) {
                continue;
            }
            let keyword = t.text(ctx.source);
            let mut diag = Diagnostic::warning(
                self.id(),
                format!("Expected braces around the body of '{keyword}'"),
                body_tok.span,
            )
            .with_help("single-statement bodies still take braces");
            if let Some(end) = simple_statement_end(ctx, body) {
                let same_line = tokens[body].span.line == tokens[end].span.line;
                if same_line {
                    let open_at = body_tok.span.start;
                    let close_at = tokens[end].span.end;
                    let fix = Fix::replace(
                        Span::new(open_at, open_at, body_tok.span.line, body_tok.span.column),
                        "{ ",
                    )
                    .and_replace(
                        Span::new(close_at, close_at, tokens[end].span.line, tokens[end].span.column),
                        " }",
                    );
                    diag = diag.with_fix(fix);
                }
            }
            out.push(diag);
        }
        out
    }
}

/// Index of the semicolon ending a brace-free single statement starting at
/// `start`, or `None` when the body is anything more complicated.
fn simple_statement_end(ctx: &RuleContext<'_>, start: usize) -> Option<usize> {
    let mut depth = 0i32;
    for (j, t) in ctx.tokens.iter().enumerate().skip(start) {
        match t.kind {
            TokenKind::LeftBrace | TokenKind::RightBrace | TokenKind::Eof => return None,
            TokenKind::LeftParen | TokenKind::LeftBracket => depth += 1,
            TokenKind::RightParen | TokenKind::RightBracket => {
                if depth == 0 {
                    return None;
                }
                depth -= 1;
            }
            TokenKind::Semicolon if depth == 0 => return Some(j),
            _ => {}
        }
    }
    None
}
