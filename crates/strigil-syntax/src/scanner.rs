//! Lexical scanner.
//!
//! Converts raw source text into a token stream plus a region partition in a
//! single pass. The scanner is total: malformed input (an unterminated
//! string, comment, template, or regex) degrades to a [`ScanIssue`] with a
//! best-effort region boundary, and scanning continues.
//!
//! The one genuinely tricky decision is whether a `/` starts a regex literal
//! or is a division operator. It is resolved from the previous significant
//! token: if that token cannot end an expression, the `/` starts a regex.
//! See [`crate::token::TokenKind::can_end_expression`].

use crate::region::{Region, RegionKind};
use crate::span::Span;
use crate::token::{keyword, Token, TokenKind, PUNCTUATORS};
use unicode_xid::UnicodeXID;

/// Template holes re-invoke the scanner recursively; this caps the depth so
/// adversarial input degrades to an issue instead of blowing the stack.
pub const MAX_TEMPLATE_DEPTH: usize = 32;

/// What went wrong while scanning a literal or comment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScanErrorKind {
    #[error("unterminated string literal")]
    UnterminatedString,
    #[error("unterminated template literal")]
    UnterminatedTemplate,
    #[error("unterminated block comment")]
    UnterminatedComment,
    #[error("unterminated regular expression literal")]
    UnterminatedRegex,
    #[error("template literal nesting exceeds {} levels", MAX_TEMPLATE_DEPTH)]
    TemplateTooDeep,
}

/// A recoverable scanning problem, surfaced later as a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanIssue {
    pub kind: ScanErrorKind,
    pub span: Span,
}

/// Everything the scanner produces for one file.
#[derive(Debug)]
pub struct ScanResult {
    pub tokens: Vec<Token>,
    pub regions: Vec<Region>,
    pub issues: Vec<ScanIssue>,
}

/// Scan a file. Total and panic-free for any input.
pub fn scan(source: &str) -> ScanResult {
    let mut scanner = Scanner::new(source);
    scanner.scan_code(0, false);
    scanner.flush_base();
    let eof = Span::new(source.len(), source.len(), scanner.line, scanner.column);
    scanner.tokens.push(Token::new(TokenKind::Eof, eof));
    ScanResult {
        tokens: scanner.tokens,
        regions: scanner.regions,
        issues: scanner.issues,
    }
}

fn is_ident_start(c: char) -> bool {
    c == '_' || c == '$' || UnicodeXID::is_xid_start(c)
}

fn is_ident_continue(c: char) -> bool {
    c == '$' || UnicodeXID::is_xid_continue(c)
}

/// A saved scanner position: byte offset plus line/column.
#[derive(Debug, Clone, Copy)]
struct Mark {
    pos: usize,
    line: u32,
    column: u32,
}

struct Scanner<'a> {
    source: &'a str,
    pos: usize,
    line: u32,
    column: u32,
    prev_was_cr: bool,
    tokens: Vec<Token>,
    regions: Vec<Region>,
    issues: Vec<ScanIssue>,
    /// Kind the current base region will be emitted as: `Code` at the top
    /// level, `TemplateExpressionHole` inside a `${...}` hole.
    base: RegionKind,
    region_start: Mark,
}

impl<'a> Scanner<'a> {
    fn new(source: &'a str) -> Self {
        Scanner {
            source,
            pos: 0,
            line: 1,
            column: 1,
            prev_was_cr: false,
            tokens: Vec::new(),
            regions: Vec::new(),
            issues: Vec::new(),
            base: RegionKind::Code,
            region_start: Mark {
                pos: 0,
                line: 1,
                column: 1,
            },
        }
    }

    fn peek(&self) -> Option<char> {
        self.source[self.pos..].chars().next()
    }

    fn peek_at(&self, n: usize) -> Option<char> {
        self.source[self.pos..].chars().nth(n)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        match c {
            '\n' => {
                // \r\n already advanced the line on the \r
                if !self.prev_was_cr {
                    self.line += 1;
                    self.column = 1;
                }
            }
            '\r' => {
                self.line += 1;
                self.column = 1;
            }
            _ => self.column += 1,
        }
        self.prev_was_cr = c == '\r';
        Some(c)
    }

    fn mark(&self) -> Mark {
        Mark {
            pos: self.pos,
            line: self.line,
            column: self.column,
        }
    }

    fn span_from(&self, m: Mark) -> Span {
        Span::new(m.pos, self.pos, m.line, m.column)
    }

    /// Close the pending base region (if non-empty) and restart it here.
    fn flush_base(&mut self) {
        if self.pos > self.region_start.pos {
            let span = Span::new(
                self.region_start.pos,
                self.pos,
                self.region_start.line,
                self.region_start.column,
            );
            self.regions.push(Region::new(self.base, span));
        }
        self.region_start = self.mark();
    }

    fn issue(&mut self, kind: ScanErrorKind, span: Span) {
        self.issues.push(ScanIssue { kind, span });
    }

    /// Table-driven regex-versus-division decision.
    fn regex_allowed(&self) -> bool {
        match self.tokens.last() {
            None => true,
            Some(t) => !t.kind.can_end_expression(),
        }
    }

    /// Scan tokens until end of input, or (inside a template hole) until the
    /// `}` that closes the hole. The closing `}` is left unconsumed.
    fn scan_code(&mut self, depth: usize, in_hole: bool) {
        let mut brace_depth = 0usize;
        loop {
            while matches!(self.peek(), Some(' ' | '\t' | '\r' | '\n')) {
                self.bump();
            }
            let Some(c) = self.peek() else { return };
            match c {
                '/' if self.peek_at(1) == Some('/') => self.line_comment(),
                '/' if self.peek_at(1) == Some('*') => self.block_comment(),
                '/' if self.regex_allowed() => self.regex_literal(),
                '"' | '\'' => self.string_literal(c),
                '`' => self.template_literal(depth),
                '}' if in_hole && brace_depth == 0 => return,
                c if is_ident_start(c) => self.identifier(),
                '0'..='9' => self.number(),
                '.' if matches!(self.peek_at(1), Some('0'..='9')) => self.number(),
                _ => {
                    let kind = self.punctuator();
                    if in_hole {
                        match kind {
                            TokenKind::LeftBrace => brace_depth += 1,
                            TokenKind::RightBrace => brace_depth = brace_depth.saturating_sub(1),
                            _ => {}
                        }
                    }
                }
            }
        }
    }

    fn line_comment(&mut self) {
        self.flush_base();
        let m = self.mark();
        self.bump();
        self.bump();
        while !matches!(self.peek(), None | Some('\n') | Some('\r')) {
            self.bump();
        }
        let span = self.span_from(m);
        self.regions.push(Region::new(RegionKind::LineComment, span));
        self.region_start = self.mark();
    }

    fn block_comment(&mut self) {
        self.flush_base();
        let m = self.mark();
        self.bump();
        self.bump();
        loop {
            match self.peek() {
                None => {
                    self.issue(ScanErrorKind::UnterminatedComment, self.span_from(m));
                    break;
                }
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.bump();
                    self.bump();
                    break;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        let span = self.span_from(m);
        self.regions.push(Region::new(RegionKind::BlockComment, span));
        self.region_start = self.mark();
    }

    fn string_literal(&mut self, quote: char) {
        self.flush_base();
        let m = self.mark();
        self.bump();
        loop {
            match self.peek() {
                // A raw line break interrupts the literal; closing at the
                // break keeps the rest of the line scannable.
                None | Some('\n') | Some('\r') => {
                    self.issue(ScanErrorKind::UnterminatedString, self.span_from(m));
                    break;
                }
                Some('\\') => self.escape_sequence(),
                Some(c) if c == quote => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        let span = self.span_from(m);
        self.regions.push(Region::new(RegionKind::StringLiteral, span));
        self.tokens.push(Token::new(TokenKind::String, span));
        self.region_start = self.mark();
    }

    /// Consume a backslash escape atomically, so an escaped quote can never
    /// terminate the enclosing literal.
    fn escape_sequence(&mut self) {
        self.bump();
        match self.peek() {
            Some('u') => {
                self.bump();
                if self.peek() == Some('{') {
                    self.bump();
                    while let Some(c) = self.peek() {
                        if c == '}' {
                            self.bump();
                            break;
                        }
                        if c == '\n' || c == '\r' {
                            break;
                        }
                        self.bump();
                    }
                } else {
                    for _ in 0..4 {
                        match self.peek() {
                            Some(c) if c.is_ascii_hexdigit() => {
                                self.bump();
                            }
                            _ => break,
                        }
                    }
                }
            }
            Some('x') => {
                self.bump();
                for _ in 0..2 {
                    match self.peek() {
                        Some(c) if c.is_ascii_hexdigit() => {
                            self.bump();
                        }
                        _ => break,
                    }
                }
            }
            Some(_) => {
                self.bump();
            }
            None => {}
        }
    }

    fn regex_literal(&mut self) {
        self.flush_base();
        let m = self.mark();
        self.bump();
        let mut in_class = false;
        loop {
            match self.peek() {
                None | Some('\n') | Some('\r') => {
                    self.issue(ScanErrorKind::UnterminatedRegex, self.span_from(m));
                    break;
                }
                Some('\\') => {
                    self.bump();
                    if self.peek().is_some() {
                        self.bump();
                    }
                }
                Some('[') => {
                    in_class = true;
                    self.bump();
                }
                Some(']') => {
                    in_class = false;
                    self.bump();
                }
                Some('/') if !in_class => {
                    self.bump();
                    while matches!(self.peek(), Some(c) if is_ident_continue(c)) {
                        self.bump();
                    }
                    break;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        let span = self.span_from(m);
        self.regions.push(Region::new(RegionKind::RegexLiteral, span));
        self.tokens.push(Token::new(TokenKind::Regex, span));
        self.region_start = self.mark();
    }

    fn template_literal(&mut self, depth: usize) {
        self.flush_base();
        if depth >= MAX_TEMPLATE_DEPTH {
            self.opaque_template();
            return;
        }
        let m = self.mark();
        self.bump();
        let mut chunk_start = m;
        let mut head_seen = false;
        loop {
            match self.peek() {
                None => {
                    self.issue(ScanErrorKind::UnterminatedTemplate, self.span_from(m));
                    self.emit_template_chunk(chunk_start, head_seen);
                    break;
                }
                Some('\\') => self.escape_sequence(),
                Some('`') => {
                    self.bump();
                    self.emit_template_chunk(chunk_start, head_seen);
                    break;
                }
                Some('$') if self.peek_at(1) == Some('{') => {
                    self.bump();
                    self.bump();
                    let span = self.span_from(chunk_start);
                    let kind = if head_seen {
                        TokenKind::TemplateMiddle
                    } else {
                        TokenKind::TemplateHead
                    };
                    self.regions.push(Region::new(RegionKind::TemplateLiteral, span));
                    self.tokens.push(Token::new(kind, span));
                    head_seen = true;

                    let saved = self.base;
                    self.base = RegionKind::TemplateExpressionHole;
                    self.region_start = self.mark();
                    self.scan_code(depth + 1, true);
                    self.flush_base();
                    self.base = saved;

                    chunk_start = self.mark();
                    if self.peek() == Some('}') {
                        self.bump();
                    } else {
                        // End of input inside the hole
                        self.issue(ScanErrorKind::UnterminatedTemplate, self.span_from(m));
                        break;
                    }
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        self.region_start = self.mark();
    }

    /// Past the nesting cap: swallow the literal as one opaque chunk up to
    /// the next unescaped backtick.
    fn opaque_template(&mut self) {
        let m = self.mark();
        self.bump();
        loop {
            match self.peek() {
                None => break,
                Some('\\') => self.escape_sequence(),
                Some('`') => {
                    self.bump();
                    break;
                }
                Some(_) => {
                    self.bump();
                }
            }
        }
        let span = self.span_from(m);
        self.issue(ScanErrorKind::TemplateTooDeep, span);
        self.regions.push(Region::new(RegionKind::TemplateLiteral, span));
        self.tokens.push(Token::new(TokenKind::Template, span));
        self.region_start = self.mark();
    }

    fn emit_template_chunk(&mut self, chunk_start: Mark, head_seen: bool) {
        let span = self.span_from(chunk_start);
        if span.is_empty() {
            return;
        }
        let kind = if head_seen {
            TokenKind::TemplateTail
        } else {
            TokenKind::Template
        };
        self.regions.push(Region::new(RegionKind::TemplateLiteral, span));
        self.tokens.push(Token::new(kind, span));
    }

    fn identifier(&mut self) {
        let m = self.mark();
        self.bump();
        while matches!(self.peek(), Some(c) if is_ident_continue(c)) {
            self.bump();
        }
        let text = &self.source[m.pos..self.pos];
        let kind = keyword(text).unwrap_or(TokenKind::Identifier);
        self.tokens.push(Token::new(kind, self.span_from(m)));
    }

    fn number(&mut self) {
        let m = self.mark();
        if self.peek() == Some('0')
            && matches!(self.peek_at(1), Some('x' | 'X' | 'b' | 'B' | 'o' | 'O'))
        {
            self.bump();
            self.bump();
            while matches!(self.peek(), Some(c) if c.is_ascii_alphanumeric() || c == '_') {
                self.bump();
            }
        } else {
            while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
                self.bump();
            }
            if self.peek() == Some('.') && matches!(self.peek_at(1), Some(c) if c.is_ascii_digit())
            {
                self.bump();
                while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
                    self.bump();
                }
            }
            if matches!(self.peek(), Some('e' | 'E')) {
                let after_sign = match self.peek_at(1) {
                    Some('+' | '-') => self.peek_at(2),
                    other => other,
                };
                if matches!(after_sign, Some(c) if c.is_ascii_digit()) {
                    self.bump();
                    if matches!(self.peek(), Some('+' | '-')) {
                        self.bump();
                    }
                    while matches!(self.peek(), Some(c) if c.is_ascii_digit() || c == '_') {
                        self.bump();
                    }
                }
            }
        }
        self.tokens
            .push(Token::new(TokenKind::Number, self.span_from(m)));
    }

    fn punctuator(&mut self) -> TokenKind {
        let m = self.mark();
        let rest = &self.source[self.pos..];
        for (text, kind) in PUNCTUATORS {
            if rest.starts_with(text) {
                for _ in 0..text.chars().count() {
                    self.bump();
                }
                self.tokens.push(Token::new(*kind, self.span_from(m)));
                return *kind;
            }
        }
        self.bump();
        self.tokens
            .push(Token::new(TokenKind::Unknown, self.span_from(m)));
        TokenKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        scan(source).tokens.iter().map(|t| t.kind).collect()
    }

    #[test]
    fn test_basic_statement() {
        use TokenKind::*;
        assert_eq!(
            kinds("let x = 10;"),
            vec![Let, Identifier, Equal, Number, Semicolon, Eof]
        );
    }

    #[test]
    fn test_regex_after_operator_division_after_value() {
        use TokenKind::*;
        assert_eq!(
            kinds("a = /b/g;"),
            vec![Identifier, Equal, Regex, Semicolon, Eof]
        );
        assert_eq!(
            kinds("a / b / c"),
            vec![Identifier, Slash, Identifier, Slash, Identifier, Eof]
        );
    }

    #[test]
    fn test_regex_slash_in_class_does_not_close() {
        let result = scan("x = /[/]/;");
        let regex = result
            .tokens
            .iter()
            .find(|t| t.kind == TokenKind::Regex)
            .unwrap();
        assert_eq!(regex.text("x = /[/]/;"), "/[/]/");
    }

    #[test]
    fn test_comment_lookalike_inside_string() {
        let src = "let s = \"// this is not a real comment\";";
        let result = scan(src);
        assert!(result
            .regions
            .iter()
            .all(|r| !r.kind.is_comment()));
        assert!(result
            .regions
            .iter()
            .any(|r| r.kind == RegionKind::StringLiteral));
    }

    #[test]
    fn test_comment_lookalike_inside_regex() {
        let src = r"let r = /\/\/ this looks like a comment/;";
        let result = scan(src);
        assert!(result.regions.iter().all(|r| !r.kind.is_comment()));
        assert_eq!(
            result
                .regions
                .iter()
                .filter(|r| r.kind == RegionKind::RegexLiteral)
                .count(),
            1
        );
    }

    #[test]
    fn test_escaped_quote_does_not_terminate() {
        let src = r#"let s = "a\"b";"#;
        let result = scan(src);
        let string = result
            .tokens
            .iter()
            .find(|t| t.kind == TokenKind::String)
            .unwrap();
        assert_eq!(string.text(src), r#""a\"b""#);
        assert!(result.issues.is_empty());
    }

    #[test]
    fn test_template_with_hole() {
        use TokenKind::*;
        let src = "let t = `a${x}b`;";
        assert_eq!(
            kinds(src),
            vec![Let, Identifier, Equal, TemplateHead, Identifier, TemplateTail, Semicolon, Eof]
        );
        let result = scan(src);
        assert!(result
            .regions
            .iter()
            .any(|r| r.kind == RegionKind::TemplateExpressionHole));
    }

    #[test]
    fn test_nested_template_in_hole() {
        let src = "let t = `a${`inner${x}`}b`;";
        let result = scan(src);
        assert!(result.issues.is_empty());
        let holes = result
            .regions
            .iter()
            .filter(|r| r.kind == RegionKind::TemplateExpressionHole)
            .count();
        assert_eq!(holes, 2);
    }

    #[test]
    fn test_region_partition_reconstructs_source() {
        let src = "import { a } from 'm';\n// c\nlet x = `t${1 + 2}`; /* b */ let r = /a+/g;\n";
        let result = scan(src);
        let mut rebuilt = String::new();
        let mut prev_end = 0;
        for region in &result.regions {
            assert_eq!(region.span.start, prev_end, "gap or overlap at {prev_end}");
            rebuilt.push_str(region.span.slice(src));
            prev_end = region.span.end;
        }
        assert_eq!(prev_end, src.len());
        assert_eq!(rebuilt, src);
    }

    #[test]
    fn test_unterminated_string_degrades() {
        let src = "let s = \"oops\nlet y = 1;";
        let result = scan(src);
        assert!(result
            .issues
            .iter()
            .any(|i| i.kind == ScanErrorKind::UnterminatedString));
        // Scanning continued: the second statement is still tokenized.
        assert!(result.tokens.iter().filter(|t| t.kind == TokenKind::Let).count() == 2);
    }

    #[test]
    fn test_unterminated_block_comment_runs_to_eof() {
        let src = "let x = 1; /* never closed";
        let result = scan(src);
        assert!(result
            .issues
            .iter()
            .any(|i| i.kind == ScanErrorKind::UnterminatedComment));
        let last = result.regions.last().unwrap();
        assert_eq!(last.kind, RegionKind::BlockComment);
        assert_eq!(last.span.end, src.len());
    }

    #[test]
    fn test_unicode_identifier_and_columns() {
        let src = "let \u{4F60}\u{597D} = 1;";
        let result = scan(src);
        let ident = result
            .tokens
            .iter()
            .find(|t| t.kind == TokenKind::Identifier)
            .unwrap();
        assert_eq!(ident.text(src), "\u{4F60}\u{597D}");
        // `=` sits at code-point column 8: `let ` is 4, the name is 2, space is 1.
        let eq = result
            .tokens
            .iter()
            .find(|t| t.kind == TokenKind::Equal)
            .unwrap();
        assert_eq!(eq.span.column, 8);
    }

    #[test]
    fn test_crlf_counts_one_line_break() {
        let src = "let a = 1;\r\nlet b = 2;";
        let result = scan(src);
        let second_let = result
            .tokens
            .iter()
            .filter(|t| t.kind == TokenKind::Let)
            .nth(1)
            .unwrap();
        assert_eq!(second_let.span.line, 2);
        assert_eq!(second_let.span.column, 1);
    }

    #[test]
    fn test_keyword_then_regex() {
        use TokenKind::*;
        assert_eq!(kinds("return /a/;"), vec![Return, Regex, Semicolon, Eof]);
    }

    #[test]
    fn test_template_depth_cap_degrades() {
        let mut src = String::from("let t = ");
        for _ in 0..(MAX_TEMPLATE_DEPTH + 2) {
            src.push_str("`${");
        }
        src.push('1');
        for _ in 0..(MAX_TEMPLATE_DEPTH + 2) {
            src.push_str("}`");
        }
        src.push(';');
        let result = scan(&src);
        assert!(result
            .issues
            .iter()
            .any(|i| i.kind == ScanErrorKind::TemplateTooDeep));
    }
}
