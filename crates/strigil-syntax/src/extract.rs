//! Structural extractor.
//!
//! One forward pass over the token stream, maintaining an explicit scope
//! stack. This is not a grammar parse: each fact comes out of a narrow
//! recognizer (import boundaries, member key lists, heritage clauses,
//! declarators and their reassignments, conditional tests, regex capture
//! groups), and anything a recognizer does not understand it skips.

use crate::facts::{
    Binding, CaptureGroup, ConditionalTest, DeclaredKind, Facts, HeritageClause, HeritageIdent,
    HeritageKind, ImportDecl, ImportSpecifier, MemberEntry, MemberList, MemberListKind,
    RegexLiteralInfo, TopLevelBinding,
};
use crate::region::{Region, RegionKind};
use crate::scanner::ScanResult;
use crate::span::Span;
use crate::token::{Token, TokenKind};
use rustc_hash::FxHashMap;

/// How many tokens past a regex literal to search for a numeric index
/// access on its match result.
const REGEX_REFERENCE_LOOKAHEAD: usize = 64;

/// Build all structural facts for one scanned file.
pub fn extract(source: &str, scan: &ScanResult) -> Facts {
    Extractor::new(source, scan).run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScopeKind {
    Root,
    Block,
    ClassBody,
    InterfaceBody,
    ObjectLiteral,
    Paren,
    Bracket,
}

/// A member entry being accumulated.
struct EntryBuild {
    key: Option<String>,
    key_set: bool,
    key_span: Span,
    start_span: Span,
    last_end: usize,
    last_line: u32,
    prev_kind: TokenKind,
    leading_comment: Option<Span>,
}

struct ListBuild {
    kind: MemberListKind,
    entries: Vec<MemberEntry>,
    entry: Option<EntryBuild>,
}

struct Scope {
    kind: ScopeKind,
    for_header: bool,
    /// Binding names to close when this scope ends.
    bindings: Vec<String>,
    list: Option<ListBuild>,
}

impl Scope {
    fn new(kind: ScopeKind) -> Self {
        let list = match kind {
            ScopeKind::ObjectLiteral => Some(ListBuild {
                kind: MemberListKind::ObjectLiteral,
                entries: Vec::new(),
                entry: None,
            }),
            ScopeKind::InterfaceBody => Some(ListBuild {
                kind: MemberListKind::InterfaceBody,
                entries: Vec::new(),
                entry: None,
            }),
            _ => None,
        };
        Scope {
            kind,
            for_header: false,
            bindings: Vec::new(),
            list,
        }
    }
}

struct DeclState {
    kind: DeclaredKind,
    keyword_span: Span,
    depth: usize,
    decl_id: u32,
    expecting_name: bool,
    exported: bool,
}

struct Extractor<'a> {
    source: &'a str,
    tokens: &'a [Token],
    regions: &'a [Region],
    facts: Facts,
    scopes: Vec<Scope>,
    /// Name -> indices into `facts.bindings`, innermost last.
    open: FxHashMap<String, Vec<usize>>,
    decl: Option<DeclState>,
    pending_header: Option<ScopeKind>,
    pending_for: bool,
    /// Bindings from a closed `for (...)` header, waiting to attach to the
    /// loop body scope.
    pending_loop_bindings: Vec<String>,
    /// Token index of the end of the import statement being walked, so its
    /// specifier braces are not mistaken for an object literal.
    import_until: Option<usize>,
    next_decl_id: u32,
}

impl<'a> Extractor<'a> {
    fn new(source: &'a str, scan: &'a ScanResult) -> Self {
        Extractor {
            source,
            tokens: &scan.tokens,
            regions: &scan.regions,
            facts: Facts::default(),
            scopes: vec![Scope::new(ScopeKind::Root)],
            open: FxHashMap::default(),
            decl: None,
            pending_header: None,
            pending_for: false,
            pending_loop_bindings: Vec::new(),
            import_until: None,
            next_decl_id: 0,
        }
    }

    fn run(mut self) -> Facts {
        let mut i = 0;
        while i < self.tokens.len() {
            let t = self.tokens[i];
            match t.kind {
                TokenKind::Eof => break,
                TokenKind::LeftBrace => {
                    self.maybe_start_opaque_entry(t);
                    self.extend_entries(t);
                    self.open_brace(i);
                    i += 1;
                    continue;
                }
                TokenKind::LeftParen => {
                    self.maybe_start_opaque_entry(t);
                    self.extend_entries(t);
                    let mut scope = Scope::new(ScopeKind::Paren);
                    scope.for_header = std::mem::take(&mut self.pending_for);
                    self.scopes.push(scope);
                    i += 1;
                    continue;
                }
                TokenKind::LeftBracket => {
                    if self.decl.as_ref().is_some_and(|d| d.expecting_name) {
                        // array destructuring pattern, not a plain declarator
                        self.decl = None;
                    }
                    self.maybe_start_opaque_entry(t);
                    self.extend_entries(t);
                    self.scopes.push(Scope::new(ScopeKind::Bracket));
                    i += 1;
                    continue;
                }
                TokenKind::RightBrace | TokenKind::RightParen | TokenKind::RightBracket => {
                    self.close_scope();
                    self.extend_entries(t);
                    i += 1;
                    continue;
                }
                TokenKind::Import => self.import_stmt(i),
                TokenKind::Class => self.pending_header = Some(ScopeKind::ClassBody),
                TokenKind::Interface => self.pending_header = Some(ScopeKind::InterfaceBody),
                TokenKind::Extends => {
                    if self.pending_header.is_some() {
                        self.heritage(i, HeritageKind::Extends);
                    }
                }
                TokenKind::Implements => {
                    if self.pending_header.is_some() {
                        self.heritage(i, HeritageKind::Implements);
                    }
                }
                TokenKind::If | TokenKind::While => self.conditional(i),
                TokenKind::For => {
                    self.pending_for = true;
                    self.for_clauses(i);
                }
                TokenKind::Let => self.begin_decl(i, DeclaredKind::Let),
                TokenKind::Const => self.begin_decl(i, DeclaredKind::Const),
                TokenKind::Var => self.begin_decl(i, DeclaredKind::Var),
                TokenKind::Identifier => self.identifier(i),
                TokenKind::Regex => self.regex(i),
                TokenKind::Comma => {
                    if let Some(d) = &mut self.decl {
                        if self.scopes.len() == d.depth {
                            d.expecting_name = true;
                        }
                    }
                }
                TokenKind::Semicolon => {
                    if let Some(d) = &self.decl {
                        if self.scopes.len() <= d.depth {
                            self.decl = None;
                        }
                    }
                    self.pending_header = None;
                    let in_for_header = self.scopes.last().is_some_and(|s| s.for_header);
                    if !in_for_header {
                        self.drop_pending_loop_bindings();
                    }
                }
                TokenKind::In | TokenKind::Of => {
                    if let Some(d) = &self.decl {
                        if self.scopes.len() == d.depth {
                            self.decl = None;
                        }
                    }
                }
                _ => {}
            }
            self.entry_transitions(i, t);
            self.extend_entries(t);
            i += 1;
        }
        // Unbalanced input: flush whatever lists are still open.
        while self.scopes.len() > 1 {
            self.close_scope();
        }
        self.facts
    }

    // ---- scope handling -------------------------------------------------

    fn open_brace(&mut self, i: usize) {
        if let Some(d) = &self.decl {
            // destructuring pattern, not a plain declarator
            if d.expecting_name {
                self.decl = None;
            }
        }
        let kind = match self.pending_header.take() {
            Some(h) => h,
            None if self.import_until.is_some_and(|e| i < e) => ScopeKind::Block,
            None => {
                let prev = i.checked_sub(1).map(|p| self.tokens[p].kind);
                let object = matches!(
                    prev,
                    Some(
                        TokenKind::Equal
                            | TokenKind::LeftParen
                            | TokenKind::LeftBracket
                            | TokenKind::Comma
                            | TokenKind::Return
                            | TokenKind::Colon
                            | TokenKind::Question
                            | TokenKind::QuestionQuestion
                            | TokenKind::AmpAmp
                            | TokenKind::PipePipe
                    )
                );
                if object {
                    ScopeKind::ObjectLiteral
                } else {
                    ScopeKind::Block
                }
            }
        };
        let mut scope = Scope::new(kind);
        scope.bindings = std::mem::take(&mut self.pending_loop_bindings);
        self.scopes.push(scope);
    }

    fn close_scope(&mut self) {
        if self.scopes.len() <= 1 {
            return;
        }
        let mut scope = self.scopes.pop().expect("non-root scope");
        if let Some(mut list) = scope.list.take() {
            Self::close_entry(&mut list);
            if !list.entries.is_empty() {
                self.facts.member_lists.push(MemberList {
                    kind: list.kind,
                    entries: list.entries,
                });
            }
        }
        if scope.for_header {
            // Header bindings live on through the loop body.
            self.pending_loop_bindings = std::mem::take(&mut scope.bindings);
        } else {
            for name in scope.bindings.drain(..) {
                if let Some(stack) = self.open.get_mut(&name) {
                    stack.pop();
                }
            }
        }
        if let Some(d) = &self.decl {
            if d.depth > self.scopes.len() {
                self.decl = None;
            }
        }
    }

    fn drop_pending_loop_bindings(&mut self) {
        for name in std::mem::take(&mut self.pending_loop_bindings) {
            if let Some(stack) = self.open.get_mut(&name) {
                stack.pop();
            }
        }
    }

    // ---- member lists ---------------------------------------------------

    /// An opener token (`[`, `(`, `{`) directly at a member-list level
    /// starts an entry with no sortable key, e.g. a computed key.
    fn maybe_start_opaque_entry(&mut self, t: Token) {
        let Some(list) = self.scopes.last_mut().and_then(|s| s.list.as_mut()) else {
            return;
        };
        if list.entry.is_some() {
            return;
        }
        list.entry = Some(EntryBuild {
            key: None,
            key_set: true,
            key_span: t.span,
            start_span: t.span,
            last_end: t.span.end,
            last_line: t.span.line,
            prev_kind: t.kind,
            leading_comment: None,
        });
    }

    fn entry_transitions(&mut self, i: usize, t: Token) {
        let Some(list) = self.scopes.last().and_then(|s| s.list.as_ref()) else {
            return;
        };
        let is_separator = t.kind == TokenKind::Comma
            || (t.kind == TokenKind::Semicolon && list.kind == MemberListKind::InterfaceBody);
        if is_separator {
            let list = self
                .scopes
                .last_mut()
                .and_then(|s| s.list.as_mut())
                .expect("list scope");
            Self::close_entry(list);
            return;
        }
        if t.kind == TokenKind::Semicolon {
            return;
        }
        // Interface members are often newline-separated without semicolons:
        // a token on a fresh line after a member that looks complete starts
        // the next entry.
        let line_break = match &list.entry {
            Some(e) => {
                list.kind == MemberListKind::InterfaceBody
                    && t.span.line > e.last_line
                    && Self::member_can_end(e.prev_kind)
            }
            None => false,
        };
        let starts = list.entry.is_none() || line_break;
        if !starts {
            self.set_entry_key(i, t);
            return;
        }
        let leading_comment = self.leading_comment(t.span.start);
        let list = self
            .scopes
            .last_mut()
            .and_then(|s| s.list.as_mut())
            .expect("list scope");
        if line_break {
            Self::close_entry(list);
        }
        list.entry = Some(EntryBuild {
            key: None,
            key_set: false,
            key_span: t.span,
            start_span: t.span,
            last_end: t.span.end,
            last_line: t.span.line,
            prev_kind: t.kind,
            leading_comment,
        });
        self.set_entry_key(i, t);
    }

    fn member_can_end(kind: TokenKind) -> bool {
        kind.can_end_expression() || matches!(kind, TokenKind::RightBrace | TokenKind::Greater)
    }

    /// Resolve the entry's sort key, skipping member modifiers.
    fn set_entry_key(&mut self, i: usize, t: Token) {
        let next_is_name = self
            .tokens
            .get(i + 1)
            .map(|n| Self::name_like(n.text(self.source)))
            .unwrap_or(false);
        let text = t.text(self.source);
        let Some(list) = self.scopes.last_mut().and_then(|s| s.list.as_mut()) else {
            return;
        };
        let Some(entry) = list.entry.as_mut() else {
            return;
        };
        if entry.key_set {
            return;
        }
        let modifier = matches!(
            t.kind,
            TokenKind::Static
                | TokenKind::Public
                | TokenKind::Private
                | TokenKind::Protected
                | TokenKind::Abstract
                | TokenKind::Async
                | TokenKind::Star
        ) || (t.kind == TokenKind::Identifier
            && matches!(text, "readonly" | "get" | "set")
            && next_is_name);
        if modifier && next_is_name {
            return;
        }
        if modifier && t.kind != TokenKind::Identifier {
            return;
        }
        entry.key = match t.kind {
            TokenKind::String => Some(
                text.trim_matches(|c| c == '"' || c == '\'')
                    .to_string(),
            ),
            TokenKind::DotDotDot => None,
            _ if Self::name_like(text) => Some(text.to_string()),
            _ => None,
        };
        entry.key_span = t.span;
        entry.key_set = true;
    }

    fn name_like(text: &str) -> bool {
        text.chars().next().is_some_and(|c| {
            c == '_' || c == '$' || c == '"' || c == '\'' || c.is_ascii_digit() || c.is_alphabetic()
        })
    }

    fn close_entry(list: &mut ListBuild) {
        if let Some(e) = list.entry.take() {
            let entry_span = Span::new(
                e.start_span.start,
                e.last_end,
                e.start_span.line,
                e.start_span.column,
            );
            list.entries.push(MemberEntry {
                key: e.key,
                key_span: e.key_span,
                entry_span,
                leading_comment: e.leading_comment,
                line: e.start_span.line,
            });
        }
    }

    /// Extend every open entry over this token.
    fn extend_entries(&mut self, t: Token) {
        for scope in &mut self.scopes {
            if let Some(list) = &mut scope.list {
                if let Some(e) = &mut list.entry {
                    e.last_end = e.last_end.max(t.span.end);
                    e.last_line = t.span.line;
                    e.prev_kind = t.kind;
                }
            }
        }
    }

    // ---- comments -------------------------------------------------------

    /// The comment block directly above (or directly before, on the same
    /// line as) the byte offset, if any. A blank line detaches.
    fn leading_comment(&self, start: usize) -> Option<Span> {
        let mut idx = self.regions.partition_point(|r| r.span.end <= start);
        let mut attached: Option<Span> = None;
        let mut cursor = start;
        while idx > 0 {
            let r = &self.regions[idx - 1];
            let gap = &self.source[r.span.end..cursor];
            if !gap.chars().all(char::is_whitespace) || gap.matches('\n').count() > 1 {
                break;
            }
            if r.kind.is_comment() {
                let line_start = self.source[..r.span.start]
                    .rfind('\n')
                    .map_or(0, |p| p + 1);
                let own_line = self.source[line_start..r.span.start]
                    .chars()
                    .all(|c| c == ' ' || c == '\t');
                if !own_line {
                    break;
                }
                attached = Some(match attached {
                    Some(prev) => r.span.merge(&prev),
                    None => r.span,
                });
                cursor = r.span.start;
                idx -= 1;
            } else if r.kind == RegionKind::Code
                && r.span.slice(self.source).chars().all(char::is_whitespace)
                && r.span.slice(self.source).matches('\n').count() <= 1
            {
                cursor = r.span.start;
                idx -= 1;
            } else {
                break;
            }
        }
        attached
    }

    // ---- imports --------------------------------------------------------

    fn import_stmt(&mut self, i: usize) {
        if self.scopes.len() != 1 {
            return;
        }
        let next = self.tokens.get(i + 1).map(|t| t.kind);
        if matches!(next, Some(TokenKind::LeftParen | TokenKind::Dot)) {
            // dynamic import() / import.meta
            return;
        }
        let keyword = self.tokens[i];
        let mut j = i + 1;
        let mut default_name = None;
        let mut namespace = false;
        let mut specifiers = Vec::new();
        let mut source_span = None;
        let mut last = i;
        // type-only imports: `import type { ... }`
        if self.tokens.get(j).map(|t| t.kind) == Some(TokenKind::Type)
            && !matches!(
                self.tokens.get(j + 1).map(|t| t.kind),
                Some(TokenKind::From | TokenKind::Comma | TokenKind::Semicolon)
            )
        {
            j += 1;
        }
        while let Some(t) = self.tokens.get(j) {
            match t.kind {
                TokenKind::String => {
                    source_span = Some(t.span);
                    last = j;
                    j += 1;
                    break;
                }
                TokenKind::Identifier => {
                    default_name = Some(t.text(self.source).to_string());
                    last = j;
                    j += 1;
                }
                TokenKind::Star => {
                    namespace = true;
                    last = j;
                    j += 1;
                    if self.tokens.get(j).map(|t| t.kind) == Some(TokenKind::As) {
                        j += 1;
                    }
                    if self.tokens.get(j).map(|t| t.kind) == Some(TokenKind::Identifier) {
                        last = j;
                        j += 1;
                    }
                }
                TokenKind::Comma | TokenKind::From => {
                    last = j;
                    j += 1;
                }
                TokenKind::LeftBrace => {
                    j = self.import_specifiers(j, &mut specifiers);
                    last = j.saturating_sub(1);
                }
                _ => break,
            }
        }
        if self.tokens.get(j).map(|t| t.kind) == Some(TokenKind::Semicolon) {
            last = j;
        }
        if last <= i {
            return;
        }
        self.import_until = Some(last);
        let full_span = keyword.span.merge(&self.tokens[last].span);
        let leading_comment = self.leading_comment(keyword.span.start);
        self.facts.imports.push(ImportDecl {
            specifiers,
            default_name,
            namespace,
            source_span,
            full_span,
            leading_comment,
            line: keyword.span.line,
        });
    }

    /// Parse `{ a, b as c, type D }`; returns the index just past the `}`.
    fn import_specifiers(&mut self, open: usize, out: &mut Vec<ImportSpecifier>) -> usize {
        let close = match self.matching(open) {
            Some(c) => c,
            None => return self.tokens.len().saturating_sub(1),
        };
        let mut k = open + 1;
        while k < close {
            if self.tokens[k].kind == TokenKind::Comma {
                k += 1;
                continue;
            }
            let mut name_tok = self.tokens[k];
            // `type Foo` inline type specifier: sort by the real name
            if name_tok.kind == TokenKind::Type
                && k + 1 < close
                && self.tokens[k + 1].kind != TokenKind::Comma
            {
                name_tok = self.tokens[k + 1];
            }
            let start_tok = self.tokens[k];
            let mut end_tok = start_tok;
            let mut m = k + 1;
            while m < close && self.tokens[m].kind != TokenKind::Comma {
                end_tok = self.tokens[m];
                m += 1;
            }
            out.push(ImportSpecifier {
                name: name_tok.text(self.source).to_string(),
                span: name_tok.span,
                entry_span: start_tok.span.merge(&end_tok.span),
                leading_comment: self.leading_comment(start_tok.span.start),
            });
            k = m;
        }
        close + 1
    }

    // ---- heritage clauses -----------------------------------------------

    fn heritage(&mut self, i: usize, kind: HeritageKind) {
        let mut idents = Vec::new();
        let mut j = i + 1;
        while let Some(t) = self.tokens.get(j) {
            if t.kind != TokenKind::Identifier {
                break;
            }
            let start = t.span;
            let mut end = t.span;
            j += 1;
            while self.tokens.get(j).map(|t| t.kind) == Some(TokenKind::Dot)
                && self.tokens.get(j + 1).map(|t| t.kind) == Some(TokenKind::Identifier)
            {
                end = self.tokens[j + 1].span;
                j += 2;
            }
            let name = self.source[start.start..end.end].to_string();
            if self.tokens.get(j).map(|t| t.kind) == Some(TokenKind::Less) {
                let mut depth = 0i32;
                while let Some(t2) = self.tokens.get(j) {
                    depth += match t2.kind {
                        TokenKind::Less => 1,
                        TokenKind::LessLess => 2,
                        TokenKind::Greater => -1,
                        TokenKind::GreaterGreater => -2,
                        TokenKind::GreaterGreaterGreater => -3,
                        TokenKind::Eof => break,
                        _ => 0,
                    };
                    end = t2.span;
                    j += 1;
                    if depth <= 0 {
                        break;
                    }
                }
            }
            idents.push(HeritageIdent {
                name,
                span: Span::new(start.start, end.end, start.line, start.column),
            });
            if self.tokens.get(j).map(|t| t.kind) == Some(TokenKind::Comma) {
                j += 1;
            } else {
                break;
            }
        }
        if idents.is_empty() {
            return;
        }
        let list_span = idents
            .first()
            .unwrap()
            .span
            .merge(&idents.last().unwrap().span);
        self.facts.heritage_clauses.push(HeritageClause {
            kind,
            idents,
            list_span,
        });
    }

    // ---- conditional tests ----------------------------------------------

    fn conditional(&mut self, i: usize) {
        let open = i + 1;
        if self.tokens.get(open).map(|t| t.kind) != Some(TokenKind::LeftParen) {
            return;
        }
        let Some(close) = self.matching(open) else {
            return;
        };
        if close <= open + 1 {
            return;
        }
        let span = self.tokens[open].span.merge(&self.tokens[close].span);
        let is_assignment = self.range_is_assignment(open + 1, close - 1);
        self.facts
            .conditional_tests
            .push(ConditionalTest { span, is_assignment });
    }

    fn for_clauses(&mut self, i: usize) {
        let mut open = i + 1;
        if self.tokens.get(open).map(|t| t.kind) == Some(TokenKind::Await) {
            open += 1;
        }
        if self.tokens.get(open).map(|t| t.kind) != Some(TokenKind::LeftParen) {
            return;
        }
        let Some(close) = self.matching(open) else {
            return;
        };
        let mut depth = 0i32;
        let mut semis = Vec::new();
        for j in open..=close {
            match self.tokens[j].kind {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    depth -= 1
                }
                TokenKind::Semicolon if depth == 1 => semis.push(j),
                _ => {}
            }
        }
        if semis.len() < 2 {
            // for-of / for-in has no structural semicolons
            return;
        }
        let (first, last) = (semis[0] + 1, semis[1].saturating_sub(1));
        if first > last {
            return;
        }
        let span = self.tokens[first].span.merge(&self.tokens[last].span);
        let is_assignment = self.range_is_assignment(first, last);
        self.facts
            .conditional_tests
            .push(ConditionalTest { span, is_assignment });
    }

    /// True when a bare `=` appears at the top nesting level of the token
    /// range, and the range is not wrapped in the `((...))` escape.
    fn range_is_assignment(&self, first: usize, last: usize) -> bool {
        if first > last {
            return false;
        }
        if self.tokens[first].kind == TokenKind::LeftParen {
            if let Some(m) = self.matching(first) {
                if m == last {
                    return false;
                }
            }
        }
        let mut depth = 0i32;
        for j in first..=last {
            match self.tokens[j].kind {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    depth -= 1
                }
                TokenKind::Equal if depth == 0 => return true,
                _ => {}
            }
        }
        false
    }

    // ---- bindings -------------------------------------------------------

    fn begin_decl(&mut self, i: usize, kind: DeclaredKind) {
        let exported = i
            .checked_sub(1)
            .is_some_and(|p| self.tokens[p].kind == TokenKind::Export);
        self.decl = Some(DeclState {
            kind,
            keyword_span: self.tokens[i].span,
            depth: self.scopes.len(),
            decl_id: self.next_decl_id,
            expecting_name: true,
            exported,
        });
        self.next_decl_id += 1;
    }

    fn identifier(&mut self, i: usize) {
        let t = self.tokens[i];
        let declarator = match &self.decl {
            Some(d) => d.expecting_name && self.scopes.len() == d.depth,
            None => false,
        };
        if declarator {
            let (kind, keyword_span, decl_id, exported) = {
                let d = self.decl.as_ref().expect("active declaration");
                (d.kind, d.keyword_span, d.decl_id, d.exported)
            };
            self.decl.as_mut().expect("active declaration").expecting_name = false;
            let name = t.text(self.source).to_string();
            let idx = self.facts.bindings.len();
            self.facts.bindings.push(Binding {
                name: name.clone(),
                declared_kind: kind,
                keyword_span,
                name_span: t.span,
                reassigned: false,
                decl_id,
            });
            self.open.entry(name.clone()).or_default().push(idx);
            if let Some(scope) = self.scopes.last_mut() {
                scope.bindings.push(name);
            }
            if self.scopes.len() == 1 {
                self.top_level_binding(i, kind, exported);
            }
            return;
        }
        let prev = i.checked_sub(1).map(|p| self.tokens[p].kind);
        if matches!(prev, Some(TokenKind::Dot | TokenKind::QuestionDot)) {
            return;
        }
        let next = self.tokens.get(i + 1).map(|t| t.kind);
        let in_for_header = self.scopes.last().is_some_and(|s| s.for_header);
        let reassigns = matches!(next, Some(k) if k.is_assignment_op())
            || matches!(next, Some(TokenKind::PlusPlus | TokenKind::MinusMinus))
            || matches!(prev, Some(TokenKind::PlusPlus | TokenKind::MinusMinus))
            || (matches!(next, Some(TokenKind::Of | TokenKind::In))
                && self.decl.is_none()
                && in_for_header);
        if !reassigns {
            return;
        }
        if let Some(stack) = self.open.get(t.text(self.source)) {
            if let Some(&idx) = stack.last() {
                self.facts.bindings[idx].reassigned = true;
            }
        }
    }

    fn top_level_binding(&mut self, name_idx: usize, kind: DeclaredKind, exported: bool) {
        let name_tok = self.tokens[name_idx];
        let mut depth = 0i32;
        let mut eq = None;
        let mut j = name_idx + 1;
        while let Some(t) = self.tokens.get(j) {
            match t.kind {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
                TokenKind::RightParen | TokenKind::RightBracket | TokenKind::RightBrace => {
                    if depth == 0 {
                        break;
                    }
                    depth -= 1;
                }
                TokenKind::Equal if depth == 0 => {
                    eq = Some(j);
                    break;
                }
                TokenKind::Semicolon | TokenKind::Comma if depth == 0 => break,
                TokenKind::Eof => break,
                _ => {}
            }
            j += 1;
        }
        let is_fn = eq.is_some_and(|e| self.is_function_init(e + 1));
        self.facts.top_level_bindings.push(TopLevelBinding {
            name: name_tok.text(self.source).to_string(),
            span: name_tok.span,
            is_arrow_or_function_expr: is_fn,
            exported,
            declared_kind: kind,
        });
    }

    fn is_function_init(&self, mut j: usize) -> bool {
        if self.tokens.get(j).map(|t| t.kind) == Some(TokenKind::Async) {
            j += 1;
        }
        match self.tokens.get(j).map(|t| t.kind) {
            Some(TokenKind::Function) => true,
            Some(TokenKind::Identifier) => {
                self.tokens.get(j + 1).map(|t| t.kind) == Some(TokenKind::Arrow)
            }
            Some(TokenKind::LeftParen) => {
                let Some(close) = self.matching(j) else {
                    return false;
                };
                let mut k = close + 1;
                if self.tokens.get(k).map(|t| t.kind) == Some(TokenKind::Colon) {
                    // skip a return-type annotation
                    let mut depth = 0i32;
                    while let Some(t) = self.tokens.get(k) {
                        match t.kind {
                            TokenKind::LeftParen
                            | TokenKind::LeftBracket
                            | TokenKind::LeftBrace => depth += 1,
                            TokenKind::RightParen
                            | TokenKind::RightBracket
                            | TokenKind::RightBrace => {
                                if depth == 0 {
                                    break;
                                }
                                depth -= 1;
                            }
                            TokenKind::Arrow if depth == 0 => break,
                            TokenKind::Semicolon | TokenKind::Eof => break,
                            _ => {}
                        }
                        k += 1;
                    }
                }
                self.tokens.get(k).map(|t| t.kind) == Some(TokenKind::Arrow)
            }
            _ => false,
        }
    }

    // ---- regex literals -------------------------------------------------

    fn regex(&mut self, i: usize) {
        let t = self.tokens[i];
        let text = t.text(self.source);
        let close_rel = match text.rfind('/') {
            Some(p) if p > 0 => p,
            _ => return,
        };
        let body_start = t.span.start + 1;
        let body_end = t.span.start + close_rel;
        let body = &self.source[body_start..body_end];
        let mut groups = parse_capture_groups(body, body_start, t.span.line, t.span.column + 1);
        mark_backrefs(body, &mut groups);
        // a numeric index access later in the statement counts as a use
        let mut j = i + 1;
        let limit = (i + REGEX_REFERENCE_LOOKAHEAD).min(self.tokens.len());
        while j < limit {
            match self.tokens[j].kind {
                TokenKind::Semicolon | TokenKind::Eof => break,
                TokenKind::LeftBracket => {
                    if self.tokens.get(j + 1).map(|t| t.kind) == Some(TokenKind::Number)
                        && self.tokens.get(j + 2).map(|t| t.kind) == Some(TokenKind::RightBracket)
                    {
                        if let Ok(n) = self.tokens[j + 1].text(self.source).parse::<usize>() {
                            if n >= 1 {
                                if let Some(g) = groups.get_mut(n - 1) {
                                    g.referenced = true;
                                }
                            }
                        }
                    }
                }
                _ => {}
            }
            j += 1;
        }
        self.facts.regex_literals.push(RegexLiteralInfo {
            span: t.span,
            body_span: Span::new(body_start, body_end, t.span.line, t.span.column + 1),
            capturing_groups: groups,
        });
    }

    // ---- helpers --------------------------------------------------------

    /// Index of the token closing the bracket pair opened at `open`.
    fn matching(&self, open: usize) -> Option<usize> {
        crate::token::matching_bracket(self.tokens, open)
    }
}

/// Parse the capturing groups of a regex body. `abs` is the byte offset of
/// the body in the file; `line`/`col` locate its first character.
fn parse_capture_groups(body: &str, abs: usize, line: u32, col: u32) -> Vec<CaptureGroup> {
    let mut groups: Vec<CaptureGroup> = Vec::new();
    let mut stack: Vec<Option<usize>> = Vec::new();
    let mut in_class = false;
    let mut index = 0u32;
    let mut cols = 0u32;
    let mut iter = body.char_indices().peekable();
    while let Some((bi, c)) = iter.next() {
        cols += 1;
        match c {
            '\\' => {
                if iter.next().is_some() {
                    cols += 1;
                }
            }
            '[' if !in_class => in_class = true,
            ']' if in_class => in_class = false,
            '(' if !in_class => {
                let rest = &body[bi + c.len_utf8()..];
                let non_capturing = rest.starts_with("?:")
                    || rest.starts_with("?=")
                    || rest.starts_with("?!")
                    || rest.starts_with("?<=")
                    || rest.starts_with("?<!");
                if non_capturing {
                    stack.push(None);
                } else {
                    let name = rest.strip_prefix("?<").map(|n| {
                        n.chars().take_while(|c| *c != '>').collect::<String>()
                    });
                    index += 1;
                    groups.push(CaptureGroup {
                        span: Span::new(abs + bi, abs + bi + 1, line, col + cols - 1),
                        index,
                        name,
                        referenced: false,
                    });
                    stack.push(Some(groups.len() - 1));
                }
            }
            ')' if !in_class => {
                if let Some(Some(gi)) = stack.pop() {
                    groups[gi].span.end = abs + bi + 1;
                }
            }
            _ => {}
        }
    }
    groups
}

/// Mark groups referenced by `\N` or `\k<name>` backreferences.
fn mark_backrefs(body: &str, groups: &mut [CaptureGroup]) {
    let mut iter = body.char_indices().peekable();
    while let Some((_, c)) = iter.next() {
        if c != '\\' {
            continue;
        }
        match iter.peek().map(|&(_, c)| c) {
            Some(d) if d.is_ascii_digit() => {
                let mut n = 0usize;
                while let Some(&(_, d)) = iter.peek() {
                    let Some(v) = d.to_digit(10) else { break };
                    n = n * 10 + v as usize;
                    iter.next();
                }
                if n >= 1 {
                    if let Some(g) = groups.get_mut(n - 1) {
                        g.referenced = true;
                    }
                }
            }
            Some('k') => {
                iter.next();
                if iter.peek().map(|&(_, c)| c) == Some('<') {
                    iter.next();
                    let mut name = String::new();
                    while let Some(&(_, c)) = iter.peek() {
                        iter.next();
                        if c == '>' {
                            break;
                        }
                        name.push(c);
                    }
                    for g in groups.iter_mut() {
                        if g.name.as_deref() == Some(name.as_str()) {
                            g.referenced = true;
                        }
                    }
                }
            }
            Some(_) => {
                iter.next();
            }
            None => {}
        }
    }
}
