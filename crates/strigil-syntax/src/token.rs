//! Token definitions.
//!
//! One flat kind per keyword and punctuator, plus literal and identifier
//! kinds. Tokens carry no text of their own; the text is recovered from the
//! source through the span.

use crate::span::Span;
use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;

/// Kind of a scanned token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Function,
    Class,
    Interface,
    Type,
    Enum,
    Let,
    Const,
    Var,
    If,
    Else,
    Switch,
    Case,
    Default,
    For,
    While,
    Do,
    Break,
    Continue,
    Return,
    Async,
    Await,
    Try,
    Catch,
    Finally,
    Throw,
    Import,
    Export,
    From,
    New,
    This,
    Super,
    Static,
    Abstract,
    Extends,
    Implements,
    Typeof,
    Instanceof,
    As,
    Delete,
    Void,
    Debugger,
    Namespace,
    Private,
    Protected,
    Public,
    Yield,
    In,
    Of,
    True,
    False,
    Null,

    // Literals and names
    Identifier,
    Number,
    String,
    /// A template literal with no expression holes, backtick to backtick.
    Template,
    /// The leading chunk of a holed template: backtick up to and including `${`.
    TemplateHead,
    /// An interior chunk: `}` up to and including the next `${`.
    TemplateMiddle,
    /// The closing chunk: `}` up to and including the closing backtick.
    TemplateTail,
    /// A regular-expression literal including flags.
    Regex,

    // Operators (3-char before 2-char, 2-char before 1-char)
    GreaterGreaterGreaterEqual,
    EqualEqualEqual,
    BangEqualEqual,
    GreaterGreaterGreater,
    DotDotDot,
    LessLessEqual,
    GreaterGreaterEqual,
    StarStar,
    EqualEqual,
    BangEqual,
    LessEqual,
    GreaterEqual,
    AmpAmp,
    PipePipe,
    PlusPlus,
    MinusMinus,
    LessLess,
    GreaterGreater,
    QuestionDot,
    QuestionQuestion,
    Arrow,
    PlusEqual,
    MinusEqual,
    StarEqual,
    SlashEqual,
    PercentEqual,
    AmpEqual,
    PipeEqual,
    CaretEqual,

    // Single-character tokens
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Bang,
    Tilde,
    Less,
    Greater,
    Amp,
    Pipe,
    Caret,
    Equal,
    Question,
    Dot,
    Colon,
    Semicolon,
    Comma,
    LeftParen,
    RightParen,
    LeftBrace,
    RightBrace,
    LeftBracket,
    RightBracket,

    /// A character the scanner does not recognize. Kept in the stream so the
    /// file still scans end to end.
    Unknown,
    Eof,
}

impl TokenKind {
    /// Whether a token of this kind can be the last token of an expression.
    ///
    /// Drives the regex-versus-division decision: a `/` after a token that
    /// can end an expression is a division operator, otherwise it starts a
    /// regex literal. A `}` is treated as a block end (so a regex may follow).
    pub fn can_end_expression(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Identifier
                | Number
                | String
                | Template
                | TemplateTail
                | Regex
                | True
                | False
                | Null
                | This
                | Super
                | RightParen
                | RightBracket
                | PlusPlus
                | MinusMinus
        )
    }

    /// Whether this kind is a compound or simple assignment operator.
    pub fn is_assignment_op(&self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Equal
                | PlusEqual
                | MinusEqual
                | StarEqual
                | SlashEqual
                | PercentEqual
                | AmpEqual
                | PipeEqual
                | CaretEqual
                | LessLessEqual
                | GreaterGreaterEqual
                | GreaterGreaterGreaterEqual
        )
    }

    /// Whether this kind is one of the template-literal chunk kinds.
    pub fn is_template_chunk(&self) -> bool {
        use TokenKind::*;
        matches!(self, Template | TemplateHead | TemplateMiddle | TemplateTail)
    }
}

/// A scanned token: a kind and the span of source it covers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(kind: TokenKind, span: Span) -> Self {
        Token { kind, span }
    }

    /// The exact source text of this token.
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        self.span.slice(source)
    }
}

/// Keyword lookup table, built once.
static KEYWORDS: Lazy<FxHashMap<&'static str, TokenKind>> = Lazy::new(|| {
    use TokenKind::*;
    let entries: &[(&str, TokenKind)] = &[
        ("function", Function),
        ("class", Class),
        ("interface", Interface),
        ("type", Type),
        ("enum", Enum),
        ("let", Let),
        ("const", Const),
        ("var", Var),
        ("if", If),
        ("else", Else),
        ("switch", Switch),
        ("case", Case),
        ("default", Default),
        ("for", For),
        ("while", While),
        ("do", Do),
        ("break", Break),
        ("continue", Continue),
        ("return", Return),
        ("async", Async),
        ("await", Await),
        ("try", Try),
        ("catch", Catch),
        ("finally", Finally),
        ("throw", Throw),
        ("import", Import),
        ("export", Export),
        ("from", From),
        ("new", New),
        ("this", This),
        ("super", Super),
        ("static", Static),
        ("abstract", Abstract),
        ("extends", Extends),
        ("implements", Implements),
        ("typeof", Typeof),
        ("instanceof", Instanceof),
        ("as", As),
        ("delete", Delete),
        ("void", Void),
        ("debugger", Debugger),
        ("namespace", Namespace),
        ("private", Private),
        ("protected", Protected),
        ("public", Public),
        ("yield", Yield),
        ("in", In),
        ("of", Of),
        ("true", True),
        ("false", False),
        ("null", Null),
    ];
    entries.iter().copied().collect()
});

/// Look up the keyword kind for an identifier-shaped word, if any.
pub fn keyword(text: &str) -> Option<TokenKind> {
    KEYWORDS.get(text).copied()
}

/// Index of the token closing the bracket pair opened at `open`, matching
/// only the opener's own bracket kind.
pub fn matching_bracket(tokens: &[Token], open: usize) -> Option<usize> {
    let (o, c) = match tokens.get(open)?.kind {
        TokenKind::LeftParen => (TokenKind::LeftParen, TokenKind::RightParen),
        TokenKind::LeftBrace => (TokenKind::LeftBrace, TokenKind::RightBrace),
        TokenKind::LeftBracket => (TokenKind::LeftBracket, TokenKind::RightBracket),
        _ => return None,
    };
    let mut depth = 0i32;
    for (j, t) in tokens.iter().enumerate().skip(open) {
        if t.kind == o {
            depth += 1;
        } else if t.kind == c {
            depth -= 1;
            if depth == 0 {
                return Some(j);
            }
        } else if t.kind == TokenKind::Eof {
            break;
        }
    }
    None
}

/// Punctuator table, longest first so scanning takes the longest match.
pub(crate) const PUNCTUATORS: &[(&str, TokenKind)] = &[
    (">>>=", TokenKind::GreaterGreaterGreaterEqual),
    ("===", TokenKind::EqualEqualEqual),
    ("!==", TokenKind::BangEqualEqual),
    (">>>", TokenKind::GreaterGreaterGreater),
    ("...", TokenKind::DotDotDot),
    ("<<=", TokenKind::LessLessEqual),
    (">>=", TokenKind::GreaterGreaterEqual),
    ("**", TokenKind::StarStar),
    ("==", TokenKind::EqualEqual),
    ("!=", TokenKind::BangEqual),
    ("<=", TokenKind::LessEqual),
    (">=", TokenKind::GreaterEqual),
    ("&&", TokenKind::AmpAmp),
    ("||", TokenKind::PipePipe),
    ("++", TokenKind::PlusPlus),
    ("--", TokenKind::MinusMinus),
    ("<<", TokenKind::LessLess),
    (">>", TokenKind::GreaterGreater),
    ("?.", TokenKind::QuestionDot),
    ("??", TokenKind::QuestionQuestion),
    ("=>", TokenKind::Arrow),
    ("+=", TokenKind::PlusEqual),
    ("-=", TokenKind::MinusEqual),
    ("*=", TokenKind::StarEqual),
    ("/=", TokenKind::SlashEqual),
    ("%=", TokenKind::PercentEqual),
    ("&=", TokenKind::AmpEqual),
    ("|=", TokenKind::PipeEqual),
    ("^=", TokenKind::CaretEqual),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("!", TokenKind::Bang),
    ("~", TokenKind::Tilde),
    ("<", TokenKind::Less),
    (">", TokenKind::Greater),
    ("&", TokenKind::Amp),
    ("|", TokenKind::Pipe),
    ("^", TokenKind::Caret),
    ("=", TokenKind::Equal),
    ("?", TokenKind::Question),
    (".", TokenKind::Dot),
    (":", TokenKind::Colon),
    (";", TokenKind::Semicolon),
    (",", TokenKind::Comma),
    ("(", TokenKind::LeftParen),
    (")", TokenKind::RightParen),
    ("{", TokenKind::LeftBrace),
    ("}", TokenKind::RightBrace),
    ("[", TokenKind::LeftBracket),
    ("]", TokenKind::RightBracket),
];
