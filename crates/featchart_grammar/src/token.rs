//! Tokens of the grammar notation.

use crate::span::Span;

/// A token from lexical analysis.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The type and value of this token.
    pub kind: TokenKind,
    /// Source location of this token.
    pub span: Span,
}

impl Token {
    /// Creates a new token.
    #[must_use]
    pub const fn new(kind: TokenKind, span: Span) -> Self {
        Self { kind, span }
    }
}

/// Token types of the grammar notation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TokenKind {
    // Delimiters
    /// `[`
    LBracket,
    /// `]`
    RBracket,
    /// `(`
    LParen,
    /// `)`
    RParen,
    /// `,`
    Comma,

    // Operators
    /// `=`
    Equals,
    /// `->` (production arrow or reentrancy reference)
    Arrow,
    /// `|` separating alternatives
    Pipe,
    /// `+` (boolean feature)
    Plus,
    /// `-` (boolean feature)
    Minus,
    /// `%` introducing a directive
    Percent,

    // Literals
    /// Bare word such as `NP`, `num`, or `sg`
    Ident(String),
    /// Quoted string such as `'Kim'`
    Str(String),
    /// Integer literal
    Int(i64),
    /// Variable such as `?n` (name without the `?`)
    Variable(String),

    // Meta
    /// End of a line
    Newline,
    /// Comment text (including `#`)
    Comment(String),
    /// End of input
    Eof,
    /// Lexer error
    Error(String),
}

impl TokenKind {
    /// Returns true if this token kind should be ignored during parsing.
    #[must_use]
    pub const fn is_trivia(&self) -> bool {
        matches!(self, Self::Comment(_))
    }

    /// Returns a human-readable name for this token kind.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::LBracket => "'['",
            Self::RBracket => "']'",
            Self::LParen => "'('",
            Self::RParen => "')'",
            Self::Comma => "','",
            Self::Equals => "'='",
            Self::Arrow => "'->'",
            Self::Pipe => "'|'",
            Self::Plus => "'+'",
            Self::Minus => "'-'",
            Self::Percent => "'%'",
            Self::Ident(_) => "identifier",
            Self::Str(_) => "string",
            Self::Int(_) => "integer",
            Self::Variable(_) => "variable",
            Self::Newline => "end of line",
            Self::Comment(_) => "comment",
            Self::Eof => "end of input",
            Self::Error(_) => "error",
        }
    }
}
