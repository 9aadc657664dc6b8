//! Lexer for the grammar notation.
//!
//! Line breaks are significant (one production line per line), so the lexer
//! emits [`TokenKind::Newline`] instead of skipping them.

use crate::span::Span;
use crate::token::{Token, TokenKind};

/// Splits grammar or feature-structure text into tokens.
pub struct Lexer<'src> {
    source: &'src str,
    /// The part of `source` not yet consumed.
    rest: &'src str,
    /// Byte offset of `rest` in `source`.
    offset: usize,
    /// 1-based line of `rest`.
    line: u32,
    /// 1-based column of `rest`, in characters.
    column: u32,
}

impl<'src> Lexer<'src> {
    /// A lexer positioned at the start of `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            rest: source,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    /// Lexes one token. At the end of input this keeps returning
    /// [`TokenKind::Eof`].
    pub fn next_token(&mut self) -> Token {
        self.skip_blanks();
        let (start, line, column) = (self.offset, self.line, self.column);
        let Some(c) = self.peek_char() else {
            return Token::new(TokenKind::Eof, Span::new(start, start, line, column));
        };

        let kind = match c {
            '\n' => self.single(TokenKind::Newline),
            '[' => self.single(TokenKind::LBracket),
            ']' => self.single(TokenKind::RBracket),
            '(' => self.single(TokenKind::LParen),
            ')' => self.single(TokenKind::RParen),
            ',' => self.single(TokenKind::Comma),
            '=' => self.single(TokenKind::Equals),
            '|' => self.single(TokenKind::Pipe),
            '+' => self.single(TokenKind::Plus),
            '%' => self.single(TokenKind::Percent),
            '#' => self.scan_comment(),
            '\'' | '"' => self.scan_string(c),
            '?' => self.scan_variable(),
            '-' => match self.peek_char_n(1) {
                Some('>') => {
                    self.advance();
                    self.advance();
                    TokenKind::Arrow
                }
                Some(d) if d.is_ascii_digit() => self.scan_number(),
                _ => self.single(TokenKind::Minus),
            },
            c if c.is_ascii_digit() => self.scan_number(),
            c if is_word_start(c) => TokenKind::Ident(self.scan_word()),
            c => {
                self.advance();
                TokenKind::Error(format!("unexpected character: {c}"))
            }
        };

        Token::new(kind, Span::new(start, self.offset, line, column))
    }

    /// Lexes all of `source`, comments included, ending with one
    /// [`TokenKind::Eof`].
    #[must_use]
    pub fn tokenize_all(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source);
        let mut done = false;
        std::iter::from_fn(|| {
            if done {
                return None;
            }
            let token = lexer.next_token();
            done = token.kind == TokenKind::Eof;
            Some(token)
        })
        .collect()
    }

    fn peek_char(&self) -> Option<char> {
        self.rest.chars().next()
    }

    fn peek_char_n(&self, n: usize) -> Option<char> {
        self.rest.chars().nth(n)
    }

    fn advance(&mut self) {
        let Some(c) = self.peek_char() else {
            return;
        };
        self.rest = &self.rest[c.len_utf8()..];
        self.offset += c.len_utf8();
        if c == '\n' {
            (self.line, self.column) = (self.line + 1, 1);
        } else {
            self.column += 1;
        }
    }

    fn single(&mut self, kind: TokenKind) -> TokenKind {
        self.advance();
        kind
    }

    /// Skips whitespace other than line breaks.
    fn skip_blanks(&mut self) {
        while let Some(c) = self.peek_char() {
            if c.is_whitespace() && c != '\n' {
                self.advance();
            } else {
                break;
            }
        }
    }

    fn scan_comment(&mut self) -> TokenKind {
        let start = self.offset;
        while let Some(c) = self.peek_char() {
            if c == '\n' {
                break;
            }
            self.advance();
        }
        TokenKind::Comment(self.source[start..self.offset].to_string())
    }

    /// Scans a string quoted with `quote`; a backslash escapes the next character.
    fn scan_string(&mut self, quote: char) -> TokenKind {
        self.advance();
        let mut text = String::new();
        loop {
            match self.peek_char() {
                Some(c) if c == quote => {
                    self.advance();
                    return TokenKind::Str(text);
                }
                Some('\\') => {
                    self.advance();
                    match self.peek_char() {
                        Some('\n') | None => {
                            return TokenKind::Error("unterminated string literal".into());
                        }
                        Some(c) => {
                            self.advance();
                            text.push(c);
                        }
                    }
                }
                Some('\n') | None => {
                    return TokenKind::Error("unterminated string literal".into());
                }
                Some(c) => {
                    self.advance();
                    text.push(c);
                }
            }
        }
    }

    fn scan_variable(&mut self) -> TokenKind {
        self.advance(); // consume '?'
        match self.peek_char() {
            Some(c) if is_word_start(c) => TokenKind::Variable(self.scan_word()),
            _ => TokenKind::Error("expected variable name after '?'".into()),
        }
    }

    fn scan_number(&mut self) -> TokenKind {
        let start = self.offset;
        if self.peek_char() == Some('-') {
            self.advance();
        }
        while self.peek_char().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let text = &self.source[start..self.offset];
        match text.parse::<i64>() {
            Ok(n) => TokenKind::Int(n),
            Err(e) => TokenKind::Error(format!("invalid integer: {e}")),
        }
    }

    /// Scans a bare word. A `-` belongs to the word unless it starts `->`.
    fn scan_word(&mut self) -> String {
        let start = self.offset;
        while let Some(c) = self.peek_char() {
            let continues = c.is_alphanumeric()
                || c == '_'
                || (c == '-' && self.peek_char_n(1) != Some('>'));
            if !continues {
                break;
            }
            self.advance();
        }
        self.source[start..self.offset].to_string()
    }
}

fn is_word_start(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}
