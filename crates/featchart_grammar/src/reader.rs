//! Reader for feature structures, categories, and grammars.
//!
//! ```text
//! % start S
//! % lexical N V
//! S -> NP[num=?n] VP[num=?n]      # agreement
//! NP[num=sg] -> 'Kim' | 'Jody'
//!     | 'Lee'
//! VP[num=?n] -> V[num=?n, subcat=NP[case=acc]] NP
//! Gap ->
//! ```
//!
//! A production line holds a category, `->`, and zero or more alternatives
//! separated by `|`. A line that starts with `|` continues the previous
//! left-hand side. Reentrancy tags `(1)[...]` and references `->(1)` are
//! scoped to a single category.

use std::collections::{BTreeSet, HashMap};

use featchart_featstruct::{Atom, FeatStruct, FeatStructBuilder, NodeId, TYPE_FEATURE, Variable};
use featchart_foundation::{Error, ErrorContext, ErrorKind, Result};

use crate::category::Category;
use crate::grammar::Grammar;
use crate::lexer::Lexer;
use crate::production::{Production, Symbol};
use crate::span::Span;
use crate::token::{Token, TokenKind};

/// A parsed feature value, before it is attached to a node.
enum Value {
    Atom(Atom),
    Var(Variable),
    Node(NodeId),
}

/// Reentrancy tag bookkeeping for one category.
struct Tag {
    node: NodeId,
    defined: bool,
    first_use: Span,
}

/// Parser for the grammar notation.
pub struct Reader<'src> {
    /// The lexer providing tokens.
    lexer: Lexer<'src>,
    /// Current token (lookahead).
    current: Token,
    /// Span of the last token consumed.
    previous: Span,
    /// Source text (for error messages).
    source: &'src str,
    /// Depth of open brackets; line breaks are insignificant inside them.
    depth: usize,
}

impl<'src> Reader<'src> {
    /// Creates a new reader for the given source.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        let mut lexer = Lexer::new(source);
        let current = lexer.next_token();
        Self {
            lexer,
            current,
            previous: Span::default(),
            source,
            depth: 0,
        }
    }

    // =========================================================================
    // Grammars
    // =========================================================================

    /// Reads a whole grammar and validates it.
    ///
    /// The start category is taken from a `% start` directive, or else from
    /// the left-hand side of the first production.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed notation, or a grammar error if
    /// the productions do not form a valid grammar.
    pub fn read_grammar(&mut self) -> Result<Grammar> {
        let mut start: Option<Category> = None;
        let mut lexical: BTreeSet<String> = BTreeSet::new();
        let mut productions: Vec<Production> = Vec::new();
        let mut last_lhs: Option<Category> = None;

        loop {
            self.skip_blank_lines();
            match &self.current.kind {
                TokenKind::Eof => break,
                TokenKind::Percent => {
                    self.advance();
                    let directive = self.expect_ident()?;
                    match directive.as_str() {
                        "start" => {
                            if start.is_some() {
                                return Err(self.error("duplicate start directive"));
                            }
                            start = Some(self.read_category()?);
                        }
                        "lexical" => {
                            while let TokenKind::Ident(label) = &self.current.kind {
                                lexical.insert(label.clone());
                                self.advance();
                            }
                        }
                        other => {
                            return Err(self.error(&format!("unknown directive '{other}'")));
                        }
                    }
                }
                TokenKind::Pipe => {
                    let Some(lhs) = last_lhs.clone() else {
                        return Err(self.error("continuation line without a production"));
                    };
                    let line = self.current.span.line;
                    self.advance();
                    self.read_alternatives(&lhs, line, &mut productions)?;
                }
                _ => {
                    let line = self.current.span.line;
                    let lhs = self.read_category()?;
                    self.expect(&TokenKind::Arrow)?;
                    self.read_alternatives(&lhs, line, &mut productions)?;
                    last_lhs = Some(lhs);
                }
            }
            self.end_of_line()?;
        }

        let start = match start {
            Some(start) => start,
            None => productions
                .first()
                .and_then(|p| p.lhs().label())
                .map_or_else(Category::default, Category::new),
        };
        Grammar::with_lexical(start, productions, lexical)
    }

    /// Reads the productions of a single line.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed notation.
    pub fn read_productions(&mut self) -> Result<Vec<Production>> {
        self.skip_blank_lines();
        let line = self.current.span.line;
        let lhs = self.read_category()?;
        self.expect(&TokenKind::Arrow)?;
        let mut productions = Vec::new();
        self.read_alternatives(&lhs, line, &mut productions)?;
        self.skip_blank_lines();
        self.expect(&TokenKind::Eof)?;
        Ok(productions)
    }

    /// Reads `rhs ('|' rhs)*` up to the end of the line.
    fn read_alternatives(
        &mut self,
        lhs: &Category,
        line: u32,
        out: &mut Vec<Production>,
    ) -> Result<()> {
        loop {
            let mut rhs = Vec::new();
            loop {
                self.skip_trivia();
                match &self.current.kind {
                    TokenKind::Newline | TokenKind::Eof | TokenKind::Pipe => break,
                    TokenKind::Str(word) => {
                        rhs.push(Symbol::terminal(word));
                        self.advance();
                    }
                    _ => rhs.push(Symbol::Category(self.read_category()?)),
                }
            }
            out.push(Production::new(lhs.clone(), rhs).at_line(line));
            if self.current.kind == TokenKind::Pipe {
                self.advance();
            } else {
                return Ok(());
            }
        }
    }

    // =========================================================================
    // Categories and feature structures
    // =========================================================================

    /// Reads one category: a label with optional features (`NP[num=sg]`),
    /// or a bare bracketed structure.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed notation.
    pub fn read_category(&mut self) -> Result<Category> {
        self.skip_trivia();
        match &self.current.kind {
            TokenKind::Ident(_) | TokenKind::LBracket | TokenKind::LParen => {
                Ok(Category::from_featstruct(self.read_featstruct()?))
            }
            _ => Err(self.unexpected("a category")),
        }
    }

    /// Reads one feature structure; reentrancy tags are local to it.
    ///
    /// # Errors
    ///
    /// Returns a parse error for malformed notation.
    pub fn read_featstruct(&mut self) -> Result<FeatStruct> {
        self.skip_trivia();
        let mut builder = FeatStruct::builder();
        let mut tags: HashMap<String, Tag> = HashMap::new();
        let root = match self.read_value(&mut builder, &mut tags)? {
            Value::Node(root) => root,
            Value::Atom(_) | Value::Var(_) => {
                return Err(self.error("expected a feature structure"));
            }
        };
        let mut undefined: Vec<&Tag> = tags.values().filter(|t| !t.defined).collect();
        undefined.sort_by_key(|t| t.first_use.start);
        if let Some(tag) = undefined.first() {
            return Err(self.error_at(tag.first_use, "reference to undefined tag"));
        }
        Ok(builder.build(root))
    }

    fn read_value(
        &mut self,
        builder: &mut FeatStructBuilder,
        tags: &mut HashMap<String, Tag>,
    ) -> Result<Value> {
        let span = self.current.span;
        match self.current.kind.clone() {
            TokenKind::LParen => {
                let name = self.read_tag()?;
                let node = match tags.get_mut(&name) {
                    Some(tag) if tag.defined => {
                        return Err(self.error_at(span, &format!("duplicate tag ({name})")));
                    }
                    Some(tag) => {
                        tag.defined = true;
                        tag.node
                    }
                    None => {
                        let node = builder.node();
                        tags.insert(
                            name,
                            Tag {
                                node,
                                defined: true,
                                first_use: span,
                            },
                        );
                        node
                    }
                };
                match &self.current.kind {
                    TokenKind::Ident(label) => {
                        builder.set_atom(node, TYPE_FEATURE, label.as_str());
                        self.advance();
                        if self.current.kind == TokenKind::LBracket {
                            self.read_body(node, builder, tags)?;
                        }
                    }
                    TokenKind::LBracket => self.read_body(node, builder, tags)?,
                    _ => return Err(self.unexpected("a feature structure after a tag")),
                }
                Ok(Value::Node(node))
            }
            TokenKind::LBracket => {
                let node = builder.node();
                self.read_body(node, builder, tags)?;
                Ok(Value::Node(node))
            }
            TokenKind::Ident(word) => {
                self.advance();
                if self.current.kind == TokenKind::LBracket || self.depth == 0 {
                    let node = builder.node();
                    builder.set_atom(node, TYPE_FEATURE, word.as_str());
                    if self.current.kind == TokenKind::LBracket {
                        self.read_body(node, builder, tags)?;
                    }
                    Ok(Value::Node(node))
                } else {
                    Ok(Value::Atom(Atom::from(word)))
                }
            }
            TokenKind::Variable(name) => {
                self.advance();
                let var = Variable::new(name);
                if self.current.kind == TokenKind::LBracket {
                    let node = builder.node();
                    builder.set_var(node, TYPE_FEATURE, var);
                    self.read_body(node, builder, tags)?;
                    Ok(Value::Node(node))
                } else {
                    Ok(Value::Var(var))
                }
            }
            TokenKind::Str(s) => {
                self.advance();
                Ok(Value::Atom(Atom::from(s)))
            }
            TokenKind::Int(n) => {
                self.advance();
                Ok(Value::Atom(Atom::Int(n)))
            }
            TokenKind::Plus => {
                self.advance();
                Ok(Value::Atom(Atom::Bool(true)))
            }
            TokenKind::Minus => {
                self.advance();
                Ok(Value::Atom(Atom::Bool(false)))
            }
            TokenKind::Arrow => {
                self.advance();
                Ok(Value::Node(self.read_reference(builder, tags)?))
            }
            _ => Err(self.unexpected("a feature value")),
        }
    }

    /// Reads `[feature, ...]` into `node`.
    fn read_body(
        &mut self,
        node: NodeId,
        builder: &mut FeatStructBuilder,
        tags: &mut HashMap<String, Tag>,
    ) -> Result<()> {
        let open = self.current.span;
        self.expect(&TokenKind::LBracket)?;
        self.depth += 1;
        self.skip_layout();
        if self.current.kind == TokenKind::RBracket {
            self.depth -= 1;
            self.advance();
            return Ok(());
        }
        loop {
            self.read_feature(node, builder, tags)?;
            self.skip_layout();
            match self.current.kind {
                TokenKind::Comma => {
                    self.advance();
                    self.skip_layout();
                }
                TokenKind::RBracket => {
                    self.depth -= 1;
                    self.advance();
                    return Ok(());
                }
                TokenKind::Eof => return Err(self.error_at(open, "unterminated feature structure")),
                _ => return Err(self.unexpected("',' or ']'")),
            }
        }
    }

    /// Reads one `name=value`, `name->(tag)`, `+name`, or `-name` entry.
    fn read_feature(
        &mut self,
        node: NodeId,
        builder: &mut FeatStructBuilder,
        tags: &mut HashMap<String, Tag>,
    ) -> Result<()> {
        let span = self.current.span;
        let (name, value) = match self.current.kind.clone() {
            TokenKind::Plus | TokenKind::Minus => {
                let positive = self.current.kind == TokenKind::Plus;
                self.advance();
                (self.expect_ident()?, Value::Atom(Atom::Bool(positive)))
            }
            TokenKind::Ident(name) => {
                self.advance();
                match self.current.kind {
                    TokenKind::Equals => {
                        self.advance();
                        (name, self.read_value(builder, tags)?)
                    }
                    TokenKind::Arrow => {
                        self.advance();
                        (name, Value::Node(self.read_reference(builder, tags)?))
                    }
                    _ => return Err(self.unexpected("'=' or '->'")),
                }
            }
            _ => return Err(self.unexpected("a feature name")),
        };
        if builder.has(node, &name) {
            let entry = span.to(self.previous).text(self.source);
            return Err(self.error_at(span, &format!("duplicate feature '{entry}'")));
        }
        match value {
            Value::Atom(a) => builder.set_atom(node, name, a),
            Value::Var(v) => builder.set_var(node, name, v),
            Value::Node(target) => builder.set_node(node, name, target),
        }
        Ok(())
    }

    /// Reads `(tag)` after `->` and returns the tagged node.
    fn read_reference(
        &mut self,
        builder: &mut FeatStructBuilder,
        tags: &mut HashMap<String, Tag>,
    ) -> Result<NodeId> {
        let span = self.current.span;
        let name = self.read_tag()?;
        let tag = tags.entry(name).or_insert_with(|| Tag {
            node: builder.node(),
            defined: false,
            first_use: span,
        });
        Ok(tag.node)
    }

    /// Reads `(name)` and returns the tag name.
    fn read_tag(&mut self) -> Result<String> {
        self.expect(&TokenKind::LParen)?;
        let name = match &self.current.kind {
            TokenKind::Int(n) => n.to_string(),
            TokenKind::Ident(s) => s.clone(),
            _ => return Err(self.unexpected("a tag name")),
        };
        self.advance();
        self.expect(&TokenKind::RParen)?;
        Ok(name)
    }

    // =========================================================================
    // Token helpers
    // =========================================================================

    fn advance(&mut self) {
        self.previous = self.current.span;
        self.current = self.lexer.next_token();
    }

    /// Skips comment tokens.
    fn skip_trivia(&mut self) {
        while self.current.kind.is_trivia() {
            self.advance();
        }
    }

    /// Skips comments and line breaks (inside brackets).
    fn skip_layout(&mut self) {
        while self.current.kind.is_trivia() || self.current.kind == TokenKind::Newline {
            self.advance();
        }
    }

    fn skip_blank_lines(&mut self) {
        self.skip_layout();
    }

    fn end_of_line(&mut self) -> Result<()> {
        self.skip_trivia();
        match self.current.kind {
            TokenKind::Newline => {
                self.advance();
                Ok(())
            }
            TokenKind::Eof => Ok(()),
            _ => Err(self.unexpected("end of line")),
        }
    }

    fn expect(&mut self, expected: &TokenKind) -> Result<()> {
        self.skip_trivia();
        let matches =
            std::mem::discriminant(&self.current.kind) == std::mem::discriminant(expected);
        if matches {
            self.advance();
            Ok(())
        } else {
            Err(self.unexpected(expected.name()))
        }
    }

    fn expect_ident(&mut self) -> Result<String> {
        self.skip_trivia();
        if let TokenKind::Ident(name) = &self.current.kind {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            Err(self.unexpected("an identifier"))
        }
    }

    fn unexpected(&self, expected: &str) -> Error {
        match &self.current.kind {
            TokenKind::Error(message) => self.error(message),
            found => self.error(&format!("expected {expected}, found {}", found.name())),
        }
    }

    /// Creates a parse error at the current position.
    fn error(&self, message: &str) -> Error {
        self.error_at(self.current.span, message)
    }

    fn error_at(&self, span: Span, message: &str) -> Error {
        Error::parse(message, span.line, span.column, self.context_at(span))
    }

    /// Returns the source line containing `span`.
    fn context_at(&self, span: Span) -> String {
        let line_start = self.source[..span.start].rfind('\n').map_or(0, |i| i + 1);
        let line_end = self.source[span.start..]
            .find('\n')
            .map_or(self.source.len(), |i| span.start + i);
        Span::new(line_start, line_end, span.line, 1)
            .text(self.source)
            .to_string()
    }
}

/// Parses a grammar.
///
/// # Errors
///
/// Returns a parse error for malformed notation or a grammar error for an
/// invalid grammar.
pub fn parse_grammar(source: &str) -> Result<Grammar> {
    Reader::new(source).read_grammar()
}

/// Parses a grammar read from the file or fixture called `name`.
///
/// Errors carry an [`ErrorContext`] naming `name` and, where known, the
/// offending line.
///
/// # Errors
///
/// As [`parse_grammar`].
pub fn parse_grammar_named(name: &str, source: &str) -> Result<Grammar> {
    parse_grammar(source).map_err(|error| {
        let context = ErrorContext::new().with_source(name);
        let context = match &error.kind {
            ErrorKind::ParseError { line, column, .. } => {
                context.with_position(*line as usize, *column as usize)
            }
            ErrorKind::UndefinedCategory {
                production, line, ..
            }
            | ErrorKind::UnlabeledCategory { production, line }
            | ErrorKind::UnscopedVariable {
                production, line, ..
            } if *line > 0 => context
                .with_position(*line as usize, 1)
                .with_frame(format!("production {production}")),
            _ => context,
        };
        error.with_context(context)
    })
}

/// Parses the productions written on one line (`A -> B C | 'w'`).
///
/// # Errors
///
/// Returns a parse error for malformed notation.
pub fn parse_productions(source: &str) -> Result<Vec<Production>> {
    Reader::new(source).read_productions()
}

/// Parses a single category such as `NP[num=sg]`.
///
/// # Errors
///
/// Returns a parse error for malformed notation.
pub fn parse_category(source: &str) -> Result<Category> {
    let mut reader = Reader::new(source);
    let category = reader.read_category()?;
    reader.skip_layout();
    reader.expect(&TokenKind::Eof)?;
    Ok(category)
}

/// Parses a single feature structure such as `[agr=(1)[num=sg], subj->(1)]`.
///
/// # Errors
///
/// Returns a parse error for malformed notation.
pub fn parse_featstruct(source: &str) -> Result<FeatStruct> {
    let mut reader = Reader::new(source);
    let fs = reader.read_featstruct()?;
    reader.skip_layout();
    reader.expect(&TokenKind::Eof)?;
    Ok(fs)
}
