//! Errors raised while reading grammars or running a bounded parse.
//!
//! A failed unification is not an error: the chart rules treat it as an
//! ordinary outcome (see `featchart_featstruct::UnifyFailure`). Neither is a
//! sentence without parses, which yields an empty result.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

/// A grammar, notation, or budget error.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct Error {
    /// What went wrong.
    pub kind: ErrorKind,
    /// Where it went wrong, when the caller knows.
    pub context: Option<ErrorContext>,
}

impl Error {
    /// An error of `kind` without context.
    #[must_use]
    pub fn new(kind: ErrorKind) -> Self {
        Self {
            kind,
            context: None,
        }
    }

    /// Attaches `context`, replacing any earlier one.
    #[must_use]
    pub fn with_context(mut self, context: ErrorContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Creates a notation parse error.
    #[must_use]
    pub fn parse(message: impl Into<String>, line: u32, column: u32, context: String) -> Self {
        Self::new(ErrorKind::ParseError {
            message: message.into(),
            line,
            column,
            context,
        })
    }

    /// Creates an undefined category error for a production.
    #[must_use]
    pub fn undefined_category(category: impl Into<String>, production: usize, line: u32) -> Self {
        Self::new(ErrorKind::UndefinedCategory {
            category: category.into(),
            production,
            line,
        })
    }

    /// Creates an unscoped variable error for a production.
    #[must_use]
    pub fn unscoped_variable(variable: impl Into<String>, production: usize, line: u32) -> Self {
        Self::new(ErrorKind::UnscopedVariable {
            variable: variable.into(),
            production,
            line,
        })
    }

    /// Creates a limit exceeded error.
    #[must_use]
    pub fn limit_exceeded(limit: ParseLimit) -> Self {
        Self::new(ErrorKind::LimitExceeded(limit))
    }

    /// Returns true if this error reports a malformed grammar.
    #[must_use]
    pub fn is_grammar_error(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::UndefinedCategory { .. }
                | ErrorKind::UndefinedStart(_)
                | ErrorKind::UnlabeledCategory { .. }
                | ErrorKind::UnscopedVariable { .. }
                | ErrorKind::EmptyGrammar
        )
    }
}

/// The kinds of [`Error`].
#[derive(Debug, Error)]
pub enum ErrorKind {
    /// Syntax error in grammar or feature structure notation.
    #[error("parse error at {line}:{column}: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
        /// Line number (1-indexed).
        line: u32,
        /// Column number (1-indexed).
        column: u32,
        /// The source line where the error occurred.
        context: String,
    },

    /// A right-hand side refers to a category no production defines.
    #[error("undefined category {category} in production {production} (line {line})")]
    UndefinedCategory {
        /// Label of the undefined category.
        category: String,
        /// Index of the offending production.
        production: usize,
        /// Source line of the production (0 if built programmatically).
        line: u32,
    },

    /// The start category is not the left-hand side of any production.
    #[error("start category {0} is not defined by any production")]
    UndefinedStart(String),

    /// A grammar symbol has no category label.
    #[error("category without a label in production {production} (line {line})")]
    UnlabeledCategory {
        /// Index of the offending production.
        production: usize,
        /// Source line of the production (0 if built programmatically).
        line: u32,
    },

    /// A production mentions a variable from outside its own scope.
    #[error("variable {variable} in production {production} (line {line}) belongs to another scope")]
    UnscopedVariable {
        /// The variable, as written.
        variable: String,
        /// Index of the offending production.
        production: usize,
        /// Source line of the production (0 if built programmatically).
        line: u32,
    },

    /// The grammar has no productions.
    #[error("grammar has no productions")]
    EmptyGrammar,

    /// A parse budget was exhausted before the chart reached its fixpoint.
    #[error("limit exceeded: {0}")]
    LimitExceeded(ParseLimit),

    /// A broken invariant inside featchart.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Parse budgets that can be exceeded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseLimit {
    /// Maximum number of chart edges exceeded.
    MaxEdges {
        /// The configured limit.
        limit: usize,
    },
    /// Wall-clock budget exhausted.
    TimeBudget {
        /// The configured budget.
        limit: Duration,
    },
}

impl fmt::Display for ParseLimit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MaxEdges { limit } => write!(f, "max edges ({limit}) exceeded"),
            Self::TimeBudget { limit } => write!(f, "time budget ({limit:?}) exhausted"),
        }
    }
}

/// Where an error arose: a named source, a position, and enclosing items.
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Name of the grammar source.
    pub source: Option<String>,
    /// 1-based line.
    pub line: Option<usize>,
    /// 1-based column.
    pub column: Option<usize>,
    /// Enclosing constructs, innermost last.
    pub stack: Vec<String>,
}

impl ErrorContext {
    /// An empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Names the source.
    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Records a position in the source.
    #[must_use]
    pub fn with_position(mut self, line: usize, column: usize) -> Self {
        self.line = Some(line);
        self.column = Some(column);
        self
    }

    /// Pushes an enclosing item such as `production 3`.
    #[must_use]
    pub fn with_frame(mut self, frame: impl Into<String>) -> Self {
        self.stack.push(frame.into());
        self
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "at {source}")?;
            if let (Some(line), Some(col)) = (self.line, self.column) {
                write!(f, ":{line}:{col}")?;
            }
        }
        if !self.stack.is_empty() {
            writeln!(f)?;
            for frame in &self.stack {
                writeln!(f, "  in {frame}")?;
            }
        }
        Ok(())
    }
}
