//! Productions and their right-hand side symbols.

use std::fmt;
use std::sync::Arc;

use featchart_featstruct::Variable;

use crate::category::Category;

/// One right-hand side symbol: a category or a terminal word.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Symbol {
    /// A nonterminal (or tagger-supplied) category.
    Category(Category),
    /// A literal word, matched against token surfaces.
    Terminal(Arc<str>),
}

impl Symbol {
    /// Creates a terminal symbol.
    #[must_use]
    pub fn terminal(word: &str) -> Self {
        Self::Terminal(word.into())
    }

    /// Returns true for terminal symbols.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Terminal(_))
    }

    /// Returns the category, if this is a nonterminal symbol.
    #[must_use]
    pub const fn as_category(&self) -> Option<&Category> {
        match self {
            Self::Category(c) => Some(c),
            Self::Terminal(_) => None,
        }
    }

    /// Returns the word, if this is a terminal symbol.
    #[must_use]
    pub fn as_terminal(&self) -> Option<&str> {
        match self {
            Self::Terminal(w) => Some(w),
            Self::Category(_) => None,
        }
    }

    /// Returns a copy with every variable renamed through `f`.
    #[must_use]
    pub fn rename_variables(&self, f: &impl Fn(&Variable) -> Variable) -> Self {
        match self {
            Self::Category(c) => Self::Category(c.rename_variables(f)),
            Self::Terminal(w) => Self::Terminal(w.clone()),
        }
    }
}

impl From<Category> for Symbol {
    fn from(c: Category) -> Self {
        Self::Category(c)
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(c) => write!(f, "{c}"),
            Self::Terminal(w) => write!(f, "'{}'", w.replace('\'', "\\'")),
        }
    }
}

/// A context-free production over categories.
///
/// Variables are local to the production: every variable written in it has
/// scope 0, and [`instantiate`](Self::instantiate) moves them all into a
/// fresh scope.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Production {
    lhs: Category,
    rhs: Vec<Symbol>,
    line: u32,
}

impl Production {
    /// Creates a production.
    #[must_use]
    pub fn new(lhs: Category, rhs: impl IntoIterator<Item = Symbol>) -> Self {
        Self {
            lhs,
            rhs: rhs.into_iter().collect(),
            line: 0,
        }
    }

    /// Records the source line the production was read from.
    #[must_use]
    pub const fn at_line(mut self, line: u32) -> Self {
        self.line = line;
        self
    }

    /// Returns the left-hand side.
    #[must_use]
    pub const fn lhs(&self) -> &Category {
        &self.lhs
    }

    /// Returns the right-hand side.
    #[must_use]
    pub fn rhs(&self) -> &[Symbol] {
        &self.rhs
    }

    /// Returns the number of right-hand side symbols.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rhs.len()
    }

    /// Returns true for empty productions (`E ->`).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rhs.is_empty()
    }

    /// Returns the source line (0 if built programmatically).
    #[must_use]
    pub const fn line(&self) -> u32 {
        self.line
    }

    /// Returns true if the right-hand side consists of terminals only.
    #[must_use]
    pub fn is_lexical(&self) -> bool {
        !self.rhs.is_empty() && self.rhs.iter().all(Symbol::is_terminal)
    }

    /// Returns the variables of the production in first-occurrence order.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        let mut out = self.lhs.variables();
        for category in self.rhs.iter().filter_map(Symbol::as_category) {
            for var in category.variables() {
                if !out.contains(&var) {
                    out.push(var);
                }
            }
        }
        out
    }

    /// Returns a copy whose production-local variables live in `scope`.
    #[must_use]
    pub fn instantiate(&self, scope: u32) -> Self {
        self.rename_variables(&|v: &Variable| {
            if v.is_local() {
                v.with_scope(scope)
            } else {
                v.clone()
            }
        })
    }

    /// Returns a copy with every variable renamed through `f`.
    #[must_use]
    pub fn rename_variables(&self, f: &impl Fn(&Variable) -> Variable) -> Self {
        Self {
            lhs: self.lhs.rename_variables(f),
            rhs: self.rhs.iter().map(|s| s.rename_variables(f)).collect(),
            line: self.line,
        }
    }
}

impl fmt::Display for Production {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs)?;
        for symbol in &self.rhs {
            write!(f, " {symbol}")?;
        }
        Ok(())
    }
}
