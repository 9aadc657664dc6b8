//! Validated feature grammars.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use featchart_featstruct::{Bindings, Variable};
use featchart_foundation::{Error, ErrorKind, Result};

use crate::category::Category;
use crate::production::{Production, Symbol};

/// Index of a production within its grammar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProductionId(usize);

impl ProductionId {
    /// Wraps a position in the grammar's production list.
    #[must_use]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

/// A start category plus a set of productions, validated once and read-only
/// afterwards.
///
/// A grammar is `Send + Sync`; share it between parsers with an `Arc`.
#[derive(Clone, Debug)]
pub struct Grammar {
    start: Category,
    productions: Vec<Production>,
    lexical: BTreeSet<Arc<str>>,
    by_lhs: HashMap<Arc<str>, Vec<ProductionId>>,
    by_left_label: HashMap<Arc<str>, Vec<ProductionId>>,
    by_left_word: HashMap<Arc<str>, Vec<ProductionId>>,
    empty: Vec<ProductionId>,
}

impl Grammar {
    /// Builds and validates a grammar.
    ///
    /// # Errors
    ///
    /// Returns a grammar error (see [`Error::is_grammar_error`]) naming the
    /// offending production if the grammar is malformed.
    pub fn new(start: Category, productions: Vec<Production>) -> Result<Self> {
        Self::with_lexical(start, productions, std::iter::empty::<&str>())
    }

    /// Builds and validates a grammar whose right-hand sides may also refer
    /// to the given tagger-supplied (lexical) categories.
    ///
    /// # Errors
    ///
    /// Returns a grammar error naming the offending production if the grammar
    /// is malformed.
    pub fn with_lexical<S: AsRef<str>>(
        start: Category,
        productions: Vec<Production>,
        lexical: impl IntoIterator<Item = S>,
    ) -> Result<Self> {
        let lexical: BTreeSet<Arc<str>> = lexical.into_iter().map(|s| s.as_ref().into()).collect();
        let mut grammar = Self {
            start,
            productions,
            lexical,
            by_lhs: HashMap::new(),
            by_left_label: HashMap::new(),
            by_left_word: HashMap::new(),
            empty: Vec::new(),
        };
        grammar.validate()?;
        grammar.index();
        Ok(grammar)
    }

    fn validate(&self) -> Result<()> {
        if self.productions.is_empty() {
            return Err(Error::new(ErrorKind::EmptyGrammar));
        }

        let mut defined: BTreeSet<&str> = BTreeSet::new();
        for (i, p) in self.productions.iter().enumerate() {
            let label = p.lhs().label().ok_or_else(|| unlabeled(i, p))?;
            defined.insert(label);
        }

        match self.start.label() {
            Some(label) if defined.contains(label) => {}
            Some(label) => return Err(Error::new(ErrorKind::UndefinedStart(label.to_string()))),
            None => return Err(Error::new(ErrorKind::UndefinedStart(self.start.to_string()))),
        }

        for (i, p) in self.productions.iter().enumerate() {
            let rhs = p.rhs().iter().filter_map(Symbol::as_category);
            for category in rhs.clone() {
                let label = category.label().ok_or_else(|| unlabeled(i, p))?;
                if !defined.contains(label) && !self.lexical.contains(label) {
                    return Err(Error::undefined_category(label, i, p.line()));
                }
            }
            // A left-hand side variable absent from the right is a fresh,
            // unconstrained value. Only the production's own scope is allowed.
            let foreign = std::iter::once(p.lhs())
                .chain(rhs)
                .flat_map(Category::variables)
                .find(|v| !v.is_local());
            if let Some(var) = foreign {
                return Err(Error::unscoped_variable(var.to_string(), i, p.line()));
            }
        }
        Ok(())
    }

    fn index(&mut self) {
        for (i, p) in self.productions.iter().enumerate() {
            let id = ProductionId(i);
            if let Some(label) = p.lhs().label() {
                self.by_lhs.entry(label.into()).or_default().push(id);
            }
            match p.rhs().first() {
                None => self.empty.push(id),
                Some(Symbol::Terminal(word)) => {
                    self.by_left_word.entry(word.clone()).or_default().push(id);
                }
                Some(Symbol::Category(c)) => {
                    if let Some(label) = c.label() {
                        self.by_left_label.entry(label.into()).or_default().push(id);
                    }
                }
            }
        }
    }

    /// Returns the start category.
    #[must_use]
    pub const fn start(&self) -> &Category {
        &self.start
    }

    /// Returns all productions in source order.
    #[must_use]
    pub fn productions(&self) -> &[Production] {
        &self.productions
    }

    /// Returns one production.
    #[must_use]
    pub fn production(&self, id: ProductionId) -> &Production {
        &self.productions[id.0]
    }

    /// Returns the ids of all productions in source order.
    pub fn ids(&self) -> impl Iterator<Item = ProductionId> + '_ {
        (0..self.productions.len()).map(ProductionId)
    }

    /// Returns the productions whose left-hand side carries `label`.
    #[must_use]
    pub fn expansions(&self, label: &str) -> &[ProductionId] {
        self.by_lhs.get(label).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the productions whose first right-hand symbol is a category
    /// labelled `label`.
    #[must_use]
    pub fn left_corner_label(&self, label: &str) -> &[ProductionId] {
        self.by_left_label.get(label).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the productions whose first right-hand symbol is `word`.
    #[must_use]
    pub fn left_corner_word(&self, word: &str) -> &[ProductionId] {
        self.by_left_word.get(word).map(Vec::as_slice).unwrap_or_default()
    }

    /// Returns the empty productions.
    #[must_use]
    pub fn empty_productions(&self) -> &[ProductionId] {
        &self.empty
    }

    /// Returns the declared tagger-supplied categories.
    pub fn lexical(&self) -> impl Iterator<Item = &str> {
        self.lexical.iter().map(AsRef::as_ref)
    }

    /// Returns true if `label` is defined by some production.
    #[must_use]
    pub fn defines(&self, label: &str) -> bool {
        self.by_lhs.contains_key(label)
    }

    /// Returns true if some production licenses the local tree `parent`
    /// over `children`.
    ///
    /// Each category is treated as an independent variable namespace: they
    /// are renamed apart before being unified with a fresh instance of the
    /// production.
    #[must_use]
    pub fn licenses(&self, parent: &Category, children: &[Symbol]) -> bool {
        let Some(label) = parent.label() else {
            return false;
        };
        let base = 1 + children
            .iter()
            .filter_map(Symbol::as_category)
            .map(Category::max_scope)
            .chain(std::iter::once(parent.max_scope()))
            .max()
            .unwrap_or(0);
        let shift = |group: u32| move |v: &Variable| v.with_scope(v.scope() + base * group);

        let parent = parent.rename_variables(&shift(1));
        let children: Vec<Symbol> = children
            .iter()
            .zip(2u32..)
            .map(|(s, group)| s.rename_variables(&shift(group)))
            .collect();
        let fresh = base * (2 + u32::try_from(children.len()).unwrap_or(u32::MAX - 2));

        self.expansions(label).iter().any(|&id| {
            let production = self.production(id).instantiate(fresh);
            production.len() == children.len()
                && replays(&production, &parent, &children).is_some()
        })
    }
}

/// Unifies a production with a local tree, threading bindings left to right.
fn replays(production: &Production, parent: &Category, children: &[Symbol]) -> Option<Bindings> {
    let (_, mut bindings) = production.lhs().unify(parent, &Bindings::new()).ok()?;
    for (expected, actual) in production.rhs().iter().zip(children) {
        match (expected, actual) {
            (Symbol::Terminal(a), Symbol::Terminal(b)) if a == b => {}
            (Symbol::Category(a), Symbol::Category(b)) => {
                bindings = a.unify(b, &bindings).ok()?.1;
            }
            _ => return None,
        }
    }
    Some(bindings)
}

fn unlabeled(production: usize, p: &Production) -> Error {
    Error::new(ErrorKind::UnlabeledCategory {
        production,
        line: p.line(),
    })
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "% start {}", self.start)?;
        if !self.lexical.is_empty() {
            write!(f, "% lexical")?;
            for label in &self.lexical {
                write!(f, " {label}")?;
            }
            writeln!(f)?;
        }
        for p in &self.productions {
            writeln!(f, "{p}")?;
        }
        Ok(())
    }
}
