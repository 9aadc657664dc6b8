//! Chart edges.
//!
//! An edge records a hypothesis about a span of the input. Leaf edges stand
//! for single tokens; tree edges are dotted productions whose categories have
//! been specialized by everything matched so far.
//!
//! Edges are immutable values compared structurally, so the chart can
//! deduplicate them by hashing. Two normalizations keep equivalent edges
//! equal:
//!
//! - a complete edge has its bindings applied and then cleared;
//! - variables from other productions (scope above 0) are renumbered by first
//!   occurrence, and bindings no category can reach are dropped.

use std::collections::HashMap;
use std::fmt;

use featchart_featstruct::{Bindings, FeatStruct, Variable};
use featchart_grammar::{Category, Production, ProductionId, Symbol};

use crate::token::Token;

/// Index of an edge in its chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EdgeId(pub(crate) usize);

impl EdgeId {
    /// Returns the position of the edge in the chart.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

// =============================================================================
// Edge
// =============================================================================

/// A chart edge.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Edge {
    /// Token `index` of the input, spanning `[index, index + 1)`.
    Leaf {
        /// Position of the token.
        index: usize,
        /// The token.
        token: Token,
    },
    /// A dotted production.
    Tree(TreeEdge),
}

impl Edge {
    /// Creates the leaf edge for token `index`.
    #[must_use]
    pub fn leaf(index: usize, token: Token) -> Self {
        Self::Leaf { index, token }
    }

    /// Returns the start of the span.
    #[must_use]
    pub fn start(&self) -> usize {
        match self {
            Self::Leaf { index, .. } => *index,
            Self::Tree(tree) => tree.start,
        }
    }

    /// Returns the end of the span.
    #[must_use]
    pub fn end(&self) -> usize {
        match self {
            Self::Leaf { index, .. } => index + 1,
            Self::Tree(tree) => tree.end,
        }
    }

    /// Returns `(start, end)`.
    #[must_use]
    pub fn span(&self) -> (usize, usize) {
        (self.start(), self.end())
    }

    /// Returns true for leaf edges.
    #[must_use]
    pub const fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf { .. })
    }

    /// Returns true if nothing remains to be matched. Leaves are complete.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        match self {
            Self::Leaf { .. } => true,
            Self::Tree(tree) => tree.is_complete(),
        }
    }

    /// Returns the tree edge, if this is one.
    #[must_use]
    pub const fn as_tree(&self) -> Option<&TreeEdge> {
        match self {
            Self::Tree(tree) => Some(tree),
            Self::Leaf { .. } => None,
        }
    }

    /// Returns the token, if this is a leaf edge.
    #[must_use]
    pub const fn token(&self) -> Option<&Token> {
        match self {
            Self::Leaf { token, .. } => Some(token),
            Self::Tree(_) => None,
        }
    }

    /// Returns the category a complete edge offers to the edges it extends:
    /// the left-hand side of a tree edge, or the tag of a leaf.
    #[must_use]
    pub fn category(&self) -> Option<&Category> {
        match self {
            Self::Leaf { token, .. } => token.category(),
            Self::Tree(tree) if tree.is_complete() => Some(&tree.lhs),
            Self::Tree(_) => None,
        }
    }

    /// Returns the symbol after the dot of an incomplete tree edge.
    #[must_use]
    pub fn next_symbol(&self) -> Option<&Symbol> {
        self.as_tree().and_then(TreeEdge::next_symbol)
    }
}

impl From<TreeEdge> for Edge {
    fn from(tree: TreeEdge) -> Self {
        Self::Tree(tree)
    }
}

impl fmt::Display for Edge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf { token, .. } => write!(f, "{}", Symbol::terminal(token.surface())),
            Self::Tree(tree) => write!(f, "{tree}"),
        }
    }
}

// =============================================================================
// Tree Edge
// =============================================================================

/// A dotted production over a span, with the bindings made so far.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct TreeEdge {
    start: usize,
    end: usize,
    production: ProductionId,
    dot: usize,
    lhs: Category,
    rhs: Vec<Symbol>,
    bindings: Bindings,
}

impl TreeEdge {
    /// Creates the zero-width edge `[lhs -> * rhs, (at, at)]`.
    #[must_use]
    pub fn predicted(id: ProductionId, production: &Production, at: usize) -> Self {
        Self {
            start: at,
            end: at,
            production: id,
            dot: 0,
            lhs: production.lhs().clone(),
            rhs: production.rhs().to_vec(),
            bindings: Bindings::new(),
        }
        .normalized()
    }

    /// Returns the edge with the dot moved over `matched`, which replaces the
    /// symbol after the dot, now ending at `end` under `bindings`.
    #[must_use]
    pub fn advance(&self, matched: Symbol, end: usize, bindings: Bindings) -> Self {
        let mut rhs = self.rhs.clone();
        rhs[self.dot] = matched;
        Self {
            start: self.start,
            end,
            production: self.production,
            dot: self.dot + 1,
            lhs: self.lhs.clone(),
            rhs,
            bindings,
        }
        .normalized()
    }

    /// Returns the start of the span.
    #[must_use]
    pub const fn start(&self) -> usize {
        self.start
    }

    /// Returns the end of the span.
    #[must_use]
    pub const fn end(&self) -> usize {
        self.end
    }

    /// Returns the production this edge was predicted from.
    #[must_use]
    pub const fn production(&self) -> ProductionId {
        self.production
    }

    /// Returns the number of right-hand side symbols matched.
    #[must_use]
    pub const fn dot(&self) -> usize {
        self.dot
    }

    /// Returns the left-hand side.
    #[must_use]
    pub const fn lhs(&self) -> &Category {
        &self.lhs
    }

    /// Returns the right-hand side; matched symbols carry what they matched.
    #[must_use]
    pub fn rhs(&self) -> &[Symbol] {
        &self.rhs
    }

    /// Returns the bindings of an incomplete edge (empty once complete).
    #[must_use]
    pub const fn bindings(&self) -> &Bindings {
        &self.bindings
    }

    /// Returns true if the dot is at the end.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.dot == self.rhs.len()
    }

    /// Returns the symbol after the dot.
    #[must_use]
    pub fn next_symbol(&self) -> Option<&Symbol> {
        self.rhs.get(self.dot)
    }

    /// Returns the largest variable scope mentioned anywhere in the edge.
    #[must_use]
    pub fn max_scope(&self) -> u32 {
        self.rhs
            .iter()
            .filter_map(Symbol::as_category)
            .map(Category::max_scope)
            .chain([self.lhs.max_scope(), self.bindings.max_scope()])
            .max()
            .unwrap_or(0)
    }

    /// Returns true if `other` covers the same span with the same production
    /// and dot, and every instance of it is an instance of this edge.
    #[must_use]
    pub fn subsumes(&self, other: &Self) -> bool {
        self.start == other.start
            && self.end == other.end
            && self.production == other.production
            && self.dot == other.dot
            && {
                let offset = other.max_scope() + 1;
                self.as_featstruct()
                    .rename_variables(&|v: &Variable| v.with_scope(v.scope() + offset))
                    .subsumes(&other.as_featstruct())
            }
    }

    /// Packs the binding-applied categories into one structure (`0` for the
    /// left-hand side, `1..` for the right-hand side) so variables shared
    /// between them stay shared.
    fn as_featstruct(&self) -> FeatStruct {
        let lhs = self.lhs.substitute(&self.bindings);
        let mut fs = FeatStruct::new().with("0", lhs.into_featstruct());
        for (i, symbol) in self.rhs.iter().enumerate() {
            let name = (i + 1).to_string();
            fs = match symbol {
                Symbol::Category(c) => {
                    fs.with(name, c.substitute(&self.bindings).into_featstruct())
                }
                Symbol::Terminal(w) => fs.with(name, &**w),
            };
        }
        fs
    }

    fn normalized(mut self) -> Self {
        if self.is_complete() && !self.bindings.is_empty() {
            let bindings = std::mem::take(&mut self.bindings);
            self.lhs = self.lhs.substitute(&bindings);
            self.rhs = self
                .rhs
                .iter()
                .map(|symbol| match symbol {
                    Symbol::Category(c) => Symbol::Category(c.substitute(&bindings)),
                    Symbol::Terminal(_) => symbol.clone(),
                })
                .collect();
        }

        let mut order = self.lhs.variables();
        for category in self.rhs.iter().filter_map(Symbol::as_category) {
            for var in category.variables() {
                if !order.contains(&var) {
                    order.push(var);
                }
            }
        }
        let mut i = 0;
        while i < order.len() {
            let var = order[i].clone();
            if let Some(value) = self.bindings.get(&var) {
                value.collect_variables(&mut order);
            }
            i += 1;
        }
        if !self.bindings.is_empty() {
            self.bindings = self.bindings.retain(|v| order.contains(v));
        }

        let renames: HashMap<Variable, Variable> = order
            .iter()
            .filter(|v| !v.is_local())
            .enumerate()
            .map(|(k, v)| {
                let scope = u32::try_from(k + 1).unwrap_or(u32::MAX);
                (v.clone(), v.with_scope(scope))
            })
            .filter(|(from, to)| from != to)
            .collect();
        if renames.is_empty() {
            return self;
        }
        let rename = |v: &Variable| renames.get(v).cloned().unwrap_or_else(|| v.clone());
        Self {
            lhs: self.lhs.rename_variables(&rename),
            rhs: self.rhs.iter().map(|s| s.rename_variables(&rename)).collect(),
            bindings: self.bindings.rename_variables(&rename),
            ..self
        }
    }
}

impl fmt::Display for TreeEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ->", self.lhs)?;
        for (i, symbol) in self.rhs.iter().enumerate() {
            if i == self.dot {
                write!(f, " *")?;
            }
            write!(f, " {symbol}")?;
        }
        if self.is_complete() {
            write!(f, " *")?;
        }
        if !self.bindings.is_empty() {
            write!(f, " {}", self.bindings)?;
        }
        Ok(())
    }
}
