//! The chart: an append-only arena of deduplicated edges.
//!
//! Each edge keeps the list of ways it was derived, so the chart doubles as
//! a packed parse forest. The parser activates an edge when it takes it off
//! the agenda; only active edges appear in the combination indexes, which
//! makes every pair of edges meet exactly once.

use std::collections::HashMap;

use featchart_featstruct::Bindings;
use featchart_grammar::Category;

use crate::edge::{Edge, EdgeId};
use crate::token::Token;
use crate::tree::{Trees, extract};

/// One way an edge was derived: `previous` extended by the complete edge
/// `child`. `previous` is `None` when a left-corner rule predicted and
/// advanced in one step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Derivation {
    /// The edge whose dot was moved.
    pub previous: Option<EdgeId>,
    /// The complete edge that was matched.
    pub child: EdgeId,
}

/// Edges over one input, with derivations and lookup indexes.
#[derive(Clone, Debug)]
pub struct Chart {
    tokens: Vec<Token>,
    edges: Vec<Edge>,
    ids: HashMap<Edge, EdgeId>,
    derivations: Vec<Vec<Derivation>>,
    by_span: HashMap<(usize, usize), Vec<EdgeId>>,
    /// Active complete edges by start position.
    complete_from: Vec<Vec<EdgeId>>,
    /// Active incomplete edges by end position.
    incomplete_to: Vec<Vec<EdgeId>>,
}

impl Chart {
    /// Creates an empty chart over `tokens`.
    #[must_use]
    pub fn new(tokens: Vec<Token>) -> Self {
        let positions = tokens.len() + 1;
        Self {
            tokens,
            edges: Vec::new(),
            ids: HashMap::new(),
            derivations: Vec::new(),
            by_span: HashMap::new(),
            complete_from: vec![Vec::new(); positions],
            incomplete_to: vec![Vec::new(); positions],
        }
    }

    /// Returns the input tokens.
    #[must_use]
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Returns the number of input tokens.
    #[must_use]
    pub fn num_tokens(&self) -> usize {
        self.tokens.len()
    }

    /// Returns the number of edges.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    /// Returns true if the chart has no edges.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// Returns an edge by id.
    #[must_use]
    pub fn edge(&self, id: EdgeId) -> &Edge {
        &self.edges[id.0]
    }

    /// Returns the id of an edge equal to `edge`, if present.
    #[must_use]
    pub fn find(&self, edge: &Edge) -> Option<EdgeId> {
        self.ids.get(edge).copied()
    }

    /// Iterates over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (EdgeId, &Edge)> {
        self.edges.iter().enumerate().map(|(i, e)| (EdgeId(i), e))
    }

    /// Returns the recorded derivations of an edge.
    #[must_use]
    pub fn derivations(&self, id: EdgeId) -> &[Derivation] {
        &self.derivations[id.0]
    }

    /// Returns every edge over `[start, end)`.
    #[must_use]
    pub fn span(&self, start: usize, end: usize) -> &[EdgeId] {
        self.by_span
            .get(&(start, end))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Adds an edge, or records a new derivation for an equal edge already
    /// present. Returns the edge's id and whether it is new.
    pub fn insert(&mut self, edge: Edge, derivation: Option<Derivation>) -> (EdgeId, bool) {
        if let Some(&id) = self.ids.get(&edge) {
            if let Some(derivation) = derivation {
                let list = &mut self.derivations[id.0];
                if !list.contains(&derivation) {
                    list.push(derivation);
                }
            }
            return (id, false);
        }

        let id = EdgeId(self.edges.len());
        self.by_span.entry(edge.span()).or_default().push(id);
        self.ids.insert(edge.clone(), id);
        self.edges.push(edge);
        self.derivations.push(derivation.into_iter().collect());
        (id, true)
    }

    /// Makes an edge visible to the combination indexes.
    pub(crate) fn activate(&mut self, id: EdgeId) {
        let edge = &self.edges[id.0];
        if edge.is_complete() {
            self.complete_from[edge.start()].push(id);
        } else {
            self.incomplete_to[edge.end()].push(id);
        }
    }

    /// Returns the active complete edges starting at `position`.
    #[must_use]
    pub fn complete_from(&self, position: usize) -> &[EdgeId] {
        &self.complete_from[position]
    }

    /// Returns the active incomplete edges ending at `position`.
    #[must_use]
    pub fn incomplete_to(&self, position: usize) -> &[EdgeId] {
        &self.incomplete_to[position]
    }

    /// Returns the complete tree edges spanning the whole input whose
    /// left-hand side unifies with `start`.
    #[must_use]
    pub fn parse_edges(&self, start: &Category) -> Vec<EdgeId> {
        self.complete_edges(start, (0, self.num_tokens()))
    }

    /// Returns the complete tree edges over `span` whose left-hand side
    /// unifies with `category`.
    #[must_use]
    pub fn complete_edges(&self, category: &Category, span: (usize, usize)) -> Vec<EdgeId> {
        self.span(span.0, span.1)
            .iter()
            .copied()
            .filter(|&id| {
                self.edge(id).as_tree().is_some_and(|tree| {
                    tree.is_complete()
                        && tree.lhs().label() == category.label()
                        && category
                            .unify(&renamed_apart(tree.lhs(), category), &Bindings::new())
                            .is_ok()
                })
            })
            .collect()
    }

    /// Returns a lazy iterator over every parse tree rooted in a parse edge.
    #[must_use]
    pub fn trees(&self, start: &Category) -> Trees<'_> {
        extract(self, start, (0, self.num_tokens()))
    }
}

/// Renames `category` so its variables cannot collide with `other`'s.
pub(crate) fn renamed_apart(category: &Category, other: &Category) -> Category {
    let offset = other.max_scope() + 1;
    category.rename_variables(&|v| v.with_scope(v.scope() + offset))
}
