//! Chart rules.
//!
//! | Strategy     | Seed                      | Complete edge         | Incomplete edge                |
//! |--------------|---------------------------|-----------------------|--------------------------------|
//! | `TopDown`    | start productions at 0    | completer             | completer, predictor, scanner  |
//! | `BottomUp`   | leaves, empty productions | completer, BU predict | completer                      |
//! | `LeftCorner` | leaves, empty productions | completer, LC predict | completer                      |
//!
//! Categories from different edges never share variables: before two are
//! unified, one is renamed into scopes the other does not use.

use std::collections::HashMap;

use featchart_featstruct::{Bindings, UnifyFailure, Variable};
use featchart_grammar::{Category, Production, ProductionId, Symbol};

use crate::chart::{Derivation, renamed_apart};
use crate::config::Strategy;
use crate::edge::{Edge, EdgeId, TreeEdge};
use crate::parser::Run;
use crate::trace::{Rule, TraceEvent};

impl Run<'_> {
    // =========================================================================
    // Seeding
    // =========================================================================

    pub(crate) fn seed(&mut self) {
        match self.config.strategy {
            Strategy::TopDown => self.init_top_down(),
            Strategy::BottomUp | Strategy::LeftCorner => {
                self.init_leaves();
                self.predict_empty();
            }
        }
    }

    /// `[S -> * γ, (0, 0)]` for every start production whose left-hand side
    /// unifies with the start category.
    fn init_top_down(&mut self) {
        let grammar = self.grammar;
        let start = grammar.start();
        let Some(label) = start.label() else {
            return;
        };
        let scope = start.max_scope() + 1;
        for &id in grammar.expansions(label) {
            let production = grammar.production(id);
            if !self.left_corner_fits(production, 0) {
                continue;
            }
            let lhs = production.instantiate(scope).lhs().clone();
            match start.unify(&lhs, &Bindings::new()) {
                Ok(_) => {
                    self.add(TreeEdge::predicted(id, production, 0).into(), Rule::Init, None);
                }
                Err(failure) => self.unify_failed(Rule::Init, start, &lhs, failure),
            }
        }
    }

    fn init_leaves(&mut self) {
        let tokens = self.chart.tokens().to_vec();
        for (index, token) in tokens.into_iter().enumerate() {
            self.add(Edge::leaf(index, token), Rule::Leaf, None);
        }
    }

    fn predict_empty(&mut self) {
        let grammar = self.grammar;
        for &id in grammar.empty_productions() {
            for position in 0..=self.chart.num_tokens() {
                let edge = TreeEdge::predicted(id, grammar.production(id), position);
                self.add(edge.into(), Rule::Empty, None);
            }
        }
    }

    // =========================================================================
    // Processing
    // =========================================================================

    /// Runs the strategy's rules on an edge just taken off the agenda.
    pub(crate) fn process(&mut self, id: EdgeId) {
        let edge = self.chart.edge(id).clone();
        match &edge {
            Edge::Tree(tree) if !tree.is_complete() => {
                self.complete_forward(id, tree);
                if self.config.strategy == Strategy::TopDown {
                    self.predict(tree);
                    self.scan(tree);
                }
            }
            _ => {
                self.complete_backward(id, &edge);
                match self.config.strategy {
                    Strategy::TopDown => {}
                    Strategy::BottomUp => self.predict_bottom_up(&edge),
                    Strategy::LeftCorner => self.predict_left_corner(id, &edge),
                }
            }
        }
    }

    /// Completer, for a new incomplete edge: extend it with every active
    /// complete edge starting where it ends.
    fn complete_forward(&mut self, id: EdgeId, left: &TreeEdge) {
        let children = self.chart.complete_from(left.end()).to_vec();
        for child_id in children {
            if self.aborted.is_some() {
                return;
            }
            let child = self.chart.edge(child_id).clone();
            self.combine(Some(id), left, child_id, &child, Rule::Completer);
        }
    }

    /// Completer, for a new complete edge: extend every active incomplete
    /// edge ending where it starts.
    fn complete_backward(&mut self, id: EdgeId, child: &Edge) {
        let lefts = self.chart.incomplete_to(child.start()).to_vec();
        for left_id in lefts {
            if self.aborted.is_some() {
                return;
            }
            let Some(left) = self.chart.edge(left_id).as_tree().cloned() else {
                continue;
            };
            self.combine(Some(left_id), &left, id, child, Rule::Completer);
        }
    }

    fn combine(
        &mut self,
        left_id: Option<EdgeId>,
        left: &TreeEdge,
        child_id: EdgeId,
        child: &Edge,
        rule: Rule,
    ) {
        if let Some(advanced) = self.advance(left, child, rule) {
            let derivation = Derivation {
                previous: left_id,
                child: child_id,
            };
            self.add(advanced.into(), rule, Some(derivation));
        }
    }

    /// Moves the dot of `left` over the complete edge `child`, if what it
    /// offers matches the symbol after the dot.
    fn advance(&mut self, left: &TreeEdge, child: &Edge, rule: Rule) -> Option<TreeEdge> {
        let next = left.next_symbol()?;
        match next {
            Symbol::Terminal(word) => {
                let token = child.token()?;
                (token.surface() == &**word).then(|| {
                    left.advance(next.clone(), child.end(), left.bindings().clone())
                })
            }
            Symbol::Category(expected) => {
                let found = child.category()?;
                if found.label() != expected.label() {
                    return None;
                }
                let offset = left.max_scope() + 1;
                let found = found.rename_variables(&|v| v.with_scope(v.scope() + offset));
                match expected.unify(&found, left.bindings()) {
                    Ok((unified, bindings)) => {
                        Some(left.advance(Symbol::Category(unified), child.end(), bindings))
                    }
                    Err(failure) => {
                        let expected = expected.substitute(left.bindings());
                        self.unify_failed(rule, &expected, &found, failure);
                        None
                    }
                }
            }
        }
    }

    // =========================================================================
    // Top-down
    // =========================================================================

    /// Predictor: `[A -> α * B β, (i, j)]` yields `[B' -> * γ, (j, j)]` for
    /// every production whose left-hand side unifies with `B`.
    fn predict(&mut self, tree: &TreeEdge) {
        let Some(Symbol::Category(next)) = tree.next_symbol() else {
            return;
        };
        let Some(label) = next.label() else {
            return;
        };
        let position = tree.end();
        let expected = next.substitute(tree.bindings());
        if !self.predicted.insert((canonical(&expected), position)) {
            return;
        }

        let grammar = self.grammar;
        let scope = expected.max_scope() + 1;
        for &id in grammar.expansions(label) {
            let production = grammar.production(id);
            if !self.left_corner_fits(production, position) {
                continue;
            }
            let lhs = production.instantiate(scope).lhs().clone();
            match expected.unify(&lhs, &Bindings::new()) {
                Ok(_) => {
                    let edge = TreeEdge::predicted(id, production, position);
                    self.add(edge.into(), Rule::Predictor, None);
                }
                Err(failure) => self.unify_failed(Rule::Predictor, &expected, &lhs, failure),
            }
        }
    }

    /// Scanner: the leaf edge for token `j` when the symbol after the dot is
    /// its word, or a category its tag unifies with.
    fn scan(&mut self, tree: &TreeEdge) {
        let position = tree.end();
        let Some(token) = self.chart.tokens().get(position).cloned() else {
            return;
        };
        let matches = match tree.next_symbol() {
            Some(Symbol::Terminal(word)) => token.surface() == &**word,
            Some(Symbol::Category(expected)) => token.category().is_some_and(|tag| {
                tag.label() == expected.label() && {
                    let expected = expected.substitute(tree.bindings());
                    expected
                        .unify(&renamed_apart(tag, &expected), &Bindings::new())
                        .is_ok()
                }
            }),
            None => false,
        };
        if matches {
            self.add(Edge::leaf(position, token), Rule::Scanner, None);
        }
    }

    /// Productions whose first symbol is a word can only start where that
    /// word is.
    fn left_corner_fits(&self, production: &Production, position: usize) -> bool {
        match production.rhs().first() {
            Some(Symbol::Terminal(word)) => self
                .chart
                .tokens()
                .get(position)
                .is_some_and(|token| token.surface() == &**word),
            _ => true,
        }
    }

    // =========================================================================
    // Bottom-up
    // =========================================================================

    /// Productions whose first symbol may match the complete edge.
    fn left_corners(&self, edge: &Edge) -> Vec<ProductionId> {
        let grammar = self.grammar;
        let mut ids = Vec::new();
        if let Some(token) = edge.token() {
            ids.extend_from_slice(grammar.left_corner_word(token.surface()));
        }
        if let Some(label) = edge.category().and_then(Category::label) {
            ids.extend_from_slice(grammar.left_corner_label(label));
        }
        ids
    }

    /// Bottom-up predict: a complete edge `[B, (i, k)]` yields
    /// `[A -> * B' γ, (i, i)]` for every production whose first symbol
    /// matches it.
    fn predict_bottom_up(&mut self, edge: &Edge) {
        let grammar = self.grammar;
        for id in self.left_corners(edge) {
            if self.aborted.is_some() {
                return;
            }
            let predicted = TreeEdge::predicted(id, grammar.production(id), edge.start());
            if self.advance(&predicted, edge, Rule::BottomUp).is_some() {
                self.add(predicted.into(), Rule::BottomUp, None);
            }
        }
    }

    /// Left-corner predict: a complete edge `[B, (i, k)]` directly yields
    /// `[A -> B' * γ, (i, k)]`.
    fn predict_left_corner(&mut self, id: EdgeId, edge: &Edge) {
        let grammar = self.grammar;
        for production_id in self.left_corners(edge) {
            if self.aborted.is_some() {
                return;
            }
            let predicted =
                TreeEdge::predicted(production_id, grammar.production(production_id), edge.start());
            self.combine(None, &predicted, id, edge, Rule::LeftCorner);
        }
    }

    // =========================================================================
    // Tracing
    // =========================================================================

    fn unify_failed(&mut self, rule: Rule, expected: &Category, found: &Category, failure: UnifyFailure) {
        if self.tracer.is_enabled() {
            self.tracer.record(TraceEvent::UnifyFailed {
                rule,
                expected: expected.to_string(),
                found: found.to_string(),
                failure,
            });
        }
    }
}

/// Renames the variables of a category by first occurrence, so categories
/// that differ only in variable names compare equal.
fn canonical(category: &Category) -> Category {
    let names: HashMap<Variable, Variable> = category
        .variables()
        .into_iter()
        .enumerate()
        .map(|(k, v)| {
            let scope = u32::try_from(k).unwrap_or(u32::MAX);
            (v, Variable::scoped("v", scope))
        })
        .collect();
    if names.is_empty() {
        return category.clone();
    }
    category.rename_variables(&|v| names.get(v).cloned().unwrap_or_else(|| v.clone()))
}
