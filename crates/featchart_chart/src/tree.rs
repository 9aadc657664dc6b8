//! Parse trees and their extraction from a chart.
//!
//! The chart stores each edge once together with every way it was derived.
//! Extraction unpacks that forest lazily: trees are produced one at a time
//! by backtracking over derivation lists, so asking for the first tree of a
//! highly ambiguous sentence does not build the others.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use featchart_featstruct::Bindings;
use featchart_grammar::{Category, Grammar, Symbol};

use crate::chart::Chart;
use crate::edge::{Edge, EdgeId, TreeEdge};

// =============================================================================
// Parse Tree
// =============================================================================

/// A parse tree. Node categories have all bindings applied.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ParseTree {
    /// A word of the input.
    Leaf(Arc<str>),
    /// A category over its children.
    Node {
        /// The category of the node.
        category: Category,
        /// The children, in input order.
        children: Vec<ParseTree>,
    },
}

impl ParseTree {
    /// Returns the category label of a node.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.category().and_then(Category::label)
    }

    /// Returns the category of a node.
    #[must_use]
    pub const fn category(&self) -> Option<&Category> {
        match self {
            Self::Node { category, .. } => Some(category),
            Self::Leaf(_) => None,
        }
    }

    /// Returns the children of a node (empty for leaves).
    #[must_use]
    pub fn children(&self) -> &[ParseTree] {
        match self {
            Self::Node { children, .. } => children,
            Self::Leaf(_) => &[],
        }
    }

    /// Returns the words at the leaves, left to right.
    #[must_use]
    pub fn leaves(&self) -> Vec<&str> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Self::Leaf(word) => out.push(word),
            Self::Node { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
        }
    }

    /// Returns the height of the tree; a leaf has height 0.
    #[must_use]
    pub fn height(&self) -> usize {
        match self {
            Self::Leaf(_) => 0,
            Self::Node { children, .. } => {
                1 + children.iter().map(Self::height).max().unwrap_or(0)
            }
        }
    }

    /// Returns true if every local tree is licensed by some production of
    /// `grammar`.
    ///
    /// A node over a single word whose label the grammar declares lexical is
    /// accepted as supplied by the tagger.
    #[must_use]
    pub fn is_licensed_by(&self, grammar: &Grammar) -> bool {
        let Self::Node { category, children } = self else {
            return true;
        };
        let symbols: Vec<Symbol> = children
            .iter()
            .map(|child| match child {
                Self::Leaf(word) => Symbol::Terminal(word.clone()),
                Self::Node { category, .. } => Symbol::Category(category.clone()),
            })
            .collect();
        let tagged = matches!(children.as_slice(), [Self::Leaf(_)])
            && category
                .label()
                .is_some_and(|label| grammar.lexical().any(|l| l == label));
        (tagged || grammar.licenses(category, &symbols))
            && children.iter().all(|child| child.is_licensed_by(grammar))
    }
}

impl fmt::Display for ParseTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Leaf(word) => write!(f, "{word}"),
            Self::Node { category, children } => {
                write!(f, "({category}")?;
                for child in children {
                    write!(f, " {child}")?;
                }
                write!(f, ")")
            }
        }
    }
}

// =============================================================================
// Extraction
// =============================================================================

/// Lazy iterator over the distinct trees of a chart.
pub struct Trees<'c> {
    inner: Box<dyn Iterator<Item = ParseTree> + 'c>,
    seen: HashSet<ParseTree>,
}

impl Iterator for Trees<'_> {
    type Item = ParseTree;

    fn next(&mut self) -> Option<ParseTree> {
        loop {
            let tree = self.inner.next()?;
            if self.seen.insert(tree.clone()) {
                return Some(tree);
            }
        }
    }
}

/// The edges being expanded above the current node.
type Path = im::HashSet<EdgeId>;

type Boxed<'c, T> = Box<dyn Iterator<Item = T> + 'c>;

/// Returns every tree rooted in a complete edge over `span` whose left-hand
/// side unifies with `start`.
///
/// Derivation cycles (unary or empty loops) are cut: an edge is never
/// expanded inside its own expansion.
#[must_use]
pub fn extract<'c>(chart: &'c Chart, start: &Category, span: (usize, usize)) -> Trees<'c> {
    let roots = chart.complete_edges(start, span);
    Trees {
        inner: Box::new(
            roots
                .into_iter()
                .flat_map(move |id| edge_trees(chart, id, None, Path::new())),
        ),
        seen: HashSet::new(),
    }
}

/// Trees for the complete edge `id`, as the category `expected` that its
/// parent matched it against.
///
/// The parent's category may carry values the edge alone leaves open (a
/// variable the parent bound after this edge was built), so the edge's
/// left-hand side is specialized by it and the same bindings flow into the
/// categories expected of the edge's own children.
fn edge_trees<'c>(
    chart: &'c Chart,
    id: EdgeId,
    expected: Option<&Category>,
    path: Path,
) -> Boxed<'c, ParseTree> {
    let Some(tree) = chart.edge(id).as_tree() else {
        return Box::new(std::iter::empty());
    };
    if path.contains(&id) {
        return Box::new(std::iter::empty());
    }
    let path = path.update(id);
    let (category, rhs) = specialize(tree, expected);
    let rhs: Arc<[Option<Category>]> = Arc::from(rhs);
    Box::new(child_sequences(chart, id).flat_map(move |children| {
        let category = category.clone();
        subtrees(chart, rhs.clone(), Arc::from(children), 0, path.clone()).map(move |children| {
            ParseTree::Node {
                category: category.clone(),
                children,
            }
        })
    }))
}

/// Unifies the left-hand side of `tree` with `expected` and applies the
/// result to both sides. Returns the node category and, per right-hand
/// symbol, the category its child is expected to be.
fn specialize(tree: &TreeEdge, expected: Option<&Category>) -> (Category, Vec<Option<Category>>) {
    let own = || {
        let rhs = tree.rhs().iter().map(|s| s.as_category().cloned()).collect();
        (tree.lhs().clone(), rhs)
    };
    let Some(expected) = expected else {
        return own();
    };
    // Scopes at or above `offset` belong to the parent's category.
    let offset = tree.max_scope() + 1;
    let shifted = expected.rename_variables(&|v| v.with_scope(v.scope() + offset));
    let Ok((lhs, bindings)) = tree.lhs().unify(&shifted, &Bindings::new()) else {
        return own();
    };
    let restore = |category: &Category| {
        category.rename_variables(&|v| {
            if v.scope() >= offset {
                v.with_scope(v.scope() - offset)
            } else {
                v.clone()
            }
        })
    };
    let rhs = tree
        .rhs()
        .iter()
        .map(|symbol| {
            symbol
                .as_category()
                .map(|category| restore(&category.substitute(&bindings)))
        })
        .collect();
    (restore(&lhs), rhs)
}

/// Enumerates the child edge sequences of a tree edge, one per path through
/// its derivation lists.
fn child_sequences(chart: &Chart, id: EdgeId) -> Boxed<'_, Vec<EdgeId>> {
    let derivations = chart.derivations(id);
    if derivations.is_empty() {
        return Box::new(std::iter::once(Vec::new()));
    }
    Box::new(derivations.iter().flat_map(move |d| {
        let prefixes: Boxed<'_, Vec<EdgeId>> = match d.previous {
            Some(previous) => child_sequences(chart, previous),
            None => Box::new(std::iter::once(Vec::new())),
        };
        let child = d.child;
        prefixes.map(move |mut sequence| {
            sequence.push(child);
            sequence
        })
    }))
}

/// Enumerates the combinations of subtrees for `children[index..]`, where
/// `expected[i]` is the category child `i` must stand for.
fn subtrees<'c>(
    chart: &'c Chart,
    expected: Arc<[Option<Category>]>,
    children: Arc<[EdgeId]>,
    index: usize,
    path: Path,
) -> Boxed<'c, Vec<ParseTree>> {
    if index == children.len() {
        return Box::new(std::iter::once(Vec::new()));
    }
    let slot = expected.get(index).cloned().flatten();
    let first = child_trees(chart, slot.as_ref(), children[index], path.clone());
    Box::new(first.flat_map(move |tree| {
        subtrees(chart, expected.clone(), children.clone(), index + 1, path.clone()).map(
            move |mut rest| {
                rest.insert(0, tree.clone());
                rest
            },
        )
    }))
}

/// Trees for one child. A leaf matched against a category becomes a node
/// carrying that category, which already includes the token's tag.
fn child_trees<'c>(
    chart: &'c Chart,
    expected: Option<&Category>,
    child: EdgeId,
    path: Path,
) -> Boxed<'c, ParseTree> {
    match chart.edge(child) {
        Edge::Leaf { token, .. } => {
            let leaf = ParseTree::Leaf(token.shared_surface());
            let tree = match (expected, token.category()) {
                (Some(category), Some(_)) => ParseTree::Node {
                    category: category.clone(),
                    children: vec![leaf],
                },
                _ => leaf,
            };
            Box::new(std::iter::once(tree))
        }
        Edge::Tree(_) => edge_trees(chart, child, expected, path),
    }
}
