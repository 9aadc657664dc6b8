//! Arena-backed feature structures.
//!
//! A [`FeatStruct`] is a rooted graph of nodes stored in a shared arena.
//! Each node maps feature names to slots; a slot holds an atom, a variable,
//! or the id of another node in the same arena. Two slots holding the same
//! node id are *reentrant*: they denote one shared value, so information
//! added through either path is visible through both.
//!
//! Structures are immutable. Cloning is O(1) (the arena is reference
//! counted) and every "modifying" operation builds a new arena.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use featchart_foundation::{Atom, Variable};

/// Feature name.
pub type Name = Arc<str>;

/// Feature carrying the syntactic label of a category (`NP`, `VP`, ...).
///
/// The name cannot be written as an ordinary feature in grammar notation;
/// it is set through the prefix label (`NP[num=sg]`).
pub const TYPE_FEATURE: &str = "*type*";

/// Index of a node within a feature structure arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the raw index of this node.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Contents of one feature slot.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Slot {
    Atom(Atom),
    Var(Variable),
    Node(NodeId),
}

pub(crate) type Node = BTreeMap<Name, Slot>;

/// A self-contained feature value.
#[derive(Clone, PartialEq, Eq, Hash)]
pub enum FeatureValue {
    /// Atomic value.
    Atom(Atom),
    /// Unification variable.
    Var(Variable),
    /// Nested feature structure.
    Struct(FeatStruct),
}

impl FeatureValue {
    /// Attempts to extract an atom reference.
    #[must_use]
    pub const fn as_atom(&self) -> Option<&Atom> {
        match self {
            Self::Atom(a) => Some(a),
            _ => None,
        }
    }

    /// Attempts to extract a nested structure reference.
    #[must_use]
    pub const fn as_struct(&self) -> Option<&FeatStruct> {
        match self {
            Self::Struct(fs) => Some(fs),
            _ => None,
        }
    }

    /// Attempts to extract a variable reference.
    #[must_use]
    pub const fn as_var(&self) -> Option<&Variable> {
        match self {
            Self::Var(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the value with every variable renamed through `f`.
    #[must_use]
    pub fn rename_variables(&self, f: &impl Fn(&Variable) -> Variable) -> Self {
        match self {
            Self::Atom(a) => Self::Atom(a.clone()),
            Self::Var(v) => Self::Var(f(v)),
            Self::Struct(fs) => Self::Struct(fs.rename_variables(f)),
        }
    }

    /// Collects the variables of this value in first-occurrence order.
    pub fn collect_variables(&self, out: &mut Vec<Variable>) {
        match self {
            Self::Atom(_) => {}
            Self::Var(v) => {
                if !out.contains(v) {
                    out.push(v.clone());
                }
            }
            Self::Struct(fs) => {
                for v in fs.variables_in_order() {
                    if !out.contains(&v) {
                        out.push(v);
                    }
                }
            }
        }
    }
}

impl From<Atom> for FeatureValue {
    fn from(a: Atom) -> Self {
        Self::Atom(a)
    }
}

impl From<&str> for FeatureValue {
    fn from(s: &str) -> Self {
        Self::Atom(Atom::from(s))
    }
}

impl From<i64> for FeatureValue {
    fn from(n: i64) -> Self {
        Self::Atom(Atom::from(n))
    }
}

impl From<bool> for FeatureValue {
    fn from(b: bool) -> Self {
        Self::Atom(Atom::from(b))
    }
}

impl From<Variable> for FeatureValue {
    fn from(v: Variable) -> Self {
        Self::Var(v)
    }
}

impl From<FeatStruct> for FeatureValue {
    fn from(fs: FeatStruct) -> Self {
        Self::Struct(fs)
    }
}

// =============================================================================
// FeatStruct
// =============================================================================

/// A feature structure: a rooted, possibly reentrant, graph of features.
///
/// Equality and hashing are structural. Two structures are equal iff they
/// are isomorphic as rooted graphs, which includes agreeing on which paths
/// share a node.
#[derive(Clone)]
pub struct FeatStruct {
    nodes: Arc<Vec<Node>>,
    root: NodeId,
}

impl Default for FeatStruct {
    fn default() -> Self {
        Self::new()
    }
}

impl FeatStruct {
    /// Creates an empty feature structure (`[]`).
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: Arc::new(vec![Node::new()]),
            root: NodeId(0),
        }
    }

    /// Creates a builder for constructing structures node by node.
    #[must_use]
    pub fn builder() -> FeatStructBuilder {
        FeatStructBuilder::new()
    }

    /// Creates a structure from `(name, value)` pairs.
    #[must_use]
    pub fn from_pairs<N, V>(pairs: impl IntoIterator<Item = (N, V)>) -> Self
    where
        N: Into<Name>,
        V: Into<FeatureValue>,
    {
        let mut builder = FeatStructBuilder::new();
        let root = builder.node();
        for (name, value) in pairs {
            builder.set_value(root, name, &value.into());
        }
        builder.build(root)
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) const fn root(&self) -> NodeId {
        self.root
    }

    /// Identity of the arena, used to recognise shared nodes across values.
    pub(crate) fn arena_key(&self) -> usize {
        Arc::as_ptr(&self.nodes) as usize
    }

    fn features(&self) -> &Node {
        self.node(self.root)
    }

    /// Returns the number of features at the top level.
    #[must_use]
    pub fn len(&self) -> usize {
        self.features().len()
    }

    /// Returns true if the structure has no features.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.features().is_empty()
    }

    /// Returns the top-level feature names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.features().keys().map(AsRef::as_ref)
    }

    /// Returns true if the structure defines `name` at the top level.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.features().contains_key(name)
    }

    /// Returns the value of a top-level feature.
    ///
    /// Nested structures returned here keep their identity: handing them to
    /// [`FeatStruct::with`] or to the unifier alongside this structure
    /// preserves the sharing.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        self.features().get(name).map(|slot| self.value_of(slot))
    }

    /// Returns the atom stored at a top-level feature, if it is one.
    #[must_use]
    pub fn atom(&self, name: &str) -> Option<&Atom> {
        match self.features().get(name) {
            Some(Slot::Atom(a)) => Some(a),
            _ => None,
        }
    }

    /// Follows a feature path and returns the value at its end.
    ///
    /// The empty path denotes the structure itself.
    #[must_use]
    pub fn get_path(&self, path: &[&str]) -> Option<FeatureValue> {
        let Some((last, prefix)) = path.split_last() else {
            return Some(FeatureValue::Struct(self.clone()));
        };
        let mut current = self.root;
        for name in prefix {
            match self.node(current).get(*name) {
                Some(Slot::Node(next)) => current = *next,
                _ => return None,
            }
        }
        self.node(current).get(*last).map(|slot| self.value_of(slot))
    }

    /// Returns true if both paths lead to the very same node.
    #[must_use]
    pub fn shares(&self, a: &[&str], b: &[&str]) -> bool {
        match (self.node_at(a), self.node_at(b)) {
            (Some(x), Some(y)) => x == y,
            _ => false,
        }
    }

    fn node_at(&self, path: &[&str]) -> Option<NodeId> {
        let mut current = self.root;
        for name in path {
            match self.node(current).get(*name) {
                Some(Slot::Node(next)) => current = *next,
                _ => return None,
            }
        }
        Some(current)
    }

    fn value_of(&self, slot: &Slot) -> FeatureValue {
        match slot {
            Slot::Atom(a) => FeatureValue::Atom(a.clone()),
            Slot::Var(v) => FeatureValue::Var(v.clone()),
            Slot::Node(id) => FeatureValue::Struct(Self {
                nodes: Arc::clone(&self.nodes),
                root: *id,
            }),
        }
    }

    /// Returns a copy with `name` set to `value`.
    #[must_use]
    pub fn with(&self, name: impl Into<Name>, value: impl Into<FeatureValue>) -> Self {
        let mut builder = FeatStructBuilder::new();
        let root = builder.import(self);
        builder.set_value(root, name, &value.into());
        builder.build(root)
    }

    /// Returns a copy without the top-level feature `name`.
    #[must_use]
    pub fn without(&self, name: &str) -> Self {
        let mut builder = FeatStructBuilder::new();
        let root = builder.import(self);
        builder.nodes[root.index()].remove(name);
        builder.build(root)
    }

    /// Node ids reachable from the root, in depth-first pre-order.
    pub(crate) fn reachable(&self) -> Vec<NodeId> {
        let mut seen = HashSet::new();
        let mut order = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                continue;
            }
            order.push(id);
            for slot in self.node(id).values().rev() {
                if let Slot::Node(child) = slot {
                    stack.push(*child);
                }
            }
        }
        order
    }

    /// Returns the set of variables occurring in the structure.
    #[must_use]
    pub fn variables(&self) -> BTreeSet<Variable> {
        self.variables_in_order().into_iter().collect()
    }

    /// Returns the variables in first-occurrence (depth-first) order.
    #[must_use]
    pub fn variables_in_order(&self) -> Vec<Variable> {
        let mut out: Vec<Variable> = Vec::new();
        self.walk(&mut |step| {
            if let Step::Var(v) = *step {
                if !out.contains(v) {
                    out.push(v.clone());
                }
            }
        });
        out
    }

    /// Returns the largest variable scope in use (0 if there are none).
    #[must_use]
    pub fn max_scope(&self) -> u32 {
        self.variables_in_order()
            .iter()
            .map(Variable::scope)
            .max()
            .unwrap_or(0)
    }

    /// Returns a copy with every variable renamed through `f`.
    #[must_use]
    pub fn rename_variables(&self, f: &impl Fn(&Variable) -> Variable) -> Self {
        let nodes = self
            .nodes
            .iter()
            .map(|node| {
                node.iter()
                    .map(|(name, slot)| {
                        let slot = match slot {
                            Slot::Var(v) => Slot::Var(f(v)),
                            other => other.clone(),
                        };
                        (name.clone(), slot)
                    })
                    .collect()
            })
            .collect();
        Self {
            nodes: Arc::new(nodes),
            root: self.root,
        }
    }

    /// Walks the structure depth-first in canonical order.
    ///
    /// Nodes are numbered on first visit; later visits emit [`Step::Ref`]
    /// with that number, so isomorphic graphs produce identical walks.
    pub(crate) fn walk<'a>(&'a self, visit: &mut impl FnMut(&Step<'a>)) {
        let mut seen = HashMap::new();
        self.walk_node(self.root, &mut seen, visit);
    }

    fn walk_node<'a>(
        &'a self,
        id: NodeId,
        seen: &mut HashMap<NodeId, usize>,
        visit: &mut impl FnMut(&Step<'a>),
    ) {
        let number = seen.len();
        seen.insert(id, number);
        visit(&Step::Enter);
        for (name, slot) in self.node(id) {
            visit(&Step::Feature(name));
            match slot {
                Slot::Atom(a) => visit(&Step::Atom(a)),
                Slot::Var(v) => visit(&Step::Var(v)),
                Slot::Node(child) => match seen.get(child) {
                    Some(&n) => visit(&Step::Ref(n)),
                    None => self.walk_node(*child, seen, visit),
                },
            }
        }
        visit(&Step::Leave);
    }

    fn steps(&self) -> Vec<Step<'_>> {
        let mut steps = Vec::new();
        self.walk(&mut |step| steps.push(step.clone()));
        steps
    }
}

/// One step of a canonical walk.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Step<'a> {
    Enter,
    Leave,
    Feature(&'a str),
    Atom(&'a Atom),
    Var(&'a Variable),
    Ref(usize),
}

impl PartialEq for FeatStruct {
    fn eq(&self, other: &Self) -> bool {
        if Arc::ptr_eq(&self.nodes, &other.nodes) && self.root == other.root {
            return true;
        }
        self.steps() == other.steps()
    }
}

impl Eq for FeatStruct {}

impl Hash for FeatStruct {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.walk(&mut |step| step.hash(state));
    }
}

// =============================================================================
// Builder
// =============================================================================

/// Incremental constructor for feature structures.
///
/// Nodes are allocated with [`node`](Self::node) and connected with the
/// `set_*` methods; setting the same node id under two features creates a
/// reentrant (shared) value.
#[derive(Default)]
pub struct FeatStructBuilder {
    nodes: Vec<Node>,
    imported: HashMap<(usize, NodeId), NodeId>,
    /// Keeps imported arenas alive so their addresses stay unique.
    retained: Vec<Arc<Vec<Node>>>,
}

impl FeatStructBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocates a new empty node.
    ///
    /// # Panics
    ///
    /// Panics if more than `u32::MAX` nodes are allocated.
    pub fn node(&mut self) -> NodeId {
        let id = NodeId(u32::try_from(self.nodes.len()).expect("too many feature nodes"));
        self.nodes.push(Node::new());
        id
    }

    /// Returns true if `node` already defines `name`.
    #[must_use]
    pub fn has(&self, node: NodeId, name: &str) -> bool {
        self.nodes[node.index()].contains_key(name)
    }

    /// Sets an atomic feature.
    pub fn set_atom(&mut self, node: NodeId, name: impl Into<Name>, atom: impl Into<Atom>) {
        self.nodes[node.index()].insert(name.into(), Slot::Atom(atom.into()));
    }

    /// Sets a variable feature.
    pub fn set_var(&mut self, node: NodeId, name: impl Into<Name>, var: Variable) {
        self.nodes[node.index()].insert(name.into(), Slot::Var(var));
    }

    /// Points a feature at another node of this builder.
    pub fn set_node(&mut self, node: NodeId, name: impl Into<Name>, target: NodeId) {
        self.nodes[node.index()].insert(name.into(), Slot::Node(target));
    }

    /// Sets a feature to a self-contained value, importing nested structures.
    pub fn set_value(&mut self, node: NodeId, name: impl Into<Name>, value: &FeatureValue) {
        let slot = match value {
            FeatureValue::Atom(a) => Slot::Atom(a.clone()),
            FeatureValue::Var(v) => Slot::Var(v.clone()),
            FeatureValue::Struct(fs) => Slot::Node(self.import(fs)),
        };
        self.nodes[node.index()].insert(name.into(), slot);
    }

    /// Copies the nodes reachable from `fs` into this builder.
    ///
    /// Importing several structures that share an arena (for example a
    /// structure and one of its own sub-values) keeps the shared nodes
    /// shared.
    pub fn import(&mut self, fs: &FeatStruct) -> NodeId {
        let key = fs.arena_key();
        if !self
            .retained
            .iter()
            .any(|arena| Arc::ptr_eq(arena, &fs.nodes))
        {
            self.retained.push(Arc::clone(&fs.nodes));
        }
        for id in fs.reachable() {
            if !self.imported.contains_key(&(key, id)) {
                let fresh = self.node();
                self.imported.insert((key, id), fresh);
            }
        }
        for id in fs.reachable() {
            let target = self.imported[&(key, id)];
            if !self.nodes[target.index()].is_empty() {
                continue;
            }
            let copied: Node = fs
                .node(id)
                .iter()
                .map(|(name, slot)| {
                    let slot = match slot {
                        Slot::Node(child) => Slot::Node(self.imported[&(key, *child)]),
                        other => other.clone(),
                    };
                    (name.clone(), slot)
                })
                .collect();
            self.nodes[target.index()] = copied;
        }
        self.imported[&(key, fs.root())]
    }

    /// Finishes the structure rooted at `root`.
    #[must_use]
    pub fn build(self, root: NodeId) -> FeatStruct {
        FeatStruct {
            nodes: Arc::new(self.nodes),
            root,
        }
    }
}
