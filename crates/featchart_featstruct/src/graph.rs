//! Working graph used by unification.
//!
//! Inputs are imported into a flat vector of terms. Unification merges terms
//! by forwarding one to the other (union-find without ranks), and the
//! representative graph is exported into a fresh arena afterwards. Imports are
//! memoized by node identity, so nodes that are shared in an input stay
//! shared in the working graph and in the result.

use std::collections::{BTreeMap, HashMap, HashSet};

use featchart_foundation::{Atom, Variable};

use crate::bindings::Bindings;
use crate::fstruct::{FeatStruct, FeatStructBuilder, FeatureValue, Name, NodeId, Slot};
use crate::unify::{Clash, UnifyFailure};

pub(crate) type TermId = usize;

#[derive(Clone, Debug)]
enum Term {
    Atom(Atom),
    Var(Variable),
    Struct(BTreeMap<Name, TermId>),
    Forward(TermId),
}

/// Shape of a representative term, detached from the term vector.
enum Shape {
    Atom(Atom),
    FreeVar(Variable),
    RigidVar(Variable),
    Struct,
}

pub(crate) struct Graph<'b> {
    terms: Vec<Term>,
    vars: HashMap<Variable, TermId>,
    imported: HashMap<(usize, NodeId), TermId>,
    bindings: &'b Bindings,
    rigid: HashSet<Variable>,
    path: Vec<Name>,
}

impl<'b> Graph<'b> {
    pub(crate) fn new(bindings: &'b Bindings) -> Self {
        Self {
            terms: Vec::new(),
            vars: HashMap::new(),
            imported: HashMap::new(),
            bindings,
            rigid: HashSet::new(),
            path: Vec::new(),
        }
    }

    /// Treats the given variables as constants that may only unify with
    /// themselves or with free variables.
    pub(crate) fn with_rigid(mut self, rigid: impl IntoIterator<Item = Variable>) -> Self {
        self.rigid.extend(rigid);
        self
    }

    fn push(&mut self, term: Term) -> TermId {
        self.terms.push(term);
        self.terms.len() - 1
    }

    pub(crate) fn find(&self, mut id: TermId) -> TermId {
        while let Term::Forward(next) = self.terms[id] {
            id = next;
        }
        id
    }

    // =========================================================================
    // Import
    // =========================================================================

    pub(crate) fn import(&mut self, fs: &FeatStruct) -> TermId {
        self.import_node(fs, fs.root())
    }

    pub(crate) fn import_value(&mut self, value: &FeatureValue) -> TermId {
        match value {
            FeatureValue::Atom(a) => self.push(Term::Atom(a.clone())),
            FeatureValue::Var(v) => self.import_var(v),
            FeatureValue::Struct(fs) => self.import(fs),
        }
    }

    fn import_node(&mut self, fs: &FeatStruct, id: NodeId) -> TermId {
        let key = (fs.arena_key(), id);
        if let Some(&term) = self.imported.get(&key) {
            return term;
        }
        let term = self.push(Term::Struct(BTreeMap::new()));
        self.imported.insert(key, term);

        let mut features = BTreeMap::new();
        for (name, slot) in fs.node(id) {
            let child = match slot {
                Slot::Atom(a) => self.push(Term::Atom(a.clone())),
                Slot::Var(v) => self.import_var(v),
                Slot::Node(child) => self.import_node(fs, *child),
            };
            features.insert(name.clone(), child);
        }
        self.terms[term] = Term::Struct(features);
        term
    }

    fn import_var(&mut self, var: &Variable) -> TermId {
        if let Some(&term) = self.vars.get(var) {
            return term;
        }
        let term = self.push(Term::Var(var.clone()));
        self.vars.insert(var.clone(), term);
        if self.rigid.contains(var) {
            return term;
        }
        if let Some(value) = self.bindings.get(var) {
            let bound = self.import_value(value);
            let bound = self.find(bound);
            if bound != term {
                self.terms[term] = Term::Forward(bound);
            }
        }
        term
    }

    // =========================================================================
    // Unify
    // =========================================================================

    fn shape(&self, id: TermId) -> Shape {
        match &self.terms[id] {
            Term::Atom(a) => Shape::Atom(a.clone()),
            Term::Var(v) if self.rigid.contains(v) => Shape::RigidVar(v.clone()),
            Term::Var(v) => Shape::FreeVar(v.clone()),
            Term::Struct(_) => Shape::Struct,
            Term::Forward(_) => unreachable!("shape of a forwarded term"),
        }
    }

    fn fail(&self, clash: Clash) -> UnifyFailure {
        UnifyFailure {
            path: self.path.clone(),
            clash,
        }
    }

    pub(crate) fn unify(&mut self, a: TermId, b: TermId) -> Result<(), UnifyFailure> {
        let a = self.find(a);
        let b = self.find(b);
        if a == b {
            return Ok(());
        }
        match (self.shape(a), self.shape(b)) {
            (Shape::FreeVar(va), Shape::FreeVar(vb)) => {
                if va <= vb {
                    self.terms[b] = Term::Forward(a);
                } else {
                    self.terms[a] = Term::Forward(b);
                }
                Ok(())
            }
            (Shape::FreeVar(_), _) => {
                self.terms[a] = Term::Forward(b);
                Ok(())
            }
            (_, Shape::FreeVar(_)) => {
                self.terms[b] = Term::Forward(a);
                Ok(())
            }
            (Shape::Atom(x), Shape::Atom(y)) => {
                if x == y {
                    self.terms[b] = Term::Forward(a);
                    Ok(())
                } else {
                    Err(self.fail(Clash::Atoms(x, y)))
                }
            }
            (Shape::Struct, Shape::Struct) => self.merge(a, b),
            (left, right) => Err(self.fail(Clash::Shapes {
                left: describe(&left),
                right: describe(&right),
            })),
        }
    }

    fn merge(&mut self, a: TermId, b: TermId) -> Result<(), UnifyFailure> {
        let Term::Struct(incoming) = std::mem::replace(&mut self.terms[b], Term::Forward(a)) else {
            unreachable!("merge of a non-structure");
        };
        for (name, theirs) in incoming {
            let target = self.find(a);
            let ours = match &self.terms[target] {
                Term::Struct(features) => features.get(&name).copied(),
                _ => None,
            };
            match ours {
                Some(ours) => {
                    self.path.push(name);
                    self.unify(ours, theirs)?;
                    self.path.pop();
                }
                None => {
                    if let Term::Struct(features) = &mut self.terms[target] {
                        features.insert(name, theirs);
                    }
                }
            }
        }
        Ok(())
    }

    // =========================================================================
    // Export
    // =========================================================================

    /// Exports the structure rooted at `id` into a fresh arena.
    pub(crate) fn export(&self, id: TermId) -> FeatStruct {
        let mut builder = FeatStruct::builder();
        let mut memo = HashMap::new();
        let root = self.export_node(&mut builder, &mut memo, id);
        builder.build(root)
    }

    pub(crate) fn export_value(&self, id: TermId) -> FeatureValue {
        let id = self.find(id);
        match &self.terms[id] {
            Term::Atom(a) => FeatureValue::Atom(a.clone()),
            Term::Var(v) => FeatureValue::Var(v.clone()),
            _ => FeatureValue::Struct(self.export(id)),
        }
    }

    fn export_node(
        &self,
        builder: &mut FeatStructBuilder,
        memo: &mut HashMap<TermId, NodeId>,
        id: TermId,
    ) -> NodeId {
        let id = self.find(id);
        if let Some(&node) = memo.get(&id) {
            return node;
        }
        let node = builder.node();
        memo.insert(id, node);
        let Term::Struct(features) = &self.terms[id] else {
            return node;
        };
        for (name, child) in features {
            let child = self.find(*child);
            match &self.terms[child] {
                Term::Atom(a) => builder.set_atom(node, name.clone(), a.clone()),
                Term::Var(v) => builder.set_var(node, name.clone(), v.clone()),
                _ => {
                    let target = self.export_node(builder, memo, child);
                    builder.set_node(node, name.clone(), target);
                }
            }
        }
        node
    }

    /// Returns `base` extended with every variable this graph has bound.
    ///
    /// Variables bound to the same structure keep sharing it: the first of
    /// them holds the exported structure and the others point at it.
    pub(crate) fn updated_bindings(&self, base: &Bindings) -> Bindings {
        let mut out = base.clone();
        let mut vars: Vec<_> = self
            .vars
            .iter()
            .filter(|(var, _)| !self.rigid.contains(*var))
            .collect();
        vars.sort();
        let mut owners: HashMap<TermId, &Variable> = HashMap::new();
        for (var, &term) in vars {
            let rep = self.find(term);
            if rep == term {
                continue;
            }
            let value = match &self.terms[rep] {
                Term::Var(v) => FeatureValue::Var(v.clone()),
                Term::Struct(_) => match owners.get(&rep) {
                    Some(owner) => FeatureValue::Var((*owner).clone()),
                    None => {
                        owners.insert(rep, var);
                        self.export_value(rep)
                    }
                },
                _ => self.export_value(rep),
            };
            out.bind(var.clone(), value);
        }
        out
    }
}

fn describe(shape: &Shape) -> String {
    match shape {
        Shape::Atom(a) => format!("atom {a}"),
        Shape::FreeVar(v) | Shape::RigidVar(v) => format!("variable {v}"),
        Shape::Struct => "structure".to_string(),
    }
}
