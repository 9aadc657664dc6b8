//! Bracketed notation for feature structures.
//!
//! Output follows the notation accepted by the grammar reader:
//!
//! ```text
//! NP[agr=(1)[num=sg, per=3], head=[agr->(1)], +wh]
//! ```
//!
//! A string-valued `*type*` feature is printed as a prefix label, boolean
//! features print as `+name` / `-name`, and nodes reached more than once are
//! tagged `(n)` on first print and referenced as `->(n)` afterwards.

use std::collections::{HashMap, HashSet};
use std::fmt;

use featchart_foundation::Atom;

use crate::fstruct::{FeatStruct, FeatureValue, NodeId, Slot, TYPE_FEATURE};

impl FeatStruct {
    /// Nodes with more than one incoming reference (the root counts as one).
    fn shared_nodes(&self) -> HashSet<NodeId> {
        let mut counts: HashMap<NodeId, usize> = HashMap::new();
        counts.insert(self.root(), 1);
        for id in self.reachable() {
            for slot in self.node(id).values() {
                if let Slot::Node(child) = slot {
                    *counts.entry(*child).or_default() += 1;
                }
            }
        }
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, _)| id)
            .collect()
    }

    fn fmt_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        id: NodeId,
        shared: &HashSet<NodeId>,
        tags: &mut HashMap<NodeId, usize>,
    ) -> fmt::Result {
        if shared.contains(&id) {
            let tag = tags.len() + 1;
            tags.insert(id, tag);
            write!(f, "({tag})")?;
        }

        let node = self.node(id);
        let label = match node.get(TYPE_FEATURE) {
            Some(Slot::Atom(Atom::Str(s))) => Some(s.to_string()),
            Some(Slot::Var(v)) => Some(v.to_string()),
            _ => None,
        };
        let rest: Vec<_> = node
            .iter()
            .filter(|(name, _)| label.is_none() || name.as_ref() != TYPE_FEATURE)
            .collect();

        if let Some(label) = &label {
            write!(f, "{label}")?;
            if rest.is_empty() {
                return Ok(());
            }
        }

        write!(f, "[")?;
        for (i, (name, slot)) in rest.into_iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            match slot {
                Slot::Atom(Atom::Bool(true)) => write!(f, "+{name}")?,
                Slot::Atom(Atom::Bool(false)) => write!(f, "-{name}")?,
                Slot::Atom(a) => write!(f, "{name}={a}")?,
                Slot::Var(v) => write!(f, "{name}={v}")?,
                Slot::Node(child) => {
                    if let Some(tag) = tags.get(child) {
                        write!(f, "{name}->({tag})")?;
                    } else {
                        write!(f, "{name}=")?;
                        self.fmt_node(f, *child, shared, tags)?;
                    }
                }
            }
        }
        write!(f, "]")
    }
}

impl fmt::Display for FeatStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let shared = self.shared_nodes();
        let mut tags = HashMap::new();
        self.fmt_node(f, self.root(), &shared, &mut tags)
    }
}

impl fmt::Debug for FeatStruct {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FeatStruct({self})")
    }
}

impl fmt::Display for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(a) => write!(f, "{a}"),
            Self::Var(v) => write!(f, "{v}"),
            Self::Struct(fs) => write!(f, "{fs}"),
        }
    }
}

impl fmt::Debug for FeatureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atom(a) => write!(f, "{a:?}"),
            Self::Var(v) => write!(f, "{v}"),
            Self::Struct(fs) => write!(f, "{fs}"),
        }
    }
}
