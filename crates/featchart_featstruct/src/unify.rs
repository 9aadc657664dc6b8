//! Unification and subsumption.
//!
//! Unification never fails fatally: a clash is an ordinary `Err` value that
//! callers (the chart rules) use to discard one candidate.

use std::fmt;

use thiserror::Error;

use featchart_foundation::Atom;

use crate::bindings::Bindings;
use crate::fstruct::{FeatStruct, FeatureValue, Name};
use crate::graph::Graph;

/// Why two values could not be unified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Clash {
    /// Two different atoms.
    Atoms(Atom, Atom),
    /// Values of incompatible kinds (atom against structure, two distinct
    /// fixed variables, ...).
    Shapes {
        /// Description of the left value.
        left: String,
        /// Description of the right value.
        right: String,
    },
}

impl fmt::Display for Clash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Atoms(a, b) => write!(f, "{a} vs {b}"),
            Self::Shapes { left, right } => write!(f, "{left} vs {right}"),
        }
    }
}

/// A failed unification: the feature path at which the clash occurred.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("cannot unify at {}: {clash}", display_path(.path))]
pub struct UnifyFailure {
    /// Feature names from the root to the clash (empty at the root).
    pub path: Vec<Name>,
    /// The clashing values.
    pub clash: Clash,
}

fn display_path(path: &[Name]) -> String {
    if path.is_empty() {
        "root".to_string()
    } else {
        path.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join(".")
    }
}

/// Result of a successful unification.
pub type Unified<T> = Result<(T, Bindings), UnifyFailure>;

/// Unifies two feature structures under `bindings`.
///
/// Variables bound in `bindings` are resolved first; newly bound variables
/// are returned in the extended bindings. The result contains no variable
/// that the returned bindings bind.
///
/// # Errors
///
/// Returns a [`UnifyFailure`] if the structures are incompatible.
pub fn unify(a: &FeatStruct, b: &FeatStruct, bindings: &Bindings) -> Unified<FeatStruct> {
    let mut graph = Graph::new(bindings);
    let ta = graph.import(a);
    let tb = graph.import(b);
    graph.unify(ta, tb)?;
    Ok((graph.export(ta), graph.updated_bindings(bindings)))
}

/// Unifies two arbitrary feature values under `bindings`.
///
/// # Errors
///
/// Returns a [`UnifyFailure`] if the values are incompatible.
pub fn unify_values(
    a: &FeatureValue,
    b: &FeatureValue,
    bindings: &Bindings,
) -> Unified<FeatureValue> {
    let mut graph = Graph::new(bindings);
    let ta = graph.import_value(a);
    let tb = graph.import_value(b);
    graph.unify(ta, tb)?;
    Ok((graph.export_value(ta), graph.updated_bindings(bindings)))
}

/// Returns true if `general` subsumes `specific`.
///
/// `general` subsumes `specific` when it carries no information `specific`
/// lacks: unifying them succeeds and yields a structure equal to
/// `specific`. Variables of `specific` are held fixed during the check.
#[must_use]
pub fn subsumes(general: &FeatStruct, specific: &FeatStruct) -> bool {
    let empty = Bindings::new();
    let mut graph = Graph::new(&empty).with_rigid(specific.variables());
    let tg = graph.import(general);
    let ts = graph.import(specific);
    if graph.unify(tg, ts).is_err() {
        return false;
    }
    graph.export(ts) == *specific
}

impl FeatStruct {
    /// Unifies this structure with another under empty bindings.
    ///
    /// # Errors
    ///
    /// Returns a [`UnifyFailure`] if the structures are incompatible.
    pub fn unify(&self, other: &Self) -> Result<Self, UnifyFailure> {
        unify(self, other, &Bindings::new()).map(|(fs, _)| fs)
    }

    /// Returns true if this structure subsumes `other`.
    #[must_use]
    pub fn subsumes(&self, other: &Self) -> bool {
        subsumes(self, other)
    }

    /// Replaces every variable bound in `bindings` by its value.
    ///
    /// Bound structures are copied in, so sharing through a variable becomes
    /// sharing of the node.
    #[must_use]
    pub fn substitute(&self, bindings: &Bindings) -> Self {
        if bindings.is_empty() {
            return self.clone();
        }
        let mut graph = Graph::new(bindings);
        let root = graph.import(self);
        graph.export(root)
    }
}
