//! Grammar categories.

use std::fmt;

use featchart_featstruct::{
    Bindings, FeatStruct, FeatureValue, Name, TYPE_FEATURE, Unified, Variable, unify,
};

/// A feature structure labelling a grammar symbol.
///
/// The syntactic class (`S`, `NP`, `V`, ...) is stored in the distinguished
/// [`TYPE_FEATURE`]; every other feature is ordinary. Categories unify
/// exactly as feature structures.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Category(FeatStruct);

impl Category {
    /// Creates a category with only a label.
    #[must_use]
    pub fn new(label: &str) -> Self {
        Self(FeatStruct::new().with(TYPE_FEATURE, label))
    }

    /// Wraps a feature structure.
    #[must_use]
    pub const fn from_featstruct(fs: FeatStruct) -> Self {
        Self(fs)
    }

    /// Returns the syntactic label, if the category has one.
    #[must_use]
    pub fn label(&self) -> Option<&str> {
        self.0.atom(TYPE_FEATURE).and_then(|a| a.as_str())
    }

    /// Returns true if the category carries `label`.
    #[must_use]
    pub fn has_label(&self, label: &str) -> bool {
        self.label() == Some(label)
    }

    /// Returns the underlying feature structure.
    #[must_use]
    pub const fn featstruct(&self) -> &FeatStruct {
        &self.0
    }

    /// Consumes the category and returns its feature structure.
    #[must_use]
    pub fn into_featstruct(self) -> FeatStruct {
        self.0
    }

    /// Returns the value of an ordinary feature.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<FeatureValue> {
        self.0.get(name)
    }

    /// Returns a copy with `name` set to `value`.
    #[must_use]
    pub fn with(&self, name: impl Into<Name>, value: impl Into<FeatureValue>) -> Self {
        Self(self.0.with(name, value))
    }

    /// Unifies two categories under `bindings`.
    ///
    /// # Errors
    ///
    /// Returns a unification failure if the categories are incompatible.
    pub fn unify(&self, other: &Self, bindings: &Bindings) -> Unified<Self> {
        unify(&self.0, &other.0, bindings).map(|(fs, b)| (Self(fs), b))
    }

    /// Returns true if this category subsumes `other`.
    #[must_use]
    pub fn subsumes(&self, other: &Self) -> bool {
        self.0.subsumes(&other.0)
    }

    /// Applies bindings to every variable in the category.
    #[must_use]
    pub fn substitute(&self, bindings: &Bindings) -> Self {
        Self(self.0.substitute(bindings))
    }

    /// Returns a copy with every variable renamed through `f`.
    #[must_use]
    pub fn rename_variables(&self, f: &impl Fn(&Variable) -> Variable) -> Self {
        Self(self.0.rename_variables(f))
    }

    /// Returns the variables in first-occurrence order.
    #[must_use]
    pub fn variables(&self) -> Vec<Variable> {
        self.0.variables_in_order()
    }

    /// Returns the largest variable scope in use.
    #[must_use]
    pub fn max_scope(&self) -> u32 {
        self.0.max_scope()
    }
}

impl From<FeatStruct> for Category {
    fn from(fs: FeatStruct) -> Self {
        Self(fs)
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Debug for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Category({})", self.0)
    }
}
