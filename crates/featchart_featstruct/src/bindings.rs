//! Variable bindings produced by unification.

use std::fmt;

use im::OrdMap;

use featchart_foundation::Variable;

use crate::fstruct::FeatureValue;

/// A set of variable bindings.
///
/// Backed by a persistent map, so cloning is O(1) and every chart edge can
/// carry its own copy. A variable may be bound to another variable; use
/// [`resolve`](Self::resolve) to follow such chains.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Bindings {
    values: OrdMap<Variable, FeatureValue>,
}

impl Bindings {
    /// Create empty bindings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of bound variables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if no variable is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Get the value a variable is directly bound to.
    #[must_use]
    pub fn get(&self, var: &Variable) -> Option<&FeatureValue> {
        self.values.get(var)
    }

    /// Returns true if the variable is bound.
    #[must_use]
    pub fn contains(&self, var: &Variable) -> bool {
        self.values.contains_key(var)
    }

    /// Bind a variable, replacing any previous binding.
    pub fn bind(&mut self, var: Variable, value: FeatureValue) {
        self.values.insert(var, value);
    }

    /// Returns a copy with one more binding.
    #[must_use]
    pub fn with(&self, var: Variable, value: impl Into<FeatureValue>) -> Self {
        let mut next = self.clone();
        next.bind(var, value.into());
        next
    }

    /// Follows variable-to-variable links and returns the final value.
    ///
    /// Returns `None` if `var` is unbound. A chain that ends in an unbound
    /// variable resolves to that variable.
    #[must_use]
    pub fn resolve(&self, var: &Variable) -> Option<FeatureValue> {
        let mut current = self.values.get(var)?;
        for _ in 0..self.values.len() {
            match current {
                FeatureValue::Var(next) => match self.values.get(next) {
                    Some(value) => current = value,
                    None => return Some(current.clone()),
                },
                other => return Some(other.clone()),
            }
        }
        Some(current.clone())
    }

    /// Iterate all bindings in variable order.
    pub fn iter(&self) -> impl Iterator<Item = (&Variable, &FeatureValue)> {
        self.values.iter()
    }

    /// Returns the bound variables in order.
    pub fn variables(&self) -> impl Iterator<Item = &Variable> {
        self.values.keys()
    }

    /// Returns a copy with every variable (bound or inside a value) renamed.
    #[must_use]
    pub fn rename_variables(&self, f: &impl Fn(&Variable) -> Variable) -> Self {
        Self {
            values: self
                .values
                .iter()
                .map(|(var, value)| (f(var), value.rename_variables(f)))
                .collect(),
        }
    }

    /// Returns a copy keeping only the bindings whose variable passes `keep`.
    #[must_use]
    pub fn retain(&self, keep: impl Fn(&Variable) -> bool) -> Self {
        Self {
            values: self
                .values
                .iter()
                .filter(|(var, _)| keep(var))
                .map(|(var, value)| (var.clone(), value.clone()))
                .collect(),
        }
    }

    /// Appends the variables mentioned by these bindings (keys first, then
    /// values) to `out` in order, skipping ones already present.
    pub fn collect_variables(&self, out: &mut Vec<Variable>) {
        for (var, value) in &self.values {
            if !out.contains(var) {
                out.push(var.clone());
            }
            value.collect_variables(out);
        }
    }

    /// Returns the largest variable scope mentioned (0 if none).
    #[must_use]
    pub fn max_scope(&self) -> u32 {
        let mut vars = Vec::new();
        self.collect_variables(&mut vars);
        vars.iter().map(Variable::scope).max().unwrap_or(0)
    }
}

impl fmt::Display for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{")?;
        for (i, (var, value)) in self.values.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{var}: {value}")?;
        }
        write!(f, "}}")
    }
}

impl fmt::Debug for Bindings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bindings{self}")
    }
}
