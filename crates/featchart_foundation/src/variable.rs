//! Unification variables.
//!
//! A variable is written `?name` in grammar notation. Every variable also
//! carries a numeric scope: scope 0 belongs to the production the variable
//! was written in, and the chart parser renames variables into other scopes
//! whenever two productions meet, so that `?n` in one rule never aliases
//! `?n` in another.

use std::fmt;
use std::sync::Arc;

/// A unification variable identified by name and scope.
///
/// Ordering is by name, then scope. The unifier uses this order to decide
/// which of two unbound variables becomes the representative, which keeps
/// unification results independent of argument order.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Variable {
    name: Arc<str>,
    scope: u32,
}

impl Variable {
    /// Creates a variable in the production scope (scope 0).
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            scope: 0,
        }
    }

    /// Creates a variable in an explicit scope.
    #[must_use]
    pub fn scoped(name: impl Into<Arc<str>>, scope: u32) -> Self {
        Self {
            name: name.into(),
            scope,
        }
    }

    /// Returns the variable name (without the leading `?`).
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the variable scope.
    #[must_use]
    pub const fn scope(&self) -> u32 {
        self.scope
    }

    /// Returns true if this variable belongs to the production scope.
    #[must_use]
    pub const fn is_local(&self) -> bool {
        self.scope == 0
    }

    /// Returns the same variable moved into another scope.
    #[must_use]
    pub fn with_scope(&self, scope: u32) -> Self {
        Self {
            name: self.name.clone(),
            scope,
        }
    }
}

impl fmt::Debug for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self}")
    }
}

impl fmt::Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.scope == 0 {
            write!(f, "?{}", self.name)
        } else {
            write!(f, "?{}#{}", self.name, self.scope)
        }
    }
}
