//! Atomic feature values.

use std::fmt;
use std::sync::Arc;

/// An atomic (non-decomposable) feature value.
///
/// Atoms are immutable and cheaply cloneable. Two atoms unify iff they are
/// equal; there is no cross-type coercion (`Int(1)` never equals `Str("1")`).
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Atom {
    /// String value such as `sg` or `'past'`.
    Str(Arc<str>),
    /// 64-bit signed integer.
    Int(i64),
    /// Boolean value, written `+name` / `-name` in feature notation.
    Bool(bool),
}

impl Atom {
    /// Attempts to extract a string reference.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Attempts to extract an integer value.
    #[must_use]
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Attempts to extract a boolean value.
    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Returns a short name for the atom's kind (used in diagnostics).
    #[must_use]
    pub const fn kind_name(&self) -> &'static str {
        match self {
            Self::Str(_) => "string",
            Self::Int(_) => "int",
            Self::Bool(_) => "bool",
        }
    }
}

/// Returns true if `s` can be written without quotes in feature notation.
#[must_use]
pub fn is_bare_word(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '-')
}

impl fmt::Debug for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => write!(f, "{s:?}"),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
        }
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) if is_bare_word(s) => write!(f, "{s}"),
            Self::Str(s) => write!(f, "'{}'", s.replace('\'', "\\'")),
            Self::Int(n) => write!(f, "{n}"),
            Self::Bool(true) => write!(f, "+"),
            Self::Bool(false) => write!(f, "-"),
        }
    }
}

impl From<&str> for Atom {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for Atom {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl From<Arc<str>> for Atom {
    fn from(s: Arc<str>) -> Self {
        Self::Str(s)
    }
}

impl From<i64> for Atom {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<bool> for Atom {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}
