//! Core atoms, variables, and error types for featchart.
//!
//! This crate provides:
//! - [`Atom`] - Atomic feature values (strings, integers, booleans)
//! - [`Variable`] - Unification variables with production scopes
//! - [`Error`] - Rich error types with context
//! - [`ParseLimit`] - Resource budgets that can abort a parse

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod atom;
pub mod error;
pub mod variable;

pub use atom::Atom;
pub use error::{Error, ErrorContext, ErrorKind, ParseLimit};
pub use variable::Variable;

/// Result type alias using featchart's Error type.
pub type Result<T> = std::result::Result<T, Error>;
