//! Feature structures and unification for featchart.
//!
//! This crate provides:
//! - [`FeatStruct`] - Arena-backed feature structures with reentrancy
//! - [`FeatureValue`] - Self-contained atom / variable / structure values
//! - [`Bindings`] - Persistent variable bindings
//! - [`unify`] and [`subsumes`] - The unification engine

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod bindings;
mod display;
pub mod fstruct;
mod graph;
pub mod unify;

pub use bindings::Bindings;
pub use fstruct::{FeatStruct, FeatStructBuilder, FeatureValue, Name, NodeId, TYPE_FEATURE};
pub use unify::{Clash, Unified, UnifyFailure, subsumes, unify, unify_values};

// Re-export foundation types commonly used alongside feature structures
pub use featchart_foundation::{Atom, Variable};
