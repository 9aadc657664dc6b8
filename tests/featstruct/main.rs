//! Integration tests for the featchart_featstruct crate.
//!
//! Tests for feature structures and unification:
//! - Unification of atoms, variables, and nested structures
//! - Reentrancy and shared updates
//! - Subsumption
//! - Algebraic properties

mod properties;
mod reentrancy;
mod subsumption;
mod unification;
