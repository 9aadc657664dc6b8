//! Integration tests for the featchart_grammar crate.
//!
//! Tests for grammar notation and validation:
//! - Reading feature structures, categories, and grammars
//! - Grammar errors with production locations
//! - Replaying local trees against productions

mod licensing;
mod notation;
mod validation;
