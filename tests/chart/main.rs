//! Integration tests for the featchart_chart crate.
//!
//! Tests for chart parsing end to end:
//! - Agreement, agreement failure, and attachment ambiguity
//! - Agreement between the three strategies
//! - Empty productions, unary cycles, and tagged input
//! - Budgets, tracing, and concurrent parsing
//! - Soundness and completeness of extracted trees

mod concurrency;
mod grammars;
mod limits;
mod scenarios;
mod strategies;
mod tagging;
mod tracing;
