//! Featchart - Feature grammars and chart parsing
//!
//! This crate re-exports all layers of the featchart system for convenient access.
//! For detailed documentation, see the individual layer crates.
//!
//! # Architecture
//!
//! ```text
//! Layer 3: featchart_chart       - Chart parser, tree extraction, tracing
//! Layer 2: featchart_grammar     - Categories, productions, grammar notation
//! Layer 1: featchart_featstruct  - Feature structures, unification, subsumption
//! Layer 0: featchart_foundation  - Core types (Atom, Variable, Error)
//! ```

pub use featchart_chart as chart;
pub use featchart_featstruct as featstruct;
pub use featchart_foundation as foundation;
pub use featchart_grammar as grammar;
