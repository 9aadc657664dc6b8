//! Chart parsing for feature grammars.
//!
//! This crate provides:
//! - [`ChartParser`] - Top-down, bottom-up, and left-corner chart parsing
//! - [`Chart`] - Deduplicated edges with packed derivations
//! - [`ParseTree`] and [`Trees`] - Lazy tree extraction
//! - [`Tracer`] - Step-by-step trace of what the parser did
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use featchart_chart::{ChartParser, Token};
//! use featchart_grammar::parse_grammar;
//!
//! let grammar = parse_grammar(
//!     "S -> NP[num=?n] VP[num=?n]
//!      NP[num=sg] -> 'Kim'
//!      VP[num=sg] -> 'sleeps'",
//! )
//! .unwrap();
//! let parser = ChartParser::new(Arc::new(grammar));
//! let trees = parser.parse_trees(&Token::words("Kim sleeps")).unwrap();
//! assert_eq!(trees.len(), 1);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod chart;
pub mod config;
pub mod edge;
pub mod parser;
mod rules;
pub mod token;
pub mod trace;
pub mod tree;

pub use chart::{Chart, Derivation};
pub use config::{ParseLimits, ParserConfig, Strategy};
pub use edge::{Edge, EdgeId, TreeEdge};
pub use parser::{ChartParser, ParseOutcome, ParseStatus};
pub use token::Token;
pub use trace::{
    HumanFormatter, Rule, TraceBuffer, TraceBufferStats, TraceEvent, TraceFormatter, TraceOutput,
    TraceRecord, Tracer, TracerConfig,
};
pub use tree::{ParseTree, Trees, extract};
