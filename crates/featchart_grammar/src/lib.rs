//! Feature grammars for featchart.
//!
//! This crate provides:
//! - [`Category`] - Labelled feature structures used as grammar symbols
//! - [`Production`] and [`Symbol`] - Context-free productions over categories
//! - [`Grammar`] - A validated, immutable, indexed set of productions
//! - [`parse_grammar`] and friends - The textual grammar notation

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod category;
pub mod grammar;
pub mod lexer;
pub mod production;
pub mod reader;
pub mod span;
pub mod token;

pub use category::Category;
pub use grammar::{Grammar, ProductionId};
pub use production::{Production, Symbol};
pub use reader::{
    Reader, parse_category, parse_featstruct, parse_grammar, parse_grammar_named,
    parse_productions,
};
