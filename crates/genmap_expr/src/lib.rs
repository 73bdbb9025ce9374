//! The UCF equation language.
//!
//! UCF `functions` entries carry equations such as
//! `$ymin + ($ymax - $ymin) / (1.0 + ($x / $K) ^ $n)`. This crate lexes and
//! parses them into an [`Expr`] tree with a Pratt parser, then [`compile`]s a
//! tree against a parameter set into a [`Compiled`] program whose remaining free
//! variables are numbered slots, so the hot scoring loop evaluates plain
//! arithmetic without name lookups.

#![warn(missing_docs)]

pub mod ast;
pub mod compile;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{BinaryOp, Expr};
pub use compile::{compile, Compiled};
pub use error::ExprError;
pub use parser::parse;
