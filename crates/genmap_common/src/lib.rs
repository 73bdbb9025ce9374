//! Shared foundational types used across the genmap workspace.
//!
//! This crate provides the two-state logic [`Level`] carried through truth
//! tables, the `define_id!` macro for opaque arena indices, and the common
//! internal-error result type.

#![warn(missing_docs)]

pub mod ids;
pub mod level;
pub mod result;

pub use level::Level;
pub use result::{GenmapResult, InternalError};
