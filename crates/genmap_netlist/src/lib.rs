//! Synthesized netlist loading.
//!
//! Reads the JSON netlist written by Yosys for a design mapped to `$_NOR_`
//! and `$_NOT_` cells, checks that it is something the mapper can place
//! (single-bit ports, one- and two-input gates, no leftover parameters or
//! attributes, every port used), and exposes it as a typed [`Netlist`].

#![warn(missing_docs)]

pub mod error;
pub mod netlist;
mod yosys;

pub use error::NetlistError;
pub use netlist::{GateKind, Netlist, NetlistGate, NetlistPort};
