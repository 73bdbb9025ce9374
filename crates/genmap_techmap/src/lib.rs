//! Technology mapping of NOR/NOT netlists onto genetic part libraries.
//!
//! A [`RoleGraph`] turns a netlist into input, gate, and output placeholders.
//! An [`Assignment`] binds catalog parts onto them, and [`CircuitScorer`]
//! evaluates the bound circuit over its full truth table. [`techmap`] searches
//! the space of assignments, exhaustively or by simulated annealing, and
//! returns the best-scoring ones.

#![warn(missing_docs)]

pub mod assignment;
pub mod codes;
pub mod error;
pub mod permute;
pub mod role;
pub mod scorer;
pub mod search;
pub mod truth_table;

pub use assignment::{Assignment, Candidate, PartBinding, RowState};
pub use error::TechmapError;
pub use role::{NodeId, RoleGraph, RoleNode};
pub use scorer::{reduce_device_score, score_circuit, CircuitScorer, ScoredCircuit};
pub use search::{
    techmap, techmap_with_diagnostics, BestResult, BestTracker, MappedCircuit, NodeBinding,
    SearchMode, SearchOptions, SearchSpace, SearchStats, SearchStrategy, SimulatedAnnealing,
};
pub use truth_table::{Cell, TruthRow, TruthTable};
