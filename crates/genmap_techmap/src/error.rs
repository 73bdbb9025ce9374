//! Error types for role-graph construction, scoring, and search.

use crate::codes::{
    COMPLEXITY_EXCEEDED, CONFIGURATION_MISMATCH, NO_VALID_ASSIGNMENT, SEARCH_CANCELLED,
    SEARCH_FAILED, UNSUPPORTED_TOPOLOGY,
};
use genmap_common::InternalError;
use genmap_diagnostics::Diagnostic;
use genmap_library::LibraryError;

/// Errors that can occur while mapping a netlist onto a part catalog.
#[derive(Debug, thiserror::Error)]
pub enum TechmapError {
    /// The catalog cannot cover the netlist.
    #[error("library cannot cover the design: {0}")]
    ConfigurationMismatch(String),

    /// The number of candidate assignments is above the configured ceiling
    /// (`count` is `None` when it does not fit in 128 bits).
    #[error("{} candidate assignments exceed the ceiling of {ceiling}", describe_count(.count))]
    ComplexityExceeded {
        /// Number of candidates, if representable.
        count: Option<u128>,
        /// Configured ceiling.
        ceiling: u128,
    },

    /// A node feeds back into itself.
    #[error("unsupported topology: {node} is part of a combinational cycle")]
    UnsupportedTopology {
        /// Node description.
        node: String,
    },

    /// The truth table would have more rows than fit in memory indices.
    #[error("{inputs} inputs give more truth-table rows than can be addressed")]
    TooManyInputs {
        /// Primary inputs of the netlist.
        inputs: usize,
    },

    /// No candidate scored above zero.
    #[error("no valid assignment found after {evaluated} evaluations")]
    NoValidAssignment {
        /// Candidates scored.
        evaluated: u64,
    },

    /// A node reads a net nothing drives.
    #[error("{node} reads bit {bit}, which no gate or input drives")]
    UnresolvedPredecessor {
        /// Node description.
        node: String,
        /// The undriven bit.
        bit: u32,
    },

    /// A node reads a net with several drivers.
    #[error("{node} reads bit {bit}, which has {drivers} drivers")]
    AmbiguousPredecessor {
        /// Node description.
        node: String,
        /// The multiply-driven bit.
        bit: u32,
        /// Number of drivers found.
        drivers: usize,
    },

    /// An input was reached during scoring without a level for the row.
    #[error("{node} has no level in the current row")]
    InputLevelUnset {
        /// Node description.
        node: String,
    },

    /// The search was interrupted before any assignment scored above zero.
    #[error("search cancelled")]
    Cancelled,

    /// A library lookup failed.
    #[error(transparent)]
    Library(#[from] LibraryError),

    /// The worker pool could not be created.
    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),

    /// A broken invariant.
    #[error(transparent)]
    Internal(#[from] InternalError),
}

fn describe_count(count: &Option<u128>) -> String {
    count.map_or_else(|| "more than 2^128".to_string(), |c| c.to_string())
}

impl TechmapError {
    /// Converts the error into a diagnostic for rendering.
    ///
    /// [`TechmapError::NoValidAssignment`] becomes a warning: the run
    /// completed, it just found nothing worth reporting.
    pub fn diagnostic(&self) -> Diagnostic {
        let message = self.to_string();
        match self {
            TechmapError::ConfigurationMismatch(_) => {
                Diagnostic::error(CONFIGURATION_MISMATCH, message)
                    .with_help("check the UCF with `genmap check` for per-collection counts")
            }
            TechmapError::ComplexityExceeded { .. } => {
                Diagnostic::error(COMPLEXITY_EXCEEDED, message)
                    .with_help("raise `search.max_permutations` or use a smaller library")
            }
            TechmapError::TooManyInputs { .. } => Diagnostic::error(COMPLEXITY_EXCEEDED, message),
            TechmapError::UnsupportedTopology { node } => {
                Diagnostic::error(UNSUPPORTED_TOPOLOGY, message).with_subject(node.clone())
            }
            TechmapError::UnresolvedPredecessor { node, .. }
            | TechmapError::AmbiguousPredecessor { node, .. } => {
                Diagnostic::error(UNSUPPORTED_TOPOLOGY, message).with_subject(node.clone())
            }
            TechmapError::NoValidAssignment { .. } => {
                Diagnostic::warning(NO_VALID_ASSIGNMENT, message)
                    .with_note("every candidate scored zero or failed the uniqueness check")
            }
            TechmapError::Cancelled => Diagnostic::error(SEARCH_CANCELLED, message),
            TechmapError::InputLevelUnset { node } => {
                Diagnostic::error(SEARCH_FAILED, message).with_subject(node.clone())
            }
            TechmapError::Library(_) | TechmapError::ThreadPool(_) | TechmapError::Internal(_) => {
                Diagnostic::error(SEARCH_FAILED, message)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genmap_diagnostics::Severity;

    #[test]
    fn complexity_message() {
        let err = TechmapError::ComplexityExceeded {
            count: Some(22_992_076_800),
            ceiling: 1_000,
        };
        assert_eq!(
            err.to_string(),
            "22992076800 candidate assignments exceed the ceiling of 1000"
        );
        let overflow = TechmapError::ComplexityExceeded {
            count: None,
            ceiling: 1_000,
        };
        assert!(overflow.to_string().starts_with("more than 2^128"));
    }

    #[test]
    fn no_valid_assignment_is_a_warning() {
        let diag = TechmapError::NoValidAssignment { evaluated: 12 }.diagnostic();
        assert_eq!(diag.severity, Severity::Warning);
        assert_eq!(diag.code, NO_VALID_ASSIGNMENT);
    }

    #[test]
    fn topology_errors_carry_subject() {
        let diag = TechmapError::UnsupportedTopology {
            node: "NOR gate 7".into(),
        }
        .diagnostic();
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.subject.as_deref(), Some("NOR gate 7"));
    }
}
