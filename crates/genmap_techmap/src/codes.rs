//! Diagnostic codes emitted by the technology mapper.

use genmap_diagnostics::{Category, DiagnosticCode};

/// The netlist's connectivity cannot be scored (cycle, dangling or
/// multiply-driven net).
pub const UNSUPPORTED_TOPOLOGY: DiagnosticCode = DiagnosticCode::new(Category::Search, 101);
/// The assignment space is too large to enumerate.
pub const COMPLEXITY_EXCEEDED: DiagnosticCode = DiagnosticCode::new(Category::Search, 102);
/// The catalog has too few parts of some kind for the netlist.
pub const CONFIGURATION_MISMATCH: DiagnosticCode = DiagnosticCode::new(Category::Search, 103);
/// The search finished without any assignment scoring above zero.
pub const NO_VALID_ASSIGNMENT: DiagnosticCode = DiagnosticCode::new(Category::Search, 201);
/// The search, or one of its shards, was interrupted.
pub const SEARCH_CANCELLED: DiagnosticCode = DiagnosticCode::new(Category::Search, 202);
/// A search shard skipped candidates that reuse a part name.
pub const CANDIDATES_SKIPPED: DiagnosticCode = DiagnosticCode::new(Category::Search, 203);
/// A library or internal failure surfaced during the search.
pub const SEARCH_FAILED: DiagnosticCode = DiagnosticCode::new(Category::Error, 1);
