//! Diagnostic codes emitted by the library crate.

use genmap_diagnostics::{Category, DiagnosticCode};

/// Input sensors, models, structures, and parts disagree or are too few.
pub const INPUT_MISMATCH: DiagnosticCode = DiagnosticCode::new(Category::Library, 101);
/// Output devices, models, parts, and structures disagree or are too few.
pub const OUTPUT_MISMATCH: DiagnosticCode = DiagnosticCode::new(Category::Library, 102);
/// Gate structures, models, and gates disagree or gate instances are too few.
pub const GATE_MISMATCH: DiagnosticCode = DiagnosticCode::new(Category::Library, 103);
/// A part was left out of the catalog because its model could not be resolved.
pub const PART_SKIPPED: DiagnosticCode = DiagnosticCode::new(Category::Library, 201);
/// A gate group's variants disagree on gate type.
pub const MIXED_GATE_TYPES: DiagnosticCode = DiagnosticCode::new(Category::Library, 202);
