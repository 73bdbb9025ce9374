//! Library/netlist compatibility check, run before any search.

use crate::codes::{GATE_MISMATCH, INPUT_MISMATCH, OUTPUT_MISMATCH};
use crate::error::LibraryError;
use crate::records::{decode, LogicConstraintRecord};
use crate::ucf::{Section, Ucf};
use genmap_diagnostics::{Diagnostic, DiagnosticSink};

/// How many inputs, outputs, and gates a netlist needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DesignSize {
    /// Primary inputs.
    pub inputs: usize,
    /// Primary outputs.
    pub outputs: usize,
    /// NOR/NOT gates.
    pub gates: usize,
}

/// The counts compared by [`check_conditions`] and their verdicts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompatibilityReport {
    /// `input_sensors` records in the input UCF.
    pub input_sensors: usize,
    /// `models` records in the input UCF.
    pub input_models: usize,
    /// `structures` records in the input UCF.
    pub input_structures: usize,
    /// `parts` records in the input UCF.
    pub input_parts: usize,
    /// `output_devices` records in the output UCF.
    pub output_devices: usize,
    /// `models` records in the output UCF.
    pub output_models: usize,
    /// `parts` records in the output UCF.
    pub output_parts: usize,
    /// `structures` records in the output UCF.
    pub output_structures: usize,
    /// `structures` records in the main UCF.
    pub structures: usize,
    /// `models` records in the main UCF.
    pub models: usize,
    /// `gates` records in the main UCF.
    pub gates: usize,
    /// Distinct gate groups in the main UCF.
    pub gate_groups: usize,
    /// `max_instances` of the first available gate type.
    pub max_instances: Option<u64>,
    /// The netlist being checked.
    pub design: DesignSize,
    /// Input sensors are consistent and sufficient.
    pub inputs_match: bool,
    /// Output devices are consistent and sufficient.
    pub outputs_match: bool,
    /// Gates are consistent and sufficient.
    pub gates_match: bool,
}

impl CompatibilityReport {
    /// Returns `true` when every check passed.
    pub fn is_compatible(&self) -> bool {
        self.inputs_match && self.outputs_match && self.gates_match
    }
}

/// Compares the UCF's collection counts against a netlist's size.
///
/// Each failed check is reported to `sink` as an error. The returned report
/// carries every count, whether or not the checks passed.
pub fn check_conditions(
    ucf: &Ucf,
    design: DesignSize,
    sink: &DiagnosticSink,
) -> Result<CompatibilityReport, LibraryError> {
    let count = |section: Section, collection: &str| ucf.query(section, collection).len();

    let mut max_instances = None;
    for record in ucf.query(Section::Main, "logic_constraints") {
        let constraint: LogicConstraintRecord = decode("logic_constraints", record)?;
        if let Some(first) = constraint.available_gates.first() {
            max_instances = Some(first.max_instances());
            break;
        }
    }

    let mut groups: Vec<&str> = Vec::new();
    for gate in ucf.query(Section::Main, "gates") {
        if let Some(group) = gate.get("group").and_then(|g| g.as_str()) {
            if !groups.contains(&group) {
                groups.push(group);
            }
        }
    }

    let mut report = CompatibilityReport {
        input_sensors: count(Section::Input, "input_sensors"),
        input_models: count(Section::Input, "models"),
        input_structures: count(Section::Input, "structures"),
        input_parts: count(Section::Input, "parts"),
        output_devices: count(Section::Output, "output_devices"),
        output_models: count(Section::Output, "models"),
        output_parts: count(Section::Output, "parts"),
        output_structures: count(Section::Output, "structures"),
        structures: ucf.collection_count("structures"),
        models: ucf.collection_count("models"),
        gates: ucf.collection_count("gates"),
        gate_groups: groups.len(),
        max_instances,
        design,
        ..CompatibilityReport::default()
    };

    report.inputs_match = report.input_sensors == report.input_models
        && report.input_models == report.input_structures
        && report.input_parts >= design.inputs;
    if !report.inputs_match {
        sink.emit(
            Diagnostic::error(INPUT_MISMATCH, "input sensors do not fit the design")
                .with_subject("input UCF")
                .with_note(format!(
                    "{} sensors, {} models, {} structures, {} parts for {} netlist inputs",
                    report.input_sensors,
                    report.input_models,
                    report.input_structures,
                    report.input_parts,
                    design.inputs
                ))
                .with_help("sensor, model, and structure counts must agree; parts cover inputs"),
        );
    }

    report.outputs_match = report.output_devices == report.output_models
        && report.output_models == report.output_parts
        && report.output_parts == report.output_structures
        && report.output_parts >= design.outputs;
    if !report.outputs_match {
        sink.emit(
            Diagnostic::error(OUTPUT_MISMATCH, "output devices do not fit the design")
                .with_subject("output UCF")
                .with_note(format!(
                    "{} devices, {} models, {} parts, {} structures for {} netlist outputs",
                    report.output_devices,
                    report.output_models,
                    report.output_parts,
                    report.output_structures,
                    design.outputs
                ))
                .with_help("device, model, part, and structure counts must agree"),
        );
    }

    let instances_suffice = max_instances.is_some_and(|m| m >= design.gates as u64);
    report.gates_match = report.structures == report.models
        && report.models == report.gates
        && instances_suffice;
    if !report.gates_match {
        let limit = max_instances.map_or_else(|| "no".to_string(), |m| m.to_string());
        sink.emit(
            Diagnostic::error(GATE_MISMATCH, "gates do not fit the design")
                .with_subject("main UCF")
                .with_note(format!(
                    "{} structures, {} models, {} gates, {limit} instance limit for {} gates",
                    report.structures, report.models, report.gates, design.gates
                )),
        );
    }

    log::debug!(
        "compatibility: inputs {}, outputs {}, gates {}",
        report.inputs_match,
        report.outputs_match,
        report.gates_match
    );
    Ok(report)
}
