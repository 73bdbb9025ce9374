//! `genmap check` — library/netlist compatibility.
//!
//! Loads the configured netlist and UCF, compares collection counts against
//! the design, builds the part catalog, and reports every finding. Exits 1 if
//! the library cannot cover the design.

use genmap_diagnostics::DiagnosticSink;
use genmap_library::{check_conditions, Catalog, CompatibilityReport};

use crate::pipeline::{load_design, render_diagnostics};
use crate::GlobalArgs;

/// Runs the `genmap check` command.
pub fn run(global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let design = load_design(global)?;
    let sink = DiagnosticSink::new();
    let report = check_conditions(&design.ucf, design.graph.size(), &sink)?;
    let catalog = Catalog::build(&design.ucf, &sink)?;

    if !global.quiet {
        eprintln!(
            "   Netlist {}: {} inputs, {} outputs, {} gates",
            design.netlist.name,
            design.netlist.inputs.len(),
            design.netlist.outputs.len(),
            design.netlist.gates.len()
        );
        print_report(&report);
        eprintln!(
            "   Catalog: {} sensors, {} devices, {} gate groups",
            catalog.sensors.len(),
            catalog.devices.len(),
            catalog.groups.len()
        );
        let units = catalog
            .units
            .as_ref()
            .and_then(|u| u.signal_carrier_units.as_deref());
        if let Some(units) = units {
            eprintln!("   Signal units: {units}");
        }
    }

    let errors = render_diagnostics(&sink.take_all(), global);
    if !global.quiet {
        let verdict = if report.is_compatible() { "compatible" } else { "incompatible" };
        eprintln!("   Result: {verdict}, {errors} error(s)");
    }
    Ok(if report.is_compatible() && errors == 0 { 0 } else { 1 })
}

fn print_report(report: &CompatibilityReport) {
    let mark = |ok: bool| if ok { "ok" } else { "MISMATCH" };
    eprintln!(
        "   Inputs:  {} sensors, {} models, {} structures, {} parts for {} inputs [{}]",
        report.input_sensors,
        report.input_models,
        report.input_structures,
        report.input_parts,
        report.design.inputs,
        mark(report.inputs_match)
    );
    eprintln!(
        "   Outputs: {} devices, {} models, {} parts, {} structures for {} outputs [{}]",
        report.output_devices,
        report.output_models,
        report.output_parts,
        report.output_structures,
        report.design.outputs,
        mark(report.outputs_match)
    );
    let instances = report
        .max_instances
        .map_or_else(
            || "no".to_string(),
            |n| if n == u64::MAX { "unlimited".to_string() } else { n.to_string() },
        );
    eprintln!(
        "   Gates:   {} structures, {} models, {} gates ({} groups), \
         {instances} max instances for {} gates [{}]",
        report.structures,
        report.models,
        report.gates,
        report.gate_groups,
        report.design.gates,
        mark(report.gates_match)
    );
}
