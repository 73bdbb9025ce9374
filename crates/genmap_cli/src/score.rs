//! `genmap score` — score one hand-picked assignment.

use std::io::{self, Write};

use genmap_diagnostics::DiagnosticSink;
use genmap_library::Catalog;
use genmap_techmap::{score_circuit, Assignment, Candidate};

use crate::pipeline::{load_design, render_diagnostics};
use crate::report;
use crate::{GlobalArgs, ScoreArgs};

/// Runs the `genmap score` command.
pub fn run(args: &ScoreArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let design = load_design(global)?;
    let sink = DiagnosticSink::new();
    let catalog = Catalog::build(&design.ucf, &sink)?;
    render_diagnostics(&sink.take_all(), global);

    let candidate = resolve_candidate(&catalog, args)?;
    if !candidate.is_unique(&catalog) {
        return Err("an assignment may not use the same part twice".into());
    }
    let assignment = match Assignment::bind(&design.graph, &catalog, &candidate) {
        Ok(a) => a,
        Err(err) => {
            render_diagnostics(&[err.diagnostic()], global);
            return Ok(1);
        }
    };
    let scored = match score_circuit(&assignment) {
        Ok(s) => s,
        Err(err) => {
            render_diagnostics(&[err.diagnostic()], global);
            return Ok(1);
        }
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "circuit score: {:.4e}", scored.score)?;
    for (output, device_score) in design.graph.outputs().zip(&scored.device_scores) {
        writeln!(
            out,
            "  {} ({}): {device_score:.4e}",
            design.graph.node(output).name(),
            assignment.part(output).name()
        )?;
    }
    writeln!(out)?;
    report::write_truth_table(&scored.truth_table, &mut out)?;
    Ok(0)
}

/// Looks up every named part, in role order.
pub fn resolve_candidate(catalog: &Catalog, args: &ScoreArgs) -> Result<Candidate, String> {
    fn indices<T>(
        kind: &str,
        names: &[String],
        parts: &[T],
        name_of: impl Fn(&T) -> &str,
    ) -> Result<Vec<usize>, String> {
        names
            .iter()
            .map(|name| {
                parts
                    .iter()
                    .position(|p| name_of(p) == name.as_str())
                    .ok_or_else(|| format!("unknown {kind} '{name}'"))
            })
            .collect()
    }
    Ok(Candidate {
        inputs: indices("input sensor", &args.inputs, &catalog.sensors, |s| s.name.as_str())?,
        outputs: indices("output device", &args.outputs, &catalog.devices, |d| d.name.as_str())?,
        groups: indices("gate group", &args.gates, &catalog.groups, |g| g.name.as_str())?,
    })
}
