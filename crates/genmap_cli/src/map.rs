//! `genmap map` — search for the best assignment and report it.

use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use genmap_config::SearchConfig;
use genmap_diagnostics::DiagnosticSink;
use genmap_library::{check_conditions, Catalog};
use genmap_techmap::{
    techmap_with_diagnostics, BestResult, SearchMode, SearchOptions, TechmapError,
};

use crate::pipeline::{load_design, render_diagnostics, Design};
use crate::report;
use crate::{GlobalArgs, MapArgs};

/// Runs the `genmap map` command.
///
/// Returns 0 when a mapping was found or the search legitimately found
/// nothing, 1 when the library does not fit or the search failed.
pub fn run(args: &MapArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let design = load_design(global)?;
    let sink = DiagnosticSink::new();

    let compatibility = check_conditions(&design.ucf, design.graph.size(), &sink)?;
    if !compatibility.is_compatible() {
        render_diagnostics(&sink.take_all(), global);
        let err = TechmapError::ConfigurationMismatch(
            "UCF collection counts do not fit the netlist".to_string(),
        );
        render_diagnostics(&[err.diagnostic()], global);
        return Ok(1);
    }
    let catalog = Catalog::build(&design.ucf, &sink)?;
    render_diagnostics(&sink.take_all(), global);

    let mut options = search_options(&design.config.search, args);
    let cancel = Arc::new(AtomicBool::new(false));
    {
        let cancel = cancel.clone();
        if let Err(e) = ctrlc::set_handler(move || cancel.store(true, Ordering::Relaxed)) {
            log::warn!("could not install Ctrl-C handler: {e}");
        }
    }
    options.cancel = Some(cancel);

    if !global.quiet {
        let mode = match options.mode {
            SearchMode::Exhaustive => "exhaustive search",
            SearchMode::Annealing => "simulated annealing",
        };
        eprintln!("     Mapping {} ({mode})", design.graph.name());
    }

    let outcome = techmap_with_diagnostics(&design.graph, &catalog, &options, &sink);
    render_diagnostics(&sink.take_sorted(), global);
    match outcome {
        Ok(result) => {
            report_result(&design, &result, global)?;
            Ok(0)
        }
        Err(err @ TechmapError::NoValidAssignment { .. }) => {
            render_diagnostics(&[err.diagnostic()], global);
            Ok(0)
        }
        Err(err) => {
            render_diagnostics(&[err.diagnostic()], global);
            Ok(1)
        }
    }
}

/// Merges command-line overrides into the configured search settings.
pub fn search_options(config: &SearchConfig, args: &MapArgs) -> SearchOptions {
    let mode = if args.exhaustive {
        SearchMode::Exhaustive
    } else {
        match config.mode {
            genmap_config::SearchMode::Exhaustive => SearchMode::Exhaustive,
            genmap_config::SearchMode::Annealing => SearchMode::Annealing,
        }
    };
    SearchOptions {
        mode,
        iterations: args.iterations.unwrap_or(config.iterations),
        seed: args.seed.or(config.seed),
        max_permutations: u128::from(config.max_permutations),
        threads: args.threads.unwrap_or(config.threads),
        cancel: None,
    }
}

fn report_result(
    design: &Design,
    result: &BestResult,
    global: &GlobalArgs,
) -> Result<(), Box<dyn std::error::Error>> {
    let Some(best) = result.best() else {
        return Ok(());
    };
    let stats = &result.stats;
    if !global.quiet {
        if stats.cancelled {
            eprintln!("warning: search interrupted; reporting the best assignment so far");
        }
        eprintln!(
            "   Completed {}/{} iterations (of {} possible)",
            stats.evaluated, stats.budget, stats.permutations
        );
        eprintln!(
            "       Score {:.4e} ({} best assignment(s))",
            result.score,
            result.circuits.len()
        );
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "circuit score: {:.4e}", result.score)?;
    report::write_bindings(best, &mut out)?;
    writeln!(out)?;
    report::write_truth_table(&best.truth_table, &mut out)?;

    let name = &design.config.project.name;
    let dir = &design.paths.output_dir;
    if design.config.report.activity_table {
        let path = report::write_activity_table(dir, name, &best.truth_table)?;
        log::info!("wrote {}", path.display());
    }
    if design.config.report.circuit_score {
        let path = report::write_circuit_score(dir, name, result.score, best)?;
        log::info!("wrote {}", path.display());
    }
    Ok(())
}
