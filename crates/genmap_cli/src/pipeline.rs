//! Shared pipeline helpers for CLI commands.
//!
//! Project root resolution, logging setup, loading the configured netlist and
//! UCF, and diagnostic rendering.

use std::path::{Path, PathBuf};

use genmap_config::{ProjectConfig, ResolvedPaths, CONFIG_FILE_NAME};
use genmap_diagnostics::{Diagnostic, DiagnosticRenderer, Severity, TerminalRenderer};
use genmap_library::Ucf;
use genmap_netlist::Netlist;
use genmap_techmap::RoleGraph;

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `genmap.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE_NAME} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Locates and loads the project configuration.
///
/// With `--config`, a file path is loaded directly (its directory becomes the
/// project root) and a directory is searched for `genmap.toml`. Otherwise the
/// current directory and its parents are searched.
pub fn load_project(
    global: &GlobalArgs,
) -> Result<(PathBuf, ProjectConfig), Box<dyn std::error::Error>> {
    match global.config {
        Some(ref config_path) => {
            let p = PathBuf::from(config_path);
            if p.is_file() {
                let dir = p
                    .parent()
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                let config = genmap_config::load_config_file(&p)?;
                Ok((dir, config))
            } else {
                let config = genmap_config::load_config(&p)?;
                Ok((p, config))
            }
        }
        None => {
            let dir = find_project_root(&std::env::current_dir()?)?;
            let config = genmap_config::load_config(&dir)?;
            Ok((dir, config))
        }
    }
}

/// Everything a command needs about the design under test.
pub struct Design {
    /// The project configuration.
    pub config: ProjectConfig,
    /// Absolute input and output locations.
    pub paths: ResolvedPaths,
    /// The validated netlist.
    pub netlist: Netlist,
    /// The loaded UCF.
    pub ucf: Ucf,
    /// The netlist's role graph.
    pub graph: RoleGraph,
}

/// Loads the netlist and UCF named by the project configuration.
///
/// A missing or invalid netlist is reported as a failed precondition: the
/// synthesis step that writes it has not run, or did not succeed.
pub fn load_design(global: &GlobalArgs) -> Result<Design, Box<dyn std::error::Error>> {
    let (project_dir, config) = load_project(global)?;
    let paths = genmap_config::resolve_paths(&config, &project_dir);

    if !global.quiet {
        eprintln!("   Loading {}", config.project.name);
    }
    let netlist = Netlist::load(&paths.netlist).map_err(|e| {
        format!(
            "netlist {} is missing or invalid ({e}); run synthesis first",
            paths.netlist.display()
        )
    })?;
    let ucf = Ucf::load(&paths.ucf_main, &paths.ucf_input, &paths.ucf_output)?;
    if let Some(version) = ucf.version() {
        log::info!("UCF version {version}");
    }
    let graph = RoleGraph::from_netlist(&netlist);
    Ok(Design {
        config,
        paths,
        netlist,
        ucf,
        graph,
    })
}

/// Installs the `env_logger` backend. `RUST_LOG` wins over the flags.
pub fn init_logging(global: &GlobalArgs) {
    let level = if global.verbose {
        "debug"
    } else if global.quiet {
        "error"
    } else {
        "warn"
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .try_init();
}

/// Renders diagnostics to stderr and returns how many were errors.
pub fn render_diagnostics(diagnostics: &[Diagnostic], global: &GlobalArgs) -> usize {
    let renderer = TerminalRenderer::new(global.color);
    let mut errors = 0;
    for diag in diagnostics {
        if diag.severity == Severity::Error {
            errors += 1;
        } else if global.quiet {
            continue;
        }
        eprint!("{}", renderer.render(diag));
    }
    errors
}
