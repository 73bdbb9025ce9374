//! Path resolution: anchoring configured paths at the project directory.

use crate::types::ProjectConfig;
use std::path::{Path, PathBuf};

/// Every file path a run needs, resolved against the project directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// The Yosys JSON netlist.
    pub netlist: PathBuf,
    /// The main UCF document.
    pub ucf_main: PathBuf,
    /// The input-sensor UCF document.
    pub ucf_input: PathBuf,
    /// The output-device UCF document.
    pub ucf_output: PathBuf,
    /// The report directory.
    pub output_dir: PathBuf,
}

/// Resolves every configured path relative to `project_dir`.
///
/// Absolute paths are kept as they are.
pub fn resolve_paths(config: &ProjectConfig, project_dir: &Path) -> ResolvedPaths {
    let anchor = |p: &str| {
        let path = Path::new(p);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_dir.join(path)
        }
    };
    ResolvedPaths {
        netlist: anchor(&config.project.netlist),
        ucf_main: anchor(&config.library.main),
        ucf_input: anchor(&config.library.input),
        ucf_output: anchor(&config.library.output),
        output_dir: anchor(&config.report.output_dir),
    }
}
