//! Configuration types deserialized from `genmap.toml`.

use serde::Deserialize;

/// Default number of annealing evaluations.
pub const DEFAULT_ITERATIONS: u64 = 1_000;

/// Default ceiling on the exact permutation count of a design.
pub const DEFAULT_MAX_PERMUTATIONS: u64 = 10_000_000_000_000;

/// The top-level project configuration parsed from `genmap.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectConfig {
    /// Core project metadata (name, netlist).
    pub project: ProjectMeta,
    /// The three UCF files describing the part library.
    pub library: LibraryConfig,
    /// Search controller settings.
    #[serde(default)]
    pub search: SearchConfig,
    /// Report output settings.
    #[serde(default)]
    pub report: ReportConfig,
}

/// Core project metadata required in every `genmap.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectMeta {
    /// The design name, used as the prefix of report files.
    pub name: String,
    /// Path to the Yosys JSON netlist of the design.
    pub netlist: String,
    /// A brief description of the design.
    #[serde(default)]
    pub description: String,
}

/// Paths of the main, input, and output UCF documents.
#[derive(Debug, Clone, Deserialize)]
pub struct LibraryConfig {
    /// The main UCF (gates, structures, models, functions).
    pub main: String,
    /// The input-sensor UCF.
    pub input: String,
    /// The output-device UCF.
    pub output: String,
}

/// Which search strategy the controller runs.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SearchMode {
    /// Enumerate every permutation.
    Exhaustive,
    /// Bounded simulated annealing over permutation indices (default).
    #[default]
    Annealing,
}

/// Search controller settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchConfig {
    /// The search strategy.
    #[serde(default)]
    pub mode: SearchMode,
    /// Annealing evaluation budget.
    #[serde(default = "default_iterations")]
    pub iterations: u64,
    /// Fixed RNG seed; a fixed seed makes annealing reproducible.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Refuse designs whose permutation count exceeds this ceiling.
    #[serde(default = "default_max_permutations")]
    pub max_permutations: u64,
    /// Worker threads for exhaustive search; `0` uses the rayon default.
    #[serde(default)]
    pub threads: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            mode: SearchMode::default(),
            iterations: DEFAULT_ITERATIONS,
            seed: None,
            max_permutations: DEFAULT_MAX_PERMUTATIONS,
            threads: 0,
        }
    }
}

/// Report output settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Write `<name>_activity-table.csv`.
    #[serde(default = "default_true")]
    pub activity_table: bool,
    /// Write `<name>_circuit-score.csv`.
    #[serde(default = "default_true")]
    pub circuit_score: bool,
    /// Directory receiving report files.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            activity_table: true,
            circuit_score: true,
            output_dir: default_output_dir(),
        }
    }
}

fn default_iterations() -> u64 {
    DEFAULT_ITERATIONS
}

fn default_max_permutations() -> u64 {
    DEFAULT_MAX_PERMUTATIONS
}

fn default_true() -> bool {
    true
}

fn default_output_dir() -> String {
    "out".to_string()
}
