//! genmap CLI — the command-line interface for the genetic circuit mapper.
//!
//! Provides `genmap check` to compare a UCF against a synthesized netlist,
//! `genmap map` to search for the best part assignment, and `genmap score` to
//! evaluate one hand-picked assignment.

#![warn(missing_docs)]

mod check;
mod map;
mod pipeline;
mod report;
mod score;

use std::io::IsTerminal;
use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// genmap — technology mapping for genetic logic circuits.
#[derive(Parser, Debug)]
#[command(name = "genmap", version, about = "Genetic circuit technology mapper")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Control colored output.
    #[arg(long, global = true, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    /// Path to a custom `genmap.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Check that the part library can cover the netlist.
    Check,
    /// Search for the best assignment of parts to the netlist.
    Map(MapArgs),
    /// Score one assignment given by part names.
    Score(ScoreArgs),
}

/// Arguments for the `genmap map` subcommand.
#[derive(Parser, Debug)]
pub struct MapArgs {
    /// Enumerate every assignment instead of annealing.
    #[arg(long)]
    pub exhaustive: bool,

    /// Annealing iteration budget (overrides `search.iterations`).
    #[arg(long)]
    pub iterations: Option<u64>,

    /// Annealing seed (overrides `search.seed`).
    #[arg(long)]
    pub seed: Option<u64>,

    /// Worker threads for exhaustive search (overrides `search.threads`).
    #[arg(long)]
    pub threads: Option<usize>,
}

/// Arguments for the `genmap score` subcommand.
#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// Input sensors, in netlist input order.
    #[arg(long, value_delimiter = ',', required = true)]
    pub inputs: Vec<String>,

    /// Output devices, in netlist output order.
    #[arg(long, value_delimiter = ',', required = true)]
    pub outputs: Vec<String>,

    /// Gate groups, in netlist gate order.
    #[arg(long, value_delimiter = ',')]
    pub gates: Vec<String>,
}

/// Controls whether colored output is produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ColorChoice {
    /// Detect from terminal capabilities.
    Auto,
    /// Always produce colored output.
    Always,
    /// Never produce colored output.
    Never,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Whether to use colored output.
    pub color: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let color = match cli.color {
        ColorChoice::Auto => std::io::stderr().is_terminal(),
        ColorChoice::Always => true,
        ColorChoice::Never => false,
    };

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        color,
        config: cli.config,
    };
    pipeline::init_logging(&global);

    let result = match cli.command {
        Command::Check => check::run(&global),
        Command::Map(ref args) => map::run(args, &global),
        Command::Score(ref args) => score::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn parse_check() {
        let cli = Cli::parse_from(["genmap", "check"]);
        assert!(matches!(cli.command, Command::Check));
    }

    #[test]
    fn parse_map_default() {
        let cli = Cli::parse_from(["genmap", "map"]);
        match cli.command {
            Command::Map(ref args) => {
                assert!(!args.exhaustive);
                assert!(args.iterations.is_none());
                assert!(args.seed.is_none());
                assert!(args.threads.is_none());
            }
            _ => panic!("expected Map command"),
        }
    }

    #[test]
    fn parse_map_with_args() {
        let cli = Cli::parse_from([
            "genmap",
            "map",
            "--exhaustive",
            "--iterations",
            "250",
            "--seed",
            "7",
            "--threads",
            "4",
        ]);
        match cli.command {
            Command::Map(ref args) => {
                assert!(args.exhaustive);
                assert_eq!(args.iterations, Some(250));
                assert_eq!(args.seed, Some(7));
                assert_eq!(args.threads, Some(4));
            }
            _ => panic!("expected Map command"),
        }
    }

    #[test]
    fn parse_score_lists() {
        let cli = Cli::parse_from([
            "genmap",
            "score",
            "--inputs",
            "LacI_sensor,TetR_sensor",
            "--outputs",
            "YFP_reporter",
            "--gates",
            "PhlF,AmtR,SrpR",
        ]);
        match cli.command {
            Command::Score(ref args) => {
                assert_eq!(args.inputs, vec!["LacI_sensor", "TetR_sensor"]);
                assert_eq!(args.outputs, vec!["YFP_reporter"]);
                assert_eq!(args.gates, vec!["PhlF", "AmtR", "SrpR"]);
            }
            _ => panic!("expected Score command"),
        }
    }

    #[test]
    fn score_requires_inputs() {
        assert!(Cli::try_parse_from(["genmap", "score", "--outputs", "YFP"]).is_err());
    }

    #[test]
    fn parse_global_flags() {
        let cli = Cli::parse_from(["genmap", "--quiet", "--color", "never", "check"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
        assert_eq!(cli.color, ColorChoice::Never);
    }

    #[test]
    fn parse_verbose_and_config() {
        let cli = Cli::parse_from(["genmap", "--verbose", "--config", "/work/genmap.toml", "map"]);
        assert!(cli.verbose);
        assert_eq!(cli.config.as_deref(), Some("/work/genmap.toml"));
    }
}
