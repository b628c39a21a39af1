//! Command-line interface definition.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Help text for configuration file options, shown at the bottom of --help.
const CONFIG_HELP: &str = "\
CONFIGURATION FILE (.flowscan.toml):
  Create this file in your project root to set defaults.

  [flowscan]
  # Resolver thresholds
  min_spec_len = 4           # Bare specs shorter than this are too short
  default_extension = \"js\"   # Appended to extension-less specs

  # Taint designation patterns
  sources = [\"source\"]       # Source variable/call names
  sinks = [\"sink\"]           # Sink call names

  # Path filters
  exclude_folders = [\"dist\", \"build\"]
";

/// Options for output formatting and verbosity.
///
/// Global so they can be given before or after the subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct OutputOptions {
    /// Output raw JSON.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose output for debugging (shows files being analyzed).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet mode: show only summary lines (no detailed tables).
    #[arg(long, global = true)]
    pub quiet: bool,
}

/// Arguments for the `resolve` subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct ResolveArgs {
    /// Dependency specs to resolve, as written in the loader call.
    /// Ignored when --module-file is given.
    pub specs: Vec<String>,

    /// JSON file with a module definition (dependencies + factory params).
    #[arg(long)]
    pub module_file: Option<PathBuf>,

    /// Project root to walk for the tree of known paths.
    #[arg(long, conflicts_with = "tree_file")]
    pub root: Option<PathBuf>,

    /// JSON file listing the tree of known paths.
    #[arg(long)]
    pub tree_file: Option<PathBuf>,

    /// Exclude folders when walking the project root.
    #[arg(long, short = 'e', alias = "exclude-folder")]
    pub exclude: Vec<String>,
}

/// Arguments for the `taint` subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct TaintArgs {
    /// Program files or directories of fixture JSON to analyze.
    pub paths: Vec<PathBuf>,

    /// Additional source patterns (variable and call names).
    #[arg(long)]
    pub source: Vec<String>,

    /// Additional sink-call patterns.
    #[arg(long)]
    pub sink: Vec<String>,

    /// Exclude folders when scanning directories.
    #[arg(long, short = 'e', alias = "exclude-folder")]
    pub exclude: Vec<String>,
}

/// Arguments for the `check` subcommand.
#[derive(Args, Debug, Default, Clone)]
pub struct CheckArgs {
    /// Fixture files or directories of fixture JSON to check.
    pub paths: Vec<PathBuf>,

    /// Exclude folders when scanning directories.
    #[arg(long, short = 'e', alias = "exclude-folder")]
    pub exclude: Vec<String>,
}

/// Command line interface configuration using `clap`.
/// This struct defines the arguments and flags accepted by the program.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "flowscan - Module-dependency resolution and property taint tracking for async-module fixtures",
    long_about = None,
    after_help = CONFIG_HELP
)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Output formatting options.
    #[command(flatten)]
    pub output: OutputOptions,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Resolve dependency specs against a project tree
    Resolve(ResolveArgs),
    /// Track property taint through programs
    Taint(TaintArgs),
    /// Check fixtures against their embedded expectations
    Check(CheckArgs),
}
