//! Shared entry point for every binary surface.
//!
//! Both `flowscan-bin` and the `flowscan-cli` wrapper delegate here so
//! argument handling and exit codes stay identical.

use crate::cli::Cli;
use crate::commands;
use anyhow::Result;
use clap::Parser;

/// Parses `args` (without the program name) and runs the selected
/// command against stdout. Returns the process exit code.
pub fn run_with_args(args: Vec<String>) -> Result<i32> {
    let cli = Cli::parse_from(std::iter::once("flowscan".to_owned()).chain(args));
    let stdout = std::io::stdout();
    let mut writer = stdout.lock();
    commands::run(cli, &mut writer)
}
