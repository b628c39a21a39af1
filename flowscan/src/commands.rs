//! Command execution logic.
//!
//! Commands are generic over their writer so tests can capture output in
//! a buffer. Exit codes: 0 on success, 1 when `check` finds failed
//! expectations. Analysis verdicts are data, never process failures.

use crate::cli::{CheckArgs, Cli, Commands, OutputOptions, ResolveArgs, TaintArgs};
use crate::config::Config;
use crate::constants::{DEFAULT_EXCLUDE_FOLDERS, FIXTURE_EXTENSION};
use crate::fixture::{self, FixtureReport};
use crate::output;
use crate::resolve::{resolve_module_def, ModuleDef, ModuleResolver, ProjectTree, Resolution};
use crate::taint::{SinkVerdict, TaintTracker};
use anyhow::{bail, Result};
use rayon::prelude::*;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Dispatches a parsed CLI invocation. Returns the process exit code.
pub fn run<W: Write>(cli: Cli, writer: &mut W) -> Result<i32> {
    match cli.command {
        Commands::Resolve(args) => run_resolve(&args, &cli.output, writer),
        Commands::Taint(args) => run_taint(&args, &cli.output, writer),
        Commands::Check(args) => run_check(&args, &cli.output, writer),
    }
}

/// Executes the `resolve` command.
pub fn run_resolve<W: Write>(
    args: &ResolveArgs,
    output: &OutputOptions,
    writer: &mut W,
) -> Result<i32> {
    let config = args
        .root
        .as_deref()
        .map_or_else(Config::load, Config::load_from_path);

    let tree = if let Some(tree_file) = &args.tree_file {
        ProjectTree::new(fixture::load_tree_listing(tree_file)?)
    } else if let Some(root) = &args.root {
        let mut exclude = config.exclude_folders();
        exclude.extend(args.exclude.iter().cloned());
        ProjectTree::from_dir(root, &exclude)
    } else {
        bail!("no project tree: pass --root <dir> or --tree-file <listing>");
    };

    let module = if let Some(module_file) = &args.module_file {
        fixture::load_module_def(module_file)?
    } else if args.specs.is_empty() {
        bail!("nothing to resolve: pass dependency specs or --module-file");
    } else {
        ModuleDef {
            dependencies: args.specs.clone(),
            params: Vec::new(),
        }
    };

    if output.verbose {
        writeln!(writer, "tree: {} known paths", tree.len())?;
    }

    let resolver = ModuleResolver::with_options(tree, config.resolver_options());
    let reports = resolve_module_def(&module, &resolver);

    if output.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&reports)?)?;
    } else if output.quiet {
        let resolved = reports
            .iter()
            .filter(|r| r.resolution.as_ref().is_some_and(Resolution::is_resolved))
            .count();
        writeln!(writer, "{resolved}/{} dependencies resolved", reports.len())?;
    } else {
        output::print_dependency_table(writer, &reports)?;
    }

    Ok(0)
}

/// Per-file taint report for JSON output.
#[derive(Serialize)]
struct FileTaintReport {
    file: String,
    verdicts: Vec<SinkVerdict>,
}

/// Executes the `taint` command.
pub fn run_taint<W: Write>(
    args: &TaintArgs,
    output: &OutputOptions,
    writer: &mut W,
) -> Result<i32> {
    let files = find_fixture_files(&args.paths, &args.exclude)?;

    let config = Config::load();
    let mut options = config.tracker_options();
    options.sources.extend(args.source.iter().cloned());
    options.sinks.extend(args.sink.iter().cloned());
    let tracker = TaintTracker::with_options(options);

    let progress = output::create_progress_bar(files.len() as u64);
    let results: Result<Vec<FileTaintReport>> = files
        .par_iter()
        .map(|path| {
            let program = fixture::load_program(path)?;
            let verdicts = tracker.analyze(&program);
            progress.inc(1);
            Ok(FileTaintReport {
                file: path.to_string_lossy().into_owned(),
                verdicts,
            })
        })
        .collect();
    progress.finish_and_clear();
    let results = results?;

    if output.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&results)?)?;
        return Ok(0);
    }

    let mut tainted_total = 0usize;
    let mut sites_total = 0usize;
    for report in &results {
        if output.verbose {
            writeln!(writer, "analyzing {}", report.file)?;
        }
        if !output.quiet {
            output::print_sink_table(writer, &report.file, &report.verdicts)?;
        }
        sites_total += report.verdicts.len();
        tainted_total += report
            .verdicts
            .iter()
            .filter(|v| v.taint.is_tainted())
            .count();
    }
    writeln!(
        writer,
        "{} files, {sites_total} sink sites, {tainted_total} tainted",
        results.len()
    )?;

    Ok(0)
}

/// Per-file check report for JSON output.
#[derive(Serialize)]
struct FileCheckReport {
    file: String,
    #[serde(flatten)]
    report: FixtureReport,
}

/// Executes the `check` command. Exit code 1 when any expectation fails.
pub fn run_check<W: Write>(
    args: &CheckArgs,
    output: &OutputOptions,
    writer: &mut W,
) -> Result<i32> {
    let files = find_fixture_files(&args.paths, &args.exclude)?;

    let config = Config::load();
    let resolver_options = config.resolver_options();
    let tracker_options = config.tracker_options();

    let progress = output::create_progress_bar(files.len() as u64);
    let results: Result<Vec<FileCheckReport>> = files
        .par_iter()
        .map(|path| {
            let fixture = fixture::load_fixture(path)?;
            let report = fixture::check_fixture(&fixture, &resolver_options, &tracker_options)?;
            progress.inc(1);
            Ok(FileCheckReport {
                file: path.to_string_lossy().into_owned(),
                report,
            })
        })
        .collect();
    progress.finish_and_clear();
    let results = results?;

    let failed = results.iter().filter(|r| !r.report.passed()).count();

    if output.json {
        writeln!(writer, "{}", serde_json::to_string_pretty(&results)?)?;
    } else {
        for entry in &results {
            if output.quiet && entry.report.passed() {
                continue;
            }
            output::print_check_result(writer, &entry.file, &entry.report)?;
        }
        writeln!(
            writer,
            "{}/{} fixtures passed",
            results.len() - failed,
            results.len()
        )?;
    }

    Ok(i32::from(failed > 0))
}

/// Collects fixture files from the given paths: files are taken
/// verbatim, directories are walked for `.json` entries with excluded
/// folders skipped at traversal time.
fn find_fixture_files(paths: &[PathBuf], exclude: &[String]) -> Result<Vec<PathBuf>> {
    use ignore::WalkBuilder;

    if paths.is_empty() {
        bail!("no input: pass fixture files or directories");
    }

    let default_excludes: Vec<String> = DEFAULT_EXCLUDE_FOLDERS()
        .iter()
        .map(|&s| s.to_owned())
        .collect();
    let all_excludes: Vec<String> = exclude.iter().cloned().chain(default_excludes).collect();

    let mut files = Vec::new();
    for path in paths {
        if path.is_file() {
            files.push(path.clone());
            continue;
        }
        if !path.is_dir() {
            bail!("no such file or directory: {}", path.display());
        }

        let excludes_for_filter = all_excludes.clone();
        let root_for_filter = path.clone();
        let walker = WalkBuilder::new(path)
            .hidden(false)
            .git_ignore(true)
            .sort_by_file_path(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                if entry.path() == root_for_filter {
                    return true;
                }
                if !entry.file_type().is_some_and(|ft| ft.is_dir()) {
                    return true;
                }
                entry
                    .file_name()
                    .to_str()
                    .is_none_or(|name| !excludes_for_filter.iter().any(|ex| ex == name))
            })
            .build();

        for entry in walker.flatten() {
            let entry_path = entry.path();
            if entry.file_type().is_some_and(|ft| ft.is_file())
                && entry_path
                    .extension()
                    .is_some_and(|ext| ext == FIXTURE_EXTENSION)
            {
                files.push(entry_path.to_path_buf());
            }
        }
    }

    if files.is_empty() {
        bail!("no fixture files found under the given paths");
    }
    Ok(files)
}
