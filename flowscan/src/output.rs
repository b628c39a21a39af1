//! Rich CLI output formatting: colored verdicts, report tables, and
//! progress bars for directory scans.

use crate::fixture::FixtureReport;
use crate::resolve::{DependencyKind, DependencyReport, Resolution, UnresolvedReason};
use crate::taint::SinkVerdict;
use colored::Colorize;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, Color, ContentArrangement, Table};
use indicatif::{ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::io::Write;
use std::time::Duration;

/// Renders per-dependency reports as a table.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_dependency_table(
    writer: &mut impl Write,
    reports: &[DependencyReport],
) -> std::io::Result<()> {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Dependency", "Kind", "Binds to", "Verdict"]);

    for report in reports {
        table.add_row(vec![
            Cell::new(&report.spec),
            kind_cell(report.kind),
            Cell::new(report.bound_param.as_deref().unwrap_or("-")),
            verdict_cell(report),
        ]);
    }

    writeln!(writer, "{table}")?;

    let resolved = reports
        .iter()
        .filter(|r| r.resolution.as_ref().is_some_and(Resolution::is_resolved))
        .count();
    writeln!(
        writer,
        "{} {resolved}/{} dependencies resolved",
        "Summary:".bold(),
        reports.len()
    )
}

fn kind_cell(kind: DependencyKind) -> Cell {
    match kind {
        DependencyKind::Pseudo => Cell::new("pseudo").fg(Color::Cyan),
        DependencyKind::Path => Cell::new("path"),
    }
}

fn verdict_cell(report: &DependencyReport) -> Cell {
    match &report.resolution {
        None => Cell::new("loader-provided").fg(Color::Cyan),
        Some(Resolution::Resolved { path }) => Cell::new(path).fg(Color::Green),
        Some(Resolution::Unresolved { reason }) => match reason {
            UnresolvedReason::Ambiguous { candidates } => {
                Cell::new(format!("ambiguous: {}", candidates.join(", "))).fg(Color::Yellow)
            }
            UnresolvedReason::TooShort => {
                Cell::new("too short for positive identification").fg(Color::Yellow)
            }
            UnresolvedReason::NoMatch => Cell::new("no match").fg(Color::Red),
        },
    }
}

/// Renders per-sink verdicts for one analyzed file as a table.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_sink_table(
    writer: &mut impl Write,
    label: &str,
    verdicts: &[SinkVerdict],
) -> std::io::Result<()> {
    writeln!(writer, "{} {}", "File:".bold(), label)?;

    if verdicts.is_empty() {
        return writeln!(writer, "  {}", "no sink sites".dimmed());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Stmt", "Expression", "Binding", "Taint"]);

    for verdict in verdicts {
        let taint = if verdict.taint.is_tainted() {
            Cell::new("TAINTED").fg(Color::Red)
        } else {
            Cell::new("clean").fg(Color::Green)
        };
        table.add_row(vec![
            Cell::new(verdict.site.stmt_index),
            Cell::new(&verdict.site.expr),
            Cell::new(verdict.site.binding.as_deref().unwrap_or("-")),
            taint,
        ]);
    }

    writeln!(writer, "{table}")
}

/// Prints a one-line pass/fail verdict for a checked fixture, with
/// failure details underneath.
///
/// # Errors
///
/// Returns an error if writing to the output fails.
pub fn print_check_result(
    writer: &mut impl Write,
    label: &str,
    report: &FixtureReport,
) -> std::io::Result<()> {
    if report.passed() {
        writeln!(
            writer,
            "{} {label} ({} expectations)",
            "[PASS]".green().bold(),
            report.checked
        )
    } else {
        writeln!(
            writer,
            "{} {label} ({}/{} expectations failed)",
            "[FAIL]".red().bold(),
            report.failures.len(),
            report.checked
        )?;
        for failure in &report.failures {
            writeln!(
                writer,
                "  {} expected {}, got {}",
                failure.subject.yellow(),
                failure.expected.green(),
                failure.actual.red()
            )?;
        }
        Ok(())
    }
}

/// Create a progress bar for scanning a known number of fixture files.
///
/// In test mode, returns a hidden progress bar to avoid polluting test output.
///
/// # Panics
///
/// Panics if the progress style template is invalid (should never happen with hardcoded template).
#[must_use]
pub fn create_progress_bar(total_files: u64) -> ProgressBar {
    // In test mode, return a hidden progress bar to avoid polluting test output
    if cfg!(test) {
        return ProgressBar::hidden();
    }

    let pb =
        ProgressBar::with_draw_target(Some(total_files), ProgressDrawTarget::stderr_with_hz(20));
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} files ({percent}%) {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("█▓░"),
    );
    pb.set_message("analyzing...");
    pb.enable_steady_tick(Duration::from_millis(100));
    pb.tick(); // Force initial draw
    pb
}
