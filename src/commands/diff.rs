use crate::SnapshotContext;
use crate::diff::{DiffReport, diff};
use crate::snapshot::Manifest;
use crate::utils::formatters::{FileStatus, format_file_status, format_size_change};
use anyhow::Result;
use colored::Colorize;
use serde::Serialize;
use std::io::{self, Write};

/// Options controlling how a diff is printed.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiffOptions {
    /// List unchanged paths too
    pub show_unchanged: bool,
    /// Emit the report as JSON instead of text
    pub json: bool,
}

/// JSON shape of `fsnap diff --json`.
#[derive(Serialize)]
struct JsonDiff<'a> {
    from: &'a str,
    to: &'a str,
    summary: crate::diff::DiffSummary,
    #[serde(flatten)]
    report: &'a DiffReport,
}

/// Execute diff command - compare two stored snapshots
///
/// Both snapshots are loaded before anything is compared or printed.
///
/// # Errors
///
/// Returns an error if:
/// - Either snapshot does not exist
/// - Either snapshot file is unreadable or corrupt
/// - Writing to stdout fails
pub fn execute(ctx: &SnapshotContext, from: &str, to: &str, options: DiffOptions) -> Result<()> {
    let (from_manifest, to_manifest) = load_pair(ctx, from, to)?;
    let report = diff(&from_manifest, &to_manifest);

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if options.json {
        let json = JsonDiff {
            from,
            to,
            summary: report.summary(),
            report: &report,
        };
        serde_json::to_writer_pretty(&mut out, &json)?;
        writeln!(out)?;
    } else {
        render_report(
            &mut out,
            (from, &from_manifest),
            (to, &to_manifest),
            &report,
            options.show_unchanged,
        )?;
    }

    Ok(())
}

/// Load both sides of a comparison
///
/// # Errors
///
/// Returns the first load failure, checking `from` before `to`.
pub fn load_pair(ctx: &SnapshotContext, from: &str, to: &str) -> Result<(Manifest, Manifest)> {
    let from_manifest = ctx.store.load_manifest(from)?;
    let to_manifest = ctx.store.load_manifest(to)?;
    Ok((from_manifest, to_manifest))
}

/// Write the grouped, colored diff followed by a summary line
///
/// Changed files show their size before and after.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn render_report(
    out: &mut impl Write,
    (from_name, from): (&str, &Manifest),
    (to_name, to): (&str, &Manifest),
    report: &DiffReport,
    show_unchanged: bool,
) -> io::Result<()> {
    writeln!(
        out,
        "{}",
        format!(
            "Comparing snapshot {} with snapshot {}...",
            from_name.yellow(),
            to_name.yellow()
        )
        .blue()
    )?;

    if report.is_identical() {
        writeln!(out, "No differences found")?;
    }

    write_group(out, "Added files:", FileStatus::Added, &report.added, |_| None)?;
    write_group(out, "Deleted files:", FileStatus::Deleted, &report.deleted, |_| None)?;
    write_group(out, "Changed files:", FileStatus::Changed, &report.changed, |path| {
        let before = from.get(path)?;
        let after = to.get(path)?;
        Some(format_size_change(before.size, after.size))
    })?;
    if show_unchanged {
        write_group(
            out,
            "Unchanged files:",
            FileStatus::Unchanged,
            &report.unchanged,
            |_| None,
        )?;
    }

    let summary = report.summary();
    writeln!(out)?;
    writeln!(
        out,
        "{}: {} added, {} deleted, {} changed, {} unchanged",
        "Summary".bold(),
        summary.added,
        summary.deleted,
        summary.changed,
        summary.unchanged
    )
}

/// Write one titled group of paths, skipping empty groups
fn write_group(
    out: &mut impl Write,
    title: &str,
    status: FileStatus,
    paths: &[String],
    detail: impl Fn(&str) -> Option<String>,
) -> io::Result<()> {
    if paths.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    let heading = match status {
        FileStatus::Added => title.green().bold(),
        FileStatus::Deleted => title.red().bold(),
        FileStatus::Changed => title.yellow().bold(),
        FileStatus::Unchanged => title.bold(),
    };
    writeln!(out, "{heading}")?;

    for path in paths {
        match detail(path) {
            Some(extra) => writeln!(
                out,
                "  {}  {}",
                format_file_status(status, path),
                extra.dimmed()
            )?,
            None => writeln!(out, "  {}", format_file_status(status, path))?,
        }
    }

    Ok(())
}
