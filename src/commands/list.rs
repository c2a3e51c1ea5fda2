use crate::SnapshotContext;
use crate::output;
use crate::storage::SnapshotSummary;
use crate::utils::formatters::{format_relative_time, format_size, format_timestamp};
use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};

/// Execute list command - print stored snapshot names
///
/// # Errors
///
/// Returns an error if the store directory cannot be read or stdout fails.
pub fn execute(ctx: &SnapshotContext, long: bool) -> Result<()> {
    let stdout = io::stdout();
    let mut out = stdout.lock();

    if long {
        let summaries = ctx.store.list_summaries()?;
        if summaries.is_empty() {
            output::info(&format!("No snapshots in {}", ctx.store.root().display()));
            return Ok(());
        }
        render_summaries(&mut out, &summaries)?;
    } else {
        let names = ctx.store.list_manifest_names()?;
        if names.is_empty() {
            output::info(&format!("No snapshots in {}", ctx.store.root().display()));
            return Ok(());
        }
        for name in names {
            writeln!(out, "{name}")?;
        }
    }

    Ok(())
}

/// Write one line per snapshot: name, scan time, file count, size, directory
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn render_summaries(out: &mut impl Write, summaries: &[SnapshotSummary]) -> io::Result<()> {
    let width = summaries.iter().map(|s| s.name.len()).max().unwrap_or(0);

    for summary in summaries {
        writeln!(
            out,
            "{}  {} {}  {:>6} files  {:>10}  {}",
            format!("{:<width$}", summary.name).bold(),
            format_timestamp(&summary.created_at),
            format!("({})", format_relative_time(&summary.created_at)).dimmed(),
            summary.files_count,
            format_size(summary.total_size),
            summary.scanned_directory,
        )?;
    }

    Ok(())
}
