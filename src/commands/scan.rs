use crate::SnapshotContext;
use crate::output;
use crate::snapshot::{ScanOutcome, Scanner};
use crate::storage::{default_snapshot_name, validate_name};
use crate::utils::format_size;
use crate::utils::paths::resolve_user_path;
use anyhow::Result;
use chrono::Local;

/// Execute scan command - snapshot a directory under a name
///
/// The name is checked before the tree is walked, so a bad name fails fast.
///
/// # Errors
///
/// Returns an error if:
/// - The snapshot name is invalid
/// - The path does not exist or is not a directory
/// - The snapshot cannot be written to the store
pub fn execute(ctx: &SnapshotContext, path: &str, name: Option<&str>) -> Result<()> {
    let name = name.map_or_else(|| default_snapshot_name(&Local::now()), str::to_string);
    let outcome = snapshot_directory(ctx, path, &name)?;

    let manifest = &outcome.manifest;
    output::success(&format!(
        "Saved snapshot '{name}' ({} files, {})",
        manifest.files_count(),
        format_size(manifest.total_size())
    ));
    output::info(&format!("Scanned {}", manifest.scanned_directory()));

    if !outcome.is_complete() {
        output::warning(&format!(
            "{} unreadable entries were skipped",
            outcome.skipped.len()
        ));
    }

    Ok(())
}

/// Scan `path` and save the manifest as `name`, returning the full outcome
///
/// # Errors
///
/// Returns an error if the name or root is invalid, or the save fails.
pub fn snapshot_directory(ctx: &SnapshotContext, path: &str, name: &str) -> Result<ScanOutcome> {
    validate_name(name)?;
    let root = resolve_user_path(path)?;

    let outcome = Scanner::new(&root)?.run();
    ctx.store.save_manifest(&outcome.manifest, name)?;

    Ok(outcome)
}
