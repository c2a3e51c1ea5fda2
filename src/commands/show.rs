use crate::SnapshotContext;
use crate::snapshot::Manifest;
use crate::utils::formatters::{format_mtime, format_size, format_timestamp};
use anyhow::Result;
use colored::Colorize;
use std::io::{self, Write};

/// Execute show command - print one snapshot
///
/// # Errors
///
/// Returns an error if:
/// - The snapshot does not exist
/// - The snapshot file is unreadable or corrupt
/// - Writing to stdout fails
pub fn execute(ctx: &SnapshotContext, name: &str, json: bool) -> Result<()> {
    let manifest = ctx.store.load_manifest(name)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    if json {
        serde_json::to_writer_pretty(&mut out, &manifest)?;
        writeln!(out)?;
    } else {
        render_manifest(&mut out, name, &manifest)?;
    }

    Ok(())
}

/// Write a header followed by a size / mtime / path table
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn render_manifest(out: &mut impl Write, name: &str, manifest: &Manifest) -> io::Result<()> {
    writeln!(out, "{} {}", "snapshot".yellow(), name)?;
    writeln!(out, "{}: {}", "Directory".bold(), manifest.scanned_directory())?;
    writeln!(
        out,
        "{}: {}",
        "Created".bold(),
        format_timestamp(&manifest.created_at())
    )?;
    writeln!(
        out,
        "{}: {} ({})",
        "Files".bold(),
        manifest.files_count(),
        format_size(manifest.total_size())
    )?;

    if manifest.is_empty() {
        return Ok(());
    }

    writeln!(out)?;
    for file in manifest.files() {
        writeln!(
            out,
            "  {:>10}  {}  {}",
            format_size(file.size),
            format_mtime(file.mtime).dimmed(),
            file.relative_path
        )?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::FileRecord;

    #[test]
    fn test_render_manifest() -> Result<()> {
        colored::control::set_override(false);
        let manifest = Manifest::new(
            "/data/photos",
            vec![
                FileRecord::new("sub/b.txt", 20, 1_700_000_000.0),
                FileRecord::new("a.txt", 10, 1_700_000_000.0),
            ],
        );

        let mut buf = Vec::new();
        render_manifest(&mut buf, "before", &manifest)?;
        let text = String::from_utf8(buf)?;
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "snapshot before");
        assert_eq!(lines[1], "Directory: /data/photos");
        assert_eq!(lines[3], "Files: 2 (30 B)");
        assert!(lines[5].trim_start().starts_with("10 B"));
        assert!(lines[5].ends_with("a.txt"));
        assert!(lines[6].ends_with("sub/b.txt"));
        Ok(())
    }

    #[test]
    fn test_render_empty_manifest_has_no_table() -> Result<()> {
        colored::control::set_override(false);
        let mut buf = Vec::new();
        render_manifest(&mut buf, "empty", &Manifest::new("/e", Vec::new()))?;
        assert_eq!(String::from_utf8(buf)?.lines().count(), 4);
        Ok(())
    }
}
