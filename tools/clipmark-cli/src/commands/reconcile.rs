//! Reconcile the mark log into the clip manifest.

use std::path::PathBuf;

use clipmark_common::config::AppConfig;
use clipmark_reconcile::reconcile_log;

pub fn run(
    config: &AppConfig,
    log: Option<PathBuf>,
    manifest: Option<PathBuf>,
    check: bool,
) -> anyhow::Result<()> {
    let log = log.unwrap_or_else(|| config.mark_log_path());
    let manifest = manifest.unwrap_or_else(|| config.manifest_path());

    println!("Reconciling marks in: {}", log.display());

    let target = if check { None } else { Some(manifest.as_path()) };
    let intervals = reconcile_log(&log, target)
        .map_err(|e| anyhow::anyhow!("Reconciliation failed: {e}"))?;

    for interval in &intervals {
        println!(
            "  {:<50} {:>9.2}s -> {:>9.2}s ({:.2}s)",
            interval.name,
            interval.start,
            interval.end,
            interval.duration()
        );
    }

    if check {
        println!(
            "\nCheck passed: {} clip(s). Manifest not written.",
            intervals.len()
        );
    } else {
        println!(
            "\nManifest written: {} ({} clip(s))",
            manifest.display(),
            intervals.len()
        );
    }

    Ok(())
}
