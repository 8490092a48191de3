//! Cut manifest clips out of the source videos.

use std::path::PathBuf;

use clipmark_common::config::AppConfig;
use clipmark_extract::{extract_manifest, plan_extraction, ExtractProgress, FfmpegBackend};
use clipmark_model::manifest::read_manifest;

pub fn run(
    config: &AppConfig,
    source_dir: PathBuf,
    manifest: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    dry_run: bool,
) -> anyhow::Result<()> {
    let manifest = manifest.unwrap_or_else(|| config.manifest_path());
    let output_dir = output_dir.unwrap_or_else(|| source_dir.join("clips"));

    println!("Extracting clips listed in: {}", manifest.display());
    println!("  Sources: {}", source_dir.display());
    println!("  Output: {}", output_dir.display());

    if dry_run {
        let rows = read_manifest(&manifest)?;
        let jobs = plan_extraction(&rows, &source_dir, &output_dir)?;
        for job in &jobs {
            println!("ffmpeg {}", job.ffmpeg_args().join(" "));
        }
        println!("\n{} clip(s) planned. Nothing extracted.", jobs.len());
        return Ok(());
    }

    let progress_cb: Box<dyn Fn(ExtractProgress)> = Box::new(|p| {
        println!(
            "  [{}/{}] {}",
            p.completed,
            p.total,
            p.dest_path.display()
        );
    });

    let count = extract_manifest(
        &manifest,
        &source_dir,
        &output_dir,
        &mut FfmpegBackend::new(),
        Some(progress_cb),
    )
    .map_err(|e| anyhow::anyhow!("Extraction failed: {e}"))?;

    println!("\nExtraction complete: {count} clip(s)");
    Ok(())
}
