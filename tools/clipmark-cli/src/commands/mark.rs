//! Record a mark or rotate a selector.

use clipmark_common::config::AppConfig;
use clipmark_model::mark::ClipType;
use clipmark_model::selector::SelectorKind;
use clipmark_recorder::player::VlcStatusClient;
use clipmark_recorder::{rotate_selector, MarkRecorder};

pub async fn record(config: &AppConfig, clip_type: ClipType) -> anyhow::Result<()> {
    let recorder = MarkRecorder::new(config)?;
    let client = VlcStatusClient::new(config.player.clone())?;

    let status = client.fetch().await?;
    let mark = recorder.record(clip_type, &status)?;

    println!(
        "Saved {:.2} timestamp for {}-{} ({} @ {})",
        mark.raw_timestamp, clip_type, mark.video_id, mark.artwork, mark.distance
    );

    Ok(())
}

pub fn rotate(config: &AppConfig, kind: SelectorKind) -> anyhow::Result<()> {
    let current = rotate_selector(config, kind)?;
    println!("Current {kind}: {current}");
    Ok(())
}
