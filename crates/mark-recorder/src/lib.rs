//! Clipmark Mark Recorder
//!
//! Snapshots the media player's current position and appends it to the
//! raw mark log, stamped with the active artwork and distance selectors.
//! Each invocation records at most one mark:
//!
//! - **Player:** HTTP status query (filename, position, length)
//! - **Selectors:** rotating artwork/distance state
//! - **Writer:** append-only CSV log, header written on creation
//!
//! Marks are never edited once written; mistakes are fixed by hand in the
//! log before reconciliation.

pub mod player;
pub mod writer;

use clipmark_common::config::AppConfig;
use clipmark_common::error::{ClipmarkError, ClipmarkResult};
use clipmark_model::mark::{ClipType, RawMark};
use clipmark_model::selector::{RotatingSelector, SelectorKind};

use crate::player::PlayerStatus;
use crate::writer::MarkLogWriter;

/// Coordinates the selectors with the mark log writer.
pub struct MarkRecorder {
    writer: MarkLogWriter,
    artwork: RotatingSelector,
    distance: RotatingSelector,
}

impl MarkRecorder {
    /// Open the recorder's log and selectors from the configured data directory.
    pub fn new(config: &AppConfig) -> ClipmarkResult<Self> {
        let artwork = RotatingSelector::load(
            &config.data_dir,
            SelectorKind::Artwork,
            config.labels.artworks.clone(),
        )?;
        let distance = RotatingSelector::load(
            &config.data_dir,
            SelectorKind::Distance,
            config.labels.distances.clone(),
        )?;

        Ok(Self {
            writer: MarkLogWriter::new(config.mark_log_path()),
            artwork,
            distance,
        })
    }

    /// Append one mark for the given player snapshot.
    pub fn record(&self, clip_type: ClipType, status: &PlayerStatus) -> ClipmarkResult<RawMark> {
        let mark = RawMark::from_position(
            status.filename.clone(),
            status.percent,
            status.length_secs,
            self.artwork.current(),
            self.distance.current(),
            clip_type,
        );

        if !mark.is_within_video() {
            return Err(ClipmarkError::player(format!(
                "timestamp {:.3}s lies outside {} (length {}s)",
                mark.raw_timestamp, mark.video_id, mark.video_length
            )));
        }

        self.writer.append(&mark)?;

        tracing::info!(
            video = %mark.video_id,
            timestamp = mark.raw_timestamp,
            clip_type = %mark.clip_type,
            artwork = %mark.artwork,
            distance = %mark.distance,
            "Recorded mark"
        );
        Ok(mark)
    }
}

/// Advance one selector and return its new label.
pub fn rotate_selector(config: &AppConfig, kind: SelectorKind) -> ClipmarkResult<String> {
    let labels = match kind {
        SelectorKind::Artwork => config.labels.artworks.clone(),
        SelectorKind::Distance => config.labels.distances.clone(),
    };
    let mut selector = RotatingSelector::load(&config.data_dir, kind, labels)?;
    let current = selector.rotate()?.to_string();
    tracing::info!(selector = %kind, label = %current, "Selector rotated");
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config(dir: &std::path::Path) -> AppConfig {
        let mut config = AppConfig::default();
        config.data_dir = dir.to_path_buf();
        config.labels.artworks = vec!["A".to_string(), "B".to_string()];
        config
    }

    fn status(percent: f64) -> PlayerStatus {
        PlayerStatus {
            filename: "v.mp4".to_string(),
            percent,
            length_secs: 100.0,
        }
    }

    #[test]
    fn test_record_stamps_current_selectors() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        rotate_selector(&config, SelectorKind::Artwork).unwrap();
        rotate_selector(&config, SelectorKind::Distance).unwrap();

        let recorder = MarkRecorder::new(&config).unwrap();
        let mark = recorder.record(ClipType::Down, &status(22.0)).unwrap();

        assert_eq!(mark.artwork, "B");
        assert_eq!(mark.distance, "1.5m");
        assert!((mark.raw_timestamp - 22.0).abs() < 1e-9);

        let marks = clipmark_model::mark::read_mark_log(&config.mark_log_path()).unwrap();
        assert_eq!(marks, vec![mark]);
    }

    #[test]
    fn test_recording_appends_without_touching_earlier_lines() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let recorder = MarkRecorder::new(&config).unwrap();

        recorder.record(ClipType::Left, &status(10.0)).unwrap();
        let first = std::fs::read_to_string(config.mark_log_path()).unwrap();
        recorder.record(ClipType::Left, &status(15.0)).unwrap();
        let second = std::fs::read_to_string(config.mark_log_path()).unwrap();

        assert!(second.starts_with(&first));
        assert_eq!(second.lines().count(), 3);
    }

    #[test]
    fn test_out_of_range_position_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        let recorder = MarkRecorder::new(&config).unwrap();

        assert!(recorder.record(ClipType::Up, &status(120.0)).is_err());
        assert!(!config.mark_log_path().exists());
    }

    #[test]
    fn test_rotate_selector_reports_new_label() {
        let dir = tempfile::tempdir().unwrap();
        let config = test_config(dir.path());
        assert_eq!(rotate_selector(&config, SelectorKind::Artwork).unwrap(), "B");
        assert_eq!(rotate_selector(&config, SelectorKind::Artwork).unwrap(), "A");
    }
}
