//! Grouping, pairing, and validation of raw marks.

use std::collections::BTreeMap;
use std::path::Path;

use clipmark_model::manifest::{write_manifest, ClipInterval};
use clipmark_model::mark::{read_mark_log, ClipKey, RawMark};

use crate::error::ReconcileError;

/// Reconcile marks into one interval per clip key.
///
/// Intervals come back ordered by artwork, distance, clip type, then video.
pub fn reconcile(marks: &[RawMark]) -> Result<Vec<ClipInterval>, ReconcileError> {
    let mut groups: BTreeMap<ClipKey, Vec<&RawMark>> = BTreeMap::new();
    for mark in marks {
        groups.entry(mark.key()).or_default().push(mark);
    }

    tracing::debug!(marks = marks.len(), groups = groups.len(), "Grouped marks");

    let intervals: Vec<ClipInterval> = groups
        .into_iter()
        .map(|(key, group)| resolve_group(key, &group))
        .collect::<Result<_, _>>()?;

    check_unique_names(&intervals)?;
    Ok(intervals)
}

/// Clip names omit the video id, so two videos filmed under the same labels
/// would land on the same output file.
fn check_unique_names(intervals: &[ClipInterval]) -> Result<(), ReconcileError> {
    let mut seen: BTreeMap<(&str, &str), &ClipKey> = BTreeMap::new();
    for interval in intervals {
        let slot = (interval.key.artwork.as_str(), interval.name.as_str());
        if let Some(first) = seen.insert(slot, &interval.key) {
            return Err(ReconcileError::DuplicateClipName {
                name: interval.name.clone(),
                first: first.clone(),
                second: interval.key.clone(),
            });
        }
    }
    Ok(())
}

fn resolve_group(key: ClipKey, group: &[&RawMark]) -> Result<ClipInterval, ReconcileError> {
    let Some(first) = group.first() else {
        return Err(ReconcileError::Cardinality { key, count: 0 });
    };

    let video_length = first.video_length;
    if let Some(other) = group.iter().find(|m| m.video_length != video_length) {
        return Err(ReconcileError::InconsistentLength {
            key,
            first: video_length,
            other: other.video_length,
        });
    }

    let mut timestamps: Vec<f64> = group.iter().map(|m| m.raw_timestamp).collect();
    let (start, end) = match timestamps.len() {
        1 if key.clip_type.may_start_unmarked() => (0.0, timestamps[0]),
        1 => {
            return Err(ReconcileError::UnpairedMark {
                timestamp: timestamps[0],
                key,
            })
        }
        2 => {
            // Marks carry no start/end role; order is by value alone.
            timestamps.sort_by(f64::total_cmp);
            (timestamps[0], timestamps[1])
        }
        count => return Err(ReconcileError::Cardinality { key, count }),
    };

    let in_bounds = start.is_finite()
        && end.is_finite()
        && start >= 0.0
        && end <= video_length;
    if !in_bounds {
        return Err(ReconcileError::OutOfBounds {
            key,
            start,
            end,
            video_length,
        });
    }

    if start >= end {
        return Err(ReconcileError::EmptyInterval { key, start, end });
    }

    Ok(ClipInterval::new(key, start, end))
}

/// Reconcile the mark log at `log_path`, writing the manifest to
/// `manifest_path` when given. Nothing is written if any group fails.
pub fn reconcile_log(
    log_path: &Path,
    manifest_path: Option<&Path>,
) -> Result<Vec<ClipInterval>, ReconcileError> {
    let marks = read_mark_log(log_path)?;
    tracing::info!(path = %log_path.display(), marks = marks.len(), "Reconciling mark log");

    let intervals = reconcile(&marks).map_err(|e| {
        tracing::error!(error = %e, "Reconciliation aborted");
        e
    })?;

    if intervals.is_empty() {
        tracing::warn!(path = %log_path.display(), "Mark log holds no marks");
    }

    if let Some(path) = manifest_path {
        write_manifest(path, &intervals)?;
    }

    Ok(intervals)
}
