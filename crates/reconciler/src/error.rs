//! Data-integrity errors raised while reconciling the mark log.

use clipmark_common::error::ClipmarkError;
use clipmark_model::mark::ClipKey;

/// Errors that abort a reconciliation run.
///
/// Every integrity variant names the offending clip key so the operator can
/// find and fix the rows in the raw log.
#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
    #[error("{key}: expected 1 or 2 marks, found {count}")]
    Cardinality { key: ClipKey, count: usize },

    #[error("{key}: single mark at {timestamp}s, but only forward clips may start unmarked")]
    UnpairedMark { key: ClipKey, timestamp: f64 },

    #[error("{key}: interval [{start}, {end}] exceeds video bounds [0, {video_length}]")]
    OutOfBounds {
        key: ClipKey,
        start: f64,
        end: f64,
        video_length: f64,
    },

    #[error("{key}: interval [{start}, {end}] is empty")]
    EmptyInterval { key: ClipKey, start: f64, end: f64 },

    #[error("{key}: marks disagree on video length ({first}s vs {other}s)")]
    InconsistentLength { key: ClipKey, first: f64, other: f64 },

    #[error("{first} and {second} would both be extracted as {name}")]
    DuplicateClipName {
        name: String,
        first: ClipKey,
        second: ClipKey,
    },

    #[error(transparent)]
    Io(#[from] ClipmarkError),
}

impl ReconcileError {
    /// The clip key that failed, if the error is about one.
    pub fn key(&self) -> Option<&ClipKey> {
        match self {
            Self::Cardinality { key, .. }
            | Self::UnpairedMark { key, .. }
            | Self::OutOfBounds { key, .. }
            | Self::EmptyInterval { key, .. }
            | Self::InconsistentLength { key, .. } => Some(key),
            Self::DuplicateClipName { second, .. } => Some(second),
            Self::Io(_) => None,
        }
    }
}
