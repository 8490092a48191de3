//! Raw boundary marks and the append-only mark log format.
//!
//! A mark is a snapshot of the player position taken while the operator
//! scrubs footage. Marks carry no start/end role; the reconciler orders
//! them by value. The log is CSV with a fixed header and is only ever
//! appended to.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use clipmark_common::error::{ClipmarkError, ClipmarkResult};

/// Header row of the raw mark log.
pub const MARK_LOG_HEADER: [&str; 7] = [
    "filename",
    "timestamp",
    "percent",
    "vid_length",
    "artworkID",
    "distance",
    "clip_type",
];

/// Direction of camera movement captured by a clip.
///
/// Declaration order is the manifest ordering within one artwork/distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ClipType {
    #[serde(rename = "f")]
    Forward,
    #[serde(rename = "d")]
    Down,
    #[serde(rename = "u")]
    Up,
    #[serde(rename = "l")]
    Left,
    #[serde(rename = "r")]
    Right,
}

impl ClipType {
    pub const ALL: [ClipType; 5] = [
        ClipType::Forward,
        ClipType::Down,
        ClipType::Up,
        ClipType::Left,
        ClipType::Right,
    ];

    /// Single-letter code stored in the mark log.
    pub fn code(self) -> &'static str {
        match self {
            ClipType::Forward => "f",
            ClipType::Down => "d",
            ClipType::Up => "u",
            ClipType::Left => "l",
            ClipType::Right => "r",
        }
    }

    /// Human-readable name used in clip file names and the manifest.
    pub fn display_name(self) -> &'static str {
        match self {
            ClipType::Forward => "forward",
            ClipType::Down => "downwards",
            ClipType::Up => "upwards",
            ClipType::Left => "left",
            ClipType::Right => "right",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.code() == code)
    }

    pub fn from_display_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.display_name() == name)
    }

    /// Unmarked-start rule: test footage always opens with the forward pan,
    /// so operators skip marking its start when it begins at 0:00. Only
    /// forward clips may therefore reach the reconciler with a single mark,
    /// which is read as the clip's end.
    pub fn may_start_unmarked(self) -> bool {
        self == ClipType::Forward
    }
}

impl fmt::Display for ClipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for ClipType {
    type Err = ClipmarkError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s).ok_or_else(|| {
            ClipmarkError::usage(format!(
                "clip type {s:?} is not acceptable, should be one of [f, d, u, l, r]"
            ))
        })
    }
}

/// One row of the raw mark log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMark {
    /// File name of the source video.
    #[serde(rename = "filename")]
    pub video_id: String,

    /// Position in seconds: `video_length * percent / 100`.
    #[serde(rename = "timestamp")]
    pub raw_timestamp: f64,

    /// Playback position in percent [0, 100].
    pub percent: f64,

    /// Total video length in seconds.
    #[serde(rename = "vid_length")]
    pub video_length: f64,

    #[serde(rename = "artworkID")]
    pub artwork: String,

    pub distance: String,

    pub clip_type: ClipType,
}

impl RawMark {
    /// Build a mark from a player snapshot, deriving the raw timestamp.
    pub fn from_position(
        video_id: impl Into<String>,
        percent: f64,
        video_length: f64,
        artwork: impl Into<String>,
        distance: impl Into<String>,
        clip_type: ClipType,
    ) -> Self {
        Self {
            video_id: video_id.into(),
            raw_timestamp: video_length * (percent / 100.0),
            percent,
            video_length,
            artwork: artwork.into(),
            distance: distance.into(),
            clip_type,
        }
    }

    /// Grouping identity of the clip this mark bounds.
    pub fn key(&self) -> ClipKey {
        ClipKey {
            artwork: self.artwork.clone(),
            distance: self.distance.clone(),
            clip_type: self.clip_type,
            video_id: self.video_id.clone(),
        }
    }

    /// Whether the timestamp lies inside `[0, video_length]`.
    pub fn is_within_video(&self) -> bool {
        self.raw_timestamp.is_finite()
            && self.raw_timestamp >= 0.0
            && self.raw_timestamp <= self.video_length
    }
}

/// Identity of one logical clip: all marks sharing a key bound the same clip.
///
/// Field order defines the manifest order: artwork, distance, clip type,
/// then video.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ClipKey {
    pub artwork: String,
    pub distance: String,
    pub clip_type: ClipType,
    pub video_id: String,
}

impl fmt::Display for ClipKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "(video={}, artwork={}, distance={}, clip_type={})",
            self.video_id, self.artwork, self.distance, self.clip_type
        )
    }
}

/// Read every mark from a log file. Any malformed row fails the whole read.
pub fn read_mark_log(path: &Path) -> ClipmarkResult<Vec<RawMark>> {
    if !path.exists() {
        return Err(ClipmarkError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    // Field values are kept verbatim; file names may carry spaces.
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    if headers.iter().ne(MARK_LOG_HEADER.iter().copied()) {
        return Err(ClipmarkError::mark_log(format!(
            "unexpected header in {}: {:?}",
            path.display(),
            headers
        )));
    }

    let marks = reader
        .deserialize::<RawMark>()
        .collect::<Result<Vec<_>, _>>()?;

    tracing::debug!(path = %path.display(), marks = marks.len(), "Read mark log");
    Ok(marks)
}
