//! Reconciled clip intervals and the clip manifest format.

use std::path::Path;

use serde::{Deserialize, Serialize};

use clipmark_common::error::{ClipmarkError, ClipmarkResult};

use crate::mark::{ClipKey, ClipType};

/// Header row of the clip manifest.
pub const MANIFEST_HEADER: [&str; 8] = [
    "clip_name",
    "filename",
    "artworkID",
    "distance",
    "clipType",
    "start",
    "end",
    "length",
];

/// Allowed disagreement between a row's `length` and `end - start`.
const LENGTH_TOLERANCE_SECS: f64 = 1e-6;

/// A validated `[start, end)` interval for one clip key.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipInterval {
    pub key: ClipKey,
    pub name: String,
    pub start: f64,
    pub end: f64,
}

impl ClipInterval {
    pub fn new(key: ClipKey, start: f64, end: f64) -> Self {
        let name = clip_name(&key.artwork, &key.distance, key.clip_type, &key.video_id);
        Self {
            key,
            name,
            start,
            end,
        }
    }

    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Deterministic output file name for a clip:
/// `{artwork}_{distance}_{clip type name}{source extension}`.
pub fn clip_name(artwork: &str, distance: &str, clip_type: ClipType, video_id: &str) -> String {
    let extension = Path::new(video_id)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    format!(
        "{artwork}_{distance}_{}{extension}",
        clip_type.display_name()
    )
}

/// One row of the clip manifest as stored on disk.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestRow {
    pub clip_name: String,

    #[serde(rename = "filename")]
    pub video_id: String,

    #[serde(rename = "artworkID")]
    pub artwork: String,

    pub distance: String,

    #[serde(rename = "clipType", with = "clip_type_name")]
    pub clip_type: ClipType,

    pub start: f64,

    pub end: f64,

    pub length: f64,
}

impl From<&ClipInterval> for ManifestRow {
    fn from(interval: &ClipInterval) -> Self {
        Self {
            clip_name: interval.name.clone(),
            video_id: interval.key.video_id.clone(),
            artwork: interval.key.artwork.clone(),
            distance: interval.key.distance.clone(),
            clip_type: interval.key.clip_type,
            start: interval.start,
            end: interval.end,
            length: interval.duration(),
        }
    }
}

impl ManifestRow {
    /// Check the row describes a usable interval.
    pub fn validate(&self) -> ClipmarkResult<()> {
        if !self.start.is_finite() || self.start < 0.0 {
            return Err(ClipmarkError::manifest(format!(
                "{}: start {} is negative",
                self.clip_name, self.start
            )));
        }
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(ClipmarkError::manifest(format!(
                "{}: length {} is not positive",
                self.clip_name, self.length
            )));
        }
        if ((self.end - self.start) - self.length).abs() > LENGTH_TOLERANCE_SECS {
            return Err(ClipmarkError::manifest(format!(
                "{}: length {} disagrees with [{}, {}]",
                self.clip_name, self.length, self.start, self.end
            )));
        }
        Ok(())
    }
}

mod clip_type_name {
    use serde::{de, Deserialize, Deserializer, Serializer};

    use crate::mark::ClipType;

    pub fn serialize<S: Serializer>(clip_type: &ClipType, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(clip_type.display_name())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<ClipType, D::Error> {
        let name = String::deserialize(d)?;
        ClipType::from_display_name(&name)
            .ok_or_else(|| de::Error::custom(format!("unknown clip type name {name:?}")))
    }
}

/// Write the manifest, replacing any previous one only once the new file
/// is complete.
pub fn write_manifest(path: &Path, intervals: &[ClipInterval]) -> ClipmarkResult<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = path.with_extension("csv.tmp");
    {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_path(&tmp_path)?;
        writer.write_record(MANIFEST_HEADER)?;
        for interval in intervals {
            writer.serialize(ManifestRow::from(interval))?;
        }
        writer.flush()?;
    }
    std::fs::rename(&tmp_path, path)?;

    tracing::info!(path = %path.display(), clips = intervals.len(), "Wrote clip manifest");
    Ok(())
}

/// Read and validate every manifest row.
pub fn read_manifest(path: &Path) -> ClipmarkResult<Vec<ManifestRow>> {
    if !path.exists() {
        return Err(ClipmarkError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_path(path)?;
    let rows = reader
        .deserialize::<ManifestRow>()
        .collect::<Result<Vec<_>, _>>()?;

    for row in &rows {
        row.validate()?;
    }

    tracing::debug!(path = %path.display(), rows = rows.len(), "Read clip manifest");
    Ok(rows)
}
