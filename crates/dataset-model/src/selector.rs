//! Rotating artwork/distance selectors.
//!
//! Each selector persists a rotation counter; the current label is
//! `labels[rotations % labels.len()]`. Operators advance a selector until it
//! shows the artwork or distance being filmed, then record marks.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use clipmark_common::error::{ClipmarkError, ClipmarkResult};

/// Which label list a selector rotates over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorKind {
    Artwork,
    Distance,
}

impl SelectorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SelectorKind::Artwork => "artwork",
            SelectorKind::Distance => "distance",
        }
    }

    /// File holding this selector's state inside the data directory.
    pub fn state_path(self, data_dir: &Path) -> PathBuf {
        data_dir.join(format!("{}.json", self.as_str()))
    }
}

impl fmt::Display for SelectorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted selector state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorState {
    pub rotations: u64,
}

/// Label selected after `rotations` rotations.
pub fn label_at(labels: &[String], rotations: u64) -> Option<&str> {
    if labels.is_empty() {
        return None;
    }
    let index = (rotations % labels.len() as u64) as usize;
    Some(labels[index].as_str())
}

/// A selector bound to its label list and state file.
#[derive(Debug, Clone)]
pub struct RotatingSelector {
    kind: SelectorKind,
    labels: Vec<String>,
    state: SelectorState,
    path: PathBuf,
}

impl RotatingSelector {
    /// Load a selector from the data directory. A missing state file means
    /// no rotations yet.
    pub fn load(data_dir: &Path, kind: SelectorKind, labels: Vec<String>) -> ClipmarkResult<Self> {
        if labels.is_empty() {
            return Err(ClipmarkError::config(format!("{kind} label list is empty")));
        }

        let path = kind.state_path(data_dir);
        let state = if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            serde_json::from_str(&content)?
        } else {
            SelectorState::default()
        };

        Ok(Self {
            kind,
            labels,
            state,
            path,
        })
    }

    pub fn rotations(&self) -> u64 {
        self.state.rotations
    }

    pub fn current(&self) -> &str {
        // `load` guarantees a non-empty list.
        label_at(&self.labels, self.state.rotations).unwrap_or_default()
    }

    /// Advance to the next label and persist the new state.
    pub fn rotate(&mut self) -> ClipmarkResult<&str> {
        self.state.rotations += 1;
        self.save()?;
        tracing::debug!(
            selector = %self.kind,
            rotations = self.state.rotations,
            "Rotated selector"
        );
        Ok(self.current())
    }

    fn save(&self) -> ClipmarkResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(&self.state)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}
