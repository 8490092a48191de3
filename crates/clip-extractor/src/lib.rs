//! Clipmark Clip Extractor
//!
//! Cuts each manifest interval out of its source video without
//! re-encoding:
//!
//! ```text
//! testing_videos.csv ──┐
//!                      ├── Plan (all sources must exist)
//! source videos ───────┘         │
//!                                ├── mkdir clips/<artwork>
//!                                │
//!                                ▼
//!                  ffmpeg -ss/-t, -c:v copy, -an, -y
//!                                │
//!                                ▼
//!                  clips/<artwork>/<clip_name>
//! ```
//!
//! Rows are extracted one at a time; the first failure stops the run.

pub mod extract;

pub use extract::*;
