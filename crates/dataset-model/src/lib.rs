//! Clipmark Dataset Model
//!
//! Defines the data contracts shared by the three pipeline stages:
//! - **Marks:** raw boundary marks appended by the recorder (`clip_timestamps.csv`)
//! - **Manifest:** reconciled clip intervals consumed by the extractor (`testing_videos.csv`)
//! - **Selectors:** rotating artwork/distance state stamped onto each mark
//!
//! Stages never call each other; these two tabular files are the only
//! hand-off between them.

pub mod manifest;
pub mod mark;
pub mod selector;

pub use manifest::*;
pub use mark::*;
pub use selector::*;
