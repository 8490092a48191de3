//! Clipmark Boundary Reconciler
//!
//! Turns the raw mark log into the clip manifest:
//! - **Grouping:** marks are grouped by clip key (video, artwork, distance, clip type)
//! - **Pairing:** each group yields exactly one `[start, end)` interval
//! - **Validation:** cardinality, unmarked-start, and bounds rules
//!
//! Reconciliation is all-or-nothing. A single bad group aborts the run and
//! no manifest is written, since a dataset silently missing clips is harder
//! to notice than a failed run.

pub mod error;
pub mod reconcile;

pub use error::ReconcileError;
pub use reconcile::{reconcile, reconcile_log};
