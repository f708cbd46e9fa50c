//! SyncEngine for moving files between the real tree and the overlay
//!
//! This module provides:
//! - **add** / **remove**: start or stop tracking files
//! - **list**: show tracked files
//! - **pull** / **push**: copy differing files in either direction

mod engine;
mod report;

pub use engine::{Pending, PendingPair, SyncEngine};
pub use report::{FileFailure, SyncDirection, SyncReport, Transfer};
