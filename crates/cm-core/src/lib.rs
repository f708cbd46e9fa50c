//! Core orchestration layer for cm
//!
//! Builds the user-facing operations on top of `cm-fs`:
//!
//! - **Config**: roots and toggles, loaded once and passed in explicitly
//! - **Setup**: overlay root creation and writability check
//! - **SyncEngine**: add, remove, list, pull and push
//! - **DiffReporter**: diff and status through external tools
//!
//! # Architecture
//!
//! ```text
//!        cm-cli
//!          |
//!       cm-core
//!          |
//!        cm-fs
//! ```
//!
//! # Example
//!
//! ```no_run
//! use cm_core::{Config, SyncEngine};
//!
//! fn example() -> cm_core::Result<()> {
//!     let engine = SyncEngine::new(Config::default())?;
//!     for path in engine.list("/etc")? {
//!         println!("{}", path.display());
//!     }
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod diff;
pub mod error;
pub mod setup;
pub mod sync;

pub use config::Config;
pub use diff::{
    DiffReporter, DiffRunner, DiffSummary, ExternalDiff, ExternalDiffstat, StatusReport,
    Summarizer,
};
pub use error::{Error, Result};
pub use setup::ensure_overlay_root;
pub use sync::{
    FileFailure, Pending, PendingPair, SyncDirection, SyncEngine, SyncReport, Transfer,
};
