//! Filesystem layer for cm
//!
//! Maps paths between the real tree and the overlay tree, expands paths into
//! file sets, compares file pairs cheaply and copies files with their
//! timestamps and permissions preserved.

pub mod error;
pub mod io;
pub mod path;
pub mod quick_diff;
pub mod walk;

pub use error::{Error, Result};
pub use path::{PathMapper, absolutize};
pub use quick_diff::{ChangeDetector, FileSnapshot, StatFailurePolicy, quick_diff};
pub use walk::{Enumerator, expand};
