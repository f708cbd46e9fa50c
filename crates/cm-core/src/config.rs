//! Process-wide settings, built once at startup and handed to the engine

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use cm_fs::{ChangeDetector, Enumerator, PathMapper, StatFailurePolicy};

use crate::{Error, Result};

/// Default location of the overlay tree.
pub const DEFAULT_OVERLAY_ROOT: &str = "/opt/cm";

/// Default real root: the whole filesystem.
pub const DEFAULT_REAL_ROOT: &str = "/";

/// Settings for one cm invocation.
///
/// Loaded from an optional TOML file, then overridden from the environment
/// and command line by the binary. Missing keys take their defaults:
///
/// ```toml
/// overlay_root = "/opt/cm"
/// real_root = "/"
/// no_backup = false
/// symlink = false
/// diff_tool = "colordiff"
/// follow_links = false
/// stat_failure_policy = "always-differ"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Root of the shadow tree
    pub overlay_root: PathBuf,
    /// Root of the live tree under management
    pub real_root: PathBuf,
    /// Skip the `<file>~` backup before pull overwrites a real file
    pub no_backup: bool,
    /// Pull creates symlinks into the overlay instead of copies
    pub symlink: bool,
    /// Diff executable to use instead of colordiff/diff
    pub diff_tool: Option<String>,
    /// Descend into symlinked directories when expanding paths
    pub follow_links: bool,
    /// How quick diff treats pairs it cannot stat
    pub stat_failure_policy: StatFailurePolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            overlay_root: PathBuf::from(DEFAULT_OVERLAY_ROOT),
            real_root: PathBuf::from(DEFAULT_REAL_ROOT),
            no_backup: false,
            symlink: false,
            diff_tool: None,
            follow_links: false,
            stat_failure_policy: StatFailurePolicy::default(),
        }
    }
}

impl Config {
    /// Standard config file location, `<config dir>/cm/config.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("cm").join("config.toml"))
    }

    /// Parse a TOML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| cm_fs::Error::io(path, e))?;
        Self::parse(&content).map_err(|message| Error::ConfigParse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parse TOML config content.
    pub fn parse(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Load `explicit` if given, else the standard file when it exists,
    /// else defaults.
    pub fn discover(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        match Self::default_path() {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "Loading config file");
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }

    /// Path mapper for the configured roots.
    pub fn mapper(&self) -> Result<PathMapper> {
        Ok(PathMapper::new(&self.real_root, &self.overlay_root)?)
    }

    pub fn detector(&self) -> ChangeDetector {
        ChangeDetector::new(self.stat_failure_policy)
    }

    pub fn enumerator(&self) -> Enumerator {
        Enumerator::new().follow_links(self.follow_links)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_file_gives_defaults() {
        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn partial_file_overrides_only_given_keys() {
        let config = Config::parse(
            r#"
overlay_root = "/srv/overlay"
symlink = true
stat_failure_policy = "same-kind-is-identical"
"#,
        )
        .unwrap();

        assert_eq!(config.overlay_root, PathBuf::from("/srv/overlay"));
        assert_eq!(config.real_root, PathBuf::from("/"));
        assert!(config.symlink);
        assert!(!config.no_backup);
        assert_eq!(
            config.stat_failure_policy,
            StatFailurePolicy::SameKindIsIdentical
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Config::parse("overlay = \"/x\"").is_err());
    }

    #[test]
    fn relative_root_fails_mapper() {
        let config = Config {
            real_root: PathBuf::from("relative"),
            ..Config::default()
        };
        assert!(config.mapper().is_err());
    }
}
