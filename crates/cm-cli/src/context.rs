//! Settings resolution for one invocation
//!
//! Merges the config file with environment and command-line overrides,
//! prepares the overlay root and builds the engine the commands share.

use std::path::PathBuf;

use tracing::debug;

use cm_core::{Config, SyncEngine, ensure_overlay_root};

use crate::cli::Cli;
use crate::error::Result;

/// Values from flags or `CM_*` variables that take precedence over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    pub config: Option<PathBuf>,
    pub overlay: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub no_backup: bool,
    pub symlink: bool,
    pub diff_tool: Option<String>,
    pub follow_links: bool,
}

impl From<&Cli> for Overrides {
    fn from(cli: &Cli) -> Self {
        Self {
            config: cli.config.clone(),
            overlay: cli.overlay.clone(),
            root: cli.root.clone(),
            no_backup: cli.no_backup,
            symlink: cli.symlink,
            diff_tool: cli.diff_tool.clone(),
            follow_links: cli.follow_links,
        }
    }
}

impl Overrides {
    /// Apply on top of `config`. Flags can switch toggles on, never off.
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(overlay) = &self.overlay {
            config.overlay_root = overlay.clone();
        }
        if let Some(root) = &self.root {
            config.real_root = root.clone();
        }
        if let Some(tool) = self.diff_tool.as_ref().filter(|t| !t.is_empty()) {
            config.diff_tool = Some(tool.clone());
        }
        config.no_backup |= self.no_backup;
        config.symlink |= self.symlink;
        config.follow_links |= self.follow_links;
        config
    }

    /// Load the config file and apply these overrides.
    pub fn resolve(&self) -> Result<Config> {
        let config = Config::discover(self.config.as_deref())?;
        Ok(self.apply(config))
    }
}

/// Ready-to-use engine for a command.
pub struct Context {
    pub engine: SyncEngine,
}

impl Context {
    /// Resolve settings, make sure the overlay root is usable and build the
    /// engine. Any failure here aborts before a command runs.
    pub fn init(overrides: &Overrides) -> Result<Self> {
        let config = overrides.resolve()?;
        debug!(
            overlay = %config.overlay_root.display(),
            root = %config.real_root.display(),
            "Resolved config"
        );
        ensure_overlay_root(&config.overlay_root)?;
        let engine = SyncEngine::new(config)?;
        Ok(Self { engine })
    }

    pub fn config(&self) -> &Config {
        self.engine.config()
    }
}
