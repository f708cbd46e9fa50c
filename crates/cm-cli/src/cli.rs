//! CLI argument parsing using clap derive

use std::path::PathBuf;

use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, Subcommand};

/// cm - keep system configs in an overlay directory
///
/// Files are tracked by copying them into an overlay tree that mirrors their
/// absolute paths, which can then be backed up, distributed or put under
/// version control. Path arguments may be directories, in which case every
/// file below them is used. With no path the current directory is used.
#[derive(Parser, Debug)]
#[command(name = "cm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Config file to load instead of the standard location
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Root of the overlay tree
    #[arg(long, global = true, env = "CM_OVERLAY", value_name = "DIR")]
    pub overlay: Option<PathBuf>,

    /// Root of the real tree under management
    #[arg(long, global = true, env = "CM_ROOT", value_name = "DIR")]
    pub root: Option<PathBuf>,

    /// Do not keep a `<file>~` backup when pull overwrites a file
    #[arg(long, global = true, env = "CM_NOBACKUP", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub no_backup: bool,

    /// Pull creates symlinks into the overlay instead of copies
    #[arg(long, global = true, env = "CM_SYMLINK", action = ArgAction::SetTrue, value_parser = FalseyValueParser::new())]
    pub symlink: bool,

    /// Diff program to use instead of colordiff or diff
    #[arg(long, global = true, env = "CM_DIFF", value_name = "PROGRAM")]
    pub diff_tool: Option<String>,

    /// Descend into symlinked directories
    #[arg(long, global = true)]
    pub follow_links: bool,

    /// The command to run
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Copy files into the overlay
    ///
    /// Existing overlay copies are overwritten.
    ///
    /// Examples:
    ///   cm add /etc/hosts       # Track one file
    ///   cm add /etc/nginx       # Track a whole directory
    Add {
        /// Files or directories to add
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Remove files from the overlay, leaving the real files alone
    #[command(visible_alias = "remove")]
    Rm {
        /// Files or directories to stop tracking
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,
    },

    /// Show which files are tracked
    #[command(visible_alias = "show")]
    List {
        /// Files or directories to look under
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Copy changed overlay files onto the real tree
    ///
    /// Use "all" to pull everything under the real root.
    #[command(visible_alias = "sync")]
    Pull {
        /// Files or directories to pull, or "all"
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Copy changed real files into the overlay
    ///
    /// Only files already tracked are updated. Use "all" to push
    /// everything under the real root.
    Push {
        /// Files or directories to push, or "all"
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,

        /// Output as JSON for scripting
        #[arg(long)]
        json: bool,
    },

    /// Show a unified diff of tracked files that changed
    Diff {
        /// Diff the real file against the overlay copy
        #[arg(short, long)]
        reverse: bool,

        /// Files or directories to diff
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,
    },

    /// Show a diffstat summary of tracked files that changed
    Status {
        /// Summarize the real files against the overlay copies
        #[arg(short, long)]
        reverse: bool,

        /// Files or directories to summarize
        #[arg(default_value = ".")]
        paths: Vec<PathBuf>,
    },
}
