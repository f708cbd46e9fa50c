//! External diff and diffstat executables

use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use crate::{Error, Result};

/// Colour-capable diff preferred when nothing is configured.
pub const PREFERRED_DIFF: &str = "colordiff";

/// Baseline diff, also used whenever plain output is required.
pub const BASELINE_DIFF: &str = "diff";

/// Summarizer fed with accumulated diff output.
pub const DIFFSTAT: &str = "diffstat";

/// Produces a textual diff of two files.
pub trait DiffRunner {
    /// Raw diff output for `left` against `right`.
    fn run(&self, left: &Path, right: &Path) -> Result<Vec<u8>>;
}

/// Summarizes concatenated diff output.
pub trait Summarizer {
    fn summarize(&self, diff: &[u8]) -> Result<Vec<u8>>;
}

/// A diff executable invoked as `<tool> -Nu <left> <right>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalDiff {
    program: PathBuf,
}

impl ExternalDiff {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Resolve the diff tool from `PATH`: `override_tool`, else
    /// [`PREFERRED_DIFF`], else [`BASELINE_DIFF`].
    pub fn resolve(override_tool: Option<&str>) -> Result<Self> {
        Self::resolve_with(override_tool, lookup_on_path)
    }

    /// Resolve the non-colourised [`BASELINE_DIFF`], ignoring any
    /// configured preference.
    pub fn resolve_plain() -> Result<Self> {
        Self::resolve_plain_with(lookup_on_path)
    }

    /// [`ExternalDiff::resolve`] with a custom executable lookup.
    pub fn resolve_with(
        override_tool: Option<&str>,
        lookup: impl Fn(&str) -> Option<PathBuf>,
    ) -> Result<Self> {
        if let Some(tool) = override_tool {
            return lookup(tool).map(Self::new).ok_or_else(|| Error::ToolNotFound {
                tool: tool.to_string(),
            });
        }

        lookup(PREFERRED_DIFF)
            .or_else(|| lookup(BASELINE_DIFF))
            .map(Self::new)
            .ok_or_else(|| Error::ToolNotFound {
                tool: BASELINE_DIFF.to_string(),
            })
    }

    /// [`ExternalDiff::resolve_plain`] with a custom executable lookup.
    pub fn resolve_plain_with(lookup: impl Fn(&str) -> Option<PathBuf>) -> Result<Self> {
        lookup(BASELINE_DIFF)
            .map(Self::new)
            .ok_or_else(|| Error::ToolNotFound {
                tool: BASELINE_DIFF.to_string(),
            })
    }
}

impl DiffRunner for ExternalDiff {
    fn run(&self, left: &Path, right: &Path) -> Result<Vec<u8>> {
        debug!(tool = %self.program.display(), left = %left.display(), right = %right.display(), "Running diff");
        let output = Command::new(&self.program)
            .arg("-Nu")
            .arg(left)
            .arg(right)
            .output()
            .map_err(|source| Error::ToolSpawn {
                tool: self.program.clone(),
                source,
            })?;

        // diff exits 1 when the inputs differ; only >1 means trouble.
        match output.status.code() {
            Some(0 | 1) => {}
            code => warn!(
                tool = %self.program.display(),
                ?code,
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "Diff tool reported a problem"
            ),
        }

        Ok(output.stdout)
    }
}

/// diffstat, given the diff text on stdin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalDiffstat {
    program: PathBuf,
}

impl ExternalDiffstat {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Find [`DIFFSTAT`] on `PATH`.
    pub fn resolve() -> Result<Self> {
        lookup_on_path(DIFFSTAT)
            .map(Self::new)
            .ok_or_else(|| Error::ToolNotFound {
                tool: DIFFSTAT.to_string(),
            })
    }

    /// Arguments for the current platform. macOS diffstat has no `-C`.
    pub fn args() -> &'static [&'static str] {
        if cfg!(target_os = "macos") {
            &[]
        } else {
            &["-C"]
        }
    }
}

impl Summarizer for ExternalDiffstat {
    fn summarize(&self, diff: &[u8]) -> Result<Vec<u8>> {
        let spawn_error = |source: std::io::Error| Error::ToolSpawn {
            tool: self.program.clone(),
            source,
        };

        let mut child = Command::new(&self.program)
            .args(Self::args())
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(spawn_error)?;

        // diffstat reads all input before writing, so feeding stdin up
        // front cannot deadlock on a full stdout pipe.
        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(diff).map_err(spawn_error)?;
        }

        let output = child.wait_with_output().map_err(spawn_error)?;
        if !output.status.success() {
            warn!(
                tool = %self.program.display(),
                code = ?output.status.code(),
                stderr = %String::from_utf8_lossy(&output.stderr).trim(),
                "Summarizer reported a problem"
            );
        }
        Ok(output.stdout)
    }
}

fn lookup_on_path(name: &str) -> Option<PathBuf> {
    which::which(name).ok()
}
