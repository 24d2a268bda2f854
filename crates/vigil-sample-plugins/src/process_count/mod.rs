//! The `pluginb` sample: a check that counts running processes.
//!
//! Processes are counted as the numeric directories under the proc
//! filesystem root.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::info;
use vigil_checks::{Check, CheckDescriptor, CheckError, CheckFailure, PluginOwner, Report};

use crate::SAMPLES_TARGET;

/// Default proc filesystem root.
pub const PROC_ROOT: &str = "/proc";

const ALIAS: &str = "pluginb";

/// Check that reports the number of running processes.
#[derive(Debug, Clone)]
pub struct ProcessCountCheck {
    root: PathBuf,
}

impl Default for ProcessCountCheck {
    fn default() -> Self {
        Self::with_root(PROC_ROOT)
    }
}

impl ProcessCountCheck {
    /// Creates a check that counts processes under `root`.
    #[must_use]
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Directory scanned for process entries.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Counts the process entries below the root.
    ///
    /// # Errors
    ///
    /// Returns the I/O error raised while listing the directory.
    pub fn count(&self) -> io::Result<usize> {
        let mut count = 0;
        for listed in fs::read_dir(&self.root)? {
            let entry = listed?;
            let numeric = entry
                .file_name()
                .to_str()
                .is_some_and(|name| !name.is_empty() && name.bytes().all(|b| b.is_ascii_digit()));
            if numeric && entry.file_type()?.is_dir() {
                count += 1;
            }
        }
        Ok(count)
    }
}

impl Check for ProcessCountCheck {
    fn run(&self, report: &mut Report) -> Result<(), CheckFailure> {
        info!(target: SAMPLES_TARGET, plugin = ALIAS, "plugin B is saying hi");
        let count = self.count().map_err(|error| {
            CheckFailure::with_source(
                format!("cannot list processes under {}", self.root.display()),
                error,
            )
        })?;
        report.line(&format!("--- Check {ALIAS} ---"));
        report.line(&format!("- Total processes:{count}"));
        Ok(())
    }
}

pub(crate) fn descriptors(owner: &PluginOwner) -> Result<Vec<Arc<CheckDescriptor>>, CheckError> {
    let descriptor =
        CheckDescriptor::builder("pluginb", owner.clone(), ProcessCountCheck::default())
            .alias(ALIAS)
            .category("sample")
            .build()?;
    Ok(vec![descriptor])
}
