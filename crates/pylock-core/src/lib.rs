#![deny(clippy::all, warnings)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

mod env;
mod error;
mod locator;
mod outcome;
mod provenance;
mod python;
mod scanner;
mod writer;

#[cfg(test)]
mod test_support;

use std::path::{Path, PathBuf};

use pylock_domain::{is_conventional_lock_name, render_lockfile, LockDocument, DEFAULT_LOCK_FILE};
use serde::Serialize;
use serde_json::json;
use tracing::{info, warn};

pub use crate::env::{EnvironmentSnapshot, PYLOCK_PYTHON, VIRTUAL_ENV};
pub use crate::error::PylockError;
pub use crate::locator::{locate_environment, VirtualEnv};
pub use crate::outcome::{CommandStatus, ExecutionOutcome};
pub use crate::scanner::{scan_environment, ScanReport, SkippedEntry};
pub use crate::writer::write_lockfile;

#[derive(Clone, Debug)]
pub struct LockRequest {
    pub output: PathBuf,
}

impl Default for LockRequest {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_LOCK_FILE),
        }
    }
}

#[derive(Clone, Debug, Serialize)]
pub struct LockSummary {
    pub output: PathBuf,
    pub requires_python: String,
    pub packages: usize,
    pub skipped: usize,
    pub duplicates: usize,
}

/// Locates the active venv, inventories it and writes the lock.
///
/// # Errors
///
/// Propagates [`PylockError`] from each stage; nothing is written unless the
/// environment was located and scanned successfully.
pub fn generate_lock(
    request: &LockRequest,
    snapshot: &EnvironmentSnapshot,
) -> Result<LockSummary, PylockError> {
    warn_on_unconventional_name(&request.output);

    let venv = locate_environment(snapshot)?;
    let report = scan_environment(&venv)?;
    let lock = LockDocument::new(venv.python, report.inventory);
    let rendered = render_lockfile(&lock);
    write_lockfile(&request.output, &rendered)?;

    let summary = LockSummary {
        output: request.output.clone(),
        requires_python: lock.requires_python,
        packages: lock.packages.len(),
        skipped: report.skipped.len(),
        duplicates: report.duplicates,
    };
    info!(
        output = %summary.output.display(),
        packages = summary.packages,
        skipped = summary.skipped,
        "wrote lock"
    );
    Ok(summary)
}

/// Runs [`generate_lock`] and folds the result into an outcome for display.
#[must_use]
pub fn execute(request: &LockRequest, snapshot: &EnvironmentSnapshot) -> ExecutionOutcome {
    match generate_lock(request, snapshot) {
        Ok(summary) => {
            let noun = if summary.packages == 1 {
                "package"
            } else {
                "packages"
            };
            let message = format!(
                "locked {} {noun} to {}",
                summary.packages,
                summary.output.display()
            );
            let mut details = json!(summary);
            if summary.skipped > 0 {
                details["hint"] = json!(format!(
                    "{} metadata entries could not be read and were left out; rerun with -v for details",
                    summary.skipped
                ));
            }
            ExecutionOutcome::success(message, details)
        }
        Err(err) => ExecutionOutcome::from_error(&err),
    }
}

fn warn_on_unconventional_name(output: &Path) {
    let conventional = output
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(is_conventional_lock_name);
    if !conventional {
        warn!(
            output = %output.display(),
            "lock file name does not follow the pylock.toml / pylock.<name>.toml convention"
        );
    }
}
