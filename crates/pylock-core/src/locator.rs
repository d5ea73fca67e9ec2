use std::path::{Path, PathBuf};

use pylock_domain::PythonVersion;
use tracing::debug;

use crate::env::{EnvironmentSnapshot, PYLOCK_PYTHON, VIRTUAL_ENV};
use crate::error::PylockError;
use crate::python::{probe_version, pyvenv_version};

/// The active virtual environment.
#[derive(Clone, Debug)]
pub struct VirtualEnv {
    pub root: PathBuf,
    pub interpreter: PathBuf,
    pub python: PythonVersion,
}

/// Resolves the active virtual environment from `VIRTUAL_ENV`.
///
/// # Errors
///
/// Returns [`PylockError::NotInVirtualEnvironment`] when the marker is unset,
/// and [`PylockError::EnvironmentIntrospection`] when it points at something
/// that is not a directory or the interpreter version cannot be determined.
pub fn locate_environment(snapshot: &EnvironmentSnapshot) -> Result<VirtualEnv, PylockError> {
    let root = snapshot
        .get(VIRTUAL_ENV)
        .map(PathBuf::from)
        .ok_or(PylockError::NotInVirtualEnvironment)?;
    if !root.is_dir() {
        return Err(PylockError::introspection(
            &root,
            "VIRTUAL_ENV does not point to a directory",
        ));
    }
    // Provenance paths are made relative to the venv's parent, which needs an
    // anchored root even when VIRTUAL_ENV is relative.
    let root = std::path::absolute(&root)
        .map_err(|err| PylockError::introspection(&root, err.to_string()))?;

    let interpreter = snapshot
        .get(PYLOCK_PYTHON)
        .map_or_else(|| venv_interpreter(&root), PathBuf::from);

    let python = match pyvenv_version(&root) {
        Some(version) => version,
        None => {
            debug!(interpreter = %interpreter.display(), "pyvenv.cfg has no version; probing interpreter");
            probe_version(&interpreter)
                .map_err(|err| PylockError::introspection(&root, format!("{err:#}")))?
        }
    };
    debug!(root = %root.display(), python = %python, "located virtual environment");

    Ok(VirtualEnv {
        root,
        interpreter,
        python,
    })
}

#[cfg(windows)]
fn venv_interpreter(root: &Path) -> PathBuf {
    root.join("Scripts").join("python.exe")
}

#[cfg(not(windows))]
fn venv_interpreter(root: &Path) -> PathBuf {
    root.join("bin").join("python")
}
