use std::io;
use std::path::PathBuf;

/// Failures that abort a lock run.
#[derive(Debug, thiserror::Error)]
pub enum PylockError {
    #[error("Not in an active virtual environment (VIRTUAL_ENV is not set)")]
    NotInVirtualEnvironment,
    #[error("failed to inspect environment at {}: {reason}", path.display())]
    EnvironmentIntrospection { path: PathBuf, reason: String },
    #[error("failed to write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl PylockError {
    pub(crate) fn introspection(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::EnvironmentIntrospection {
            path: path.into(),
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn is_user_error(&self) -> bool {
        matches!(self, Self::NotInVirtualEnvironment)
    }

    #[must_use]
    pub fn reason(&self) -> &'static str {
        match self {
            Self::NotInVirtualEnvironment => "not_in_virtual_environment",
            Self::EnvironmentIntrospection { .. } => "environment_introspection_failed",
            Self::OutputWrite { .. } => "output_write_failed",
        }
    }

    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::NotInVirtualEnvironment => {
                Some("activate the environment first (e.g. `source .venv/bin/activate`)")
            }
            Self::EnvironmentIntrospection { .. } => None,
            Self::OutputWrite { .. } => Some("check that the destination directory exists and is writable"),
        }
    }
}
