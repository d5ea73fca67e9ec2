use crate::package::Inventory;
use crate::python::PythonVersion;

pub const LOCK_VERSION: &str = "1.0";
pub const CREATED_BY: &str = "pylock";
pub const DEFAULT_LOCK_FILE: &str = "pylock.toml";

#[derive(Clone, Debug)]
pub struct LockDocument {
    pub requires_python: String,
    pub packages: Inventory,
}

impl LockDocument {
    #[must_use]
    pub fn new(python: PythonVersion, packages: Inventory) -> Self {
        Self {
            requires_python: python.requires_python(),
            packages,
        }
    }
}
