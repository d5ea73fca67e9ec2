use std::collections::BTreeMap;
use std::env;
use std::ffi::OsString;

/// Marker set by `activate` scripts (and by `uv run`) for the active venv.
pub const VIRTUAL_ENV: &str = "VIRTUAL_ENV";
/// Overrides the interpreter derived from the venv layout.
pub const PYLOCK_PYTHON: &str = "PYLOCK_PYTHON";

const CAPTURED: &[&str] = &[VIRTUAL_ENV, PYLOCK_PYTHON];

/// The slice of process environment the lock run depends on, captured once
/// so the rest of the pipeline never consults ambient state.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvironmentSnapshot {
    vars: BTreeMap<String, OsString>,
}

impl EnvironmentSnapshot {
    #[must_use]
    pub fn capture() -> Self {
        let vars = CAPTURED
            .iter()
            .filter_map(|key| env::var_os(key).map(|value| ((*key).to_string(), value)))
            .collect();
        Self { vars }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<OsString>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        }
    }

    /// Returns the value of `key`, treating an empty value as unset.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&OsString> {
        self.vars.get(key).filter(|value| !value.is_empty())
    }
}
