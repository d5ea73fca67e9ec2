use std::fmt;

use anyhow::{anyhow, Result};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct PythonVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: Option<u32>,
}

impl PythonVersion {
    /// Parses `3.12`, `3.12.4` or interpreter-style strings such as
    /// `3.13.0rc1` / `3.12.4+` (only the numeric release prefix is kept).
    ///
    /// # Errors
    ///
    /// Returns an error when the major or minor component is missing.
    pub fn parse(raw: &str) -> Result<Self> {
        let trimmed = raw.trim();
        let mut parts = trimmed.split('.');
        let major = parse_component(parts.next())
            .ok_or_else(|| anyhow!("invalid python version '{trimmed}'"))?;
        let minor = parse_component(parts.next())
            .ok_or_else(|| anyhow!("invalid python version '{trimmed}'"))?;
        let patch = parse_component(parts.next());
        Ok(Self {
            major,
            minor,
            patch,
        })
    }

    /// The `requires-python` specifier recorded in the lock.
    #[must_use]
    pub fn requires_python(&self) -> String {
        format!(">={}.{}", self.major, self.minor)
    }
}

fn parse_component(part: Option<&str>) -> Option<u32> {
    let part = part?;
    let digits: String = part.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

impl fmt::Display for PythonVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}
