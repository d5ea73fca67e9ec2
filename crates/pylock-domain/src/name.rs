use std::fmt;

use serde::Serialize;

/// A distribution name in its canonical form.
///
/// Canonicalization lowercases the name and collapses every run of `-`, `_`
/// and `.` into a single `-`, so `Foo__Bar`, `foo.bar` and `foo-bar` compare
/// equal.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct PackageName(String);

impl PackageName {
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self(canonicalize_package_name(raw))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PackageName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for PackageName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

pub fn canonicalize_package_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_separator = false;
    for ch in name.trim().chars() {
        if matches!(ch, '-' | '_' | '.') {
            pending_separator = true;
            continue;
        }
        if pending_separator && !out.is_empty() {
            out.push('-');
        }
        pending_separator = false;
        out.push(ch.to_ascii_lowercase());
    }
    out
}
