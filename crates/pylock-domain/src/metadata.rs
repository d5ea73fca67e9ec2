//! Core metadata (`METADATA` / `PKG-INFO`) header parsing.

use serde::Deserialize;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum MetadataError {
    #[error("metadata is missing the '{field}' header")]
    MissingField { field: &'static str },
    #[error("metadata header '{field}' is empty")]
    EmptyField { field: &'static str },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CoreMetadata {
    pub name: String,
    pub version: String,
    pub requires_python: Option<String>,
}

impl CoreMetadata {
    /// Parses the header block of a core metadata file.
    ///
    /// Only the headers before the first blank line are read; the body holds
    /// the long description. Continuation lines are ignored.
    ///
    /// # Errors
    ///
    /// Returns an error when `Name` or `Version` is absent or blank.
    pub fn parse(contents: &str) -> Result<Self, MetadataError> {
        let mut name = None;
        let mut version = None;
        let mut requires_python = None;

        for line in contents.lines() {
            if line.trim().is_empty() {
                break;
            }
            if line.starts_with([' ', '\t']) {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();
            let slot = if key.eq_ignore_ascii_case("name") {
                &mut name
            } else if key.eq_ignore_ascii_case("version") {
                &mut version
            } else if key.eq_ignore_ascii_case("requires-python") {
                &mut requires_python
            } else {
                continue;
            };
            if slot.is_none() {
                *slot = Some(value.to_string());
            }
        }

        let name = require_field(name, "Name")?;
        let version = require_field(version, "Version")?;
        let requires_python = requires_python.filter(|value| !value.is_empty());
        Ok(Self {
            name,
            version,
            requires_python,
        })
    }
}

fn require_field(value: Option<String>, field: &'static str) -> Result<String, MetadataError> {
    match value {
        None => Err(MetadataError::MissingField { field }),
        Some(value) if value.is_empty() => Err(MetadataError::EmptyField { field }),
        Some(value) => Ok(value),
    }
}

/// The `direct_url.json` record written by installers for packages that did
/// not come from an index.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct DirectUrl {
    pub url: String,
    #[serde(default)]
    pub vcs_info: Option<VcsInfo>,
    #[serde(default)]
    pub archive_info: Option<ArchiveInfo>,
    #[serde(default)]
    pub dir_info: Option<DirInfo>,
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct VcsInfo {
    pub vcs: String,
    pub commit_id: String,
    #[serde(default)]
    pub requested_revision: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct ArchiveInfo {
    #[serde(default)]
    pub hashes: std::collections::BTreeMap<String, String>,
    /// Legacy `<algorithm>=<digest>` form.
    #[serde(default)]
    pub hash: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, PartialEq, Eq)]
pub struct DirInfo {
    #[serde(default)]
    pub editable: bool,
}

impl DirectUrl {
    /// # Errors
    ///
    /// Returns an error when the payload is not valid `direct_url.json`.
    pub fn parse(contents: &str) -> serde_json::Result<Self> {
        serde_json::from_str(contents)
    }
}

impl ArchiveInfo {
    /// Hashes keyed by algorithm, folding the legacy `hash` field in when the
    /// `hashes` table does not already carry that algorithm.
    #[must_use]
    pub fn all_hashes(&self) -> std::collections::BTreeMap<String, String> {
        let mut hashes = self.hashes.clone();
        if let Some((algorithm, digest)) = self.hash.as_deref().and_then(|raw| raw.split_once('=')) {
            hashes
                .entry(algorithm.to_ascii_lowercase())
                .or_insert_with(|| digest.to_string());
        }
        hashes
    }
}
