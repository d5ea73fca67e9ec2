use std::fs;
use std::path::Path;
use std::process::Command;

use anyhow::{bail, Context, Result};
use pylock_domain::PythonVersion;
use serde::Deserialize;

const VERSION_SCRIPT: &str = r#"import json, sys
print(json.dumps({"major": sys.version_info[0], "minor": sys.version_info[1], "micro": sys.version_info[2]}))
"#;

#[derive(Deserialize)]
struct VersionPayload {
    major: u32,
    minor: u32,
    micro: u32,
}

/// Reads the interpreter version recorded in `pyvenv.cfg`.
///
/// uv and virtualenv write `version_info`, the stdlib `venv` module writes
/// `version`; `version_info` wins when both are present.
pub(crate) fn pyvenv_version(env_root: &Path) -> Option<PythonVersion> {
    let contents = fs::read_to_string(env_root.join("pyvenv.cfg")).ok()?;
    let mut version = None;
    let mut version_info = None;
    for line in contents.lines() {
        let Some((key, value)) = line.split_once('=') else {
            continue;
        };
        let value = value.trim();
        match key.trim() {
            "version_info" => version_info = PythonVersion::parse(value).ok(),
            "version" => version = PythonVersion::parse(value).ok(),
            _ => {}
        }
    }
    version_info.or(version)
}

/// Asks the interpreter for its version.
///
/// # Errors
///
/// Returns an error when the interpreter cannot be invoked or the payload is
/// malformed.
pub(crate) fn probe_version(python: &Path) -> Result<PythonVersion> {
    let output = Command::new(python)
        .arg("-c")
        .arg(VERSION_SCRIPT)
        .output()
        .with_context(|| format!("failed to probe interpreter version via {}", python.display()))?;
    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        bail!("python version probe failed: {}", stderr.trim());
    }
    let payload: VersionPayload =
        serde_json::from_slice(&output.stdout).context("invalid version payload")?;
    Ok(PythonVersion {
        major: payload.major,
        minor: payload.minor,
        patch: Some(payload.micro),
    })
}
