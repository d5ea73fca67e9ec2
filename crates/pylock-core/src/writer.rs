use std::fs;
use std::io::{self, Write};
use std::path::Path;

use tempfile::NamedTempFile;

use crate::error::PylockError;

/// Writes `contents` to `dest` through a temp file in the same directory, so
/// `dest` either keeps its previous contents or holds the complete new file.
///
/// # Errors
///
/// Returns [`PylockError::OutputWrite`] when the temp file cannot be created,
/// written or renamed into place.
pub fn write_lockfile(dest: &Path, contents: &str) -> Result<(), PylockError> {
    let wrap = |source: io::Error| PylockError::OutputWrite {
        path: dest.to_path_buf(),
        source,
    };
    let parent = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(parent).map_err(wrap)?;
    tmp.write_all(contents.as_bytes()).map_err(wrap)?;
    tmp.flush().map_err(wrap)?;
    set_lock_permissions(tmp.as_file()).map_err(wrap)?;
    tmp.as_file().sync_all().map_err(wrap)?;
    tmp.persist(dest).map_err(|err| wrap(err.error))?;
    Ok(())
}

#[cfg(unix)]
fn set_lock_permissions(file: &fs::File) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    file.set_permissions(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn set_lock_permissions(_file: &fs::File) -> io::Result<()> {
    Ok(())
}
