use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use pylock_domain::{CoreMetadata, DirectUrl, Insertion, InstalledPackage, Inventory, PackageName};
use tracing::{debug, warn};

use crate::error::PylockError;
use crate::locator::VirtualEnv;
use crate::provenance::source_from_direct_url;

/// A metadata entry that could not be read and was left out of the lock.
#[derive(Clone, Debug)]
pub struct SkippedEntry {
    pub path: PathBuf,
    pub reason: String,
}

#[derive(Clone, Debug, Default)]
pub struct ScanReport {
    pub inventory: Inventory,
    pub skipped: Vec<SkippedEntry>,
    /// Metadata entries dropped because another entry for the same
    /// canonical name took precedence.
    pub duplicates: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EntryKind {
    DistInfo,
    EggInfoDir,
    EggInfoFile,
}

/// Enumerates the distributions installed in `venv`.
///
/// # Errors
///
/// Returns [`PylockError::EnvironmentIntrospection`] when the environment has
/// no site-packages directory or one cannot be listed. Individual broken
/// entries are skipped and reported in [`ScanReport::skipped`].
pub fn scan_environment(venv: &VirtualEnv) -> Result<ScanReport, PylockError> {
    let project_root = venv.root.parent().unwrap_or(&venv.root);
    let mut report = ScanReport::default();
    for site in site_packages_dirs(&venv.root)? {
        debug!(site = %site.display(), "scanning site-packages");
        scan_site_packages(&site, project_root, &mut report)?;
    }
    Ok(report)
}

/// Finds the site-packages directories of a venv, each listed once even when
/// reachable through several paths (e.g. `lib64` symlinked to `lib`).
fn site_packages_dirs(root: &Path) -> Result<Vec<PathBuf>, PylockError> {
    let mut candidates = Vec::new();
    for lib in ["lib", "lib64"] {
        let lib_dir = root.join(lib);
        if !lib_dir.is_dir() {
            continue;
        }
        let entries = fs::read_dir(&lib_dir)
            .map_err(|err| PylockError::introspection(&lib_dir, err.to_string()))?;
        for entry in entries {
            let entry =
                entry.map_err(|err| PylockError::introspection(&lib_dir, err.to_string()))?;
            let is_python_dir = entry
                .file_name()
                .to_str()
                .is_some_and(|name| name.starts_with("python"));
            let site = entry.path().join("site-packages");
            if is_python_dir && site.is_dir() {
                candidates.push(site);
            }
        }
    }
    let windows_site = root.join("Lib").join("site-packages");
    if windows_site.is_dir() {
        candidates.push(windows_site);
    }
    candidates.sort();

    let mut seen = Vec::new();
    let mut dirs = Vec::new();
    for candidate in candidates {
        let canonical = fs::canonicalize(&candidate)
            .map_err(|err| PylockError::introspection(&candidate, err.to_string()))?;
        if seen.contains(&canonical) {
            continue;
        }
        seen.push(canonical);
        dirs.push(candidate);
    }

    if dirs.is_empty() {
        return Err(PylockError::introspection(
            root,
            "no site-packages directory found",
        ));
    }
    Ok(dirs)
}

fn scan_site_packages(
    site: &Path,
    project_root: &Path,
    report: &mut ScanReport,
) -> Result<(), PylockError> {
    let listing =
        fs::read_dir(site).map_err(|err| PylockError::introspection(site, err.to_string()))?;
    let mut entries = Vec::new();
    for entry in listing {
        match entry {
            Ok(entry) => entries.push(entry.path()),
            Err(err) => skip(report, site, format!("failed to read directory entry: {err}")),
        }
    }
    entries.sort();

    for path in entries {
        let Some(kind) = entry_kind(&path) else {
            continue;
        };
        match read_entry(&path, kind, project_root) {
            Ok(package) => record(report, package),
            Err(reason) => skip(report, &path, reason),
        }
    }
    Ok(())
}

fn entry_kind(path: &Path) -> Option<EntryKind> {
    let name = path.file_name()?.to_str()?;
    if name.ends_with(".dist-info") && path.is_dir() {
        Some(EntryKind::DistInfo)
    } else if name.ends_with(".egg-info") {
        if path.is_dir() {
            Some(EntryKind::EggInfoDir)
        } else {
            Some(EntryKind::EggInfoFile)
        }
    } else {
        None
    }
}

fn read_entry(path: &Path, kind: EntryKind, project_root: &Path) -> Result<InstalledPackage, String> {
    let metadata_path = match kind {
        EntryKind::DistInfo => path.join("METADATA"),
        EntryKind::EggInfoDir => path.join("PKG-INFO"),
        EntryKind::EggInfoFile => path.to_path_buf(),
    };
    let contents = read_metadata_file(&metadata_path)?;
    let metadata = CoreMetadata::parse(&contents).map_err(|err| err.to_string())?;

    let source = if kind == EntryKind::DistInfo {
        read_direct_url(path).map(|direct| source_from_direct_url(&direct, project_root))
    } else {
        None
    };

    let origin = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    Ok(InstalledPackage {
        name: PackageName::new(&metadata.name),
        version: metadata.version,
        requires_python: metadata.requires_python,
        source,
        origin,
    })
}

fn read_metadata_file(path: &Path) -> Result<String, String> {
    let bytes = fs::read(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => format!("missing {}", display_name(path)),
        _ => format!("failed to read {}: {err}", display_name(path)),
    })?;
    // Core metadata is UTF-8 by specification; legacy files occasionally are not.
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Reads `direct_url.json`. A broken record drops the provenance only.
fn read_direct_url(dist_info: &Path) -> Option<DirectUrl> {
    let path = dist_info.join("direct_url.json");
    let contents = match fs::read_to_string(&path) {
        Ok(contents) => contents,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return None,
        Err(err) => {
            warn!(path = %path.display(), %err, "failed to read direct_url.json; omitting source");
            return None;
        }
    };
    match DirectUrl::parse(&contents) {
        Ok(direct) => Some(direct),
        Err(err) => {
            warn!(path = %path.display(), %err, "malformed direct_url.json; omitting source");
            None
        }
    }
}

fn record(report: &mut ScanReport, package: InstalledPackage) {
    debug!(name = %package.name, version = %package.version, origin = %package.origin, "found distribution");
    match report.inventory.insert(package) {
        Insertion::Added => {}
        Insertion::Replaced { discarded } | Insertion::Kept { discarded } => {
            report.duplicates += 1;
            warn!(
                name = %discarded.name,
                version = %discarded.version,
                origin = %discarded.origin,
                "duplicate metadata for installed distribution; keeping the higher version"
            );
        }
    }
}

fn skip(report: &mut ScanReport, path: &Path, reason: String) {
    warn!(path = %path.display(), %reason, "skipping unreadable distribution metadata");
    report.skipped.push(SkippedEntry {
        path: path.to_path_buf(),
        reason,
    });
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map_or_else(|| path.display().to_string(), |name| name.to_string_lossy().into_owned())
}
