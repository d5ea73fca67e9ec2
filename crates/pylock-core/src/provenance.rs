use std::path::{Component, Path};

use pylock_domain::{DirectUrl, Location, PackageSource};
use tracing::debug;
use url::Url;

/// Converts a `direct_url.json` record into a lock source.
///
/// Local `file://` locations are made relative to `project_root`; locations
/// outside it are dropped so absolute host paths never reach the lock.
pub(crate) fn source_from_direct_url(direct: &DirectUrl, project_root: &Path) -> PackageSource {
    if let Some(vcs) = &direct.vcs_info {
        return PackageSource::Vcs {
            vcs: vcs.vcs.clone(),
            location: location_for(&direct.url, project_root),
            requested_revision: vcs.requested_revision.clone(),
            commit_id: vcs.commit_id.clone(),
        };
    }
    if let Some(dir) = &direct.dir_info {
        let path = match location_for(&direct.url, project_root) {
            Some(Location::Path(path)) => Some(path),
            Some(Location::Url(_)) | None => None,
        };
        return PackageSource::Directory {
            path,
            editable: dir.editable,
        };
    }
    let hashes = direct
        .archive_info
        .as_ref()
        .map(pylock_domain::metadata::ArchiveInfo::all_hashes)
        .unwrap_or_default();
    PackageSource::Archive {
        location: location_for(&direct.url, project_root),
        hashes,
    }
}

fn location_for(raw: &str, project_root: &Path) -> Option<Location> {
    let Ok(mut url) = Url::parse(raw) else {
        debug!(url = raw, "unparseable direct url; omitting location");
        return None;
    };
    if url.scheme() != "file" {
        // Credentials must not leak into a shared lock.
        let _ = url.set_username("");
        let _ = url.set_password(None);
        return Some(Location::Url(url.to_string()));
    }
    let path = url.to_file_path().ok()?;
    if !project_root.is_absolute() {
        // An empty or relative root would prefix-match any absolute path.
        debug!(path = %path.display(), "project root is not absolute; omitting location");
        return None;
    }
    let Ok(relative) = path.strip_prefix(project_root) else {
        debug!(path = %path.display(), "local source outside project root; omitting location");
        return None;
    };
    Some(Location::Path(portable_path(relative)))
}

fn portable_path(path: &Path) -> String {
    let parts: Vec<_> = path
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        ".".to_string()
    } else {
        parts.join("/")
    }
}
