use toml_edit::{Array, ArrayOfTables, DocumentMut, InlineTable, Item, Table, Value as TomlValue};

use crate::package::{InstalledPackage, Location, PackageSource};

use super::types::{LockDocument, CREATED_BY, LOCK_VERSION};

/// Renders the lock as TOML.
///
/// The output depends only on the document contents: packages are emitted
/// in canonical order and nested maps are ordered by key.
#[must_use]
pub fn render_lockfile(lock: &LockDocument) -> String {
    let mut doc = DocumentMut::new();
    doc.insert("lock-version", Item::Value(TomlValue::from(LOCK_VERSION)));
    doc.insert("created-by", Item::Value(TomlValue::from(CREATED_BY)));
    doc.insert(
        "requires-python",
        Item::Value(TomlValue::from(lock.requires_python.clone())),
    );

    if lock.packages.is_empty() {
        doc.insert("packages", Item::Value(TomlValue::Array(Array::new())));
        return doc.to_string();
    }

    let mut packages = ArrayOfTables::new();
    for package in lock.packages.sorted() {
        packages.push(render_package(package));
    }
    doc.insert("packages", Item::ArrayOfTables(packages));
    doc.to_string()
}

fn render_package(package: &InstalledPackage) -> Table {
    let mut table = Table::new();
    table.insert("name", Item::Value(TomlValue::from(package.name.as_str())));
    table.insert(
        "version",
        Item::Value(TomlValue::from(package.version.clone())),
    );
    if let Some(requires_python) = &package.requires_python {
        table.insert(
            "requires-python",
            Item::Value(TomlValue::from(requires_python.clone())),
        );
    }
    if let Some(source) = &package.source {
        let (key, rendered) = render_source(source);
        table.insert(key, Item::Table(rendered));
    }
    table
}

fn render_source(source: &PackageSource) -> (&'static str, Table) {
    let mut table = Table::new();
    match source {
        PackageSource::Vcs {
            vcs,
            location,
            requested_revision,
            commit_id,
        } => {
            table.insert("type", Item::Value(TomlValue::from(vcs.clone())));
            insert_location(&mut table, location.as_ref());
            if let Some(revision) = requested_revision {
                table.insert(
                    "requested-revision",
                    Item::Value(TomlValue::from(revision.clone())),
                );
            }
            table.insert("commit-id", Item::Value(TomlValue::from(commit_id.clone())));
            ("vcs", table)
        }
        PackageSource::Archive { location, hashes } => {
            insert_location(&mut table, location.as_ref());
            let mut inline = InlineTable::new();
            for (algorithm, digest) in hashes {
                inline.insert(algorithm.as_str(), TomlValue::from(digest.clone()));
            }
            table.insert("hashes", Item::Value(TomlValue::InlineTable(inline)));
            ("archive", table)
        }
        PackageSource::Directory { path, editable } => {
            if let Some(path) = path {
                table.insert("path", Item::Value(TomlValue::from(path.clone())));
            }
            table.insert("editable", Item::Value(TomlValue::from(*editable)));
            ("directory", table)
        }
    }
}

fn insert_location(table: &mut Table, location: Option<&Location>) {
    match location {
        Some(Location::Url(url)) => {
            table.insert("url", Item::Value(TomlValue::from(url.clone())));
        }
        Some(Location::Path(path)) => {
            table.insert("path", Item::Value(TomlValue::from(path.clone())));
        }
        None => {}
    }
}

/// Whether `file_name` follows the `pylock.toml` / `pylock.<label>.toml`
/// naming convention.
#[must_use]
pub fn is_conventional_lock_name(file_name: &str) -> bool {
    let Some(stem) = file_name
        .strip_prefix("pylock.")
        .and_then(|rest| rest.strip_suffix("toml"))
    else {
        return false;
    };
    if stem.is_empty() {
        return true;
    }
    let Some(label) = stem.strip_suffix('.') else {
        return false;
    };
    !label.is_empty() && !label.contains('.')
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::name::PackageName;
    use crate::package::Inventory;
    use crate::python::PythonVersion;

    fn pkg(name: &str, version: &str) -> InstalledPackage {
        InstalledPackage {
            name: PackageName::new(name),
            version: version.to_string(),
            requires_python: None,
            source: None,
            origin: format!("{name}-{version}.dist-info"),
        }
    }

    fn lock(packages: Vec<InstalledPackage>) -> LockDocument {
        LockDocument::new(
            PythonVersion::parse("3.12.4").expect("version"),
            packages.into_iter().collect(),
        )
    }

    #[test]
    fn renders_header_and_sorted_packages() {
        let rendered = render_lockfile(&lock(vec![pkg("Urllib3", "2.2.3"), pkg("certifi", "2024.8.30")]));
        let expected = "lock-version = \"1.0\"\n\
created-by = \"pylock\"\n\
requires-python = \">=3.12\"\n\
\n\
[[packages]]\n\
name = \"certifi\"\n\
version = \"2024.8.30\"\n\
\n\
[[packages]]\n\
name = \"urllib3\"\n\
version = \"2.2.3\"\n";
        assert_eq!(rendered, expected);
    }

    #[test]
    fn insertion_order_does_not_change_output() {
        let names = ["idna", "Requests", "charset_normalizer", "certifi", "urllib3"];
        let forward: Vec<_> = names.iter().map(|name| pkg(name, "1.0")).collect();
        let backward: Vec<_> = names.iter().rev().map(|name| pkg(name, "1.0")).collect();
        assert_eq!(render_lockfile(&lock(forward)), render_lockfile(&lock(backward)));
    }

    #[test]
    fn empty_inventory_keeps_header() {
        let rendered = render_lockfile(&LockDocument::new(
            PythonVersion::parse("3.11").expect("version"),
            Inventory::new(),
        ));
        let doc: DocumentMut = rendered.parse().expect("valid toml");
        assert_eq!(doc["lock-version"].as_str(), Some("1.0"));
        assert_eq!(doc["requires-python"].as_str(), Some(">=3.11"));
        assert_eq!(doc["packages"].as_array().map(Array::len), Some(0));
    }

    #[test]
    fn renders_provenance_tables() {
        let mut vcs = pkg("demo", "0.1.0");
        vcs.source = Some(PackageSource::Vcs {
            vcs: "git".into(),
            location: Some(Location::Url("https://example.invalid/demo.git".into())),
            requested_revision: Some("main".into()),
            commit_id: "0123abcd".into(),
        });
        let mut archive = pkg("archived", "1.0");
        archive.requires_python = Some(">=3.8".into());
        archive.source = Some(PackageSource::Archive {
            location: Some(Location::Url(
                "https://example.invalid/archived-1.0.tar.gz".into(),
            )),
            hashes: BTreeMap::from([("sha256".to_string(), "feed".to_string())]),
        });
        let mut local = pkg("local", "0.0.1");
        local.source = Some(PackageSource::Directory {
            path: Some("src/local".into()),
            editable: true,
        });

        let rendered = render_lockfile(&lock(vec![vcs, archive, local]));
        let doc: DocumentMut = rendered.parse().expect("valid toml");
        let packages = doc["packages"].as_array_of_tables().expect("packages");
        let entries: Vec<_> = packages.iter().collect();
        assert_eq!(entries[0]["name"].as_str(), Some("archived"));
        assert_eq!(entries[0]["requires-python"].as_str(), Some(">=3.8"));
        assert_eq!(entries[0]["archive"]["hashes"]["sha256"].as_str(), Some("feed"));
        assert_eq!(entries[1]["vcs"]["type"].as_str(), Some("git"));
        assert_eq!(entries[1]["vcs"]["commit-id"].as_str(), Some("0123abcd"));
        assert_eq!(entries[2]["directory"]["path"].as_str(), Some("src/local"));
        assert_eq!(entries[2]["directory"]["editable"].as_bool(), Some(true));
        assert!(rendered.contains("[packages.vcs]"));
    }

    #[test]
    fn lock_name_convention() {
        assert!(is_conventional_lock_name("pylock.toml"));
        assert!(is_conventional_lock_name("pylock.test1.toml"));
        assert!(!is_conventional_lock_name("pylock..toml"));
        assert!(!is_conventional_lock_name("pylock.a.b.toml"));
        assert!(!is_conventional_lock_name("requirements.toml"));
        assert!(!is_conventional_lock_name("pylock.tomlx"));
    }
}
