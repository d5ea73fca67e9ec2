use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::str::FromStr;

use pep440_rs::Version;
use serde::Serialize;

use crate::name::PackageName;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct InstalledPackage {
    pub name: PackageName,
    pub version: String,
    pub requires_python: Option<String>,
    pub source: Option<PackageSource>,
    /// Name of the metadata directory the record was read from. Used only to
    /// break ties between duplicates; never rendered.
    #[serde(skip)]
    pub origin: String,
}

/// Where a package came from, when the installer recorded it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum PackageSource {
    Vcs {
        vcs: String,
        location: Option<Location>,
        requested_revision: Option<String>,
        commit_id: String,
    },
    Archive {
        location: Option<Location>,
        hashes: BTreeMap<String, String>,
    },
    Directory {
        path: Option<String>,
        editable: bool,
    },
}

/// A remote URL, or a local path relative to the project root.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Location {
    Url(String),
    Path(String),
}

/// Installed packages keyed by canonical name.
#[derive(Clone, Debug, Default)]
pub struct Inventory {
    packages: BTreeMap<PackageName, InstalledPackage>,
}

/// What happened when a record collided with one already in the inventory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Insertion {
    Added,
    /// The incoming record won; the previous one was discarded.
    Replaced { discarded: InstalledPackage },
    /// The incoming record lost and was discarded.
    Kept { discarded: InstalledPackage },
}

impl Inventory {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a record, resolving name collisions deterministically: the
    /// higher version wins, then the lexically greater version string, then
    /// the lexically greater origin directory.
    pub fn insert(&mut self, package: InstalledPackage) -> Insertion {
        match self.packages.get_mut(&package.name) {
            None => {
                self.packages.insert(package.name.clone(), package);
                Insertion::Added
            }
            Some(existing) => {
                if precedence(&package, existing) == Ordering::Greater {
                    let discarded = std::mem::replace(existing, package);
                    Insertion::Replaced { discarded }
                } else {
                    Insertion::Kept { discarded: package }
                }
            }
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    #[must_use]
    pub fn get(&self, name: &PackageName) -> Option<&InstalledPackage> {
        self.packages.get(name)
    }

    /// Records in output order: canonical name, then version string.
    #[must_use]
    pub fn sorted(&self) -> Vec<&InstalledPackage> {
        let mut ordered: Vec<_> = self.packages.values().collect();
        ordered.sort_by(|a, b| a.name.cmp(&b.name).then_with(|| a.version.cmp(&b.version)));
        ordered
    }
}

impl FromIterator<InstalledPackage> for Inventory {
    fn from_iter<T: IntoIterator<Item = InstalledPackage>>(iter: T) -> Self {
        let mut inventory = Self::new();
        for package in iter {
            inventory.insert(package);
        }
        inventory
    }
}

fn precedence(candidate: &InstalledPackage, existing: &InstalledPackage) -> Ordering {
    compare_versions(&candidate.version, &existing.version)
        .then_with(|| candidate.version.cmp(&existing.version))
        .then_with(|| candidate.origin.cmp(&existing.origin))
}

/// PEP 440 ordering; versions that do not parse sort below those that do.
#[must_use]
pub fn compare_versions(left: &str, right: &str) -> Ordering {
    match (Version::from_str(left), Version::from_str(right)) {
        (Ok(left), Ok(right)) => left.cmp(&right),
        (Ok(_), Err(_)) => Ordering::Greater,
        (Err(_), Ok(_)) => Ordering::Less,
        (Err(_), Err(_)) => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pkg(name: &str, version: &str, origin: &str) -> InstalledPackage {
        InstalledPackage {
            name: PackageName::new(name),
            version: version.to_string(),
            requires_python: None,
            source: None,
            origin: origin.to_string(),
        }
    }

    #[test]
    fn higher_version_wins_regardless_of_order() {
        let forward: Inventory = [pkg("Demo", "1.9", "a"), pkg("demo", "1.10", "b")]
            .into_iter()
            .collect();
        let backward: Inventory = [pkg("demo", "1.10", "b"), pkg("Demo", "1.9", "a")]
            .into_iter()
            .collect();
        let name = PackageName::new("demo");
        assert_eq!(forward.get(&name).unwrap().version, "1.10");
        assert_eq!(backward.get(&name).unwrap().version, "1.10");
        assert_eq!(forward.len(), 1);
    }

    #[test]
    fn equivalent_versions_fall_back_to_lexical_order() {
        let mut inventory = Inventory::new();
        inventory.insert(pkg("demo", "1.0.0", "demo-1.0.0.dist-info"));
        let outcome = inventory.insert(pkg("demo", "1.0", "demo-1.0.dist-info"));
        assert!(matches!(outcome, Insertion::Kept { .. }));
        assert_eq!(inventory.get(&PackageName::new("demo")).unwrap().version, "1.0.0");
    }

    #[test]
    fn identical_versions_fall_back_to_origin() {
        let mut inventory = Inventory::new();
        inventory.insert(pkg("demo", "2.0", "Demo-2.0.dist-info"));
        let outcome = inventory.insert(pkg("demo", "2.0", "demo-2.0.dist-info"));
        assert!(matches!(outcome, Insertion::Replaced { .. }));
        assert_eq!(
            inventory.get(&PackageName::new("demo")).unwrap().origin,
            "demo-2.0.dist-info"
        );
    }

    #[test]
    fn unparseable_versions_lose_to_valid_ones() {
        let inventory: Inventory = [pkg("demo", "1.0", "a"), pkg("demo", "not a version", "b")]
            .into_iter()
            .collect();
        assert_eq!(inventory.get(&PackageName::new("demo")).unwrap().version, "1.0");
    }

    #[test]
    fn sorted_orders_by_canonical_name() {
        let inventory: Inventory = [
            pkg("Zope.Interface", "6.0", "z"),
            pkg("attrs", "23.1", "a"),
            pkg("Markup_Safe", "2.1", "m"),
        ]
        .into_iter()
        .collect();
        let names: Vec<_> = inventory.sorted().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["attrs", "markup-safe", "zope-interface"]);
    }
}
