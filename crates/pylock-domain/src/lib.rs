#![deny(clippy::all, warnings)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate
)]

pub mod lockfile;
pub mod metadata;
pub mod name;
pub mod package;
pub mod python;

pub use lockfile::{
    is_conventional_lock_name, render_lockfile, LockDocument, CREATED_BY, DEFAULT_LOCK_FILE,
    LOCK_VERSION,
};
pub use metadata::{CoreMetadata, DirectUrl, MetadataError};
pub use name::{canonicalize_package_name, PackageName};
pub use package::{
    compare_versions, InstalledPackage, Insertion, Inventory, Location, PackageSource,
};
pub use python::PythonVersion;
