use std::fs;
use std::path::{Path, PathBuf};

use pylock_domain::PythonVersion;
use tempfile::TempDir;

use crate::env::{EnvironmentSnapshot, VIRTUAL_ENV};
use crate::locator::{locate_environment, VirtualEnv};

/// An on-disk venv layout with hand-written metadata; no interpreter.
pub(crate) struct FakeVenv {
    _temp: TempDir,
    root: PathBuf,
    site: PathBuf,
}

impl FakeVenv {
    pub(crate) fn new(python: &str) -> Self {
        let venv = Self::bare(python);
        fs::create_dir_all(&venv.site).expect("create site-packages");
        venv
    }

    /// A venv with `pyvenv.cfg` but no site-packages directory.
    pub(crate) fn bare(python: &str) -> Self {
        let temp = tempfile::Builder::new()
            .prefix("pylock-venv")
            .tempdir()
            .expect("tempdir");
        let root = temp.path().join(".venv");
        fs::create_dir_all(&root).expect("create venv root");
        fs::write(
            root.join("pyvenv.cfg"),
            format!("home = /usr/bin\nimplementation = CPython\nversion_info = {python}\n"),
        )
        .expect("write pyvenv.cfg");
        let version = PythonVersion::parse(python).expect("python version");
        let site = root
            .join("lib")
            .join(format!("python{}.{}", version.major, version.minor))
            .join("site-packages");
        Self {
            _temp: temp,
            root,
            site,
        }
    }

    pub(crate) fn root(&self) -> &Path {
        &self.root
    }

    pub(crate) fn project_root(&self) -> &Path {
        self.root.parent().expect("venv parent")
    }

    pub(crate) fn site_packages(&self) -> &Path {
        &self.site
    }

    pub(crate) fn snapshot(&self) -> EnvironmentSnapshot {
        EnvironmentSnapshot::from_pairs([(VIRTUAL_ENV, self.root.as_os_str())])
    }

    pub(crate) fn locate(&self) -> VirtualEnv {
        locate_environment(&self.snapshot()).expect("locate fake venv")
    }

    pub(crate) fn install(&self, name: &str, version: &str) {
        let dir = format!("{}-{version}.dist-info", name.replace('-', "_"));
        self.write_dist_file(
            &dir,
            "METADATA",
            &format!("Metadata-Version: 2.1\nName: {name}\nVersion: {version}\n\nlong description\n"),
        );
        self.write_dist_file(&dir, "INSTALLER", "uv\n");
    }

    pub(crate) fn install_egg_info_file(&self, name: &str, version: &str) {
        let path = self.site.join(format!("{name}-{version}-py3.egg-info"));
        fs::write(path, format!("Metadata-Version: 1.1\nName: {name}\nVersion: {version}\n"))
            .expect("write egg-info");
    }

    pub(crate) fn install_egg_info_dir(&self, name: &str, version: &str) {
        let dir = format!("{name}-{version}-py3.egg-info");
        self.write_dist_file(
            &dir,
            "PKG-INFO",
            &format!("Metadata-Version: 1.1\nName: {name}\nVersion: {version}\n"),
        );
    }

    pub(crate) fn write_dist_file(&self, dir: &str, file: &str, contents: &str) {
        let dir = self.site.join(dir);
        fs::create_dir_all(&dir).expect("create metadata dir");
        fs::write(dir.join(file), contents).expect("write metadata file");
    }
}
