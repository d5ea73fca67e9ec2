#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
};

use tempfile::TempDir;
use toml_edit::DocumentMut;

/// A project directory holding a `.venv` with hand-written distribution
/// metadata. No interpreter is installed; `pyvenv.cfg` carries the version.
pub struct VenvFixture {
    _temp: TempDir,
    pub project: PathBuf,
    pub venv: PathBuf,
    site: PathBuf,
}

pub fn prepare_venv(prefix: &str, python: &str) -> VenvFixture {
    let temp = tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("tempdir");
    let project = temp.path().join("project");
    let venv = project.join(".venv");
    let short = python.splitn(3, '.').take(2).collect::<Vec<_>>().join(".");
    let site = venv
        .join("lib")
        .join(format!("python{short}"))
        .join("site-packages");
    fs::create_dir_all(&site).expect("create site-packages");
    fs::write(
        venv.join("pyvenv.cfg"),
        format!("home = /usr/bin\nimplementation = CPython\nuv = 0.5.0\nversion_info = {python}\n"),
    )
    .expect("write pyvenv.cfg");
    VenvFixture {
        _temp: temp,
        project,
        venv,
        site,
    }
}

impl VenvFixture {
    pub fn site_packages(&self) -> &Path {
        &self.site
    }

    pub fn install(&self, name: &str, version: &str) {
        let dist_info = self
            .site
            .join(format!("{}-{version}.dist-info", name.replace('-', "_")));
        fs::create_dir_all(&dist_info).expect("create dist-info");
        fs::write(
            dist_info.join("METADATA"),
            format!("Metadata-Version: 2.3\nName: {name}\nVersion: {version}\n\n# {name}\n"),
        )
        .expect("write METADATA");
        fs::write(dist_info.join("INSTALLER"), "uv\n").expect("write INSTALLER");
        fs::write(
            dist_info.join("RECORD"),
            format!("{name}/__init__.py,,\n"),
        )
        .expect("write RECORD");
    }

    pub fn write_direct_url(&self, name: &str, version: &str, contents: &str) {
        let dist_info = self
            .site
            .join(format!("{}-{version}.dist-info", name.replace('-', "_")));
        fs::write(dist_info.join("direct_url.json"), contents).expect("write direct_url.json");
    }
}

pub fn read_lock(path: &Path) -> DocumentMut {
    let contents = fs::read_to_string(path).expect("read lock");
    contents.parse().expect("valid lock toml")
}

pub fn package_names(doc: &DocumentMut) -> Vec<String> {
    doc["packages"]
        .as_array_of_tables()
        .map(|tables| {
            tables
                .iter()
                .filter_map(|table| table.get("name").and_then(toml_edit::Item::as_str))
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
