use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use once_cell::sync::Lazy;
use serde::de::DeserializeOwned;
use serde::Deserialize;

static INDEX: Lazy<Index> = Lazy::new(|| {
    let raw = include_str!("../../../../fixtures/manifest.json");
    serde_json::from_str(raw).expect("fixtures manifest should parse")
});

#[derive(Debug, Deserialize)]
struct Index {
    /// Media directory listings, as served next to the assets.
    manifests: HashMap<String, String>,
    catalogs: HashMap<String, String>,
}

/// One named group of fixtures in `fixtures/manifest.json`.
#[derive(Copy, Clone, Debug)]
enum Section {
    Manifests,
    Catalogs,
}

impl Section {
    fn entries(self) -> &'static HashMap<String, String> {
        match self {
            Section::Manifests => &INDEX.manifests,
            Section::Catalogs => &INDEX.catalogs,
        }
    }

    fn label(self) -> &'static str {
        match self {
            Section::Manifests => "manifest",
            Section::Catalogs => "catalog",
        }
    }

    fn keys(self) -> Vec<String> {
        let mut keys: Vec<String> = self.entries().keys().cloned().collect();
        keys.sort();
        keys
    }

    fn path(self, name: &str) -> Result<PathBuf> {
        let rel = self
            .entries()
            .get(name)
            .ok_or_else(|| anyhow!("no {} fixture named '{name}'", self.label()))?;
        Ok(Path::new(env!("CARGO_MANIFEST_DIR"))
            .join("../../../fixtures")
            .join(rel))
    }

    fn json(self, name: &str) -> Result<String> {
        let path = self.path(name)?;
        fs::read_to_string(&path).with_context(|| {
            format!("{} fixture '{name}' unreadable at {}", self.label(), path.display())
        })
    }

    fn load<T: DeserializeOwned>(self, name: &str) -> Result<T> {
        let text = self.json(name)?;
        serde_json::from_str(&text)
            .with_context(|| format!("{} fixture '{name}' does not deserialize", self.label()))
    }
}

/// Media directory listings (`{ "files": [...] }`).
pub mod manifests {
    use super::*;

    pub fn keys() -> Vec<String> {
        Section::Manifests.keys()
    }

    pub fn json(name: &str) -> Result<String> {
        Section::Manifests.json(name)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        Section::Manifests.load(name)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Section::Manifests.path(name)
    }
}

/// Catalog documents accepted by `Catalog::from_json`.
pub mod catalogs {
    use super::*;

    pub fn keys() -> Vec<String> {
        Section::Catalogs.keys()
    }

    pub fn json(name: &str) -> Result<String> {
        Section::Catalogs.json(name)
    }

    pub fn load<T: DeserializeOwned>(name: &str) -> Result<T> {
        Section::Catalogs.load(name)
    }

    pub fn path(name: &str) -> Result<PathBuf> {
        Section::Catalogs.path(name)
    }
}
