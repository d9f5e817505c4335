use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};

use crate::error::DepsError;
use crate::package::PackageRecord;

/// Read-only view of the dependency database, keyed by package name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDatabase {
    packages: BTreeMap<String, PackageRecord>,
}

impl PackageDatabase {
    pub fn from_json_str(input: &str) -> Result<Self> {
        let packages: BTreeMap<String, PackageRecord> =
            serde_json::from_str(input).context("failed to parse package database")?;
        Ok(Self { packages })
    }

    pub fn load(path: &Path) -> Result<Self> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                return Err(DepsError::MissingDatabase(path.to_path_buf()).into());
            }
            Err(err) => {
                return Err(err).with_context(|| {
                    format!("failed to read package database: {}", path.display())
                });
            }
        };
        Self::from_json_str(&raw)
            .with_context(|| format!("invalid package database: {}", path.display()))
    }

    pub fn get(&self, name: &str) -> Option<&PackageRecord> {
        self.packages.get(name)
    }

    /// Lookup that treats an absent name as a failure.
    pub fn require(&self, name: &str) -> Result<&PackageRecord> {
        self.packages
            .get(name)
            .ok_or_else(|| DepsError::UnknownPackage(name.to_string()).into())
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.packages.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.packages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }
}

impl FromIterator<(String, PackageRecord)> for PackageDatabase {
    fn from_iter<I: IntoIterator<Item = (String, PackageRecord)>>(iter: I) -> Self {
        Self {
            packages: iter.into_iter().collect(),
        }
    }
}
