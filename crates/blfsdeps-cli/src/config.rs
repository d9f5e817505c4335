use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use blfsdeps_core::DEFAULT_SOURCE_EXTENSIONS;
use blfsdeps_installer::DEFAULT_STAGING_DIR;
use serde::Deserialize;
use tracing::debug;

pub(crate) const DEFAULT_DATABASE_PATH: &str = "dependencies.json";

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    database: Option<PathBuf>,
    staging_dir: Option<PathBuf>,
    extensions: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) database: PathBuf,
    pub(crate) staging_dir: PathBuf,
    pub(crate) extensions: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database: PathBuf::from(DEFAULT_DATABASE_PATH),
            staging_dir: PathBuf::from(DEFAULT_STAGING_DIR),
            extensions: DEFAULT_SOURCE_EXTENSIONS
                .iter()
                .map(|extension| extension.to_string())
                .collect(),
        }
    }
}

impl Config {
    /// Reads `explicit` when given; otherwise the user config file if it
    /// exists; otherwise defaults.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_config_path() {
            Some(path) if path.is_file() => Self::from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        debug!(path = %path.display(), "reading configuration");
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;
        Self::from_toml_str(&raw)
            .with_context(|| format!("invalid config file: {}", path.display()))
    }

    pub(crate) fn from_toml_str(input: &str) -> Result<Self> {
        let file: ConfigFile = toml::from_str(input).context("failed to parse config")?;
        let defaults = Self::default();
        let extensions = match file.extensions {
            Some(extensions) => validate_extensions(extensions)?,
            None => defaults.extensions,
        };
        Ok(Self {
            database: file.database.unwrap_or(defaults.database),
            staging_dir: file.staging_dir.unwrap_or(defaults.staging_dir),
            extensions,
        })
    }

    pub(crate) fn with_overrides(
        mut self,
        database: Option<PathBuf>,
        staging_dir: Option<PathBuf>,
    ) -> Self {
        if let Some(database) = database {
            self.database = database;
        }
        if let Some(staging_dir) = staging_dir {
            self.staging_dir = staging_dir;
        }
        self
    }
}

fn validate_extensions(extensions: Vec<String>) -> Result<Vec<String>> {
    if extensions.is_empty() {
        return Err(anyhow!("at least one source extension is required"));
    }
    extensions
        .into_iter()
        .map(|extension| {
            let trimmed = extension.trim();
            if trimmed.is_empty() || trimmed == "." {
                return Err(anyhow!("source extension must not be empty"));
            }
            if trimmed.starts_with('.') {
                Ok(trimmed.to_string())
            } else {
                Ok(format!(".{trimmed}"))
            }
        })
        .collect()
}

fn default_config_path() -> Option<PathBuf> {
    let base = match std::env::var_os("XDG_CONFIG_HOME") {
        Some(dir) if !dir.is_empty() => PathBuf::from(dir),
        _ => PathBuf::from(std::env::var_os("HOME")?).join(".config"),
    };
    Some(base.join("blfsdeps").join("config.toml"))
}
