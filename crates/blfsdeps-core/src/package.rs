use serde::{Deserialize, Serialize};

/// How aggressively dependencies are pulled in.
///
/// Levels are ordered: selecting a level includes every tier below it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum DependencyTier {
    #[default]
    Required,
    Recommended,
    Optional,
}

impl DependencyTier {
    pub const ALL: [DependencyTier; 3] = [Self::Required, Self::Recommended, Self::Optional];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Required => "required",
            Self::Recommended => "recommended",
            Self::Optional => "optional",
        }
    }

    /// Maps the `--recommended` / `--optional` flag pair onto a level.
    /// Optional dependencies always bring their recommended peers along.
    pub fn from_flags(recommended: bool, optional: bool) -> Self {
        if optional {
            Self::Optional
        } else if recommended {
            Self::Recommended
        } else {
            Self::Required
        }
    }

    /// Tiers selected by this level, lowest first.
    pub fn selected(self) -> impl Iterator<Item = DependencyTier> {
        Self::ALL.into_iter().filter(move |tier| *tier <= self)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageDependencies {
    #[serde(default)]
    pub required: Vec<String>,
    #[serde(default)]
    pub recommended: Vec<String>,
    #[serde(default)]
    pub optional: Vec<String>,
}

impl PackageDependencies {
    pub fn tier(&self, tier: DependencyTier) -> &[String] {
        match tier {
            DependencyTier::Required => &self.required,
            DependencyTier::Recommended => &self.recommended,
            DependencyTier::Optional => &self.optional,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct PackageRecord {
    #[serde(rename = "url", default)]
    pub source_urls: Vec<String>,
    #[serde(rename = "Hashes", default, skip_serializing_if = "Option::is_none")]
    pub hashes: Option<Vec<String>>,
    #[serde(rename = "Dependencies", default)]
    pub dependencies: PackageDependencies,
    #[serde(rename = "Commands", default)]
    pub install_commands: Vec<String>,
    #[serde(rename = "kconf", default, skip_serializing_if = "Option::is_none")]
    pub kernel_config_notes: Option<Vec<String>>,
}

impl PackageRecord {
    /// The first declared source, assumed to be the main source archive.
    pub fn primary_source(&self) -> Option<&str> {
        self.source_urls.first().map(String::as_str)
    }

    /// Hash declared for the source at `index`, if any.
    pub fn hash_for(&self, index: usize) -> Option<&str> {
        self.hashes
            .as_ref()
            .and_then(|hashes| hashes.get(index))
            .map(String::as_str)
            .filter(|hash| !hash.trim().is_empty())
    }

    /// True when the record carries at least one non-blank hash.
    pub fn has_integrity_data(&self) -> bool {
        self.hashes
            .as_ref()
            .is_some_and(|hashes| hashes.iter().any(|hash| !hash.trim().is_empty()))
    }

    pub fn kernel_config_notes(&self) -> &[String] {
        self.kernel_config_notes.as_deref().unwrap_or_default()
    }

    pub fn dependency_names(&self, tier: DependencyTier) -> impl Iterator<Item = &str> {
        tier.selected()
            .flat_map(move |selected| self.dependencies.tier(selected).iter())
            .map(String::as_str)
    }
}
