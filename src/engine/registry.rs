//! The static engine catalog: engine name → runnable metadata.

use std::{collections::BTreeMap, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Runnable metadata for one engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineDescriptor {
    /// Container image reference, e.g. `codeclimate/codeclimate-rubocop`.
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl EngineDescriptor {
    pub fn new(image: impl Into<String>) -> Self {
        Self {
            image: image.into(),
            description: None,
        }
    }
}

/// Read-only mapping from engine name to [`EngineDescriptor`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Registry(BTreeMap<String, EngineDescriptor>);

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a YAML document of the form `name: { image: ..., description: ... }`.
    /// An empty document yields an empty registry.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Failed to parse engine registry")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read registry {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid registry file {}", path.display()))
    }

    pub fn insert(&mut self, name: impl Into<String>, descriptor: EngineDescriptor) {
        self.0.insert(name.into(), descriptor);
    }

    pub fn get(&self, name: &str) -> Option<&EngineDescriptor> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, EngineDescriptor)> for Registry {
    fn from_iter<I: IntoIterator<Item = (N, EngineDescriptor)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, d)| (n.into(), d)).collect())
    }
}
