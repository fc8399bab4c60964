// src/engine/config.rs

use std::{fmt, path::Path, path::PathBuf};

use anyhow::{Context, Result};
use derive_builder::Builder;
use serde::de::{Deserializer, MapAccess, Visitor};
use serde::ser::{SerializeMap, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::engine::registry::Registry;

/// One entry of the `engines` section.
///
/// `config` is kept as an opaque value; the builder normalises it later.
/// Keys other than the known ones are carried in `extra` and handed to the
/// engine untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EngineSettings {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config: Option<Value>,

    /// Gitignore-style patterns excluded for this engine only.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub exclude_paths: Vec<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl EngineSettings {
    pub fn enabled() -> Self {
        Self {
            enabled: true,
            ..Self::default()
        }
    }

    pub fn with_config(mut self, config: Value) -> Self {
        self.config = Some(config);
        self
    }
}

/// The `engines` section, in the order the entries were written.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EngineTable(Vec<(String, EngineSettings)>);

impl EngineTable {
    pub fn iter(&self) -> impl Iterator<Item = (&str, &EngineSettings)> {
        self.0.iter().map(|(n, s)| (n.as_str(), s))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<N: Into<String>> FromIterator<(N, EngineSettings)> for EngineTable {
    fn from_iter<I: IntoIterator<Item = (N, EngineSettings)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(n, s)| (n.into(), s)).collect())
    }
}

impl Serialize for EngineTable {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, settings) in &self.0 {
            map.serialize_entry(name, settings)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for EngineTable {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct TableVisitor;

        impl<'de> Visitor<'de> for TableVisitor {
            type Value = EngineTable;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of engine names to engine settings")
            }

            fn visit_map<A>(self, mut map: A) -> std::result::Result<Self::Value, A::Error>
            where
                A: MapAccess<'de>,
            {
                let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((name, settings)) = map.next_entry::<String, EngineSettings>()? {
                    entries.push((name, settings));
                }
                Ok(EngineTable(entries))
            }
        }

        deserializer.deserialize_map(TableVisitor)
    }
}

/// Represents the parsed analysis configuration file.
/// Everything is optional; a missing `engines` section means no engines.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub engines: Option<EngineTable>,

    /// Gitignore-style patterns excluded for every engine.
    #[serde(default)]
    pub exclude_paths: Vec<String>,
}

impl AnalysisConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).context("Failed to parse analysis config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    /// Configured engines in file order; empty when the section is absent.
    pub fn engines(&self) -> impl Iterator<Item = (&str, &EngineSettings)> {
        self.engines.iter().flat_map(EngineTable::iter)
    }
}

/// Inputs captured by an [`EnginesBuilder`](crate::engine::builder::EnginesBuilder).
#[derive(Debug, Clone, Builder)]
#[builder(setter(into), build_fn(name = "build_internal"))]
pub struct RunConfig {
    pub registry: Registry,

    pub config: AnalysisConfig,

    /// Passed through for callers that label engine containers; not used
    /// during resolution.
    #[builder(default, setter(into, strip_option))]
    pub container_label: Option<String>,

    pub source_dir: PathBuf,

    #[builder(default)]
    pub requested_paths: Vec<String>,
}

impl RunConfigBuilder {
    pub fn build(&self) -> Result<RunConfig, RunConfigBuilderError> {
        self.build_internal()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn engines_keep_file_order() {
        let cfg = AnalysisConfig::from_yaml_str(
            "engines:\n  rubocop:\n    enabled: true\n  eslint:\n    enabled: false\n  csslint:\n    enabled: true\n",
        )
        .unwrap();
        let names: Vec<&str> = cfg.engines().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["rubocop", "eslint", "csslint"]);
    }

    #[test]
    fn missing_or_null_engines_section() {
        let cfg = AnalysisConfig::from_yaml_str("exclude_paths:\n  - vendor/**\n").unwrap();
        assert!(cfg.engines.is_none());
        assert_eq!(cfg.engines().count(), 0);
        assert_eq!(cfg.exclude_paths, vec!["vendor/**"]);

        let cfg = AnalysisConfig::from_yaml_str("engines:\n").unwrap();
        assert_eq!(cfg.engines().count(), 0);

        let cfg = AnalysisConfig::from_yaml_str("").unwrap();
        assert_eq!(cfg, AnalysisConfig::default());
    }

    #[test]
    fn settings_keep_config_and_extra_keys() {
        let cfg = AnalysisConfig::from_yaml_str(
            "engines:\n  rubocop:\n    enabled: true\n    channel: beta\n    exclude_paths:\n      - spec/**\n    config:\n      file: rubocop.yml\n",
        )
        .unwrap();
        let (_, rubocop) = cfg.engines().next().unwrap();

        assert!(rubocop.enabled);
        assert_eq!(rubocop.config, Some(json!({ "file": "rubocop.yml" })));
        assert_eq!(rubocop.exclude_paths, vec!["spec/**"]);
        assert_eq!(rubocop.extra.get("channel"), Some(&json!("beta")));
        assert!(!rubocop.extra.contains_key("enabled"));
    }

    #[test]
    fn run_config_requires_registry_and_source_dir() {
        let err = RunConfigBuilder::default()
            .config(AnalysisConfig::default())
            .build();
        assert!(err.is_err());

        let cfg = RunConfigBuilder::default()
            .registry(Registry::new())
            .config(AnalysisConfig::default())
            .source_dir("/code")
            .container_label("cc-run")
            .build()
            .unwrap();
        assert_eq!(cfg.container_label.as_deref(), Some("cc-run"));
        assert!(cfg.requested_paths.is_empty());
        assert_eq!(cfg.source_dir, PathBuf::from("/code"));
    }
}
