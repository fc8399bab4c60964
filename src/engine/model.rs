//! Contains the merged per-engine configuration handed to engine construction.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::engine::config::EngineSettings;

/// The engine-specific `config` value after normalisation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EnginePayload {
    /// `config: { file: X }` flattened to `X`.
    File(String),
    /// Any other shape, untouched.
    Other(Value),
}

impl EnginePayload {
    /// Applies the single supported normalisation: a map whose only key is
    /// `file` with a string value collapses to that string. Nothing else is
    /// rewritten.
    pub fn normalize(raw: Value) -> Self {
        if let Value::Object(map) = &raw {
            if map.len() == 1 {
                if let Some(Value::String(file)) = map.get("file") {
                    return EnginePayload::File(file.clone());
                }
            }
        }
        EnginePayload::Other(raw)
    }

    pub fn as_file(&self) -> Option<&str> {
        match self {
            EnginePayload::File(f) => Some(f),
            EnginePayload::Other(_) => None,
        }
    }
}

/// Final configuration for one engine.
///
/// `exclude_paths` and `include_paths` are fields of their own rather than
/// entries in `settings`, so an engine-declared key of the same name cannot
/// shadow them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineConfig {
    pub enabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub config: Option<EnginePayload>,
    #[serde(flatten)]
    pub settings: Map<String, Value>,
    pub exclude_paths: Vec<String>,
    pub include_paths: Vec<String>,
}

impl EngineConfig {
    pub fn merge(
        settings: &EngineSettings,
        exclude_paths: Vec<String>,
        include_paths: Vec<String>,
    ) -> Self {
        let mut extra = settings.extra.clone();
        // Computed lists always win over engine-declared keys on the wire.
        extra.remove("exclude_paths");
        extra.remove("include_paths");

        Self {
            enabled: settings.enabled,
            config: settings.config.clone().map(EnginePayload::normalize),
            settings: extra,
            exclude_paths,
            include_paths,
        }
    }

    /// JSON document an engine reads as its configuration.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}
