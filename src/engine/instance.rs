use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::engine::{
    model::EngineConfig,
    registry::EngineDescriptor,
    sink::{SharedSink, Sink},
};

/// A resolved engine, ready to be handed to whatever runs it.
#[derive(Clone)]
pub struct Engine {
    name: String,
    descriptor: EngineDescriptor,
    source_dir: PathBuf,
    config: EngineConfig,
    sink: Option<SharedSink>,
}

impl Engine {
    pub fn new(
        name: &str,
        descriptor: &EngineDescriptor,
        source_dir: &Path,
        config: EngineConfig,
        sink: Option<SharedSink>,
    ) -> Self {
        Self {
            name: name.to_owned(),
            descriptor: descriptor.clone(),
            source_dir: source_dir.to_path_buf(),
            config,
            sink,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn image(&self) -> &str {
        &self.descriptor.image
    }

    pub fn descriptor(&self) -> &EngineDescriptor {
        &self.descriptor
    }

    pub fn source_dir(&self) -> &Path {
        &self.source_dir
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn sink(&self) -> Option<&dyn Sink> {
        self.sink.as_deref()
    }

    /// The merged configuration as the JSON document the engine reads.
    pub fn config_json(&self) -> Result<String> {
        self.config
            .to_json()
            .with_context(|| format!("Failed to serialize config for engine {}", self.name))
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("name", &self.name)
            .field("descriptor", &self.descriptor)
            .field("source_dir", &self.source_dir)
            .field("config", &self.config)
            .field("sink", &self.sink.is_some())
            .finish()
    }
}
