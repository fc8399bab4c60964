use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use crate::engine::{
    config::{AnalysisConfig, EngineSettings, RunConfig, RunConfigBuilder},
    ignore_rules,
    include_paths::{IncludePathsBuilder, IncludePathsResolver},
    instance::Engine,
    model::EngineConfig,
    registry::{EngineDescriptor, Registry},
    sink::SharedSink,
};

/// Resolves per-engine configuration and constructs one engine per
/// configured, registry-known engine.
pub struct EnginesBuilder {
    config: RunConfig,
    include_resolver: Box<dyn IncludePathsResolver>,
}

impl EnginesBuilder {
    // ──────────────────────────────────────────────────────────
    // Construction helpers
    // ──────────────────────────────────────────────────────────
    pub fn new(config: RunConfig) -> Self {
        let include_resolver = Box::new(IncludePathsBuilder::new(&config.source_dir));
        Self {
            config,
            include_resolver,
        }
    }

    pub fn from_builder(builder: RunConfigBuilder) -> Result<Self> {
        Ok(Self::new(builder.build()?))
    }

    /// Replaces the default tree-listing include resolver.
    pub fn with_include_resolver(mut self, resolver: impl IncludePathsResolver + 'static) -> Self {
        self.include_resolver = Box::new(resolver);
        self
    }

    pub fn registry(&self) -> &Registry {
        &self.config.registry
    }

    pub fn analysis_config(&self) -> &AnalysisConfig {
        &self.config.config
    }

    pub fn container_label(&self) -> Option<&str> {
        self.config.container_label.as_deref()
    }

    pub fn source_dir(&self) -> &Path {
        &self.config.source_dir
    }

    pub fn requested_paths(&self) -> &[String] {
        &self.config.requested_paths
    }

    // ──────────────────────────────────────────────────────────
    // Resolution
    // ──────────────────────────────────────────────────────────

    /// Builds the default [`Engine`] for every resolved entry.
    pub fn run(&self, sink: Option<SharedSink>) -> Result<Vec<Engine>> {
        self.run_with(Engine::new, sink)
    }

    /// Builds every resolved entry with `factory`, in configuration order.
    ///
    /// Names missing from the registry are skipped. `sink` is cloned into
    /// each factory call and never used here.
    pub fn run_with<T, F>(&self, mut factory: F, sink: Option<SharedSink>) -> Result<Vec<T>>
    where
        F: FnMut(&str, &EngineDescriptor, &Path, EngineConfig, Option<SharedSink>) -> T,
    {
        let mut engines = Vec::new();

        for (name, settings) in self.config.config.engines() {
            let Some(descriptor) = self.config.registry.get(name) else {
                warn!("Unknown engine {name:?}, skipping");
                continue;
            };

            let merged = self
                .engine_config(settings)
                .with_context(|| format!("Failed to resolve paths for engine {name}"))?;
            debug!(
                "Engine {name}: {} excluded, include paths {:?}",
                merged.exclude_paths.len(),
                merged.include_paths
            );

            engines.push(factory(
                name,
                descriptor,
                &self.config.source_dir,
                merged,
                sink.clone(),
            ));
        }

        info!("Resolved {} engine(s)", engines.len());
        Ok(engines)
    }

    /// Merged configuration for one engine entry.
    pub fn engine_config(&self, settings: &EngineSettings) -> Result<EngineConfig> {
        let patterns: Vec<String> = self
            .config
            .config
            .exclude_paths
            .iter()
            .chain(&settings.exclude_paths)
            .cloned()
            .collect();

        let exclude_paths = ignore_rules::exclude_paths(&self.config.source_dir, &patterns)?;
        let include_paths = self
            .include_resolver
            .build(&exclude_paths, &self.config.requested_paths)?;

        Ok(EngineConfig::merge(settings, exclude_paths, include_paths))
    }
}
