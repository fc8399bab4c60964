use anyhow::{Context, Result};
use log::info;

use crate::{
    EnginesBuilder,
    engine::{config::AnalysisConfig, config::RunConfigBuilder, registry::Registry},
    ui::{cli::Cli, output},
};

/// The primary orchestration function for the application.
pub fn run(args: Cli) -> Result<()> {
    let registry = Registry::load(&args.registry)?;
    let config = AnalysisConfig::load(&args.config)?;
    let source_dir = args
        .source_dir
        .canonicalize()
        .with_context(|| format!("Failed to canonicalize {}", args.source_dir.display()))?;
    info!(
        "Resolving engines for {} ({} registered)",
        source_dir.display(),
        registry.len()
    );

    let mut builder = RunConfigBuilder::default();
    builder
        .registry(registry)
        .config(config)
        .source_dir(source_dir)
        .requested_paths(args.paths.clone());
    if let Some(label) = &args.label {
        builder.container_label(label.clone());
    }

    let engines = EnginesBuilder::from_builder(builder)?.run(None)?;
    output::print_engines(&engines, args.format)
}
