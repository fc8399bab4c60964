// src/ui/cli.rs

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

// ~~~ CLI Arguments ~~~
#[derive(Parser, Debug, Clone)]
#[clap(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS")
)]
pub struct Cli {
    /// Paths to analyze, relative to the source directory (default: everything)
    pub paths: Vec<String>,

    /// Engine registry (YAML: name -> { image, description })
    #[clap(short = 'r', long)]
    pub registry: PathBuf,

    /// Analysis config (YAML with an `engines` section)
    #[clap(short = 'c', long)]
    pub config: PathBuf,

    /// Source directory to analyze
    #[clap(short = 's', long = "source-dir", default_value = ".")]
    pub source_dir: PathBuf,

    /// Label attached to engine containers
    #[clap(long)]
    pub label: Option<String>,

    /// Output format: text or json
    #[clap(short = 'F', long = "format", default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}
