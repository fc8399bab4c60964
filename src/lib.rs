// src/lib.rs

//! Resolves which analysis engines run, with which configuration, over
//! which paths of a source tree.

pub mod app_controller;
pub mod common;
pub mod engine;
pub mod ui;

// Re-export a narrow, testable API surface
pub use engine::{
    builder::EnginesBuilder,
    config::{AnalysisConfig, EngineSettings, EngineTable, RunConfig, RunConfigBuilder},
    include_paths::{IncludePathsBuilder, IncludePathsResolver},
    instance::Engine,
    model::{EngineConfig, EnginePayload},
    registry::{EngineDescriptor, Registry},
    sink::{MemorySink, SharedSink, Sink, SinkEvent},
};
