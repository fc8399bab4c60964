// src/engine/mod.rs
pub mod builder;
pub mod config;
pub mod git;
pub mod ignore_rules;
pub mod include_paths;
pub mod instance;
pub mod model;
pub mod registry;
pub mod sink;
