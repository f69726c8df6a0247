// src/config/mod.rs

//! Task-set file loading and validation for rtdag.
//!
//! Responsibilities:
//! - Define the TOML-backed data model (`model.rs`).
//! - Load a task-set file from disk (`loader.rs`).
//! - Validate references and timing values (`validate.rs`).

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{default_config_path, load_and_validate, load_from_path, load_from_str};
pub use model::{
    AnalysisSection, ChainConfig, EdgeConfig, EdgeKind, RawTaskSetFile, TaskConfig, TaskSetFile,
};
pub use validate::validate_config;
