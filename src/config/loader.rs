// src/config/loader.rs

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::model::{RawTaskSetFile, TaskSetFile};
use crate::errors::Result;

/// Load a task-set file from a given path and return the raw `RawTaskSetFile`.
///
/// This only performs TOML deserialization; it does **not** perform semantic
/// validation (unknown task references, timing sanity, etc.). Use
/// [`load_and_validate`] for that.
pub fn load_from_path(path: impl AsRef<Path>) -> Result<RawTaskSetFile> {
    let contents = fs::read_to_string(path.as_ref())?;
    load_from_str(&contents)
}

/// Deserialize a task-set file from TOML text without validation.
pub fn load_from_str(contents: &str) -> Result<RawTaskSetFile> {
    let config: RawTaskSetFile = toml::from_str(contents)?;
    Ok(config)
}

/// Load a task-set file from path and run validation.
///
/// - Reads TOML.
/// - Applies defaults (handled by `serde` + `Default` impls).
/// - Checks for:
///   - duplicate or unknown task names,
///   - non-positive periods / wcets and deadlines shorter than the wcet,
///   - malformed chains,
///   - a usable candidate cap.
pub fn load_and_validate(path: impl AsRef<Path>) -> Result<TaskSetFile> {
    let raw_config = load_from_path(&path)?;
    let config = TaskSetFile::try_from(raw_config)?;
    Ok(config)
}

/// Default task-set path: `rtdag.toml` in the current working directory.
pub fn default_config_path() -> PathBuf {
    PathBuf::from("rtdag.toml")
}
