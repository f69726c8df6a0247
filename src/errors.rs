// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

use crate::types::Time;

#[derive(Error, Debug)]
pub enum RtDagError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task not found: {0}")]
    TaskNotFound(String),

    #[error("Cycle detected in DAG: {0}")]
    DagCycle(String),

    /// The mixed-radix candidate space is larger than the caller allowed.
    ///
    /// `candidates` is `None` when the product overflowed `u64`.
    #[error(
        "enumeration too large: {} candidates exceed the limit of {limit}",
        candidates.map_or_else(|| "more than u64::MAX".to_string(), |c| c.to_string())
    )]
    EnumerationTooLarge { candidates: Option<u64>, limit: u64 },

    /// Unrolling one hyperperiod would create more jobs than allowed.
    ///
    /// `jobs` is `None` when the count overflowed `u64`.
    #[error(
        "hyperperiod unrolls to {} jobs, more than the limit of {limit}",
        jobs.map_or_else(|| "more than u64::MAX".to_string(), |j| j.to_string())
    )]
    TooManyJobs { jobs: Option<u64>, limit: u64 },

    #[error("out-of-order event for task {task}: t={time} precedes previous event at t={last}")]
    ChainOutOfOrder { task: usize, time: Time, last: Time },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, RtDagError>;
