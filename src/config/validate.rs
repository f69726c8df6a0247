// src/config/validate.rs

use std::collections::HashSet;

use tracing::warn;

use crate::config::model::{EdgeKind, RawTaskSetFile, TaskSetFile};
use crate::errors::{Result, RtDagError};

impl TryFrom<RawTaskSetFile> for TaskSetFile {
    type Error = crate::errors::RtDagError;

    fn try_from(raw: RawTaskSetFile) -> std::result::Result<Self, Self::Error> {
        validate_config(&raw)?;
        Ok(TaskSetFile::new_unchecked(raw))
    }
}

/// Semantic checks on a deserialized task-set file.
pub fn validate_config(cfg: &RawTaskSetFile) -> Result<()> {
    ensure_has_tasks(cfg)?;
    validate_analysis(cfg)?;
    validate_tasks(cfg)?;
    validate_edges(cfg)?;
    validate_chains(cfg)?;
    Ok(())
}

fn ensure_has_tasks(cfg: &RawTaskSetFile) -> Result<()> {
    if cfg.task.is_empty() {
        return Err(RtDagError::ConfigError(
            "task set must contain at least one [[task]] entry".to_string(),
        ));
    }
    Ok(())
}

fn validate_analysis(cfg: &RawTaskSetFile) -> Result<()> {
    if !cfg.analysis.unbounded && cfg.analysis.max_candidates == 0 {
        return Err(RtDagError::ConfigError(
            "[analysis].max_candidates must be >= 1 (got 0)".to_string(),
        ));
    }
    Ok(())
}

fn validate_tasks(cfg: &RawTaskSetFile) -> Result<()> {
    let mut seen = HashSet::new();
    for task in &cfg.task {
        if task.name.is_empty() {
            return Err(RtDagError::ConfigError(
                "every [[task]] needs a non-empty name".to_string(),
            ));
        }
        if !seen.insert(task.name.as_str()) {
            return Err(RtDagError::ConfigError(format!(
                "task '{}' is defined more than once",
                task.name
            )));
        }
        if task.period == 0 || task.wcet == 0 {
            return Err(RtDagError::ConfigError(format!(
                "task '{}': period and wcet must be positive",
                task.name
            )));
        }
        if task.effective_deadline() < task.wcet {
            return Err(RtDagError::ConfigError(format!(
                "task '{}': deadline {} is shorter than wcet {}",
                task.name,
                task.effective_deadline(),
                task.wcet
            )));
        }
    }
    Ok(())
}

fn validate_edges(cfg: &RawTaskSetFile) -> Result<()> {
    for edge in &cfg.edge {
        for end in [&edge.from, &edge.to] {
            if !cfg.task.iter().any(|t| &t.name == end) {
                return Err(RtDagError::ConfigError(format!(
                    "edge '{}' -> '{}' references unknown task '{}'",
                    edge.from, edge.to, end
                )));
            }
        }
        if edge.from == edge.to {
            return Err(RtDagError::ConfigError(format!(
                "task '{}' cannot depend on itself",
                edge.from
            )));
        }
        if edge.kind == EdgeKind::Precedence && edge.jitter.is_some_and(|j| j > 0) {
            warn!(
                from = %edge.from,
                to = %edge.to,
                "jitter is ignored on precedence edges"
            );
        }
    }
    Ok(())
}

fn validate_chains(cfg: &RawTaskSetFile) -> Result<()> {
    let mut names = HashSet::new();
    for chain in &cfg.chain {
        if !names.insert(chain.name.as_str()) {
            return Err(RtDagError::ConfigError(format!(
                "chain '{}' is defined more than once",
                chain.name
            )));
        }
        if chain.tasks.len() < 2 {
            return Err(RtDagError::ConfigError(format!(
                "chain '{}' needs at least two tasks",
                chain.name
            )));
        }
        let mut members = HashSet::new();
        for task in &chain.tasks {
            if !cfg.task.iter().any(|t| &t.name == task) {
                return Err(RtDagError::ConfigError(format!(
                    "chain '{}' references unknown task '{}'",
                    chain.name, task
                )));
            }
            if !members.insert(task.as_str()) {
                return Err(RtDagError::ConfigError(format!(
                    "chain '{}' lists task '{}' more than once",
                    chain.name, task
                )));
            }
        }
    }
    Ok(())
}
