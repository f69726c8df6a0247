// src/config/model.rs

use serde::Deserialize;

use crate::chain::ChainSim;
use crate::dag::EnumerationLimits;
use crate::errors::{Result, RtDagError};
use crate::taskset::TaskGraphModel;
use crate::types::{HyperperiodMode, TaskId, Time};

/// Task-set file as read from TOML, before validation.
///
/// ```toml
/// [analysis]
/// hyperperiod = "lcm"
/// max_candidates = 10000
///
/// [[task]]
/// name = "sensor"
/// period = 10
/// wcet = 2
///
/// [[task]]
/// name = "control"
/// period = 20
/// wcet = 3
/// deadline = 15
///
/// [[edge]]
/// from = "sensor"
/// to = "control"
/// kind = "data"
/// jitter = 10
///
/// [[chain]]
/// name = "sense_to_act"
/// tasks = ["sensor", "control"]
/// ```
///
/// Tasks are an array rather than a table so that file order fixes the
/// dense task ids.
#[derive(Debug, Clone, Deserialize)]
pub struct RawTaskSetFile {
    #[serde(default)]
    pub analysis: AnalysisSection,

    #[serde(default)]
    pub task: Vec<TaskConfig>,

    #[serde(default)]
    pub edge: Vec<EdgeConfig>,

    #[serde(default)]
    pub chain: Vec<ChainConfig>,
}

/// Validated task-set file. Construct through `TryFrom<RawTaskSetFile>`.
#[derive(Debug, Clone)]
pub struct TaskSetFile {
    pub analysis: AnalysisSection,
    pub task: Vec<TaskConfig>,
    pub edge: Vec<EdgeConfig>,
    pub chain: Vec<ChainConfig>,
}

impl TaskSetFile {
    pub(crate) fn new_unchecked(raw: RawTaskSetFile) -> Self {
        Self {
            analysis: raw.analysis,
            task: raw.task,
            edge: raw.edge,
            chain: raw.chain,
        }
    }
}

/// `[analysis]` section.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisSection {
    /// `"max_period"` (default) or `"lcm"`.
    #[serde(default)]
    pub hyperperiod: HyperperiodMode,

    /// Maximum number of candidate DAGs an enumeration may visit.
    #[serde(default = "default_max_candidates")]
    pub max_candidates: u64,

    /// Opt in to enumeration without any candidate cap.
    #[serde(default)]
    pub unbounded: bool,
}

fn default_max_candidates() -> u64 {
    crate::dag::enumerate::DEFAULT_MAX_CANDIDATES
}

impl Default for AnalysisSection {
    fn default() -> Self {
        Self {
            hyperperiod: HyperperiodMode::default(),
            max_candidates: default_max_candidates(),
            unbounded: false,
        }
    }
}

impl AnalysisSection {
    pub fn limits(&self) -> EnumerationLimits {
        if self.unbounded {
            EnumerationLimits::unbounded()
        } else {
            EnumerationLimits {
                max_candidates: Some(self.max_candidates),
            }
        }
    }
}

/// `[[task]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct TaskConfig {
    /// Unique task name; referenced by edges and chains.
    pub name: String,
    pub period: Time,
    pub wcet: Time,
    /// Relative deadline; defaults to `period`.
    #[serde(default)]
    pub deadline: Option<Time>,
}

impl TaskConfig {
    pub fn effective_deadline(&self) -> Time {
        self.deadline.unwrap_or(self.period)
    }
}

/// Dependency kind as written in TOML.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EdgeKind {
    Precedence,
    Data,
}

/// `[[edge]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct EdgeConfig {
    pub from: String,
    pub to: String,
    pub kind: EdgeKind,
    /// Only meaningful for data edges; ignored for precedence edges.
    #[serde(default)]
    pub jitter: Option<Time>,
}

/// `[[chain]]` entry: a cause-effect chain, head first.
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    pub name: String,
    pub tasks: Vec<String>,
}

impl TaskSetFile {
    /// Build the task graph model described by this file.
    ///
    /// Task ids follow file order.
    pub fn build_model(&self) -> Result<TaskGraphModel> {
        let mut model = TaskGraphModel::with_mode(self.analysis.hyperperiod);
        for task in &self.task {
            model.add_task_with_deadline(
                task.period,
                task.wcet,
                task.effective_deadline(),
                &task.name,
            )?;
        }

        for edge in &self.edge {
            let from = self.task_id(&edge.from)?;
            let to = self.task_id(&edge.to)?;
            match edge.kind {
                EdgeKind::Precedence => {
                    model.add_precedence_edge(from, to)?;
                }
                EdgeKind::Data => {
                    model.add_data_edge(from, to, edge.jitter.unwrap_or(0))?;
                }
            }
        }
        Ok(model)
    }

    /// Id of the task called `name`.
    pub fn task_id(&self, name: &str) -> Result<TaskId> {
        self.task
            .iter()
            .position(|t| t.name == name)
            .map(TaskId)
            .ok_or_else(|| RtDagError::TaskNotFound(name.to_string()))
    }

    /// Chain simulator for the chain called `name`.
    pub fn chain_sim(&self, name: &str) -> Result<ChainSim> {
        let chain = self
            .chain
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| RtDagError::ConfigError(format!("unknown chain '{name}'")))?;

        let tasks = chain
            .tasks
            .iter()
            .map(|t| self.task_id(t))
            .collect::<Result<Vec<_>>>()?;
        ChainSim::new(tasks)
    }
}
