#![allow(dead_code)]

use rtdag::config::{
    AnalysisSection, ChainConfig, EdgeConfig, EdgeKind, RawTaskSetFile, TaskConfig, TaskSetFile,
};
use rtdag::taskset::TaskGraphModel;
use rtdag::types::{HyperperiodMode, Time};

/// Builder for `TaskSetFile` to simplify test setup.
///
/// Tasks get ids in the order they are added.
pub struct TaskSetBuilder {
    config: RawTaskSetFile,
}

impl TaskSetBuilder {
    pub fn new() -> Self {
        Self {
            config: RawTaskSetFile {
                analysis: AnalysisSection::default(),
                task: Vec::new(),
                edge: Vec::new(),
                chain: Vec::new(),
            },
        }
    }

    pub fn task(mut self, name: &str, period: Time, wcet: Time) -> Self {
        self.config.task.push(TaskConfig {
            name: name.to_string(),
            period,
            wcet,
            deadline: None,
        });
        self
    }

    pub fn task_with_deadline(mut self, name: &str, period: Time, wcet: Time, deadline: Time) -> Self {
        self.config.task.push(TaskConfig {
            name: name.to_string(),
            period,
            wcet,
            deadline: Some(deadline),
        });
        self
    }

    pub fn precedence(mut self, from: &str, to: &str) -> Self {
        self.config.edge.push(EdgeConfig {
            from: from.to_string(),
            to: to.to_string(),
            kind: EdgeKind::Precedence,
            jitter: None,
        });
        self
    }

    pub fn data(mut self, from: &str, to: &str, jitter: Time) -> Self {
        self.config.edge.push(EdgeConfig {
            from: from.to_string(),
            to: to.to_string(),
            kind: EdgeKind::Data,
            jitter: Some(jitter),
        });
        self
    }

    pub fn chain(mut self, name: &str, tasks: &[&str]) -> Self {
        self.config.chain.push(ChainConfig {
            name: name.to_string(),
            tasks: tasks.iter().map(|t| t.to_string()).collect(),
        });
        self
    }

    pub fn hyperperiod(mut self, mode: HyperperiodMode) -> Self {
        self.config.analysis.hyperperiod = mode;
        self
    }

    pub fn max_candidates(mut self, max: u64) -> Self {
        self.config.analysis.max_candidates = max;
        self
    }

    pub fn unbounded(mut self) -> Self {
        self.config.analysis.unbounded = true;
        self
    }

    pub fn raw(self) -> RawTaskSetFile {
        self.config
    }

    pub fn build(self) -> TaskSetFile {
        TaskSetFile::try_from(self.config).expect("Failed to build valid task set from builder")
    }

    /// Shortcut for `build().build_model()`.
    pub fn model(self) -> TaskGraphModel {
        self.build()
            .build_model()
            .expect("Failed to build task graph model from builder")
    }
}

impl Default for TaskSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}
