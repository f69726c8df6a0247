// src/taskset/task.rs

//! The periodic task model.

use crate::dag::graph::Job;
use crate::types::{TaskId, Time};

/// A single periodic task.
///
/// Immutable once added to a [`TaskGraphModel`](crate::taskset::TaskGraphModel);
/// construction-time validation guarantees `period > 0`, `wcet > 0` and
/// `wcet <= deadline`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub id: TaskId,
    pub name: String,
    pub period: Time,
    /// Worst-case execution time.
    pub wcet: Time,
    /// Relative deadline; equal to `period` unless set explicitly.
    pub deadline: Time,
}

impl Task {
    /// Tests whether the task has an implicit deadline (deadline == period).
    pub fn implicit(&self) -> bool {
        self.deadline == self.period
    }

    /// Number of jobs this task releases within `hyperperiod`.
    ///
    /// Exact only if `period` divides `hyperperiod`; otherwise the trailing
    /// partial period is dropped.
    pub fn job_count(&self, hyperperiod: Time) -> usize {
        usize::try_from(hyperperiod / self.period).unwrap_or(usize::MAX)
    }

    /// Unroll the task into its ordered jobs for one hyperperiod.
    ///
    /// Job `k` is released at `k * period`; its absolute deadline is
    /// `k * period + deadline`, clamped to the hyperperiod.
    pub fn create_jobs(&self, hyperperiod: Time) -> Vec<Job> {
        (0..self.job_count(hyperperiod))
            .map(|instance| {
                let release = instance as Time * self.period;
                Job {
                    task: self.id,
                    instance,
                    release,
                    deadline: release.saturating_add(self.deadline).min(hyperperiod),
                    wcet: self.wcet,
                }
            })
            .collect()
    }
}
