// src/taskset/edge.rs

//! Task-level dependencies and their job-level realizations.

use crate::dag::graph::JobEdge;
use crate::taskset::model::BaselineDag;
use crate::types::{TaskId, Time};

/// One legal job-level wiring of a task-level edge.
pub type EdgeSet = Vec<JobEdge>;

/// Kind of dependency between two tasks.
///
/// Jitter exists only for data edges: a precedence edge is a synchronous
/// hand-off and carries no timing slack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dependency {
    Precedence,
    /// `jitter` is the maximum delay tolerated between producer completion
    /// and consumer observation.
    Data { jitter: Time },
}

/// Dependency between two tasks of a [`TaskGraphModel`](crate::taskset::TaskGraphModel).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edge {
    pub from: TaskId,
    pub to: TaskId,
    pub dependency: Dependency,
}

impl Edge {
    pub fn jitter(&self) -> Time {
        match self.dependency {
            Dependency::Precedence => 0,
            Dependency::Data { jitter } => jitter,
        }
    }

    /// Ordered, structurally distinct job-level realizations of this edge.
    ///
    /// Consumer job `j` (released at `r_j`) is wired to the latest producer
    /// job released no later than `r_j`. Jitter lets the consumer observe
    /// older data: each shift `s` in `0..=jitter / producer_period` moves
    /// every pairing back by `s` producer jobs, pairings that would reach
    /// before the hyperperiod are dropped. Shift 0 always comes first, so
    /// precedence edges have exactly one realization.
    pub fn translate_to_edges(&self, baseline: &BaselineDag) -> Vec<EdgeSet> {
        let producer = baseline.task(self.from);
        let consumer = baseline.task(self.to);
        let from_jobs = baseline.jobs_of(self.from);
        let to_jobs = baseline.jobs_of(self.to);

        let max_shift = usize::try_from(self.jitter() / producer.period)
            .unwrap_or(usize::MAX)
            .min(from_jobs.len());

        let mut sets: Vec<EdgeSet> = Vec::new();
        for shift in 0..=max_shift {
            let set: EdgeSet = to_jobs
                .iter()
                .enumerate()
                .filter_map(|(j, &c)| {
                    let release = j as Time * consumer.period;
                    let latest = usize::try_from(release / producer.period).ok()?;
                    let i = latest.checked_sub(shift)?;
                    from_jobs.get(i).map(|&p| (p, c))
                })
                .collect();

            if !sets.contains(&set) {
                sets.push(set);
            }
        }
        sets
    }
}
