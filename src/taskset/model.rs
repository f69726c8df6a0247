// src/taskset/model.rs

use petgraph::graph::NodeIndex;
use tracing::{debug, warn};

use crate::dag::graph::{JobDag, JobEdge};
use crate::dag::sync;
use crate::errors::{Result, RtDagError};
use crate::taskset::edge::{Dependency, Edge};
use crate::taskset::task::Task;
use crate::types::{HyperperiodMode, TaskId, Time};

/// Cap on the number of jobs one hyperperiod may unroll to.
pub const MAX_JOBS: u64 = 1_000_000;

/// Multi-rate task set: an arena of tasks plus the dependencies between
/// them.
///
/// Tasks are addressed by [`TaskId`] (their creation index); edges store
/// ids, never references. The hyperperiod is kept up to date as tasks are
/// added, according to the model's [`HyperperiodMode`].
#[derive(Debug, Clone, Default)]
pub struct TaskGraphModel {
    tasks: Vec<Task>,
    edges: Vec<Edge>,
    hyperperiod: Time,
    mode: HyperperiodMode,
}

impl TaskGraphModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_mode(mode: HyperperiodMode) -> Self {
        Self {
            mode,
            ..Self::default()
        }
    }

    /// Add a task with an implicit deadline (equal to `period`).
    pub fn add_task(&mut self, period: Time, wcet: Time, name: &str) -> Result<TaskId> {
        self.add_task_with_deadline(period, wcet, period, name)
    }

    /// Add a task with an explicit relative deadline.
    ///
    /// An empty `name` becomes the stringified id.
    pub fn add_task_with_deadline(
        &mut self,
        period: Time,
        wcet: Time,
        deadline: Time,
        name: &str,
    ) -> Result<TaskId> {
        if period == 0 || wcet == 0 {
            return Err(RtDagError::ConfigError(format!(
                "task '{name}': period and wcet must be positive (got period={period}, wcet={wcet})"
            )));
        }
        if deadline < wcet {
            return Err(RtDagError::ConfigError(format!(
                "task '{name}': deadline {deadline} is shorter than wcet {wcet}"
            )));
        }

        let hyperperiod = self.mode.combine(self.hyperperiod, period).ok_or_else(|| {
            RtDagError::ConfigError(format!(
                "task '{name}': hyperperiod overflows with period {period}"
            ))
        })?;

        let jobs = self
            .tasks
            .iter()
            .map(|t| t.period)
            .chain([period])
            .try_fold(0u64, |acc, p| acc.checked_add(hyperperiod / p));
        match jobs {
            Some(n) if n <= MAX_JOBS => {}
            jobs => {
                return Err(RtDagError::TooManyJobs {
                    jobs,
                    limit: MAX_JOBS,
                });
            }
        }

        let id = TaskId(self.tasks.len());
        let name = if name.is_empty() {
            id.to_string()
        } else {
            name.to_string()
        };

        debug!(task = %name, %id, period, wcet, deadline, "added task");

        self.tasks.push(Task {
            id,
            name,
            period,
            wcet,
            deadline,
        });
        self.hyperperiod = hyperperiod;
        Ok(id)
    }

    /// Add a precedence edge; its jitter is always 0.
    pub fn add_precedence_edge(&mut self, from: TaskId, to: TaskId) -> Result<&Edge> {
        self.push_edge(from, to, Dependency::Precedence)
    }

    /// Add a data edge tolerating `jitter` between producer completion and
    /// consumer observation.
    pub fn add_data_edge(&mut self, from: TaskId, to: TaskId, jitter: Time) -> Result<&Edge> {
        self.push_edge(from, to, Dependency::Data { jitter })
    }

    fn push_edge(&mut self, from: TaskId, to: TaskId, dependency: Dependency) -> Result<&Edge> {
        for id in [from, to] {
            if self.tasks.get(id.index()).is_none() {
                return Err(RtDagError::TaskNotFound(id.to_string()));
            }
        }
        if from == to {
            return Err(RtDagError::ConfigError(format!(
                "task '{}' cannot depend on itself",
                self.tasks[from.index()].name
            )));
        }

        let idx = self.edges.len();
        self.edges.push(Edge {
            from,
            to,
            dependency,
        });
        Ok(&self.edges[idx])
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.get(id.index())
    }

    pub fn task_by_name(&self, name: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.name == name)
    }

    pub fn hyperperiod(&self) -> Time {
        self.hyperperiod
    }

    pub fn mode(&self) -> HyperperiodMode {
        self.mode
    }

    /// Unroll every task into its job chain for one hyperperiod.
    ///
    /// Each chain is linked start dummy → first job → … → last job → end
    /// dummy, then the dummy synchronization structure is added. The result
    /// is a snapshot: later additions to the model are not reflected in it.
    pub fn create_baseline_dag(&self) -> BaselineDag {
        let hyperperiod = self.hyperperiod;
        let mut dag = JobDag::new(hyperperiod);
        let (start, end) = (dag.start(), dag.end());
        let mut jobs = Vec::with_capacity(self.tasks.len());

        for task in &self.tasks {
            if hyperperiod % task.period != 0 {
                warn!(
                    task = %task.name,
                    period = task.period,
                    hyperperiod,
                    "period does not divide the hyperperiod; trailing partial period is dropped"
                );
            }

            let nodes = dag.add_nodes(task.create_jobs(hyperperiod));

            let mut edges: Vec<JobEdge> = Vec::with_capacity(nodes.len() + 1);
            if let (Some(&first), Some(&last)) = (nodes.first(), nodes.last()) {
                edges.push((start, first));
                edges.extend(nodes.windows(2).map(|w| (w[0], w[1])));
                edges.push((last, end));
            }
            dag.add_edges(&edges);
            jobs.push(nodes);
        }

        sync::add_to_dag(&mut dag);

        debug!(
            hyperperiod,
            nodes = dag.node_count(),
            edges = dag.edge_count(),
            "built baseline DAG"
        );

        BaselineDag {
            hyperperiod,
            tasks: self.tasks.clone(),
            edges: self.edges.clone(),
            jobs,
            dag,
        }
    }
}

/// Build context for one hyperperiod: the baseline job DAG together with
/// the task and edge snapshot it was unrolled from.
///
/// Read-only once built; enumeration clones [`BaselineDag::dag`] per
/// candidate instead of mutating it.
#[derive(Debug, Clone)]
pub struct BaselineDag {
    hyperperiod: Time,
    tasks: Vec<Task>,
    edges: Vec<Edge>,
    /// Job node indices per task, in release order.
    jobs: Vec<Vec<NodeIndex>>,
    dag: JobDag,
}

impl BaselineDag {
    pub fn hyperperiod(&self) -> Time {
        self.hyperperiod
    }

    pub fn dag(&self) -> &JobDag {
        &self.dag
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// The task with the given id. Ids come from the same model, so they are
    /// always in range.
    pub fn task(&self, id: TaskId) -> &Task {
        &self.tasks[id.index()]
    }

    pub fn jobs_of(&self, id: TaskId) -> &[NodeIndex] {
        &self.jobs[id.index()]
    }
}
