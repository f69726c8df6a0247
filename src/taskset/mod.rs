// src/taskset/mod.rs

//! Multi-rate task sets and their unrolling into job-level DAGs.
//!
//! - [`task`] holds the periodic task model and job unrolling.
//! - [`edge`] holds precedence/data dependencies and their job-level
//!   realizations.
//! - [`model`] owns the task arena and builds the baseline DAG for one
//!   hyperperiod.

pub mod edge;
pub mod model;
pub mod task;

pub use edge::{Dependency, Edge, EdgeSet};
pub use model::{BaselineDag, MAX_JOBS, TaskGraphModel};
pub use task::Task;
