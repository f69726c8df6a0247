// src/dag/mod.rs

//! Job-level DAGs and their enumeration.
//!
//! - [`graph`] wraps the `petgraph` job graph (cycle check, transitive
//!   reduction, dense node ids).
//! - [`sync`] adds and checks the start/end dummy synchronization.
//! - [`enumerate`] expands multi-rate edges into every valid candidate DAG.

pub mod enumerate;
pub mod graph;
pub mod sync;

pub use enumerate::{
    CandidateDag, CandidateOutcome, DagEnumerator, Enumeration, EnumerationLimits,
    EnumerationReport,
};
pub use graph::{DagNode, DummyRole, Job, JobDag, JobEdge};
pub use sync::{SyncViolation, broken_dummy_chain};
