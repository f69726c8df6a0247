// src/dag/sync.rs

//! Start/end dummy synchronization.
//!
//! Every task's job chain is bracketed by the start dummy (time 0) and the
//! end dummy (time = hyperperiod). A candidate DAG keeps that structure
//! intact only if
//! - every job is still reachable from the start dummy and still reaches
//!   the end dummy, and
//! - the jobs still fit between the anchors: releasing the start dummy at
//!   time 0 and running every job as early as its release and predecessors
//!   allow, no job finishes after its deadline and the end dummy is reached
//!   no later than the hyperperiod.
//!
//! The timing part is a necessary condition only (unbounded processors);
//! it says nothing about a concrete scheduling policy.

use petgraph::Direction;
use petgraph::graph::NodeIndex;
use petgraph::visit::{Dfs, Reversed};
use tracing::trace;

use crate::dag::graph::{DagNode, DummyRole, JobDag};
use crate::types::Time;

/// Why a candidate's dummy chain is considered broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncViolation {
    /// The node cannot be reached from the start dummy or cannot reach the
    /// end dummy.
    Unanchored { node: usize },
    /// The job's earliest possible finish lies past its absolute deadline.
    DeadlineOverrun { node: usize, finish: Time, deadline: Time },
    /// The end dummy is reached only after the hyperperiod.
    FrameOverrun { finish: Time, hyperperiod: Time },
    /// No topological order exists.
    Cyclic,
}

/// Add the synchronization structure to a freshly unrolled baseline.
///
/// Job chains are already linked to both dummies by the unrolling step;
/// this only guarantees that the start dummy reaches the end dummy even
/// for an empty task set.
pub fn add_to_dag(dag: &mut JobDag) {
    let (start, end) = (dag.start(), dag.end());
    let has_successor = dag
        .graph()
        .neighbors_directed(start, Direction::Outgoing)
        .next()
        .is_some();
    if !has_successor {
        dag.add_edges(&[(start, end)]);
    }
}

/// Returns `true` if the start → … → end structure is broken.
pub fn broken_dummy_chain(dag: &JobDag) -> bool {
    find_violation(dag).is_some()
}

/// First violation of the dummy synchronization structure, if any.
pub fn find_violation(dag: &JobDag) -> Option<SyncViolation> {
    if let Some(node) = first_unanchored(dag) {
        return Some(SyncViolation::Unanchored { node });
    }

    let order = match dag.topological_order() {
        Ok(order) => order,
        Err(_) => return Some(SyncViolation::Cyclic),
    };

    let mut finish: Vec<Time> = vec![0; dag.node_count()];
    for idx in order {
        let ready = dag
            .predecessors(idx)
            .map(|p| finish[p.index()])
            .max()
            .unwrap_or(0);

        match dag.node(idx) {
            DagNode::Job(job) => {
                let done = ready.max(job.release).saturating_add(job.wcet);
                if done > job.deadline {
                    trace!(
                        node = idx.index(),
                        finish = done,
                        deadline = job.deadline,
                        "job overruns its deadline"
                    );
                    return Some(SyncViolation::DeadlineOverrun {
                        node: idx.index(),
                        finish: done,
                        deadline: job.deadline,
                    });
                }
                finish[idx.index()] = done;
            }
            DagNode::Dummy(DummyRole::Start) => finish[idx.index()] = 0,
            DagNode::Dummy(DummyRole::End) => {
                if ready > dag.hyperperiod() {
                    return Some(SyncViolation::FrameOverrun {
                        finish: ready,
                        hyperperiod: dag.hyperperiod(),
                    });
                }
                finish[idx.index()] = ready;
            }
        }
    }

    None
}

fn first_unanchored(dag: &JobDag) -> Option<usize> {
    let from_start = reachable(dag, dag.start(), false);
    let to_end = reachable(dag, dag.end(), true);

    dag.graph()
        .node_indices()
        .find(|idx| !from_start[idx.index()] || !to_end[idx.index()])
        .map(NodeIndex::index)
}

fn reachable(dag: &JobDag, root: NodeIndex, backwards: bool) -> Vec<bool> {
    let mut seen = vec![false; dag.node_count()];
    if backwards {
        let reversed = Reversed(dag.graph());
        let mut dfs = Dfs::new(reversed, root);
        while let Some(idx) = dfs.next(reversed) {
            seen[idx.index()] = true;
        }
    } else {
        let mut dfs = Dfs::new(dag.graph(), root);
        while let Some(idx) = dfs.next(dag.graph()) {
            seen[idx.index()] = true;
        }
    }
    seen
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dag::graph::Job;
    use crate::types::TaskId;

    fn job(release: Time, deadline: Time, wcet: Time) -> Job {
        Job {
            task: TaskId(0),
            instance: 0,
            release,
            deadline,
            wcet,
        }
    }

    #[test]
    fn empty_baseline_links_start_to_end() {
        let mut dag = JobDag::new(10);
        add_to_dag(&mut dag);
        assert!(dag.contains_edge(dag.start(), dag.end()));
        assert!(!broken_dummy_chain(&dag));
    }

    #[test]
    fn dangling_job_is_unanchored() {
        let mut dag = JobDag::new(10);
        let n = dag.add_nodes([job(0, 10, 1)]);
        let (s, e) = (dag.start(), dag.end());
        dag.add_edges(&[(s, n[0]), (s, e)]);

        assert_eq!(
            find_violation(&dag),
            Some(SyncViolation::Unanchored { node: n[0].index() })
        );
    }

    #[test]
    fn chained_jobs_past_deadline_break_the_chain() {
        let mut dag = JobDag::new(10);
        let n = dag.add_nodes([job(0, 10, 6), job(0, 10, 6)]);
        let (s, e) = (dag.start(), dag.end());
        dag.add_edges(&[(s, n[0]), (n[0], n[1]), (n[1], e)]);

        assert_eq!(
            find_violation(&dag),
            Some(SyncViolation::DeadlineOverrun {
                node: n[1].index(),
                finish: 12,
                deadline: 10,
            })
        );
    }

    #[test]
    fn release_times_delay_successors() {
        let mut dag = JobDag::new(20);
        let n = dag.add_nodes([job(0, 10, 2), job(10, 20, 2), job(0, 20, 9)]);
        let (s, e) = (dag.start(), dag.end());
        // n1 released at 10 finishes at 12; n2 then runs 12..21 > 20.
        dag.add_edges(&[(s, n[0]), (n[0], n[1]), (n[1], n[2]), (n[2], e)]);

        assert!(matches!(
            find_violation(&dag),
            Some(SyncViolation::DeadlineOverrun { finish: 21, .. })
        ));
    }
}
