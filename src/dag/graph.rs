// src/dag/graph.rs

use petgraph::Direction;
use petgraph::algo::tred::{dag_to_toposorted_adjacency_list, dag_transitive_reduction_closure};
use petgraph::algo::{is_cyclic_directed, toposort};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::{EdgeRef, IntoNeighbors, NodeCount};

use crate::errors::{Result, RtDagError};
use crate::types::{TaskId, Time};

/// A job-level edge `(producer, consumer)` between two node indices.
pub type JobEdge = (NodeIndex, NodeIndex);

/// One concrete instance of a task within the hyperperiod.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub task: TaskId,
    /// Position of this job within its task's chain (0-based).
    pub instance: usize,
    pub release: Time,
    /// Absolute deadline, clamped to the hyperperiod.
    pub deadline: Time,
    pub wcet: Time,
}

/// Role of a synthetic synchronization anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DummyRole {
    /// Anchors every job chain at time 0.
    Start,
    /// Anchors every job chain at the hyperperiod.
    End,
}

/// Node payload of a [`JobDag`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DagNode {
    Job(Job),
    Dummy(DummyRole),
}

impl DagNode {
    pub fn as_job(&self) -> Option<&Job> {
        match self {
            DagNode::Job(job) => Some(job),
            DagNode::Dummy(_) => None,
        }
    }
}

/// Job-level DAG for one hyperperiod, backed by a `petgraph` [`DiGraph`].
///
/// Node indices are dense and assigned in insertion order: the start dummy
/// is `0`, the end dummy is `1`, and jobs follow task by task. Node indices
/// are never reused or reordered, so `NodeIndex::index()` doubles as the
/// job's unique id for array-indexed algorithms.
#[derive(Debug, Clone)]
pub struct JobDag {
    graph: DiGraph<DagNode, ()>,
    start: NodeIndex,
    end: NodeIndex,
    hyperperiod: Time,
}

impl JobDag {
    pub fn new(hyperperiod: Time) -> Self {
        let mut graph = DiGraph::new();
        let start = graph.add_node(DagNode::Dummy(DummyRole::Start));
        let end = graph.add_node(DagNode::Dummy(DummyRole::End));
        Self {
            graph,
            start,
            end,
            hyperperiod,
        }
    }

    pub fn start(&self) -> NodeIndex {
        self.start
    }

    pub fn end(&self) -> NodeIndex {
        self.end
    }

    pub fn hyperperiod(&self) -> Time {
        self.hyperperiod
    }

    /// Append jobs in order and return their node indices.
    pub fn add_nodes(&mut self, jobs: impl IntoIterator<Item = Job>) -> Vec<NodeIndex> {
        jobs.into_iter()
            .map(|job| self.graph.add_node(DagNode::Job(job)))
            .collect()
    }

    /// Add edges, skipping any that already exist.
    pub fn add_edges(&mut self, edges: &[JobEdge]) {
        for &(from, to) in edges {
            self.graph.update_edge(from, to, ());
        }
    }

    pub fn node(&self, idx: NodeIndex) -> &DagNode {
        &self.graph[idx]
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn contains_edge(&self, from: NodeIndex, to: NodeIndex) -> bool {
        self.graph.contains_edge(from, to)
    }

    /// All edges as `(from, to)` pairs, sorted for stable comparison.
    pub fn edges(&self) -> Vec<JobEdge> {
        let mut edges: Vec<JobEdge> = self
            .graph
            .edge_references()
            .map(|e| (e.source(), e.target()))
            .collect();
        edges.sort();
        edges
    }

    /// Iterate over job nodes with their indices (dummies excluded).
    pub fn jobs(&self) -> impl Iterator<Item = (NodeIndex, &Job)> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph[idx].as_job().map(|job| (idx, job)))
    }

    pub fn predecessors(&self, idx: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(idx, Direction::Incoming)
    }

    pub fn is_cyclic(&self) -> bool {
        is_cyclic_directed(&self.graph)
    }

    /// Node indices in a topological order.
    pub fn topological_order(&self) -> Result<Vec<NodeIndex>> {
        toposort(&self.graph, None).map_err(|cycle| {
            RtDagError::DagCycle(format!(
                "cycle detected in job DAG involving node {}",
                cycle.node_id().index()
            ))
        })
    }

    /// Replace the edge set with its transitive reduction.
    ///
    /// Reachability is preserved and reducing an already reduced graph
    /// leaves it unchanged. Fails on cyclic graphs.
    pub fn transitive_reduction(&mut self) -> Result<()> {
        let order = self.topological_order()?;
        let (adjacency, _revmap) = dag_to_toposorted_adjacency_list::<_, u32>(&self.graph, &order);
        let (reduction, _closure) = dag_transitive_reduction_closure(&adjacency);

        self.graph.clear_edges();
        for from in 0..reduction.node_count() {
            // Reduced list indices are positions in `order`.
            let targets: Vec<u32> = (&reduction).neighbors(from as u32).collect();
            for to in targets {
                self.graph.add_edge(order[from], order[to as usize], ());
            }
        }
        Ok(())
    }

    /// Whether the graph already equals its own transitive reduction.
    pub fn is_transitively_reduced(&self) -> bool {
        let mut reduced = self.clone();
        match reduced.transitive_reduction() {
            Ok(()) => reduced.edges() == self.edges(),
            Err(_) => false,
        }
    }

    /// Read-only access to the underlying graph for custom traversals.
    pub fn graph(&self) -> &DiGraph<DagNode, ()> {
        &self.graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(task: usize, instance: usize) -> Job {
        Job {
            task: TaskId(task),
            instance,
            release: 0,
            deadline: 10,
            wcet: 1,
        }
    }

    #[test]
    fn dummies_take_the_first_ids() {
        let mut dag = JobDag::new(10);
        let nodes = dag.add_nodes([job(0, 0), job(0, 1)]);

        assert_eq!(dag.start().index(), 0);
        assert_eq!(dag.end().index(), 1);
        assert_eq!(nodes.iter().map(|n| n.index()).collect::<Vec<_>>(), vec![2, 3]);
        assert_eq!(dag.jobs().count(), 2);
    }

    #[test]
    fn duplicate_edges_are_merged() {
        let mut dag = JobDag::new(10);
        let (s, e) = (dag.start(), dag.end());
        dag.add_edges(&[(s, e), (s, e)]);
        assert_eq!(dag.edge_count(), 1);
    }

    #[test]
    fn reduction_drops_implied_edges() {
        let mut dag = JobDag::new(10);
        let n = dag.add_nodes([job(0, 0)]);
        let (s, e) = (dag.start(), dag.end());
        dag.add_edges(&[(s, n[0]), (n[0], e), (s, e)]);

        dag.transitive_reduction().unwrap();

        assert_eq!(dag.edges(), vec![(s, n[0]), (n[0], e)]);
        assert!(dag.is_transitively_reduced());
    }

    #[test]
    fn reduction_rejects_cycles() {
        let mut dag = JobDag::new(10);
        let n = dag.add_nodes([job(0, 0), job(1, 0)]);
        dag.add_edges(&[(n[0], n[1]), (n[1], n[0])]);

        assert!(dag.is_cyclic());
        assert!(matches!(
            dag.transitive_reduction(),
            Err(RtDagError::DagCycle(_))
        ));
    }
}
