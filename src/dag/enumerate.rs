// src/dag/enumerate.rs

//! Enumeration of every acyclic, synchronization-valid job DAG implied by
//! a task set's multi-rate edges.
//!
//! Each task-level edge contributes one "digit": the index of the
//! realization chosen for it. Candidate `k` is decoded as a mixed-radix
//! number over those digits (first edge most significant), so the
//! candidate space has exactly `∏ cᵢ` members for choice-set sizes `cᵢ`.
//!
//! Work per candidate is O(|V| + |E|) for the cycle check, reduction and
//! dummy-chain check, so total cost grows exponentially with the number of
//! edges that have more than one realization. [`EnumerationLimits`] guards
//! against accidentally huge spaces.

use tracing::{debug, info};

use crate::dag::graph::JobDag;
use crate::dag::sync;
use crate::errors::{Result, RtDagError};
use crate::taskset::edge::EdgeSet;
use crate::taskset::model::BaselineDag;

/// Default cap on the number of candidates a single enumeration may visit.
pub const DEFAULT_MAX_CANDIDATES: u64 = 1_000_000;

/// Upper bound on the candidate space.
///
/// `max_candidates: None` is an explicit opt-in to unbounded enumeration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnumerationLimits {
    pub max_candidates: Option<u64>,
}

impl Default for EnumerationLimits {
    fn default() -> Self {
        Self {
            max_candidates: Some(DEFAULT_MAX_CANDIDATES),
        }
    }
}

impl EnumerationLimits {
    pub fn unbounded() -> Self {
        Self {
            max_candidates: None,
        }
    }

    /// Whether a space of `candidates` members fits under the cap.
    pub fn admits(&self, candidates: u64) -> bool {
        self.max_candidates.is_none_or(|max| candidates <= max)
    }
}

/// An accepted candidate: baseline plus one realization per edge,
/// transitively reduced.
#[derive(Debug, Clone)]
pub struct CandidateDag {
    /// Mixed-radix index this candidate was decoded from.
    pub index: u64,
    /// Realization index chosen for each edge, in edge insertion order.
    pub choices: Vec<usize>,
    pub dag: JobDag,
}

/// Counts gathered during one enumeration.
///
/// `accepted + cyclic + broken_dummy_chain == total` always holds.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnumerationReport {
    pub total: u64,
    pub accepted: u64,
    pub cyclic: u64,
    pub broken_dummy_chain: u64,
}

/// Result of [`DagEnumerator::enumerate`].
#[derive(Debug, Clone)]
pub struct Enumeration {
    /// Accepted candidates in ascending index order.
    pub candidates: Vec<CandidateDag>,
    pub report: EnumerationReport,
}

/// Outcome of evaluating a single candidate index.
#[derive(Debug, Clone)]
pub enum CandidateOutcome {
    Accepted(CandidateDag),
    Cyclic,
    BrokenDummyChain(sync::SyncViolation),
}

/// Mixed-radix enumerator over the realizations of every task-level edge.
///
/// Holds a read-only reference to the baseline; every candidate is built
/// from a fresh clone of it.
#[derive(Debug)]
pub struct DagEnumerator<'a> {
    baseline: &'a BaselineDag,
    edge_sets: Vec<Vec<EdgeSet>>,
    /// `suffix[i]` = product of choice-set sizes of edges `i..`; the last
    /// entry is 1.
    suffix: Vec<u64>,
}

impl<'a> DagEnumerator<'a> {
    /// Translate every edge of `baseline` and size the candidate space.
    ///
    /// Fails with [`RtDagError::EnumerationTooLarge`] if the product of
    /// choice-set sizes overflows or exceeds `limits`.
    pub fn new(baseline: &'a BaselineDag, limits: EnumerationLimits) -> Result<Self> {
        let edge_sets: Vec<Vec<EdgeSet>> = baseline
            .edges()
            .iter()
            .map(|edge| edge.translate_to_edges(baseline))
            .collect();

        let mut suffix = vec![1u64; edge_sets.len() + 1];
        for i in (0..edge_sets.len()).rev() {
            let size = edge_sets[i].len() as u64;
            suffix[i] = suffix[i + 1].checked_mul(size).ok_or(
                RtDagError::EnumerationTooLarge {
                    candidates: None,
                    limit: limits.max_candidates.unwrap_or(u64::MAX),
                },
            )?;
        }

        let total = suffix[0];
        if !limits.admits(total) {
            return Err(RtDagError::EnumerationTooLarge {
                candidates: Some(total),
                limit: limits.max_candidates.unwrap_or(u64::MAX),
            });
        }

        debug!(
            edges = edge_sets.len(),
            candidates = total,
            "prepared DAG enumeration"
        );

        Ok(Self {
            baseline,
            edge_sets,
            suffix,
        })
    }

    /// Number of candidates before filtering.
    pub fn candidate_count(&self) -> u64 {
        self.suffix[0]
    }

    /// Number of realizations per edge, in edge insertion order.
    pub fn choice_counts(&self) -> Vec<usize> {
        self.edge_sets.iter().map(Vec::len).collect()
    }

    /// The realizations computed for each edge.
    pub fn edge_sets(&self) -> &[Vec<EdgeSet>] {
        &self.edge_sets
    }

    /// Decode a candidate index into one realization index per edge.
    ///
    /// Returns `None` for indices outside `0..candidate_count()`.
    pub fn decode(&self, index: u64) -> Option<Vec<usize>> {
        if index >= self.candidate_count() {
            return None;
        }
        let mut rest = index;
        let digits = (0..self.edge_sets.len())
            .map(|i| {
                let weight = self.suffix[i + 1];
                let digit = rest / weight;
                rest %= weight;
                digit as usize
            })
            .collect();
        Some(digits)
    }

    /// Baseline plus the chosen realization of every edge, unreduced.
    ///
    /// `None` if `choices` has the wrong length or a digit is out of range
    /// for its edge.
    pub fn build_candidate(&self, choices: &[usize]) -> Option<JobDag> {
        if choices.len() != self.edge_sets.len() {
            return None;
        }
        let mut dag = self.baseline.dag().clone();
        for (sets, &choice) in self.edge_sets.iter().zip(choices) {
            dag.add_edges(sets.get(choice)?);
        }
        Some(dag)
    }

    /// Build and validate the candidate with the given index.
    ///
    /// `None` if `index` is not below [`candidate_count`](Self::candidate_count).
    pub fn evaluate(&self, index: u64) -> Option<CandidateOutcome> {
        let choices = self.decode(index)?;
        let mut dag = self.build_candidate(&choices)?;

        if dag.is_cyclic() || dag.transitive_reduction().is_err() {
            return Some(CandidateOutcome::Cyclic);
        }

        if let Some(violation) = sync::find_violation(&dag) {
            return Some(CandidateOutcome::BrokenDummyChain(violation));
        }

        Some(CandidateOutcome::Accepted(CandidateDag {
            index,
            choices,
            dag,
        }))
    }

    /// Visit every candidate in ascending index order, keeping the accepted
    /// ones.
    pub fn enumerate(&self) -> Enumeration {
        let mut report = EnumerationReport {
            total: self.candidate_count(),
            ..EnumerationReport::default()
        };
        let mut candidates = Vec::new();

        for index in 0..report.total {
            let Some(outcome) = self.evaluate(index) else {
                continue;
            };
            match outcome {
                CandidateOutcome::Accepted(candidate) => {
                    report.accepted += 1;
                    candidates.push(candidate);
                }
                CandidateOutcome::Cyclic => {
                    debug!(index, "candidate rejected: cyclic");
                    report.cyclic += 1;
                }
                CandidateOutcome::BrokenDummyChain(violation) => {
                    debug!(index, ?violation, "candidate rejected: broken dummy chain");
                    report.broken_dummy_chain += 1;
                }
            }
        }

        info!(
            total = report.total,
            accepted = report.accepted,
            "{} cyclic DAGs were excluded",
            report.cyclic
        );
        info!(
            "{} DAGs were excluded due to broken dummy chain",
            report.broken_dummy_chain
        );

        Enumeration { candidates, report }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::taskset::TaskGraphModel;

    fn jittered_model() -> TaskGraphModel {
        // A→B has two realizations; A→C has two once the empty shifts merge.
        let mut model = TaskGraphModel::new();
        let a = model.add_task(10, 1, "A").unwrap();
        let b = model.add_task(10, 1, "B").unwrap();
        let c = model.add_task(30, 1, "C").unwrap();
        model.add_data_edge(a, b, 10).unwrap();
        model.add_data_edge(b, c, 0).unwrap();
        model.add_data_edge(a, c, 25).unwrap();
        model
    }

    #[test]
    fn candidate_count_is_product_of_choice_sets() {
        let baseline = jittered_model().create_baseline_dag();
        let enumerator = DagEnumerator::new(&baseline, EnumerationLimits::default()).unwrap();

        let counts = enumerator.choice_counts();
        let product: u64 = counts.iter().map(|&c| c as u64).product();
        assert_eq!(enumerator.candidate_count(), product);
    }

    #[test]
    fn decode_is_mixed_radix_most_significant_first() {
        let baseline = jittered_model().create_baseline_dag();
        let enumerator = DagEnumerator::new(&baseline, EnumerationLimits::default()).unwrap();
        let counts = enumerator.choice_counts();

        for index in 0..enumerator.candidate_count() {
            let digits = enumerator.decode(index).unwrap();
            let recomposed = digits
                .iter()
                .zip(&counts)
                .fold(0u64, |acc, (&d, &c)| acc * c as u64 + d as u64);
            assert_eq!(recomposed, index);
            assert!(digits.iter().zip(&counts).all(|(&d, &c)| d < c));
        }
    }

    #[test]
    fn limits_admit_up_to_the_cap() {
        let limits = EnumerationLimits {
            max_candidates: Some(4),
        };
        assert!(limits.admits(4));
        assert!(!limits.admits(5));
        assert!(EnumerationLimits::unbounded().admits(u64::MAX));
    }

    #[test]
    fn indices_past_the_space_are_rejected() {
        let baseline = jittered_model().create_baseline_dag();
        let enumerator = DagEnumerator::new(&baseline, EnumerationLimits::default()).unwrap();
        let total = enumerator.candidate_count();

        assert!(enumerator.decode(total).is_none());
        assert!(enumerator.evaluate(total).is_none());
        assert!(enumerator.evaluate(u64::MAX).is_none());
        assert!(enumerator.evaluate(total - 1).is_some());

        let too_far: Vec<usize> = enumerator.choice_counts();
        assert!(enumerator.build_candidate(&too_far).is_none());
        assert!(enumerator.build_candidate(&[]).is_none());
    }

    #[test]
    fn no_edges_accepts_only_index_zero() {
        let mut model = TaskGraphModel::new();
        model.add_task(10, 1, "A").unwrap();
        let baseline = model.create_baseline_dag();
        let enumerator = DagEnumerator::new(&baseline, EnumerationLimits::default()).unwrap();

        assert!(matches!(
            enumerator.evaluate(0),
            Some(CandidateOutcome::Accepted(_))
        ));
        assert!(enumerator.evaluate(1).is_none());
    }

    #[test]
    fn limit_is_enforced_before_work() {
        let baseline = jittered_model().create_baseline_dag();
        let err = DagEnumerator::new(
            &baseline,
            EnumerationLimits {
                max_candidates: Some(1),
            },
        )
        .unwrap_err();

        assert!(matches!(
            err,
            RtDagError::EnumerationTooLarge {
                candidates: Some(n),
                limit: 1,
            } if n > 1
        ));
    }

    #[test]
    fn counts_add_up() {
        let baseline = jittered_model().create_baseline_dag();
        let enumerator = DagEnumerator::new(&baseline, EnumerationLimits::unbounded()).unwrap();
        let result = enumerator.enumerate();
        let r = result.report;

        assert_eq!(r.accepted + r.cyclic + r.broken_dummy_chain, r.total);
        assert_eq!(result.candidates.len() as u64, r.accepted);
        assert!(
            result
                .candidates
                .windows(2)
                .all(|w| w[0].index < w[1].index)
        );
    }

    #[test]
    fn no_edges_yields_the_reduced_baseline() {
        let mut model = TaskGraphModel::new();
        model.add_task(10, 1, "A").unwrap();
        let baseline = model.create_baseline_dag();
        let result = DagEnumerator::new(&baseline, EnumerationLimits::default())
            .unwrap()
            .enumerate();

        assert_eq!(result.report.total, 1);
        assert_eq!(result.candidates.len(), 1);
        assert!(result.candidates[0].choices.is_empty());
        assert_eq!(result.candidates[0].dag.edges(), baseline.dag().edges());
    }
}
