// tests/property_enumeration.rs

use proptest::prelude::*;
use rtdag::dag::{DagEnumerator, EnumerationLimits, broken_dummy_chain};
use rtdag::taskset::TaskGraphModel;
use rtdag::types::{TaskId, Time};

/// Random task set whose periods all divide 40, with up to four edges.
fn model_strategy() -> impl Strategy<Value = TaskGraphModel> {
    let periods = prop::sample::select(vec![5u64, 10, 20, 40]);
    (
        proptest::collection::vec(periods, 1..4),
        proptest::collection::vec((0..4usize, 0..4usize, any::<bool>(), 0..=20u64), 0..5),
    )
        .prop_map(|(periods, raw_edges)| {
            let mut model = TaskGraphModel::new();
            for p in &periods {
                model.add_task(*p, 1, "").unwrap();
            }
            // Anchor the hyperperiod at 40 so every period divides it.
            model.add_task(40, 1, "frame").unwrap();

            let n = model.tasks().len();
            for (from, to, precedence, jitter) in raw_edges {
                let (from, to) = (TaskId(from % n), TaskId(to % n));
                if from == to {
                    continue;
                }
                if precedence {
                    model.add_precedence_edge(from, to).unwrap();
                } else {
                    model.add_data_edge(from, to, jitter).unwrap();
                }
            }
            model
        })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn outcomes_partition_the_candidate_space(model in model_strategy()) {
        let baseline = model.create_baseline_dag();
        let enumerator = DagEnumerator::new(&baseline, EnumerationLimits::unbounded()).unwrap();
        let product: u64 = enumerator.choice_counts().iter().map(|&c| c as u64).product();
        prop_assert_eq!(enumerator.candidate_count(), product);

        let result = enumerator.enumerate();
        let r = result.report;
        prop_assert_eq!(r.total, product);
        prop_assert_eq!(r.accepted + r.cyclic + r.broken_dummy_chain, r.total);
        prop_assert_eq!(result.candidates.len() as u64, r.accepted);

        for candidate in &result.candidates {
            prop_assert!(!candidate.dag.is_cyclic());
            prop_assert!(candidate.dag.is_transitively_reduced());
            prop_assert!(!broken_dummy_chain(&candidate.dag));

            let mut again = candidate.dag.clone();
            again.transitive_reduction().unwrap();
            prop_assert_eq!(again.edges(), candidate.dag.edges());
        }
    }

    #[test]
    fn every_task_unrolls_into_an_anchored_chain(model in model_strategy()) {
        let baseline = model.create_baseline_dag();
        let dag = baseline.dag();
        let h = baseline.hyperperiod();
        prop_assert_eq!(h, 40);

        for task in baseline.tasks() {
            let jobs = baseline.jobs_of(task.id);
            prop_assert_eq!(jobs.len() as Time, h / task.period);
            prop_assert!(dag.contains_edge(dag.start(), jobs[0]));
            prop_assert!(dag.contains_edge(jobs[jobs.len() - 1], dag.end()));
            for pair in jobs.windows(2) {
                prop_assert!(dag.contains_edge(pair[0], pair[1]));
            }
        }
        prop_assert!(!broken_dummy_chain(dag));
    }

    #[test]
    fn precedence_edges_never_carry_jitter(jitter in any::<u64>()) {
        let mut model = TaskGraphModel::new();
        let a = model.add_task(10, 1, "A").unwrap();
        let b = model.add_task(20, 1, "B").unwrap();
        model.add_data_edge(a, b, jitter).unwrap();
        let edge = model.add_precedence_edge(a, b).unwrap();
        prop_assert_eq!(edge.jitter(), 0);
    }
}
