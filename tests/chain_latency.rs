// tests/chain_latency.rs

use std::error::Error;

use rtdag::chain::{ChainEvent, ChainSim, LatencySummary, SlotState};
use rtdag::errors::RtDagError;
use rtdag::types::TaskId;
use rtdag_test_utils::builders::TaskSetBuilder;
use rtdag_test_utils::init_tracing;

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn two_task_chain_produces_age_and_reaction() -> TestResult {
    init_tracing();

    let mut sim = ChainSim::new(vec![TaskId(0), TaskId(1)])?;
    sim.replay([
        ChainEvent::write(TaskId(0), 0),
        ChainEvent::read(TaskId(1), 5),
        ChainEvent::write(TaskId(1), 6),
    ])?;

    assert_eq!(sim.ages(), &[5]);
    assert_eq!(sim.reactions(), &[6]);
    Ok(())
}

#[test]
fn read_without_prior_write_adds_no_sample() -> TestResult {
    let mut sim = ChainSim::new(vec![TaskId(0), TaskId(1)])?;
    sim.read(TaskId(1), 4)?;
    assert!(sim.ages().is_empty());
    assert!(sim.slot(TaskId(0)).is_none());
    Ok(())
}

#[test]
fn rereading_a_live_value_adds_no_sample() -> TestResult {
    let mut sim = ChainSim::new(vec![TaskId(0), TaskId(1)])?;
    sim.write(TaskId(0), 0)?;
    sim.read(TaskId(1), 1)?;
    let before = sim.ages().len();
    sim.read(TaskId(1), 2)?;
    sim.read(TaskId(1), 3)?;

    assert_eq!(sim.ages().len(), before);
    assert_eq!(sim.slot(TaskId(0)).map(|s| s.read_at), Some(Some(1)));
    Ok(())
}

#[test]
fn periodic_trace_through_three_tasks() -> TestResult {
    init_tracing();

    // Head samples every 10, middle every 20, tail every 20 offset by 5.
    let (head, mid, tail) = (TaskId(0), TaskId(1), TaskId(2));
    let mut sim = ChainSim::new(vec![head, mid, tail])?;

    let mut events = Vec::new();
    for k in 0..4 {
        events.push(ChainEvent::write(head, k * 10 + 2));
    }
    sim.replay(events)?;
    // Middle reads the newest head value (written at 32) at 35.
    sim.read(mid, 35)?;
    sim.write(mid, 38)?;
    sim.read(tail, 45)?;
    sim.write(tail, 47)?;

    assert_eq!(sim.ages(), &[3, 7]);
    assert_eq!(sim.reactions(), &[15]);
    assert_eq!(sim.slot(mid).map(|s| s.state), Some(SlotState::Reacted));

    let summary = LatencySummary::from_samples(sim.ages()).ok_or("no ages")?;
    assert_eq!((summary.min, summary.max), (3, 7));
    Ok(())
}

#[test]
fn out_of_order_timestamps_are_rejected() -> TestResult {
    let mut sim = ChainSim::new(vec![TaskId(0), TaskId(1)])?;
    sim.write(TaskId(0), 20)?;

    let err = sim
        .replay([ChainEvent::write(TaskId(0), 30), ChainEvent::write(TaskId(0), 25)])
        .unwrap_err();
    assert!(matches!(
        err,
        RtDagError::ChainOutOfOrder {
            task: 0,
            time: 25,
            last: 30
        }
    ));
    Ok(())
}

#[test]
fn chain_from_task_set_file_uses_task_ids() -> TestResult {
    let cfg = TaskSetBuilder::new()
        .task("cam", 10, 1)
        .task("detect", 20, 4)
        .task("brake", 20, 1)
        .chain("cam_to_brake", &["cam", "detect", "brake"])
        .build();

    let sim = cfg.chain_sim("cam_to_brake")?;
    assert_eq!(sim.chain(), &[TaskId(0), TaskId(1), TaskId(2)]);
    assert!(cfg.chain_sim("missing").is_err());
    Ok(())
}
