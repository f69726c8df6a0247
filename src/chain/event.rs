// src/chain/event.rs

//! Trace events and sample summaries.

use crate::types::{TaskId, Time};

/// Whether a task read its input or wrote its output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    Read,
    Write,
}

/// One timestamped event of a read/write trace.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChainEvent {
    pub task: TaskId,
    pub time: Time,
    pub kind: EventKind,
}

impl ChainEvent {
    pub fn read(task: TaskId, time: Time) -> Self {
        Self {
            task,
            time,
            kind: EventKind::Read,
        }
    }

    pub fn write(task: TaskId, time: Time) -> Self {
        Self {
            task,
            time,
            kind: EventKind::Write,
        }
    }
}

/// Min/mean/max over a sample sequence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LatencySummary {
    pub count: usize,
    pub min: Time,
    pub mean: f64,
    pub max: Time,
}

impl LatencySummary {
    /// Summarize `samples`; `None` if there are none.
    #[allow(clippy::cast_precision_loss)]
    pub fn from_samples(samples: &[Time]) -> Option<Self> {
        let min = *samples.iter().min()?;
        let max = *samples.iter().max()?;
        let sum: u128 = samples.iter().map(|&s| u128::from(s)).sum();
        Some(Self {
            count: samples.len(),
            min,
            mean: sum as f64 / samples.len() as f64,
            max,
        })
    }
}
