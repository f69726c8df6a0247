// src/chain/sim.rs

//! Read/write trace analysis for one cause-effect chain.
//!
//! Each chain position except the tail owns a *slot* holding the value it
//! last wrote. The next position in the chain reads from that slot. A slot
//! moves `Unread → Read → Reacted`:
//! - a write opens a fresh `Unread` value (last write wins; an unread value
//!   is simply replaced),
//! - the consumer's first read of that value moves it to `Read` and yields
//!   one age sample (`read time − write time`),
//! - the consumer's next write moves it to `Reacted`.
//!
//! Every value also carries the time of the head write it derives from.
//! When a tail write derives from a head write that has not reached the
//! tail before, one reaction-time sample is recorded.

use std::collections::HashMap;

use tracing::{debug, trace};

use crate::chain::event::{ChainEvent, EventKind};
use crate::errors::{Result, RtDagError};
use crate::types::{TaskId, Time};

/// Lifecycle of the live value in a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    Unread,
    Read,
    Reacted,
}

/// The live value written by one chain position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Slot {
    pub written_at: Time,
    /// Head write time this value derives from, if any.
    pub stimulus: Option<Time>,
    pub state: SlotState,
    pub read_at: Option<Time>,
    pub reacted_at: Option<Time>,
}

/// Event-driven age/reaction-time analysis for one chain.
#[derive(Debug, Clone)]
pub struct ChainSim {
    chain: Vec<TaskId>,
    positions: HashMap<TaskId, usize>,
    /// `slots[p]` holds the live value written by `chain[p]`; the tail has
    /// no slot.
    slots: Vec<Option<Slot>>,
    /// Stimulus carried by the value each position last read.
    inputs: Vec<Option<Time>>,
    /// Per-position event history, in arrival order.
    history: Vec<Vec<(Time, EventKind)>>,
    last_reaction_stimulus: Option<Time>,
    ages: Vec<Time>,
    reactions: Vec<Time>,
}

impl ChainSim {
    /// Start an empty trace for `chain` (head first).
    ///
    /// A chain needs at least two distinct tasks.
    pub fn new(chain: Vec<TaskId>) -> Result<Self> {
        if chain.len() < 2 {
            return Err(RtDagError::ConfigError(format!(
                "a cause-effect chain needs at least two tasks (got {})",
                chain.len()
            )));
        }

        let mut positions = HashMap::with_capacity(chain.len());
        for (pos, &task) in chain.iter().enumerate() {
            if positions.insert(task, pos).is_some() {
                return Err(RtDagError::ConfigError(format!(
                    "task {task} appears more than once in the chain"
                )));
            }
        }

        let n = chain.len();
        Ok(Self {
            chain,
            positions,
            slots: vec![None; n - 1],
            inputs: vec![None; n],
            history: vec![Vec::new(); n],
            last_reaction_stimulus: None,
            ages: Vec::new(),
            reactions: Vec::new(),
        })
    }

    pub fn chain(&self) -> &[TaskId] {
        &self.chain
    }

    /// Age samples, one per first read of a written value.
    pub fn ages(&self) -> &[Time] {
        &self.ages
    }

    /// Reaction-time samples, one per head write that reached the tail.
    pub fn reactions(&self) -> &[Time] {
        &self.reactions
    }

    /// Live value written by `task`, if it has written anything yet.
    pub fn slot(&self, task: TaskId) -> Option<&Slot> {
        let pos = *self.positions.get(&task)?;
        self.slots.get(pos)?.as_ref()
    }

    /// Events accepted so far for `task`.
    pub fn history(&self, task: TaskId) -> &[(Time, EventKind)] {
        self.positions
            .get(&task)
            .map(|&pos| self.history[pos].as_slice())
            .unwrap_or(&[])
    }

    /// `task` reads its input at `time`.
    ///
    /// Reads before the producer's first write (and reads by the head, which
    /// has no producer in the chain) are discarded. Repeated reads of the
    /// same value add no age sample.
    pub fn read(&mut self, task: TaskId, time: Time) -> Result<()> {
        let pos = self.position_checked(task, time)?;

        let Some(producer) = pos.checked_sub(1) else {
            self.history[pos].push((time, EventKind::Read));
            return Ok(());
        };

        let Some(slot) = self.slots[producer].as_mut() else {
            trace!(%task, time, "read before first write; discarded");
            self.history[pos].push((time, EventKind::Read));
            return Ok(());
        };

        if time < slot.written_at {
            return Err(RtDagError::ChainOutOfOrder {
                task: task.index(),
                time,
                last: slot.written_at,
            });
        }

        if slot.state == SlotState::Unread {
            slot.state = SlotState::Read;
            slot.read_at = Some(time);
            let age = time - slot.written_at;
            debug!(%task, time, age, "age sample");
            self.ages.push(age);
        }
        self.inputs[pos] = slot.stimulus;
        self.history[pos].push((time, EventKind::Read));
        Ok(())
    }

    /// `task` writes its output at `time`.
    pub fn write(&mut self, task: TaskId, time: Time) -> Result<()> {
        let pos = self.position_checked(task, time)?;

        let stimulus = if pos == 0 {
            Some(time)
        } else {
            if let Some(slot) = self.slots[pos - 1].as_mut() {
                if slot.state == SlotState::Read {
                    slot.state = SlotState::Reacted;
                    slot.reacted_at = Some(time);
                }
            }
            self.inputs[pos]
        };

        if pos == self.chain.len() - 1 {
            if let Some(origin) = stimulus {
                if self.last_reaction_stimulus.is_none_or(|last| origin > last) {
                    let reaction = time.saturating_sub(origin);
                    debug!(%task, time, reaction, "reaction sample");
                    self.reactions.push(reaction);
                    self.last_reaction_stimulus = Some(origin);
                }
            }
        } else {
            self.slots[pos] = Some(Slot {
                written_at: time,
                stimulus,
                state: SlotState::Unread,
                read_at: None,
                reacted_at: None,
            });
        }

        self.history[pos].push((time, EventKind::Write));
        Ok(())
    }

    /// Apply one event.
    pub fn apply(&mut self, event: ChainEvent) -> Result<()> {
        match event.kind {
            EventKind::Read => self.read(event.task, event.time),
            EventKind::Write => self.write(event.task, event.time),
        }
    }

    /// Apply a whole trace, stopping at the first rejected event.
    pub fn replay(&mut self, events: impl IntoIterator<Item = ChainEvent>) -> Result<()> {
        for event in events {
            self.apply(event)?;
        }
        Ok(())
    }

    /// Chain position of `task`, after checking per-task time monotonicity.
    fn position_checked(&self, task: TaskId, time: Time) -> Result<usize> {
        let pos = *self
            .positions
            .get(&task)
            .ok_or_else(|| RtDagError::TaskNotFound(task.to_string()))?;

        if let Some(&(last, _)) = self.history[pos].last() {
            if time < last {
                return Err(RtDagError::ChainOutOfOrder {
                    task: task.index(),
                    time,
                    last,
                });
            }
        }
        Ok(pos)
    }
}
