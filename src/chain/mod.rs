// src/chain/mod.rs

//! Cause-effect chain latency analysis.
//!
//! - [`sim`] consumes a read/write trace and derives age and reaction-time
//!   samples.
//! - [`event`] defines trace events and a small summary helper.

pub mod event;
pub mod sim;

pub use event::{ChainEvent, EventKind, LatencySummary};
pub use sim::{ChainSim, Slot, SlotState};
