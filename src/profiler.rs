//! # Interaction Profiler
//!
//! An observer that turns lifecycle notifications into a per-interaction
//! record of work blocks. Every execution id attributed to an interaction
//! becomes one [`Block`] holding when it was scheduled, when it first started,
//! when it last ended and how many times it ran.
//!
//! Each block also remembers its parent: the execution that was running when
//! the block was scheduled, which gives the causal tree of an interaction.
//!
//! Executions that were scheduled but never ended (an abandoned continuation,
//! a wrapped callback nobody called) show up in [`Profiler::unfinished`].
//!
//! Data is kept until it is drained. [`Profiler::take_finished`] hands over
//! and forgets every interaction whose blocks have all ended; a host calls it
//! periodically to ship profiles and keep the profiler bounded.

use interaction_tracking::{now, ExecutionId, InteractionId, InteractionObserver, InteractionSet};
use serde::Serialize;
use std::cell::RefCell;
use std::collections::BTreeMap;

/// One unit of work attributed to an interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub execution_id: ExecutionId,
    /// The execution running when this block was scheduled.
    pub parent_execution_id: Option<ExecutionId>,
    pub scheduled_at: f64,
    pub started_at: Option<f64>,
    pub ended_at: Option<f64>,
    pub runs: u32,
}

/// Everything recorded for one interaction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InteractionProfile {
    pub id: InteractionId,
    pub name: String,
    pub timestamp: f64,
    pub blocks: Vec<Block>,
}

#[derive(Debug)]
struct Entry {
    name: String,
    timestamp: f64,
    blocks: BTreeMap<ExecutionId, Block>,
}

impl Entry {
    fn is_finished(&self) -> bool {
        self.blocks.values().all(|block| block.ended_at.is_some())
    }

    fn to_profile(&self, id: InteractionId) -> InteractionProfile {
        InteractionProfile {
            id,
            name: self.name.clone(),
            timestamp: self.timestamp,
            blocks: self.blocks.values().cloned().collect(),
        }
    }
}

/// Observer recording work blocks per interaction.
#[derive(Debug, Default)]
pub struct Profiler {
    interactions: RefCell<BTreeMap<InteractionId, Entry>>,
    /// Executions currently between `on_starting` and `on_ended`, innermost last.
    running: RefCell<Vec<ExecutionId>>,
}

impl Profiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all recorded interactions, ordered by id.
    pub fn report(&self) -> Vec<InteractionProfile> {
        self.interactions
            .borrow()
            .iter()
            .map(|(id, entry)| entry.to_profile(*id))
            .collect()
    }

    /// Removes and returns every interaction whose blocks have all ended.
    ///
    /// Interactions with outstanding work stay. If a drained interaction is
    /// scheduled again later (a continuation reserved before the drain, say),
    /// it starts over with only the new blocks.
    pub fn take_finished(&self) -> Vec<InteractionProfile> {
        let mut recorded = self.interactions.borrow_mut();
        let finished: Vec<InteractionId> = recorded
            .iter()
            .filter(|(_, entry)| entry.is_finished())
            .map(|(id, _)| *id)
            .collect();

        finished
            .into_iter()
            .filter_map(|id| recorded.remove(&id).map(|entry| entry.to_profile(id)))
            .collect()
    }

    /// Executions that were scheduled but have not ended.
    pub fn unfinished(&self) -> Vec<ExecutionId> {
        let mut ids: Vec<_> = self
            .interactions
            .borrow()
            .values()
            .flat_map(|entry| entry.blocks.values())
            .filter(|block| block.ended_at.is_none())
            .map(|block| block.execution_id)
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    fn update_blocks(
        &self,
        interactions: &InteractionSet,
        execution_id: ExecutionId,
        update: impl Fn(&mut Block),
    ) {
        let mut recorded = self.interactions.borrow_mut();
        for interaction in interactions {
            if let Some(block) = recorded
                .get_mut(&interaction.id())
                .and_then(|entry| entry.blocks.get_mut(&execution_id))
            {
                update(block);
            }
        }
    }
}

impl InteractionObserver for Profiler {
    fn on_scheduled(&self, interactions: &InteractionSet, execution_id: ExecutionId) {
        let scheduled_at = now();
        let parent_execution_id = self.running.borrow().last().copied();
        let mut recorded = self.interactions.borrow_mut();
        for interaction in interactions {
            let entry = recorded.entry(interaction.id()).or_insert_with(|| Entry {
                name: interaction.name().to_string(),
                timestamp: interaction.timestamp(),
                blocks: BTreeMap::new(),
            });
            entry.blocks.entry(execution_id).or_insert(Block {
                execution_id,
                parent_execution_id,
                scheduled_at,
                started_at: None,
                ended_at: None,
                runs: 0,
            });
        }
    }

    fn on_starting(&self, interactions: &InteractionSet, execution_id: ExecutionId) {
        let started_at = now();
        self.running.borrow_mut().push(execution_id);
        self.update_blocks(interactions, execution_id, |block| {
            block.started_at.get_or_insert(started_at);
            block.runs += 1;
        });
    }

    fn on_ended(&self, interactions: &InteractionSet, execution_id: ExecutionId) {
        let ended_at = now();
        let mut running = self.running.borrow_mut();
        if let Some(position) = running.iter().rposition(|id| *id == execution_id) {
            running.remove(position);
        }
        drop(running);
        self.update_blocks(interactions, execution_id, |block| {
            block.ended_at = Some(ended_at);
        });
    }
}
