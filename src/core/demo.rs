//! Scripted demonstration: three drops into three targets, one step apart.

use chrono::{DateTime, Utc};

use crate::core::diagram::{Diagram, EntityId};
use crate::core::error::{DropError, DropResult};
use crate::core::schedule::DeferredQueue;
use crate::core::targets::TargetKind;
use crate::core::transfer::TransferPayload;

/// Default pause between demo drops
pub const DEFAULT_DEMO_STEP_MS: u32 = 1000;

/// One scripted drop
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DemoStep {
    pub entity_id: EntityId,
    pub target: TargetKind,
}

impl DemoStep {
    /// Build the payload from the live diagram so demo drops look exactly
    /// like real ones.
    pub fn payload(&self, diagram: &Diagram, now: DateTime<Utc>) -> DropResult<TransferPayload> {
        diagram
            .entity(self.entity_id)
            .map(|entity| TransferPayload::from_entity(entity, now))
            .ok_or(DropError::NoHit)
    }
}

pub const DEMO_SCRIPT: [DemoStep; 3] = [
    DemoStep {
        entity_id: EntityId(1),
        target: TargetKind::CodeGenerator,
    },
    DemoStep {
        entity_id: EntityId(2),
        target: TargetKind::Documentation,
    },
    DemoStep {
        entity_id: EntityId(3),
        target: TargetKind::QueryBuilder,
    },
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DemoSequencer {
    step_ms: u32,
}

impl DemoSequencer {
    pub fn new(step_ms: u32) -> Self {
        Self { step_ms }
    }

    /// Queue the script: first step at `start_ms`, then one step apart.
    pub fn schedule(&self, queue: &mut DeferredQueue<DemoStep>, start_ms: i64) {
        for (index, step) in DEMO_SCRIPT.into_iter().enumerate() {
            queue.schedule(start_ms + index as i64 * i64::from(self.step_ms), step);
        }
    }

    /// Total time from the first to the last drop
    pub fn duration_ms(&self) -> i64 {
        (DEMO_SCRIPT.len() as i64 - 1) * i64::from(self.step_ms)
    }
}

impl Default for DemoSequencer {
    fn default() -> Self {
        Self::new(DEFAULT_DEMO_STEP_MS)
    }
}
