//! Everything the page owns: the diagram, the interaction controller, the
//! drop targets, the diagnostic ring and the deferred demo queue.
//!
//! All state is explicit and owned here; the UI keeps one `Workspace` in a
//! signal and forwards host events to it.

use chrono::{DateTime, Utc};

use crate::core::config::AppConfig;
use crate::core::controller::{DragMode, InteractionController, PointerSample, Resolution};
use crate::core::demo::{DemoSequencer, DemoStep};
use crate::core::diagnostics::Diagnostics;
use crate::core::diagram::{Diagram, Point, create_sample_diagram};
#[cfg(test)]
use crate::core::diagram::Rect;
use crate::core::error::{DropError, DropResult};
use crate::core::schedule::DeferredQueue;
use crate::core::targets::{Delivery, DropRecord, DropTargets, TargetKind, TargetLocator};
use crate::core::transfer::{TransferChannel, TransferPayload, TransferSource};

#[derive(Clone, Debug)]
pub struct Workspace {
    diagram: Diagram,
    controller: InteractionController,
    targets: DropTargets,
    diagnostics: Diagnostics,
    demo: DemoSequencer,
    queue: DeferredQueue<DemoStep>,
}

impl Workspace {
    pub fn new(diagram: Diagram, config: AppConfig) -> Self {
        Self {
            diagram,
            controller: InteractionController::new(),
            targets: DropTargets::new(),
            diagnostics: Diagnostics::with_capacity(config.diagnostics_capacity),
            demo: DemoSequencer::new(config.demo_step_ms),
            queue: DeferredQueue::new(),
        }
    }

    /// Sample diagram with the given configuration
    pub fn sample(config: AppConfig) -> Self {
        Self::new(create_sample_diagram(), config)
    }

    pub fn diagram(&self) -> &Diagram {
        &self.diagram
    }

    pub fn controller(&self) -> &InteractionController {
        &self.controller
    }

    pub fn targets(&self) -> &DropTargets {
        &self.targets
    }

    pub fn records(&self, target: TargetKind) -> &[DropRecord] {
        self.targets.get(target).records()
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    // --- Pointer input ---

    pub fn hover(&mut self, local: Point) -> bool {
        self.controller.hover(&self.diagram, local)
    }

    pub fn leave_surface(&mut self) {
        self.controller.clear_hover();
    }

    pub fn press(&mut self, sample: PointerSample, now: DateTime<Utc>) -> DropResult<&TransferPayload> {
        self.controller
            .press(&self.diagram, sample, now, &mut self.diagnostics)
    }

    pub fn pointer_move(&mut self, client: Point) {
        self.controller.pointer_move(client);
    }

    /// Pointer released; on the fallback path this performs the delivery.
    pub fn release(
        &mut self,
        client: Point,
        locator: &dyn TargetLocator,
        now: DateTime<Utc>,
    ) -> Option<DropRecord> {
        let resolution = self.controller.release(client, locator);
        self.resolve(resolution, now)
    }

    /// Release using the targets' own measured bounds.
    #[cfg(test)]
    pub fn release_over_targets(&mut self, client: Point, now: DateTime<Utc>) -> Option<DropRecord> {
        let resolution = self.controller.release(client, &self.targets);
        self.resolve(resolution, now)
    }

    fn resolve(&mut self, resolution: Resolution, now: DateTime<Utc>) -> Option<DropRecord> {
        self.targets.clear_hover();

        match resolution {
            Resolution::Deliver {
                target, payload, ..
            } => Some(self.targets.get_mut(target).accept(payload, now).clone()),
            Resolution::Missed(_) => {
                self.diagnostics.emit(DropError::NoHit);
                None
            }
            Resolution::Inactive | Resolution::Native(_) | Resolution::Abandoned(_) => None,
        }
    }

    pub fn abandon(&mut self) {
        self.targets.clear_hover();
        self.controller.abandon();
    }

    // --- Native transfer ---

    /// Start of a native drag. `DragMode::Fallback` means the channel took
    /// no data and the host should cancel its own drag.
    pub fn native_drag_start(&mut self, channel: &mut dyn TransferChannel) -> DropResult<DragMode> {
        self.controller
            .native_drag_start(channel, &mut self.diagnostics)
    }

    /// Native drop on a target: decode, enforce one delivery per gesture,
    /// append.
    pub fn native_drop(
        &mut self,
        target: TargetKind,
        source: &dyn TransferSource,
        now: DateTime<Utc>,
    ) -> DropResult<DropRecord> {
        self.targets.get_mut(target).set_hovered(false);

        let payload = Delivery::Native(source).into_payload(&mut self.diagnostics)?;
        if let Err(e) = self.controller.claim_delivery(&payload) {
            self.diagnostics.emit(e.clone());
            return Err(e);
        }

        Ok(self.targets.get_mut(target).accept(payload, now).clone())
    }

    pub fn native_drag_end(&mut self) {
        self.targets.clear_hover();
        self.controller.native_drag_end();
    }

    // --- Targets ---

    pub fn set_target_hovered(&mut self, target: TargetKind, hovered: bool) {
        self.targets.get_mut(target).set_hovered(hovered);
    }

    #[cfg(test)]
    pub fn set_target_bounds(&mut self, target: TargetKind, bounds: Option<Rect>) {
        self.targets.get_mut(target).set_bounds(bounds);
    }

    pub fn clear(&mut self, target: TargetKind) {
        self.targets.get_mut(target).clear();
    }

    /// Confirmation text for the record's target action.
    pub fn action_message(&self, target: TargetKind, index: usize) -> Option<String> {
        self.records(target).get(index).map(DropRecord::action_message)
    }

    // --- Demo ---

    pub fn start_demo(&mut self, now: DateTime<Utc>) {
        tracing::info!("Starting drag and drop demo");
        self.demo.schedule(&mut self.queue, now.timestamp_millis());
    }

    /// Deliver every demo step due at `now`. Returns how many were accepted.
    pub fn tick(&mut self, now: DateTime<Utc>) -> usize {
        let mut delivered = 0;
        for step in self.queue.drain_due(now.timestamp_millis()) {
            let payload = match step.payload(&self.diagram, now) {
                Ok(payload) => payload,
                Err(e) => {
                    self.diagnostics.emit(e);
                    continue;
                }
            };
            if self
                .targets
                .get_mut(step.target)
                .receive(Delivery::Local(payload), now, &mut self.diagnostics)
                .is_ok()
            {
                delivered += 1;
            }
        }
        delivered
    }

    /// When the next demo step is due, in epoch milliseconds.
    pub fn next_due_ms(&self) -> Option<i64> {
        self.queue.next_due()
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::sample(AppConfig::default())
    }
}
