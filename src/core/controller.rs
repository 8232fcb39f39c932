//! Pointer interaction state machine.
//!
//! ```text
//! Idle ──press on entity──▶ Pressed ──move / native start──▶ Dragging
//!   ▲                          │                                │
//!   └──── release / drag end / abandon (resolution) ◀───────────┘
//! ```
//!
//! The controller knows nothing about the DOM. The host feeds it pointer
//! samples and native drag notifications and acts on what comes back.
//! Every gesture may deliver its payload at most once, whichever of the
//! native or fallback paths gets there first.

use chrono::{DateTime, Utc};
use derive_more::Display;

use crate::core::diagnostics::Diagnostics;
use crate::core::diagram::{Color, Diagram, EntityId, Point};
use crate::core::error::{DropError, DropResult};
use crate::core::targets::{TargetKind, TargetLocator};
use crate::core::transfer::{DragImage, TransferChannel, TransferPayload, write_transfer};

/// Affordance position relative to the pointer
pub const AFFORDANCE_OFFSET: Point = Point::new(60.0, 20.0);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Display)]
#[display("#{_0}")]
pub struct GestureId(pub u64);

/// One pointer sample in both coordinate spaces
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PointerSample {
    /// Relative to the drawing surface, used for hit-testing
    pub local: Point,
    /// Relative to the viewport, used for the affordance and drop targets
    pub client: Point,
}

impl PointerSample {
    pub fn new(local: Point, client: Point) -> Self {
        Self { local, client }
    }

    /// Same point in both spaces
    pub fn at(x: f64, y: f64) -> Self {
        let point = Point::new(x, y);
        Self::new(point, point)
    }
}

/// Floating label that follows the pointer during a drag
#[derive(Clone, Debug, PartialEq)]
pub struct DragAffordance {
    pub label: String,
    pub color: Color,
    /// Top-left corner in client space
    pub position: Point,
    pub visible: bool,
}

impl DragAffordance {
    fn new(name: &str, color: Color, client: Point) -> Self {
        Self {
            label: format!("📊 {}", name),
            color,
            position: Self::anchor(client),
            visible: false,
        }
    }

    fn anchor(client: Point) -> Point {
        client.offset(-AFFORDANCE_OFFSET.x, -AFFORDANCE_OFFSET.y)
    }

    fn follow(&mut self, client: Point) {
        self.position = Self::anchor(client);
        self.visible = true;
    }
}

/// Data owned by one press-to-resolution interaction
#[derive(Clone, Debug, PartialEq)]
pub struct Gesture {
    pub id: GestureId,
    pub payload: TransferPayload,
    pub affordance: DragAffordance,
    pub delivered: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    /// The host's native drag protocol is carrying the payload
    Native,
    /// Pointer tracking only; release delivers by hit-testing targets
    Fallback,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum InteractionState {
    #[default]
    Idle,
    Pressed(Gesture),
    Dragging { gesture: Gesture, mode: DragMode },
}

impl InteractionState {
    fn gesture(&self) -> Option<&Gesture> {
        match self {
            InteractionState::Idle => None,
            InteractionState::Pressed(gesture) | InteractionState::Dragging { gesture, .. } => {
                Some(gesture)
            }
        }
    }

    fn gesture_mut(&mut self) -> Option<&mut Gesture> {
        match self {
            InteractionState::Idle => None,
            InteractionState::Pressed(gesture) | InteractionState::Dragging { gesture, .. } => {
                Some(gesture)
            }
        }
    }
}

/// How a gesture ended
#[derive(Clone, Debug, PartialEq)]
pub enum Resolution {
    /// Nothing was in progress
    Inactive,
    /// Fallback path found a target; the caller must hand the payload over
    Deliver {
        gesture: GestureId,
        target: TargetKind,
        payload: TransferPayload,
    },
    /// The native channel owns delivery, or already delivered
    Native(GestureId),
    /// Released outside every target
    Missed(GestureId),
    /// Gesture dropped without a release
    Abandoned(GestureId),
}

#[derive(Clone, Debug, Default)]
pub struct InteractionController {
    state: InteractionState,
    hovered: Option<EntityId>,
    next_gesture: u64,
    /// Last resolved gesture that delivered, kept to catch late native drops
    last_delivered: Option<(GestureId, TransferPayload)>,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> &InteractionState {
        &self.state
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, InteractionState::Idle)
    }

    pub fn hovered(&self) -> Option<EntityId> {
        self.hovered
    }

    pub fn gesture(&self) -> Option<&Gesture> {
        self.state.gesture()
    }

    pub fn affordance(&self) -> Option<&DragAffordance> {
        self.state.gesture().map(|gesture| &gesture.affordance)
    }

    pub fn mode(&self) -> Option<DragMode> {
        match self.state {
            InteractionState::Dragging { mode, .. } => Some(mode),
            _ => None,
        }
    }

    /// Update hover highlighting. Returns whether it changed.
    pub fn hover(&mut self, diagram: &Diagram, local: Point) -> bool {
        let hovered = diagram.entity_at(local).map(|entity| entity.id);
        let changed = hovered != self.hovered;
        self.hovered = hovered;
        changed
    }

    pub fn clear_hover(&mut self) {
        self.hovered = None;
    }

    /// Begin an interaction on the entity under the pointer.
    ///
    /// Any gesture still open is abandoned first. A press that misses every
    /// entity starts nothing.
    pub fn press(
        &mut self,
        diagram: &Diagram,
        sample: PointerSample,
        now: DateTime<Utc>,
        diagnostics: &mut Diagnostics,
    ) -> DropResult<&TransferPayload> {
        if !self.is_idle() {
            self.abandon();
        }

        let Some(entity) = diagram.entity_at(sample.local) else {
            diagnostics.emit(DropError::NoHit);
            return Err(DropError::NoHit);
        };

        tracing::debug!("Starting drag for entity: {}", entity.name);

        self.next_gesture += 1;
        let gesture = Gesture {
            id: GestureId(self.next_gesture),
            payload: TransferPayload::from_entity(entity, now),
            affordance: DragAffordance::new(&entity.name, entity.color.clone(), sample.client),
            delivered: false,
        };
        self.state = InteractionState::Pressed(gesture);

        self.state
            .gesture()
            .map(|gesture| &gesture.payload)
            .ok_or(DropError::NoHit)
    }

    /// Track the pointer. Movement after a press without a native drag
    /// start switches to the fallback drag.
    pub fn pointer_move(&mut self, client: Point) {
        match std::mem::take(&mut self.state) {
            InteractionState::Pressed(mut gesture) => {
                gesture.affordance.follow(client);
                self.state = InteractionState::Dragging {
                    gesture,
                    mode: DragMode::Fallback,
                };
            }
            InteractionState::Dragging {
                mut gesture,
                mode: DragMode::Fallback,
            } => {
                gesture.affordance.follow(client);
                self.state = InteractionState::Dragging {
                    gesture,
                    mode: DragMode::Fallback,
                };
            }
            other => self.state = other,
        }
    }

    /// The host's native drag started on the affordance.
    ///
    /// Writes the payload into `channel`. Missing optional capabilities are
    /// reported and skipped. If the channel refuses data the gesture stays
    /// on the fallback path: the host must then cancel its native drag so
    /// pointer events keep flowing to the release.
    pub fn native_drag_start(
        &mut self,
        channel: &mut dyn TransferChannel,
        diagnostics: &mut Diagnostics,
    ) -> DropResult<DragMode> {
        let mut gesture = match std::mem::take(&mut self.state) {
            InteractionState::Pressed(gesture)
            | InteractionState::Dragging {
                gesture,
                mode: DragMode::Fallback,
            } => gesture,
            other => {
                self.state = other;
                diagnostics.emit(DropError::NoHit);
                return Err(DropError::NoHit);
            }
        };

        gesture.affordance.visible = true;

        let mode = match write_transfer(&gesture.payload, channel) {
            Ok(()) => {
                let image = DragImage {
                    label: gesture.affordance.label.clone(),
                    color: gesture.affordance.color.clone(),
                    offset: AFFORDANCE_OFFSET,
                };
                if let Err(e) = channel.set_drag_image(&image) {
                    diagnostics.emit(e);
                }
                DragMode::Native
            }
            Err(e) => {
                diagnostics.emit(e);
                DragMode::Fallback
            }
        };

        self.state = InteractionState::Dragging { gesture, mode };
        Ok(mode)
    }

    /// Claim the single delivery allowed for the gesture that produced
    /// `payload`.
    ///
    /// Payloads that belong to no known gesture (a drag from another page)
    /// are always allowed.
    pub fn claim_delivery(&mut self, payload: &TransferPayload) -> DropResult<()> {
        if let Some(gesture) = self.state.gesture_mut() {
            if gesture.payload == *payload {
                if gesture.delivered {
                    return Err(DropError::DuplicateDelivery(gesture.id));
                }
                gesture.delivered = true;
                return Ok(());
            }
        }

        match &self.last_delivered {
            Some((id, last)) if last == payload => Err(DropError::DuplicateDelivery(*id)),
            _ => Ok(()),
        }
    }

    fn finish(&mut self, gesture: &Gesture) {
        if gesture.delivered {
            self.last_delivered = Some((gesture.id, gesture.payload.clone()));
        }
    }

    /// Pointer released. On the fallback path, locate the target under the
    /// pointer; the caller performs the delivery.
    pub fn release(&mut self, client: Point, locator: &dyn TargetLocator) -> Resolution {
        match std::mem::take(&mut self.state) {
            InteractionState::Idle => Resolution::Inactive,
            InteractionState::Pressed(mut gesture)
            | InteractionState::Dragging {
                mut gesture,
                mode: DragMode::Fallback,
            } if !gesture.delivered => match locator.target_at(client) {
                Some(target) => {
                    gesture.delivered = true;
                    self.finish(&gesture);
                    Resolution::Deliver {
                        gesture: gesture.id,
                        target,
                        payload: gesture.payload,
                    }
                }
                None => Resolution::Missed(gesture.id),
            },
            InteractionState::Pressed(gesture) | InteractionState::Dragging { gesture, .. } => {
                self.finish(&gesture);
                Resolution::Native(gesture.id)
            }
        }
    }

    /// Native drag ended. Delivery, if any, happened on the drop side.
    pub fn native_drag_end(&mut self) -> Resolution {
        match std::mem::take(&mut self.state) {
            InteractionState::Idle => Resolution::Inactive,
            InteractionState::Pressed(gesture) | InteractionState::Dragging { gesture, .. } => {
                self.finish(&gesture);
                Resolution::Native(gesture.id)
            }
        }
    }

    /// Drop the open gesture without delivering.
    pub fn abandon(&mut self) -> Resolution {
        match std::mem::take(&mut self.state) {
            InteractionState::Idle => Resolution::Inactive,
            InteractionState::Pressed(gesture) | InteractionState::Dragging { gesture, .. } => {
                tracing::debug!("Abandoned gesture {}", gesture.id);
                self.finish(&gesture);
                Resolution::Abandoned(gesture.id)
            }
        }
    }
}
