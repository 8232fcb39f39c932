//! Core domain model and interaction logic for the ER drag and drop page
//!
//! Nothing in here touches the DOM; the `ui` module adapts browser events
//! onto these types.

pub mod config;
pub mod controller;
mod demo;
mod diagnostics;
mod diagram;
mod error;
pub mod render;
mod schedule;
mod targets;
#[cfg(test)]
mod tests;
pub mod transfer;
mod workspace;

pub use config::AppConfig;
pub use controller::{
    DragAffordance, DragMode, Gesture, GestureId, InteractionController, InteractionState,
    PointerSample, Resolution,
};
pub use demo::{DEMO_SCRIPT, DemoSequencer, DemoStep};
pub use diagnostics::Diagnostics;
pub use diagram::*;
pub use error::{DropError, DropResult};
pub use schedule::DeferredQueue;
pub use targets::{Delivery, DropRecord, DropTarget, DropTargets, TargetKind, TargetLocator};
pub use transfer::{
    DragImage, DropEffect, MemoryTransfer, TransferChannel, TransferData, TransferPayload,
    TransferSource,
};
pub use workspace::Workspace;
