//! Errors raised while moving an entity from the diagram into a drop target.
//!
//! None of these are fatal: every caller recovers locally and the error is
//! recorded in [`Diagnostics`](crate::core::Diagnostics).

use crate::core::controller::GestureId;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DropError {
    /// Press or release did not land on an entity or a target
    #[error("No entity or drop target under the pointer")]
    NoHit,

    /// An optional native enhancement is not available
    #[error("Unsupported capability: {0}")]
    UnsupportedCapability(String),

    /// Transfer data is absent or cannot be parsed
    #[error("Malformed transfer payload: {0}")]
    MalformedPayload(String),

    /// Transfer data parsed but is not an entity transfer
    #[error("Unrecognized payload kind: {0}")]
    WrongPayloadKind(String),

    /// The gesture has already delivered its payload once
    #[error("Gesture {0} already delivered its payload")]
    DuplicateDelivery(GestureId),
}

impl DropError {
    /// Misses are routine; everything else deserves a warning.
    pub fn is_routine(&self) -> bool {
        matches!(self, DropError::NoHit)
    }
}

pub type DropResult<T> = Result<T, DropError>;
