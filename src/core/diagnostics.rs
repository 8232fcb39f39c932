//! Non-fatal diagnostic channel.
//!
//! Every emitted error is logged through `tracing` and kept in a bounded
//! ring so the UI can mirror it to the browser console and tests can
//! inspect it.

use std::collections::VecDeque;

use crate::core::error::DropError;

/// Default number of diagnostics kept in memory
pub const DEFAULT_DIAGNOSTICS_CAPACITY: usize = 50;

#[derive(Clone, Debug)]
pub struct Diagnostics {
    entries: VecDeque<DropError>,
    capacity: usize,
    /// Total emitted since creation, including evicted entries
    emitted: u64,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_DIAGNOSTICS_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.min(DEFAULT_DIAGNOSTICS_CAPACITY)),
            capacity: capacity.max(1),
            emitted: 0,
        }
    }

    pub fn emit(&mut self, error: DropError) {
        if error.is_routine() {
            tracing::debug!("{}", error);
        } else {
            tracing::warn!("{}", error);
        }

        self.entries.push_back(error);
        self.emitted += 1;

        // Remove oldest if we exceed capacity
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &DropError> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&DropError> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn emitted(&self) -> u64 {
        self.emitted
    }

    /// Entries emitted after the `seen` total, oldest first.
    ///
    /// Used by the client to forward only what it has not logged yet.
    pub fn since(&self, seen: u64) -> impl Iterator<Item = &DropError> {
        let fresh = self.emitted.saturating_sub(seen) as usize;
        let skip = self.entries.len().saturating_sub(fresh);
        self.entries.iter().skip(skip)
    }
}

impl Default for Diagnostics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_records_in_order() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.emit(DropError::NoHit);
        diagnostics.emit(DropError::MalformedPayload("empty".into()));

        assert_eq!(diagnostics.len(), 2);
        assert_eq!(
            diagnostics.last(),
            Some(&DropError::MalformedPayload("empty".into()))
        );
    }

    #[test]
    fn test_capacity_evicts_oldest() {
        let mut diagnostics = Diagnostics::with_capacity(2);
        diagnostics.emit(DropError::NoHit);
        diagnostics.emit(DropError::WrongPayloadKind("a".into()));
        diagnostics.emit(DropError::WrongPayloadKind("b".into()));

        let kept: Vec<_> = diagnostics.entries().cloned().collect();
        assert_eq!(
            kept,
            vec![
                DropError::WrongPayloadKind("a".into()),
                DropError::WrongPayloadKind("b".into()),
            ]
        );
        assert_eq!(diagnostics.emitted(), 3);
    }

    #[test]
    fn test_since_returns_only_fresh_entries() {
        let mut diagnostics = Diagnostics::new();
        diagnostics.emit(DropError::NoHit);
        let seen = diagnostics.emitted();
        diagnostics.emit(DropError::UnsupportedCapability("setDragImage".into()));

        let fresh: Vec<_> = diagnostics.since(seen).cloned().collect();
        assert_eq!(
            fresh,
            vec![DropError::UnsupportedCapability("setDragImage".into())]
        );
        assert_eq!(diagnostics.since(diagnostics.emitted()).count(), 0);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut diagnostics = Diagnostics::with_capacity(0);
        diagnostics.emit(DropError::NoHit);
        diagnostics.emit(DropError::NoHit);

        assert_eq!(diagnostics.len(), 1);
    }
}
