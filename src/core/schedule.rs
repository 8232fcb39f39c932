//! Deferred actions for the single-threaded UI loop.
//!
//! Items are keyed by their due time in milliseconds; the host asks for
//! [`DeferredQueue::next_due`], sleeps until then and drains what is due.

#[derive(Clone, Debug)]
struct Scheduled<T> {
    due_ms: i64,
    seq: u64,
    item: T,
}

#[derive(Clone, Debug)]
pub struct DeferredQueue<T> {
    items: Vec<Scheduled<T>>,
    next_seq: u64,
}

impl<T> DeferredQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            next_seq: 0,
        }
    }

    pub fn schedule(&mut self, due_ms: i64, item: T) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.items.push(Scheduled { due_ms, seq, item });
    }

    /// Remove and return every item due at or before `now_ms`, in
    /// due-time order; ties keep scheduling order.
    pub fn drain_due(&mut self, now_ms: i64) -> Vec<T> {
        let (mut due, pending): (Vec<_>, Vec<_>) = std::mem::take(&mut self.items)
            .into_iter()
            .partition(|scheduled| scheduled.due_ms <= now_ms);
        self.items = pending;

        due.sort_by_key(|scheduled| (scheduled.due_ms, scheduled.seq));
        due.into_iter().map(|scheduled| scheduled.item).collect()
    }

    pub fn next_due(&self) -> Option<i64> {
        self.items.iter().map(|scheduled| scheduled.due_ms).min()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<T> Default for DeferredQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
