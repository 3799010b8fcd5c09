//! Deadline-ordered timer queue with cancellable handles.
//!
//! Entries are keyed by `(due, sequence)`: two checks due at the same instant
//! fire in the order they were scheduled. Cancelling removes the entry, so a
//! cancelled handle can never come back out of [`TimerQueue::pop_due`].

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDateTime;

/// Handle to a scheduled entry. Only meaningful for the queue that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

#[derive(Debug)]
pub struct TimerQueue<T> {
    entries: BTreeMap<(NaiveDateTime, u64), T>,
    /// Sequence -> due time, for O(log n) cancellation
    due_by_seq: HashMap<u64, NaiveDateTime>,
    next_seq: u64,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
            due_by_seq: HashMap::new(),
            next_seq: 0,
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, due: NaiveDateTime, payload: T) -> TimerHandle {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.insert((due, seq), payload);
        self.due_by_seq.insert(seq, due);
        TimerHandle(seq)
    }

    /// Remove a pending entry. Returns `None` if it already fired or was cancelled.
    pub fn cancel(&mut self, handle: TimerHandle) -> Option<T> {
        let due = self.due_by_seq.remove(&handle.0)?;
        self.entries.remove(&(due, handle.0))
    }

    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.due_by_seq.contains_key(&handle.0)
    }

    /// Pop the earliest entry whose due time is at or before `now`.
    pub fn pop_due(&mut self, now: NaiveDateTime) -> Option<(TimerHandle, T)> {
        let (&(due, seq), _) = self.entries.first_key_value()?;
        if due > now {
            return None;
        }
        let payload = self.entries.remove(&(due, seq))?;
        self.due_by_seq.remove(&seq);
        Some((TimerHandle(seq), payload))
    }

    /// Earliest pending due time
    pub fn next_due(&self) -> Option<NaiveDateTime> {
        self.entries.keys().next().map(|(due, _)| *due)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.due_by_seq.clear();
    }
}
