//! Virtual-time timer queue.
//!
//! Every suspension point of a screen lives here: the two measurement
//! fallback deadlines, the idle-snap timer and the frame-throttle flush.
//! Nothing fires on its own; the host calls [`TimerQueue::pop_due`] (through
//! the engine's `advance`) with the current time.
//!
//! Cancellation is by [`TimerId`]. A cancelled id never fires, and ids are
//! never reused, so a stale id held after [`TimerQueue::cancel_all`] cannot
//! cancel a newer timer by accident.

use crate::model::Timestamp;

/// Handle for a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// What a timer does when it fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Unlocked measurements become provisional.
    ShortFallback,
    /// Unlocked measurements lock to their estimates.
    LongFallback,
    /// The user stopped scrolling; consider idle-snap.
    IdleSnap,
    /// Deliver the coalesced scroll offset for this frame.
    FrameFlush,
}

/// A timer that came due.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FiredTimer {
    /// Id it was scheduled under.
    pub id: TimerId,
    /// What to do.
    pub kind: TimerKind,
    /// When it was due. Handlers use this, not the host's `now`.
    pub due: Timestamp,
}

#[derive(Debug, Clone)]
struct Entry {
    id: TimerId,
    kind: TimerKind,
    due: Timestamp,
}

/// Pending timers for one screen.
#[derive(Debug, Clone, Default)]
pub struct TimerQueue {
    entries: Vec<Entry>,
    next_id: u64,
}

impl TimerQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` to fire at `due`.
    pub fn schedule(&mut self, kind: TimerKind, due: Timestamp) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.entries.push(Entry { id, kind, due });
        id
    }

    /// Cancel a timer. Returns `false` if it already fired or was cancelled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.id != id);
        self.entries.len() != before
    }

    /// Cancel every pending timer. Returns how many were dropped.
    pub fn cancel_all(&mut self) -> usize {
        let dropped = self.entries.len();
        self.entries.clear();
        dropped
    }

    /// Whether `id` is still pending.
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.id == id)
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Earliest pending due time.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        self.entries.iter().map(|e| e.due).min()
    }

    /// Remove and return the earliest timer due at or before `now`.
    ///
    /// Timers with equal due times fire in scheduling order.
    pub fn pop_due(&mut self, now: Timestamp) -> Option<FiredTimer> {
        let position = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due <= now)
            .min_by_key(|(_, e)| (e.due, e.id))
            .map(|(i, _)| i)?;

        let entry = self.entries.swap_remove(position);
        Some(FiredTimer {
            id: entry.id,
            kind: entry.kind,
            due: entry.due,
        })
    }
}
