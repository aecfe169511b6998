//! Scroll state machine.
//!
//! Mode is a function of the last threshold crossing, not of the current
//! offset: inside the hysteresis band the previous mode holds. This keeps the
//! action bar from flickering when the user parks the grid near the boundary.
//!
//! Also here: the idle-snap decision and the per-frame scroll throttle. The
//! timers driving both live in the engine's [`super::timer::TimerQueue`].

use crate::model::{DisplayMode, Thresholds, Timestamp};
use std::time::Duration;

/// Offsets closer than this to the threshold count as already aligned.
pub const SNAP_EPSILON_PX: f64 = 0.5;

/// Live scroll state for one scroll session.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScrollState {
    /// Last evaluated vertical offset.
    pub offset_y: f64,
    /// Current display mode.
    pub mode: DisplayMode,
    /// True from a raw scroll event until the idle timer settles it.
    pub is_user_scrolling: bool,
}

/// A mode transition produced by one offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModeChange {
    /// Mode before the offset.
    pub from: DisplayMode,
    /// Mode after the offset.
    pub to: DisplayMode,
    /// The offset that crossed the threshold.
    pub offset_y: f64,
}

/// Hysteresis transition rule.
///
/// - Resting → Sticky when `offset >= enter`
/// - Sticky → Resting when `offset <= exit`
/// - anything else keeps `current`
pub fn next_mode(current: DisplayMode, offset: f64, thresholds: &Thresholds) -> DisplayMode {
    match current {
        DisplayMode::Resting if offset >= thresholds.enter => DisplayMode::Sticky,
        DisplayMode::Sticky if offset <= thresholds.exit => DisplayMode::Resting,
        unchanged => unchanged,
    }
}

/// Idle-snap target for a resting offset, if any.
///
/// Snaps only when the offset sits within `snap_zone` of `base` and is not
/// already on it.
pub fn snap_target(offset: f64, thresholds: &Thresholds, snap_zone: f64) -> Option<f64> {
    let distance = thresholds.distance_to_base(offset);
    (distance <= snap_zone && distance > SNAP_EPSILON_PX).then_some(thresholds.base)
}

/// Owns the [`ScrollState`] and applies offsets to it.
#[derive(Debug, Clone, Default)]
pub struct ScrollMachine {
    state: ScrollState,
}

impl ScrollMachine {
    /// Resting at offset zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state.
    pub fn state(&self) -> ScrollState {
        self.state
    }

    /// Current mode.
    pub fn mode(&self) -> DisplayMode {
        self.state.mode
    }

    /// Last evaluated offset.
    pub fn offset_y(&self) -> f64 {
        self.state.offset_y
    }

    /// Record that a raw scroll event arrived.
    pub fn mark_scrolling(&mut self) {
        self.state.is_user_scrolling = true;
    }

    /// Evaluate one offset. Returns the transition, if any.
    ///
    /// Non-finite offsets are ignored.
    pub fn apply_offset(&mut self, offset: f64, thresholds: &Thresholds) -> Option<ModeChange> {
        if !offset.is_finite() {
            return None;
        }
        self.state.offset_y = offset;

        let from = self.state.mode;
        let to = next_mode(from, offset, thresholds);
        if from == to {
            return None;
        }
        self.state.mode = to;
        Some(ModeChange {
            from,
            to,
            offset_y: offset,
        })
    }

    /// The user stopped scrolling. Returns the idle-snap target, if any.
    pub fn settle(&mut self, thresholds: &Thresholds, snap_zone: f64) -> Option<f64> {
        let was_scrolling = std::mem::replace(&mut self.state.is_user_scrolling, false);
        if !was_scrolling {
            return None;
        }
        snap_target(self.state.offset_y, thresholds, snap_zone)
    }

    /// Drop the in-progress gesture without snapping.
    pub fn interrupt(&mut self) {
        self.state.is_user_scrolling = false;
    }
}

/// What [`FrameThrottle::offer`] did with an offset.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ThrottleDecision {
    /// Evaluate this offset now.
    Emit(f64),
    /// Held; schedule a flush at `flush_at`.
    Deferred {
        /// When the held offset should be evaluated.
        flush_at: Timestamp,
    },
    /// Replaced an offset already waiting for a scheduled flush.
    Coalesced,
}

/// Limits offset evaluation to one per frame.
///
/// The first offset after a quiet frame goes straight through. Offsets arriving
/// inside the same frame are held, and only the latest one is evaluated when
/// the frame ends.
#[derive(Debug, Clone)]
pub struct FrameThrottle {
    interval: Duration,
    last_emit: Option<Timestamp>,
    pending: Option<f64>,
}

impl FrameThrottle {
    /// Throttle with the given frame interval. Zero disables throttling.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_emit: None,
            pending: None,
        }
    }

    /// Offer a raw offset.
    pub fn offer(&mut self, offset: f64, now: Timestamp) -> ThrottleDecision {
        if self.interval.is_zero() {
            return ThrottleDecision::Emit(offset);
        }
        if self.pending.is_some() {
            self.pending = Some(offset);
            return ThrottleDecision::Coalesced;
        }

        match self.last_emit {
            Some(last) if now < last.after(self.interval) => {
                self.pending = Some(offset);
                ThrottleDecision::Deferred {
                    flush_at: last.after(self.interval),
                }
            }
            _ => {
                self.last_emit = Some(now);
                ThrottleDecision::Emit(offset)
            }
        }
    }

    /// End of frame: hand back the held offset, if any.
    pub fn flush(&mut self, now: Timestamp) -> Option<f64> {
        let offset = self.pending.take()?;
        self.last_emit = Some(now);
        Some(offset)
    }

    /// Whether an offset is waiting for a flush.
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Forget the held offset and the frame clock.
    pub fn clear(&mut self) {
        self.pending = None;
        self.last_emit = None;
    }
}

#[cfg(test)]
#[path = "scroll_tests.rs"]
mod tests;
