//! Sticky header engine.
//!
//! [`StickyHeader`] owns every piece of per-screen state and wires the data
//! flow:
//!
//! ```text
//! layout report ─▶ MeasurementCollector ─▶ ThresholdCalculator ─┐
//!                                                                ▼
//! scroll offset ─▶ FrameThrottle ─────────────────────────▶ ScrollMachine ─▶ RenderCoordinator
//! ```
//!
//! Every input takes the host's current [`Timestamp`] and first fires any
//! timers that came due before it, so inputs and timers are always processed
//! in time order. Outputs are pulled: [`StickyHeader::frame`] for drawing and
//! [`StickyHeader::drain_events`] for notifications and the idle-snap command.

use super::measure::{MeasurementCollector, ReportOutcome};
use super::scroll::{FrameThrottle, ModeChange, ScrollMachine, ScrollState, ThrottleDecision};
use super::threshold::{ThresholdCalculator, ThresholdInputs};
use super::timer::{FiredTimer, TimerId, TimerKind, TimerQueue};
use crate::model::{
    Dimensions, DisplayMode, HeaderMetrics, LayoutConstants, LayoutReport, MeasureKind,
    Measurement, MeasurementRejection, Placement, Thresholds, Timestamp,
};
use crate::view_state::render::{
    grid_padding_top, FrameGeometry, RenderCoordinator, RenderFrame,
};
use serde::Serialize;
use tracing::{debug, info};

/// Why a lifecycle reset happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "cause", rename_all = "snake_case")]
pub enum ResetReason {
    /// The user picked another category.
    CategoryChanged {
        /// The new category.
        category: String,
    },
    /// Orientation or window size changed.
    DimensionsChanged {
        /// The new dimensions.
        dimensions: Dimensions,
    },
}

/// Notifications produced by the engine, in the order they happened.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EngineEvent {
    /// A measurement locked, from a report or the long fallback.
    MeasurementLocked {
        /// The locked measurement.
        measurement: Measurement,
    },
    /// The short fallback passed with this kind still unreported.
    MeasurementProvisional {
        /// Kind now running on its estimate.
        kind: MeasureKind,
    },
    /// A report was implausible and dropped.
    MeasurementRejected {
        /// Reported kind.
        kind: MeasureKind,
        /// Why it was dropped.
        rejection: MeasurementRejection,
    },
    /// All three heights are locked.
    HeaderPublished {
        /// The published heights.
        metrics: HeaderMetrics,
    },
    /// Switching thresholds moved.
    ThresholdsChanged {
        /// New thresholds.
        thresholds: Thresholds,
    },
    /// The header switched mode.
    ModeChanged {
        /// Previous mode.
        from: DisplayMode,
        /// New mode.
        to: DisplayMode,
        /// Offset that crossed the threshold.
        offset_y: f64,
    },
    /// Measurements were invalidated and timers restarted.
    LifecycleReset {
        /// What triggered it.
        reason: ResetReason,
    },
    /// Idle-snap: the host should scroll the grid to this offset.
    ScrollTo {
        /// Target offset.
        offset_y: f64,
    },
}

impl From<ModeChange> for EngineEvent {
    fn from(change: ModeChange) -> Self {
        EngineEvent::ModeChanged {
            from: change.from,
            to: change.to,
            offset_y: change.offset_y,
        }
    }
}

/// Per-screen sticky header engine.
#[derive(Debug, Clone)]
pub struct StickyHeader {
    constants: LayoutConstants,
    collector: MeasurementCollector,
    calculator: ThresholdCalculator,
    thresholds: Thresholds,
    machine: ScrollMachine,
    throttle: FrameThrottle,
    coordinator: RenderCoordinator,
    timers: TimerQueue,
    fallback_timers: Vec<TimerId>,
    idle_timer: Option<TimerId>,
    flush_timer: Option<TimerId>,
    category: Option<String>,
    dimensions: Option<Dimensions>,
    focused: bool,
    transitioning: bool,
    mounted: bool,
    events: Vec<EngineEvent>,
}

impl StickyHeader {
    /// Mount a screen at `now`. Starts the measurement fallback race.
    pub fn new(constants: LayoutConstants, now: Timestamp) -> Self {
        let timing = constants.timing();
        let collector =
            MeasurementCollector::new(constants.estimates(), constants.max_plausible_px());
        let mut calculator = ThresholdCalculator::new(constants.clone());
        let (thresholds, _) = calculator.compute(threshold_inputs(&collector));

        let mut engine = Self {
            collector,
            calculator,
            thresholds,
            machine: ScrollMachine::new(),
            throttle: FrameThrottle::new(timing.frame_interval),
            coordinator: RenderCoordinator::new(timing.fade_duration),
            timers: TimerQueue::new(),
            fallback_timers: Vec::new(),
            idle_timer: None,
            flush_timer: None,
            category: None,
            dimensions: None,
            focused: true,
            transitioning: false,
            mounted: true,
            events: Vec::new(),
            constants,
        };
        engine.schedule_fallbacks(now);
        debug!(
            at_ms = now.as_millis(),
            base = thresholds.base,
            "Sticky header mounted"
        );
        engine
    }

    // ===== Inputs =====

    /// Feed a layout report from one of the measured views.
    pub fn report_layout(&mut self, report: LayoutReport, now: Timestamp) {
        if !self.mounted {
            return;
        }
        self.fire_due(now);

        // The composite header collapses around a floating action bar, so its
        // height only means something while the bar is embedded.
        if report.kind == MeasureKind::ScrollHeader
            && self.coordinator.placement() == Placement::Floating
        {
            debug!(height = report.height, "Scroll header report ignored while floating");
            return;
        }

        match self.collector.report(report.kind, report.height, now) {
            ReportOutcome::Locked(measurement) => {
                self.events
                    .push(EngineEvent::MeasurementLocked { measurement });
                self.on_measurements_changed();
            }
            ReportOutcome::Rejected(rejection) => {
                self.events.push(EngineEvent::MeasurementRejected {
                    kind: report.kind,
                    rejection,
                });
            }
            ReportOutcome::Ignored => {}
        }
    }

    /// Feed a raw scroll offset.
    pub fn scroll(&mut self, offset_y: f64, now: Timestamp) {
        if !self.mounted {
            return;
        }
        self.fire_due(now);

        if self.is_frozen() {
            debug!(offset_y, "Scroll dropped while frozen");
            return;
        }
        if !offset_y.is_finite() {
            return;
        }

        self.machine.mark_scrolling();
        if let Some(id) = self.idle_timer.take() {
            self.timers.cancel(id);
        }
        let idle_at = now.after(self.constants.timing().idle_snap_delay);
        self.idle_timer = Some(self.timers.schedule(TimerKind::IdleSnap, idle_at));

        match self.throttle.offer(offset_y, now) {
            ThrottleDecision::Emit(offset) => self.evaluate(offset, now),
            ThrottleDecision::Deferred { flush_at } => {
                self.flush_timer = Some(self.timers.schedule(TimerKind::FrameFlush, flush_at));
            }
            ThrottleDecision::Coalesced => {}
        }
    }

    /// Category selection changed. The first signal only records the category.
    pub fn category_changed(&mut self, category: &str, now: Timestamp) {
        if !self.mounted {
            return;
        }
        self.fire_due(now);

        match self.category.as_deref() {
            Some(current) if current == category => {}
            None => self.category = Some(category.to_string()),
            Some(_) => {
                self.category = Some(category.to_string());
                self.reset_lifecycle(
                    ResetReason::CategoryChanged {
                        category: category.to_string(),
                    },
                    now,
                );
            }
        }
    }

    /// Window dimensions changed. The first signal only records them.
    pub fn dimensions_changed(&mut self, dimensions: Dimensions, now: Timestamp) {
        if !self.mounted {
            return;
        }
        self.fire_due(now);

        match self.dimensions {
            Some(current) if current == dimensions => {}
            None => self.dimensions = Some(dimensions),
            Some(_) => {
                self.dimensions = Some(dimensions);
                self.reset_lifecycle(ResetReason::DimensionsChanged { dimensions }, now);
            }
        }
    }

    /// Host screen gained or lost focus.
    pub fn set_focused(&mut self, focused: bool, now: Timestamp) {
        if !self.mounted || self.focused == focused {
            return;
        }
        self.fire_due(now);
        self.focused = focused;
        debug!(focused, "Focus changed");
        if self.is_frozen() {
            self.freeze(now);
        }
    }

    /// A navigation transition started or ended.
    pub fn set_transitioning(&mut self, transitioning: bool, now: Timestamp) {
        if !self.mounted || self.transitioning == transitioning {
            return;
        }
        self.fire_due(now);
        self.transitioning = transitioning;
        debug!(transitioning, "Transition changed");
        if self.is_frozen() {
            self.freeze(now);
        }
    }

    /// Fire every timer due at or before `now`.
    pub fn advance(&mut self, now: Timestamp) {
        if !self.mounted {
            return;
        }
        self.fire_due(now);
    }

    /// Tear down. Cancels all timers; every later input is ignored.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        let cancelled = self.timers.cancel_all();
        self.fallback_timers.clear();
        self.idle_timer = None;
        self.flush_timer = None;
        self.throttle.clear();
        self.events.clear();
        self.mounted = false;
        info!(cancelled, "Sticky header unmounted");
    }

    // ===== Outputs =====

    /// Compose the render frame for `now`.
    pub fn frame(&self, now: Timestamp) -> RenderFrame {
        self.coordinator
            .frame(self.thresholds, self.geometry(), &self.constants, now)
    }

    /// Take all events produced since the last drain.
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.events)
    }

    /// Earliest pending timer, for hosts that sleep between inputs.
    pub fn next_deadline(&self) -> Option<Timestamp> {
        if !self.mounted {
            return None;
        }
        self.timers.next_deadline()
    }

    // ===== Accessors =====

    /// Current display mode.
    pub fn mode(&self) -> DisplayMode {
        self.machine.mode()
    }

    /// Thresholds in force.
    pub fn thresholds(&self) -> Thresholds {
        self.thresholds
    }

    /// Current scroll state.
    pub fn scroll_state(&self) -> ScrollState {
        self.machine.state()
    }

    /// Current measurement for `kind`.
    pub fn measurement(&self, kind: MeasureKind) -> &Measurement {
        self.collector.measurement(kind)
    }

    /// Last published header heights.
    pub fn header_metrics(&self) -> Option<HeaderMetrics> {
        self.collector.published()
    }

    /// Top inset the grid must apply.
    pub fn grid_padding_top(&self) -> f64 {
        grid_padding_top(
            self.mode(),
            self.collector.effective_height(MeasureKind::TopBar),
            &self.constants,
        )
    }

    /// Whether scroll input is currently dropped.
    pub fn is_frozen(&self) -> bool {
        !self.focused || self.transitioning
    }

    /// Whether the screen is still mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// The constants this screen was mounted with.
    pub fn constants(&self) -> &LayoutConstants {
        &self.constants
    }

    /// Last recorded category.
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    // ===== Internals =====

    fn geometry(&self) -> FrameGeometry {
        FrameGeometry {
            top_bar_px: self.collector.effective_height(MeasureKind::TopBar),
            action_bar_px: self.collector.effective_height(MeasureKind::ActionBar),
            offset_y: self.machine.offset_y(),
        }
    }

    fn schedule_fallbacks(&mut self, now: Timestamp) {
        let timing = self.constants.timing();
        self.fallback_timers = vec![
            self.timers
                .schedule(TimerKind::ShortFallback, now.after(timing.short_fallback)),
            self.timers
                .schedule(TimerKind::LongFallback, now.after(timing.long_fallback)),
        ];
    }

    fn fire_due(&mut self, now: Timestamp) {
        while let Some(fired) = self.timers.pop_due(now) {
            self.on_timer(fired);
        }
    }

    fn on_timer(&mut self, fired: FiredTimer) {
        match fired.kind {
            TimerKind::ShortFallback => {
                self.fallback_timers.retain(|id| *id != fired.id);
                for kind in self.collector.apply_short_fallback() {
                    self.events.push(EngineEvent::MeasurementProvisional { kind });
                }
            }
            TimerKind::LongFallback => {
                self.fallback_timers.retain(|id| *id != fired.id);
                let locked = self.collector.apply_long_fallback(fired.due);
                if locked.is_empty() {
                    return;
                }
                for measurement in locked {
                    self.events
                        .push(EngineEvent::MeasurementLocked { measurement });
                }
                self.on_measurements_changed();
            }
            TimerKind::FrameFlush => {
                self.flush_timer = None;
                if let Some(offset) = self.throttle.flush(fired.due) {
                    self.evaluate(offset, fired.due);
                }
            }
            TimerKind::IdleSnap => {
                self.idle_timer = None;
                self.flush_pending(fired.due);
                let target = self
                    .machine
                    .settle(&self.thresholds, self.constants.snap_zone_px());
                if let Some(offset_y) = target.filter(|_| self.constants.spec().snap_enabled) {
                    debug!(
                        from = self.machine.offset_y(),
                        to = offset_y,
                        "Idle snap"
                    );
                    self.events.push(EngineEvent::ScrollTo { offset_y });
                }
            }
        }
    }

    /// Evaluate a held offset now instead of at the frame boundary.
    fn flush_pending(&mut self, now: Timestamp) {
        if let Some(id) = self.flush_timer.take() {
            self.timers.cancel(id);
        }
        if let Some(offset) = self.throttle.flush(now) {
            self.evaluate(offset, now);
        }
    }

    fn evaluate(&mut self, offset: f64, now: Timestamp) {
        if let Some(change) = self.machine.apply_offset(offset, &self.thresholds) {
            let animate = !self.is_frozen();
            self.coordinator.on_mode(change.to, now, animate);
            debug!(
                from = ?change.from,
                to = ?change.to,
                offset_y = change.offset_y,
                "Mode changed"
            );
            self.events.push(change.into());
        }
    }

    /// Recompute thresholds and publish if complete. Mode is left alone: the
    /// next evaluated offset applies the new thresholds.
    fn on_measurements_changed(&mut self) {
        let (thresholds, changed) = self.calculator.compute(threshold_inputs(&self.collector));
        self.thresholds = thresholds;
        if changed {
            debug!(
                base = thresholds.base,
                enter = thresholds.enter,
                exit = thresholds.exit,
                "Thresholds changed"
            );
            self.events
                .push(EngineEvent::ThresholdsChanged { thresholds });
        }

        if let Some(metrics) = self.collector.publish() {
            for id in self.fallback_timers.drain(..) {
                self.timers.cancel(id);
            }
            self.events.push(EngineEvent::HeaderPublished { metrics });
        }
    }

    /// Stop reacting to scroll input. An offset accepted before the freeze is
    /// still evaluated; only later events are dropped.
    fn freeze(&mut self, now: Timestamp) {
        if let Some(id) = self.idle_timer.take() {
            self.timers.cancel(id);
        }
        self.flush_pending(now);
        self.throttle.clear();
        self.machine.interrupt();
        self.coordinator.finish_fade();
    }

    fn reset_lifecycle(&mut self, reason: ResetReason, now: Timestamp) {
        // The held offset belongs to the old lifecycle's thresholds
        self.flush_pending(now);
        let cancelled = self.timers.cancel_all();
        self.fallback_timers.clear();
        self.idle_timer = None;
        self.flush_timer = None;
        self.throttle.clear();
        self.machine.interrupt();
        self.collector.reset();

        info!(?reason, cancelled, "Lifecycle reset");
        self.events.push(EngineEvent::LifecycleReset { reason });
        self.on_measurements_changed();
        self.schedule_fallbacks(now);
    }
}

fn threshold_inputs(collector: &MeasurementCollector) -> ThresholdInputs {
    ThresholdInputs {
        top_bar_px: collector.effective_height(MeasureKind::TopBar),
        action_bar_px: collector.effective_height(MeasureKind::ActionBar),
        scroll_header_px: collector.locked_height(MeasureKind::ScrollHeader),
    }
}

#[cfg(test)]
#[path = "engine_tests.rs"]
mod tests;
