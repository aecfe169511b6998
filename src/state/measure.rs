//! Measurement collector.
//!
//! Receives layout reports for the three measured views in any order and
//! decides when each height is final. A kind locks on its first plausible
//! report; later reports are ignored until [`MeasurementCollector::reset`].
//!
//! Views may never report (conditionally unmounted, slow layout pass), so the
//! engine races every lifecycle against two fallback deadlines:
//!
//! - short deadline: unlocked kinds become [`MeasureSource::Provisional`]
//! - long deadline: unlocked kinds lock to their estimate
//!
//! Locking early with an estimate keeps the sticky logic moving, at the cost
//! of a slightly wrong height until the next lifecycle reset.

use crate::model::{
    validate_height, FallbackEstimates, HeaderMetrics, MeasureKind, MeasureSource, Measurement,
    MeasurementRejection, Timestamp,
};
use tracing::{debug, warn};

/// Result of feeding one layout report to the collector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReportOutcome {
    /// The report locked this kind.
    Locked(Measurement),
    /// The kind was already locked; the report changed nothing.
    Ignored,
    /// The height was implausible; the kind stays unlocked.
    Rejected(MeasurementRejection),
}

/// Per-screen measurement state.
#[derive(Debug, Clone)]
pub struct MeasurementCollector {
    estimates: FallbackEstimates,
    ceiling: f64,
    slots: [Measurement; 3],
    published: Option<HeaderMetrics>,
}

impl MeasurementCollector {
    /// Fresh collector with every kind unlocked at its estimate.
    pub fn new(estimates: FallbackEstimates, ceiling: f64) -> Self {
        Self {
            estimates,
            ceiling,
            slots: Self::unlocked_slots(&estimates),
            published: None,
        }
    }

    fn unlocked_slots(estimates: &FallbackEstimates) -> [Measurement; 3] {
        MeasureKind::ALL.map(|kind| Measurement::unlocked(kind, estimate_for(estimates, kind)))
    }

    /// Current measurement for `kind`.
    pub fn measurement(&self, kind: MeasureKind) -> &Measurement {
        &self.slots[kind.index()]
    }

    /// All three measurements in slot order.
    pub fn measurements(&self) -> &[Measurement; 3] {
        &self.slots
    }

    /// Locked value, or the estimate while unlocked. Always finite.
    pub fn effective_height(&self, kind: MeasureKind) -> f64 {
        self.slots[kind.index()].height_px
    }

    /// Locked value only.
    pub fn locked_height(&self, kind: MeasureKind) -> Option<f64> {
        let m = &self.slots[kind.index()];
        m.is_locked().then_some(m.height_px)
    }

    /// Whether every kind is locked.
    pub fn all_locked(&self) -> bool {
        self.slots.iter().all(Measurement::is_locked)
    }

    /// Kinds that are still unlocked.
    pub fn unlocked_kinds(&self) -> Vec<MeasureKind> {
        self.slots
            .iter()
            .filter(|m| !m.is_locked())
            .map(|m| m.kind)
            .collect()
    }

    /// Feed one layout report.
    pub fn report(&mut self, kind: MeasureKind, height: f64, now: Timestamp) -> ReportOutcome {
        let slot = &mut self.slots[kind.index()];
        if slot.is_locked() {
            return ReportOutcome::Ignored;
        }

        match validate_height(height, self.ceiling) {
            Ok(height_px) => {
                *slot = Measurement {
                    kind,
                    height_px,
                    locked_at: Some(now),
                    source: MeasureSource::Measured,
                };
                debug!(%kind, height_px, at_ms = now.as_millis(), "Measurement locked");
                ReportOutcome::Locked(*slot)
            }
            Err(rejection) => {
                warn!(%kind, height, %rejection, "Measurement rejected");
                ReportOutcome::Rejected(rejection)
            }
        }
    }

    /// Short deadline: mark every `Default` kind provisional.
    ///
    /// Returns the kinds that changed.
    pub fn apply_short_fallback(&mut self) -> Vec<MeasureKind> {
        let mut changed = Vec::new();
        for slot in self
            .slots
            .iter_mut()
            .filter(|m| m.source == MeasureSource::Default)
        {
            slot.source = MeasureSource::Provisional;
            changed.push(slot.kind);
        }
        if !changed.is_empty() {
            debug!(kinds = ?changed, "Measurements provisional");
        }
        changed
    }

    /// Long deadline: lock every unlocked kind to its estimate.
    ///
    /// Returns the measurements that locked.
    pub fn apply_long_fallback(&mut self, now: Timestamp) -> Vec<Measurement> {
        let estimates = self.estimates;
        let mut locked = Vec::new();
        for slot in self.slots.iter_mut().filter(|m| !m.is_locked()) {
            *slot = Measurement {
                kind: slot.kind,
                height_px: estimate_for(&estimates, slot.kind),
                locked_at: Some(now),
                source: MeasureSource::Estimated,
            };
            debug!(kind = %slot.kind, height_px = slot.height_px, "Fallback estimate locked");
            locked.push(*slot);
        }
        locked
    }

    /// Publish the header heights if every kind is locked and the value differs
    /// from the last publication.
    pub fn publish(&mut self) -> Option<HeaderMetrics> {
        if !self.all_locked() {
            return None;
        }
        let metrics = HeaderMetrics {
            top_bar_px: self.effective_height(MeasureKind::TopBar),
            action_bar_px: self.effective_height(MeasureKind::ActionBar),
            scroll_header_px: self.effective_height(MeasureKind::ScrollHeader),
        };
        if self.published == Some(metrics) {
            return None;
        }
        self.published = Some(metrics);
        Some(metrics)
    }

    /// Last published header heights.
    pub fn published(&self) -> Option<HeaderMetrics> {
        self.published
    }

    /// Unlock everything back to estimates and forget the last publication.
    pub fn reset(&mut self) {
        self.slots = Self::unlocked_slots(&self.estimates);
        self.published = None;
    }
}

fn estimate_for(estimates: &FallbackEstimates, kind: MeasureKind) -> f64 {
    match kind {
        MeasureKind::TopBar => estimates.top_bar_px,
        MeasureKind::ActionBar => estimates.action_bar_px,
        MeasureKind::ScrollHeader => estimates.scroll_header_px,
    }
}

#[cfg(test)]
#[path = "measure_tests.rs"]
mod tests;
