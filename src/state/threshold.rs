//! Threshold calculator.
//!
//! Computes the scroll offsets at which the header switches mode. Safe to call
//! before anything has reported: the inputs fall back to estimates.

use crate::model::{LayoutConstants, Thresholds};

/// Measured or estimated heights feeding the calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdInputs {
    /// Top bar height (safe area + search bar).
    pub top_bar_px: f64,
    /// Action bar height.
    pub action_bar_px: f64,
    /// Composite scroll header height, only once it is locked.
    pub scroll_header_px: Option<f64>,
}

/// Height of header content above the embedded action bar.
///
/// Derived from the scroll header when known, otherwise from the design
/// constants for the category rail and the rail/action gap.
pub fn pre_action_height(inputs: &ThresholdInputs, constants: &LayoutConstants) -> f64 {
    match inputs.scroll_header_px {
        Some(header) => (header - inputs.action_bar_px).max(0.0),
        None => {
            let spec = constants.spec();
            spec.category_rail_px + spec.rail_action_gap_px
        }
    }
}

/// Compute the switching thresholds.
///
/// ```text
/// sticky = top + gap + action
/// base   = max(top, min(top + pre_action, sticky - reveal_offset))
/// enter  = base + hysteresis
/// exit   = base - hysteresis
/// ```
pub fn compute_thresholds(inputs: &ThresholdInputs, constants: &LayoutConstants) -> Thresholds {
    let top = inputs.top_bar_px;
    let sticky_height = top + constants.gap_px() + inputs.action_bar_px;
    let pre_action = pre_action_height(inputs, constants);

    let base = top.max((top + pre_action).min(sticky_height - constants.reveal_offset_px()));
    Thresholds::around(base, constants.hysteresis_px())
}

/// Memoizing wrapper around [`compute_thresholds`].
#[derive(Debug, Clone)]
pub struct ThresholdCalculator {
    constants: LayoutConstants,
    last: Option<(ThresholdInputs, Thresholds)>,
}

impl ThresholdCalculator {
    /// Calculator bound to one screen's constants.
    pub fn new(constants: LayoutConstants) -> Self {
        Self {
            constants,
            last: None,
        }
    }

    /// Thresholds for `inputs`, plus whether they differ from the previous
    /// result. The first call always reports a change.
    pub fn compute(&mut self, inputs: ThresholdInputs) -> (Thresholds, bool) {
        if let Some((prev_inputs, prev)) = self.last {
            if prev_inputs == inputs {
                return (prev, false);
            }
            let next = compute_thresholds(&inputs, &self.constants);
            self.last = Some((inputs, next));
            return (next, next != prev);
        }

        let next = compute_thresholds(&inputs, &self.constants);
        self.last = Some((inputs, next));
        (next, true)
    }

    /// Last computed thresholds.
    pub fn current(&self) -> Option<Thresholds> {
        self.last.map(|(_, t)| t)
    }
}
