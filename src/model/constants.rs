//! Fixed layout configuration for one screen.
//!
//! [`LayoutSpec`] is the raw, freely editable description. [`LayoutConstants`]
//! is the validated, read-only form the engine is built from; once a screen
//! mounts its constants never change.

use super::error::ConstantsError;
use super::measurement::validate_height;
use std::time::Duration;

/// Fallback heights used while a view has not reported.
///
/// These are configuration, not derived truth: the default values are sums of
/// the design constants, but nothing checks them against real layouts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FallbackEstimates {
    /// Estimated top bar height.
    pub top_bar_px: f64,
    /// Estimated action bar height.
    pub action_bar_px: f64,
    /// Estimated scroll header height.
    pub scroll_header_px: f64,
}

impl FallbackEstimates {
    /// Estimates computed from the design constants of `spec`.
    ///
    /// - top bar: safe-area inset + search bar
    /// - action bar: action bar
    /// - scroll header: category rail + action bar + rail/action gap
    pub fn derived_from(spec: &LayoutSpec) -> Self {
        Self {
            top_bar_px: spec.safe_area_top_px + spec.search_bar_px,
            action_bar_px: spec.action_bar_px,
            scroll_header_px: spec.category_rail_px + spec.action_bar_px + spec.rail_action_gap_px,
        }
    }
}

/// Timer delays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timing {
    /// Unlocked measurements turn provisional after this delay.
    pub short_fallback: Duration,
    /// Unlocked measurements lock to their estimate after this delay.
    pub long_fallback: Duration,
    /// Quiet period after the last scroll event before idle-snap is considered.
    pub idle_snap_delay: Duration,
    /// Minimum spacing between evaluated scroll offsets. Zero disables throttling.
    pub frame_interval: Duration,
    /// Action bar cross-fade duration. Zero switches instantly.
    pub fade_duration: Duration,
}

impl Default for Timing {
    fn default() -> Self {
        Self {
            short_fallback: Duration::from_millis(500),
            long_fallback: Duration::from_millis(1000),
            idle_snap_delay: Duration::from_millis(150),
            frame_interval: Duration::from_millis(16),
            fade_duration: Duration::from_millis(120),
        }
    }
}

/// Raw layout description. Validate with [`LayoutConstants::new`].
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutSpec {
    /// Safe-area inset above the search bar.
    pub safe_area_top_px: f64,
    /// Search bar height.
    pub search_bar_px: f64,
    /// Gap between the top bar and the action bar lane.
    pub gap_px: f64,
    /// Action bar height.
    pub action_bar_px: f64,
    /// Category rail height.
    pub category_rail_px: f64,
    /// Gap between the category rail and the embedded action bar.
    pub rail_action_gap_px: f64,
    /// Extra grid padding applied while the action bar floats.
    pub overlay_inset_px: f64,
    /// Half-width of the hysteresis band. Must be positive.
    pub hysteresis_px: f64,
    /// How far before the action bar reaches the top bar the sticky switch happens.
    pub reveal_offset_px: f64,
    /// Height of the fade strip under the sticky backdrop.
    pub fade_px: f64,
    /// Idle-snap only fires when the resting offset is this close to the threshold.
    pub snap_zone_px: f64,
    /// Reports above this height are rejected as implausible.
    pub max_plausible_px: f64,
    /// Whether idle-snap commands are issued at all.
    pub snap_enabled: bool,
    /// Fallback heights.
    pub estimates: FallbackEstimates,
    /// Timer delays.
    pub timing: Timing,
}

impl LayoutSpec {
    /// Pixel-unit defaults matching the mobile design system.
    pub fn pixels() -> Self {
        let mut spec = Self {
            safe_area_top_px: 0.0,
            search_bar_px: 56.0,
            gap_px: 8.0,
            action_bar_px: 48.0,
            category_rail_px: 88.0,
            rail_action_gap_px: 8.0,
            overlay_inset_px: 8.0,
            hysteresis_px: 10.0,
            reveal_offset_px: 0.0,
            fade_px: 16.0,
            snap_zone_px: 30.0,
            max_plausible_px: 2000.0,
            snap_enabled: true,
            estimates: FallbackEstimates {
                top_bar_px: 0.0,
                action_bar_px: 0.0,
                scroll_header_px: 0.0,
            },
            timing: Timing::default(),
        };
        spec.estimates = FallbackEstimates::derived_from(&spec);
        spec
    }

    /// Row-unit defaults for terminal hosts, one unit per cell row.
    pub fn terminal_rows() -> Self {
        let mut spec = Self {
            safe_area_top_px: 0.0,
            search_bar_px: 3.0,
            gap_px: 1.0,
            action_bar_px: 3.0,
            category_rail_px: 3.0,
            rail_action_gap_px: 1.0,
            overlay_inset_px: 1.0,
            hysteresis_px: 1.0,
            reveal_offset_px: 0.0,
            fade_px: 1.0,
            snap_zone_px: 2.0,
            max_plausible_px: 200.0,
            snap_enabled: true,
            estimates: FallbackEstimates {
                top_bar_px: 0.0,
                action_bar_px: 0.0,
                scroll_header_px: 0.0,
            },
            timing: Timing::default(),
        };
        spec.estimates = FallbackEstimates::derived_from(&spec);
        spec
    }

    /// Recompute `estimates` from the current design constants.
    pub fn with_derived_estimates(mut self) -> Self {
        self.estimates = FallbackEstimates::derived_from(&self);
        self
    }
}

impl Default for LayoutSpec {
    fn default() -> Self {
        Self::pixels()
    }
}

/// Validated, immutable layout constants.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConstants {
    spec: LayoutSpec,
}

impl LayoutConstants {
    /// Validate a spec.
    ///
    /// # Errors
    ///
    /// - [`ConstantsError::NonPositiveHysteresis`] when `hysteresis_px <= 0`
    /// - [`ConstantsError::InvalidSize`] for any negative or non-finite size
    /// - [`ConstantsError::NonPositiveCeiling`] when `max_plausible_px <= 0`
    /// - [`ConstantsError::ImplausibleEstimate`] when a fallback estimate is
    ///   not positive or not below the ceiling
    /// - [`ConstantsError::FallbackOrder`] when the short deadline is after the long one
    pub fn new(spec: LayoutSpec) -> Result<Self, ConstantsError> {
        if !(spec.hysteresis_px.is_finite() && spec.hysteresis_px > 0.0) {
            return Err(ConstantsError::NonPositiveHysteresis(spec.hysteresis_px));
        }

        let sizes = [
            ("safe_area_top_px", spec.safe_area_top_px),
            ("search_bar_px", spec.search_bar_px),
            ("gap_px", spec.gap_px),
            ("action_bar_px", spec.action_bar_px),
            ("category_rail_px", spec.category_rail_px),
            ("rail_action_gap_px", spec.rail_action_gap_px),
            ("overlay_inset_px", spec.overlay_inset_px),
            ("reveal_offset_px", spec.reveal_offset_px),
            ("fade_px", spec.fade_px),
            ("snap_zone_px", spec.snap_zone_px),
            ("estimates.top_bar_px", spec.estimates.top_bar_px),
            ("estimates.action_bar_px", spec.estimates.action_bar_px),
            ("estimates.scroll_header_px", spec.estimates.scroll_header_px),
        ];
        for (field, value) in sizes {
            if !value.is_finite() || value < 0.0 {
                return Err(ConstantsError::InvalidSize { field, value });
            }
        }

        if !(spec.max_plausible_px.is_finite() && spec.max_plausible_px > 0.0) {
            return Err(ConstantsError::NonPositiveCeiling(spec.max_plausible_px));
        }

        // Estimates must pass the same checks as reports
        let estimates = [
            ("estimates.top_bar_px", spec.estimates.top_bar_px),
            ("estimates.action_bar_px", spec.estimates.action_bar_px),
            ("estimates.scroll_header_px", spec.estimates.scroll_header_px),
        ];
        for (field, value) in estimates {
            validate_height(value, spec.max_plausible_px)
                .map_err(|rejection| ConstantsError::ImplausibleEstimate { field, rejection })?;
        }

        if spec.timing.short_fallback > spec.timing.long_fallback {
            return Err(ConstantsError::FallbackOrder {
                short_ms: spec.timing.short_fallback.as_millis(),
                long_ms: spec.timing.long_fallback.as_millis(),
            });
        }

        Ok(Self { spec })
    }

    /// The validated spec.
    pub fn spec(&self) -> &LayoutSpec {
        &self.spec
    }

    /// Gap between the top bar and the action bar lane.
    pub fn gap_px(&self) -> f64 {
        self.spec.gap_px
    }

    /// Extra grid padding while floating.
    pub fn overlay_inset_px(&self) -> f64 {
        self.spec.overlay_inset_px
    }

    /// Hysteresis half-width.
    pub fn hysteresis_px(&self) -> f64 {
        self.spec.hysteresis_px
    }

    /// Reveal offset.
    pub fn reveal_offset_px(&self) -> f64 {
        self.spec.reveal_offset_px
    }

    /// Fade strip height.
    pub fn fade_px(&self) -> f64 {
        self.spec.fade_px
    }

    /// Idle-snap zone.
    pub fn snap_zone_px(&self) -> f64 {
        self.spec.snap_zone_px
    }

    /// Sanity ceiling for reports.
    pub fn max_plausible_px(&self) -> f64 {
        self.spec.max_plausible_px
    }

    /// Fallback heights.
    pub fn estimates(&self) -> FallbackEstimates {
        self.spec.estimates
    }

    /// Timer delays.
    pub fn timing(&self) -> Timing {
        self.spec.timing
    }
}

impl Default for LayoutConstants {
    fn default() -> Self {
        Self {
            spec: LayoutSpec::pixels(),
        }
    }
}
