//! Layout measurements reported by the three measured views.

use super::time::Timestamp;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Which measured view a layout report comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureKind {
    /// The fixed search bar at the very top, including the safe-area inset.
    TopBar,
    /// The action bar, in either placement.
    ActionBar,
    /// The composite scroll-away header: category rail, embedded action bar
    /// and the gaps between them.
    ScrollHeader,
}

impl MeasureKind {
    /// All kinds, in collector slot order.
    pub const ALL: [MeasureKind; 3] = [
        MeasureKind::TopBar,
        MeasureKind::ActionBar,
        MeasureKind::ScrollHeader,
    ];

    /// Slot index used by the collector.
    pub(crate) fn index(self) -> usize {
        match self {
            MeasureKind::TopBar => 0,
            MeasureKind::ActionBar => 1,
            MeasureKind::ScrollHeader => 2,
        }
    }
}

impl fmt::Display for MeasureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MeasureKind::TopBar => "top_bar",
            MeasureKind::ActionBar => "action_bar",
            MeasureKind::ScrollHeader => "scroll_header",
        };
        f.write_str(name)
    }
}

/// Where a measurement's current value came from.
///
/// `Default` and `Provisional` are unlocked: a valid layout report still
/// replaces them. `Measured` and `Estimated` are locked until the next
/// lifecycle reset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureSource {
    /// Conservative estimate; the view has not reported yet.
    #[default]
    Default,
    /// Short fallback deadline passed without a report. Still overridable.
    Provisional,
    /// Locked from a layout report.
    Measured,
    /// Locked from the fallback estimate at the long deadline.
    Estimated,
}

impl MeasureSource {
    /// Whether a value with this source is final for the current lifecycle.
    pub fn is_locked(self) -> bool {
        matches!(self, MeasureSource::Measured | MeasureSource::Estimated)
    }
}

/// A single height measurement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    /// Which view this is.
    pub kind: MeasureKind,
    /// Height in layout units (pixels on mobile hosts, rows in the terminal).
    pub height_px: f64,
    /// When the value locked, `None` while unlocked.
    pub locked_at: Option<Timestamp>,
    /// Provenance of `height_px`.
    pub source: MeasureSource,
}

impl Measurement {
    /// Unlocked measurement holding the fallback estimate.
    pub fn unlocked(kind: MeasureKind, estimate_px: f64) -> Self {
        Self {
            kind,
            height_px: estimate_px,
            locked_at: None,
            source: MeasureSource::Default,
        }
    }

    /// Whether this measurement is final for the current lifecycle.
    pub fn is_locked(&self) -> bool {
        self.source.is_locked()
    }
}

/// A layout-size report from one of the measured views.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutReport {
    /// Reporting view.
    pub kind: MeasureKind,
    /// Reported width. Carried for diagnostics; only height drives layout.
    #[serde(default)]
    pub width: f64,
    /// Reported height.
    pub height: f64,
}

impl LayoutReport {
    /// Create a report.
    pub fn new(kind: MeasureKind, width: f64, height: f64) -> Self {
        Self {
            kind,
            width,
            height,
        }
    }
}

/// Screen dimensions, used to detect orientation changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
    /// Screen width.
    pub width: f64,
    /// Screen height.
    pub height: f64,
}

impl Dimensions {
    /// Create dimensions.
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Whether the screen is wider than it is tall.
    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

/// The stable header heights published once every kind is locked.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeaderMetrics {
    /// Locked top bar height.
    pub top_bar_px: f64,
    /// Locked action bar height.
    pub action_bar_px: f64,
    /// Locked scroll header height.
    pub scroll_header_px: f64,
}

/// Why a layout report was not accepted.
///
/// Rejection is never fatal: the kind stays unlocked and the next layout pass
/// gets another chance.
#[derive(Debug, Clone, Copy, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum MeasurementRejection {
    /// Height was NaN or infinite.
    #[error("height is not a finite number")]
    NotFinite,
    /// Height was zero or negative.
    #[error("height {height} is not positive")]
    NonPositive {
        /// Reported height.
        height: f64,
    },
    /// Height was not below the sanity ceiling.
    #[error("height {height} is not below ceiling {ceiling}")]
    AboveCeiling {
        /// Reported height.
        height: f64,
        /// Configured ceiling.
        ceiling: f64,
    },
}

/// Check a reported height against the plausibility rules.
pub fn validate_height(height: f64, ceiling: f64) -> Result<f64, MeasurementRejection> {
    if !height.is_finite() {
        return Err(MeasurementRejection::NotFinite);
    }
    if height <= 0.0 {
        return Err(MeasurementRejection::NonPositive { height });
    }
    if height >= ceiling {
        return Err(MeasurementRejection::AboveCeiling { height, ceiling });
    }
    Ok(height)
}
