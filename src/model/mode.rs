//! Display modes, action bar placement and switching thresholds.

use serde::{Deserialize, Serialize};

/// Header display mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DisplayMode {
    /// The action bar scrolls away with the header content.
    #[default]
    Resting,
    /// The action bar is pinned under the search bar.
    Sticky,
}

impl DisplayMode {
    /// Where the action bar lives in this mode.
    pub fn placement(self) -> Placement {
        match self {
            DisplayMode::Resting => Placement::Embedded,
            DisplayMode::Sticky => Placement::Floating,
        }
    }
}

/// Position of the single logical action bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// Inside the scroll-away header, under the category rail.
    Embedded,
    /// Overlaid under the fixed search bar.
    Floating,
}

impl Placement {
    /// Both placements, embedded first.
    pub const ALL: [Placement; 2] = [Placement::Embedded, Placement::Floating];

    /// The other placement.
    pub fn other(self) -> Self {
        match self {
            Placement::Embedded => Placement::Floating,
            Placement::Floating => Placement::Embedded,
        }
    }
}

/// Scroll offsets at which the header changes mode.
///
/// Invariant: `exit < base < enter`. Guaranteed by construction from a
/// positive hysteresis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// The boundary itself. Idle-snap aligns to this offset.
    pub base: f64,
    /// Resting → Sticky at `offset >= enter`.
    pub enter: f64,
    /// Sticky → Resting at `offset <= exit`.
    pub exit: f64,
}

impl Thresholds {
    /// Build a symmetric band around `base`.
    ///
    /// `hysteresis` must be positive; [`crate::model::LayoutConstants`]
    /// guarantees that for every engine-built value.
    pub fn around(base: f64, hysteresis: f64) -> Self {
        Self {
            base,
            enter: base + hysteresis,
            exit: base - hysteresis,
        }
    }

    /// Whether `offset` lies strictly inside the hysteresis band.
    pub fn in_band(&self, offset: f64) -> bool {
        offset > self.exit && offset < self.enter
    }

    /// Absolute distance from `offset` to `base`.
    pub fn distance_to_base(&self, offset: f64) -> f64 {
        (offset - self.base).abs()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resting_embeds_and_sticky_floats() {
        assert_eq!(DisplayMode::Resting.placement(), Placement::Embedded);
        assert_eq!(DisplayMode::Sticky.placement(), Placement::Floating);
    }

    #[test]
    fn default_mode_is_resting() {
        assert_eq!(DisplayMode::default(), DisplayMode::Resting);
    }

    #[test]
    fn other_placement_flips() {
        for p in Placement::ALL {
            assert_ne!(p, p.other());
            assert_eq!(p, p.other().other());
        }
    }

    #[test]
    fn around_orders_exit_base_enter() {
        let t = Thresholds::around(90.0, 10.0);
        assert_eq!(t.exit, 80.0);
        assert_eq!(t.base, 90.0);
        assert_eq!(t.enter, 100.0);
        assert!(t.exit < t.base && t.base < t.enter);
    }

    #[test]
    fn band_is_open_interval() {
        let t = Thresholds::around(90.0, 10.0);
        assert!(!t.in_band(80.0));
        assert!(t.in_band(80.5));
        assert!(t.in_band(99.9));
        assert!(!t.in_band(100.0));
    }
}
