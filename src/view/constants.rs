//! Layout and timing constants for the terminal demo host.
//!
//! Header geometry comes from [`crate::model::LayoutSpec`]; only values the
//! engine never sees live here.

use std::time::Duration;

/// Categories shown in the rail, in order.
pub const CATEGORIES: [&str; 7] = [
    "mikvah", "eatery", "shul", "stores", "specials", "jobs", "events",
];

/// Number of listing rows generated per category.
pub const LISTINGS_PER_CATEGORY: usize = 40;

/// Buttons drawn inside the action bar.
pub const ACTION_BAR_BUTTONS: [&str; 4] = ["Filter", "Sort", "Map", "+ Add"];

/// Height of the status bar in lines.
pub const STATUS_BAR_HEIGHT: u16 = 1;

/// Width of the measurement overlay popup.
pub const OVERLAY_WIDTH: u16 = 36;

/// Poll timeout when no timer or fade is pending.
pub const IDLE_POLL: Duration = Duration::from_millis(500);

/// Poll timeout while a cross-fade is running.
pub const ANIMATION_POLL: Duration = Duration::from_millis(16);
