//! JSONL parser for recorded engine input traces.
//!
//! One record per line:
//!
//! ```text
//! {"at_ms": 0,   "event": {"type": "dimensions", "width": 390, "height": 844}}
//! {"at_ms": 12,  "event": {"type": "layout", "kind": "top_bar", "width": 390, "height": 56}}
//! {"at_ms": 40,  "event": {"type": "scroll", "offset_y": 35.5}}
//! {"at_ms": 900, "event": {"type": "advance"}}
//! ```
//!
//! Parsing is pure; reading lines is the job of [`crate::source`].

use crate::model::{Dimensions, LayoutReport, TraceError};
use serde::{Deserialize, Serialize};

/// One timestamped host input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TraceRecord {
    /// Host time in milliseconds since mount.
    pub at_ms: u64,
    /// The input.
    pub event: TraceEvent,
}

/// Host inputs, one per engine entry point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TraceEvent {
    /// A view reported its size.
    Layout(LayoutReport),
    /// The grid scrolled.
    Scroll {
        /// New vertical offset.
        offset_y: f64,
    },
    /// The category selection changed.
    Category {
        /// Selected category.
        category: String,
    },
    /// Window dimensions changed.
    Dimensions(Dimensions),
    /// Host focus changed.
    Focus {
        /// Whether the screen is focused.
        focused: bool,
    },
    /// A navigation transition started or ended.
    Transition {
        /// Whether a transition is running.
        transitioning: bool,
    },
    /// Only time passed; fire due timers.
    Advance,
    /// The screen went away.
    Unmount,
}

/// Whether a line carries no record.
pub fn is_blank(line: &str) -> bool {
    line.trim().is_empty()
}

/// Parse one trace line.
///
/// # Errors
///
/// Returns [`TraceError::Malformed`] with the 1-based `line_number` when the
/// line is not a valid record.
pub fn parse_record(line: &str, line_number: usize) -> Result<TraceRecord, TraceError> {
    serde_json::from_str(line.trim()).map_err(|e| TraceError::Malformed {
        line: line_number,
        reason: e.to_string(),
    })
}
