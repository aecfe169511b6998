//! Engine state machines (pure).
//!
//! All state transitions are pure functions of their inputs and the host's
//! timestamp, testable without a terminal.

pub mod engine;
pub mod measure;
pub mod scroll;
pub mod threshold;
pub mod timer;

// Re-export for convenience
pub use engine::{EngineEvent, ResetReason, StickyHeader};
pub use measure::{MeasurementCollector, ReportOutcome};
pub use scroll::{next_mode, FrameThrottle, ModeChange, ScrollMachine, ScrollState, ThrottleDecision};
pub use threshold::{compute_thresholds, ThresholdCalculator, ThresholdInputs};
pub use timer::{TimerId, TimerKind, TimerQueue};
