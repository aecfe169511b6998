//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors.

pub mod constants;
pub mod error;
pub mod key_action;
pub mod measurement;
pub mod mode;
pub mod time;

// Re-export for convenience
pub use constants::{FallbackEstimates, LayoutConstants, LayoutSpec, Timing};
pub use error::{AppError, ConstantsError, TraceError};
pub use key_action::KeyAction;
pub use measurement::{
    validate_height, Dimensions, HeaderMetrics, LayoutReport, MeasureKind, MeasureSource,
    Measurement, MeasurementRejection,
};
pub use mode::{DisplayMode, Placement, Thresholds};
pub use time::Timestamp;
