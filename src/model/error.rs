//! Error types for stickylane.
//!
//! The layout engine itself has no runtime errors: degraded measurements are
//! absorbed by fallback estimation and events arriving while the host is
//! frozen are dropped. What can fail is everything around it:
//!
//! - [`ConstantsError`] - invalid layout configuration, rejected before a screen mounts
//! - [`TraceError`] - reading or parsing a recorded event trace
//! - [`AppError`] - top-level wrapper used by the binary
//!
//! Trace parse failures are non-fatal during replay: the bad line is logged
//! and skipped.

use super::measurement::MeasurementRejection;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error.
#[derive(Debug, Error)]
pub enum AppError {
    /// Layout constants failed validation.
    #[error("Invalid layout constants: {0}")]
    Constants(#[from] ConstantsError),

    /// Reading a trace failed.
    #[error("Trace error: {0}")]
    Trace(#[from] TraceError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// Terminal or output I/O failed.
    #[error("Terminal error: {0}")]
    Terminal(#[from] std::io::Error),
}

/// Invalid layout constants.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConstantsError {
    /// Hysteresis must be a positive finite number, otherwise `exit < base < enter` breaks.
    #[error("hysteresis must be positive, got {0}")]
    NonPositiveHysteresis(f64),

    /// A size was negative, NaN or infinite.
    #[error("{field} must be a finite non-negative size, got {value}")]
    InvalidSize {
        /// Offending field.
        field: &'static str,
        /// Offending value.
        value: f64,
    },

    /// A fallback estimate would itself fail measurement validation.
    #[error("{field} is not a plausible height: {rejection}")]
    ImplausibleEstimate {
        /// Offending estimate.
        field: &'static str,
        /// Why a report of that height would be rejected.
        rejection: MeasurementRejection,
    },

    /// The measurement ceiling must be positive.
    #[error("max plausible height must be positive, got {0}")]
    NonPositiveCeiling(f64),

    /// The short fallback deadline must not come after the long one.
    #[error("short fallback ({short_ms} ms) is after long fallback ({long_ms} ms)")]
    FallbackOrder {
        /// Short deadline in ms.
        short_ms: u128,
        /// Long deadline in ms.
        long_ms: u128,
    },
}

/// Errors reading a recorded event trace.
#[derive(Debug, Error)]
pub enum TraceError {
    /// The trace file does not exist.
    #[error("Trace file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
    },

    /// Reading the trace failed.
    #[error("I/O error reading trace: {0}")]
    Io(#[from] std::io::Error),

    /// A line was not a valid trace record.
    #[error("Malformed trace record at line {line}: {reason}")]
    Malformed {
        /// 1-based line number.
        line: usize,
        /// Parser message.
        reason: String,
    },

    /// Timestamps went backwards.
    #[error("Trace time went backwards at line {line}: {at_ms} ms after {previous_ms} ms")]
    NonMonotonic {
        /// 1-based line number.
        line: usize,
        /// Offending timestamp.
        at_ms: u64,
        /// Previous timestamp.
        previous_ms: u64,
    },
}

impl TraceError {
    /// Line number for per-line errors.
    pub fn line(&self) -> Option<usize> {
        match self {
            TraceError::Malformed { line, .. } | TraceError::NonMonotonic { line, .. } => {
                Some(*line)
            }
            TraceError::FileNotFound { .. } | TraceError::Io(_) => None,
        }
    }
}
