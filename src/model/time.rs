//! Engine time.
//!
//! The engine never reads a clock. Hosts pass a monotonic [`Timestamp`] into
//! every call, measured in milliseconds since the screen mounted. This keeps
//! every timer deterministic under test.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Milliseconds elapsed since the hosting screen mounted.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    /// The mount instant.
    pub const ZERO: Self = Self(0);

    /// Create a timestamp from raw milliseconds.
    pub fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Get the raw millisecond value.
    pub fn as_millis(&self) -> u64 {
        self.0
    }

    /// Timestamp `delay` after this one, saturating at `u64::MAX` ms.
    pub fn after(&self, delay: Duration) -> Self {
        let delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
        Self(self.0.saturating_add(delay_ms))
    }

    /// Time elapsed since `earlier`, zero if `earlier` is in the future.
    pub fn saturating_since(&self, earlier: Timestamp) -> Duration {
        Duration::from_millis(self.0.saturating_sub(earlier.0))
    }
}

impl From<Duration> for Timestamp {
    fn from(elapsed: Duration) -> Self {
        Self(u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn after_adds_whole_milliseconds() {
        let t = Timestamp::from_millis(100).after(Duration::from_millis(150));
        assert_eq!(t.as_millis(), 250);
    }

    #[test]
    fn after_saturates() {
        let t = Timestamp::from_millis(u64::MAX - 1).after(Duration::from_secs(10));
        assert_eq!(t.as_millis(), u64::MAX);
    }

    #[test]
    fn saturating_since_is_zero_for_future_instant() {
        let now = Timestamp::from_millis(10);
        assert_eq!(
            now.saturating_since(Timestamp::from_millis(50)),
            Duration::ZERO
        );
        assert_eq!(
            Timestamp::from_millis(50).saturating_since(now),
            Duration::from_millis(40)
        );
    }

    #[test]
    fn from_duration_truncates_to_millis() {
        let t = Timestamp::from(Duration::from_micros(2_999));
        assert_eq!(t.as_millis(), 2);
    }
}
