#![forbid(unsafe_code)]

//! Host-driven monotonic time.
//!
//! The core never reads a wall clock to decide when something is due. The
//! browser host forwards `performance.now()`, native tests advance a
//! [`ManualClock`], and every timed component takes `now` as an argument.

use core::time::Duration;

/// Monotonic clock abstraction.
pub trait Clock {
    /// Elapsed time since an unspecified epoch, monotonically non-decreasing.
    fn now_mono(&self) -> Duration;
}

/// Deterministic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct ManualClock {
    now: Duration,
}

impl ManualClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Jump to `now`. Moving backwards is ignored.
    pub fn set(&mut self, now: Duration) {
        self.now = self.now.max(now);
    }

    /// Advance by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }
}

impl Clock for ManualClock {
    fn now_mono(&self) -> Duration {
        self.now
    }
}

/// Convert a host millisecond value into a [`Duration`].
///
/// Non-finite and negative values map to `None`.
#[must_use]
pub fn duration_from_ms(ms: f64) -> Option<Duration> {
    if !ms.is_finite() || ms < 0.0 {
        return None;
    }
    let secs = (ms / 1000.0).min(Duration::MAX.as_secs_f64());
    Some(Duration::try_from_secs_f64(secs).unwrap_or(Duration::MAX))
}
