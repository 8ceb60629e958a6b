#![forbid(unsafe_code)]

//! Trailing-edge coalescing for bursty triggers.
//!
//! Typing into the search box produces one input event per keystroke. Each
//! filter pass is idempotent, so running one per keystroke is wasted work.
//! [`CoalescingScheduler`] collapses a burst into a single execution:
//!
//! - Every [`request`](CoalescingScheduler::request) replaces the pending
//!   payload and pushes the deadline out to `now + delay`.
//! - [`poll`](CoalescingScheduler::poll) hands back the payload once the
//!   quiet period has elapsed, and the slot becomes empty.
//!
//! # Invariants
//!
//! 1. At most one payload is pending; the most recent request always wins.
//! 2. A payload is released no earlier than `last_request + delay`.
//! 3. A superseded request is dropped, never executed.
//!
//! # Usage
//!
//! ```
//! use core::time::Duration;
//! use jobboard_core::coalescer::CoalescingScheduler;
//!
//! let mut debounce = CoalescingScheduler::new(Duration::from_millis(300));
//! debounce.request(Duration::from_millis(0), "e");
//! debounce.request(Duration::from_millis(120), "en");
//! debounce.request(Duration::from_millis(200), "eng");
//!
//! assert_eq!(debounce.poll(Duration::from_millis(450)), None);
//! assert_eq!(debounce.poll(Duration::from_millis(500)), Some("eng"));
//! assert_eq!(debounce.poll(Duration::from_millis(900)), None);
//! ```

use core::time::Duration;

use tracing::trace;

/// Default quiet period for search-as-you-type.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(300);

#[derive(Debug, Clone)]
struct Pending<T> {
    payload: T,
    requested_at: Duration,
}

/// Counters for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CoalescerStats {
    /// Requests received.
    pub requests: u64,
    /// Payloads released by `poll` or `flush`.
    pub fired: u64,
    /// Requests replaced before they fired.
    pub superseded: u64,
    /// Requests dropped by `cancel`.
    pub cancelled: u64,
}

/// Debounces requests against host-supplied monotonic time.
///
/// Not thread-safe; it lives on the single UI event thread.
#[derive(Debug, Clone)]
pub struct CoalescingScheduler<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
    stats: CoalescerStats,
}

impl<T> Default for CoalescingScheduler<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl<T> CoalescingScheduler<T> {
    #[must_use]
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
            stats: CoalescerStats::default(),
        }
    }

    #[must_use]
    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Change the quiet period. A pending request keeps its request time and
    /// uses the new delay.
    pub fn set_delay(&mut self, delay: Duration) {
        self.delay = delay;
    }

    /// Record a request at `now`.
    ///
    /// Returns `true` if an earlier pending request was replaced.
    pub fn request(&mut self, now: Duration, payload: T) -> bool {
        self.stats.requests += 1;
        let replaced = self
            .pending
            .replace(Pending {
                payload,
                requested_at: now,
            })
            .is_some();
        if replaced {
            self.stats.superseded += 1;
        }
        trace!(
            message = "scheduler.request",
            replaced,
            deadline_ms = self.deadline().map(|d| d.as_millis() as u64)
        );
        replaced
    }

    /// When the pending request becomes due, if any.
    #[must_use]
    pub fn deadline(&self) -> Option<Duration> {
        self.pending
            .as_ref()
            .map(|p| p.requested_at.saturating_add(self.delay))
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// True if a pending request is due at `now`.
    #[must_use]
    pub fn is_due(&self, now: Duration) -> bool {
        self.deadline().is_some_and(|deadline| now >= deadline)
    }

    /// Release the pending payload if its quiet period has elapsed.
    pub fn poll(&mut self, now: Duration) -> Option<T> {
        if !self.is_due(now) {
            return None;
        }
        self.flush()
    }

    /// Release the pending payload immediately, regardless of the deadline.
    pub fn flush(&mut self) -> Option<T> {
        let pending = self.pending.take()?;
        self.stats.fired += 1;
        trace!(
            message = "scheduler.fire",
            requested_at_ms = pending.requested_at.as_millis() as u64
        );
        Some(pending.payload)
    }

    /// Drop the pending payload without firing it.
    pub fn cancel(&mut self) -> Option<T> {
        let pending = self.pending.take()?;
        self.stats.cancelled += 1;
        Some(pending.payload)
    }

    #[must_use]
    pub fn stats(&self) -> CoalescerStats {
        self.stats
    }
}
