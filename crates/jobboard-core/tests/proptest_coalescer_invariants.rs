#![forbid(unsafe_code)]

//! Property tests for the coalescing scheduler.
//!
//! A burst of requests separated by less than the delay fires exactly once,
//! with the last payload, no earlier than `last_request + delay`.

use core::time::Duration;

use jobboard_core::CoalescingScheduler;
use proptest::prelude::*;

const DELAY_MS: u64 = 300;

fn ms(v: u64) -> Duration {
    Duration::from_millis(v)
}

/// Gaps between consecutive requests, all shorter than the delay.
fn burst_gaps() -> impl Strategy<Value = Vec<u64>> {
    prop::collection::vec(0..DELAY_MS, 1..32)
}

proptest! {
    #[test]
    fn burst_fires_once_with_last_payload(gaps in burst_gaps(), scan_step in 1u64..97) {
        let mut scheduler = CoalescingScheduler::new(ms(DELAY_MS));
        let mut now = 0;
        for (i, gap) in gaps.iter().enumerate() {
            now += gap;
            scheduler.request(ms(now), i);
        }
        let last = now;
        let expected = gaps.len() - 1;

        let mut fired = Vec::new();
        let mut t = 0;
        while t <= last + 2 * DELAY_MS {
            if let Some(payload) = scheduler.poll(ms(t)) {
                prop_assert!(t >= last + DELAY_MS);
                fired.push(payload);
            }
            t += scan_step;
        }
        if let Some(payload) = scheduler.poll(ms(last + 2 * DELAY_MS)) {
            fired.push(payload);
        }

        prop_assert_eq!(fired, vec![expected]);
        let stats = scheduler.stats();
        prop_assert_eq!(stats.requests, gaps.len() as u64);
        prop_assert_eq!(stats.fired, 1);
        prop_assert_eq!(stats.superseded, gaps.len() as u64 - 1);
    }
}

proptest! {
    #[test]
    fn deadline_follows_last_request(gaps in burst_gaps()) {
        let mut scheduler = CoalescingScheduler::new(ms(DELAY_MS));
        let mut now = 0;
        for gap in gaps {
            now += gap;
            scheduler.request(ms(now), ());
            prop_assert_eq!(scheduler.deadline(), Some(ms(now + DELAY_MS)));
        }
    }
}

proptest! {
    #[test]
    fn separated_requests_each_fire(count in 1usize..12, extra in 0u64..200) {
        let mut scheduler = CoalescingScheduler::new(ms(DELAY_MS));
        let spacing = DELAY_MS + extra;
        let mut fired = 0;
        for i in 0..count as u64 {
            let at = i * spacing;
            scheduler.request(ms(at), i);
            if scheduler.poll(ms(at + DELAY_MS)) == Some(i) {
                fired += 1;
            }
        }
        prop_assert_eq!(fired, count);
        prop_assert_eq!(scheduler.stats().superseded, 0);
    }
}

#[test]
fn cancel_drops_pending_payload() {
    let mut scheduler = CoalescingScheduler::new(ms(DELAY_MS));
    scheduler.request(ms(0), "draft");
    assert_eq!(scheduler.cancel(), Some("draft"));
    assert_eq!(scheduler.poll(ms(10_000)), None);
    assert_eq!(scheduler.stats().cancelled, 1);
}
