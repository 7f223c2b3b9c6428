//! Property-based tests for the precision event.

use cadence_event::PrecisionEvent;
use proptest::prelude::*;
use std::time::{Duration, Instant};

proptest! {
    #[test]
    fn test_flag_tracks_last_operation(ops in prop::collection::vec(any::<bool>(), 1..64)) {
        let event = PrecisionEvent::new();

        for &raise in &ops {
            if raise {
                event.set();
            } else {
                event.clear();
            }
        }

        let last = ops.last().copied().unwrap_or(false);
        prop_assert_eq!(event.is_set(), last);
        prop_assert_eq!(event.wait(Some(Duration::ZERO)), last);
        prop_assert_eq!(event.waiter_count(), 0);
    }

    #[test]
    fn test_non_positive_seconds_never_block(seconds in -1.0e9f64..=0.0) {
        let event = PrecisionEvent::new();
        let start = Instant::now();

        prop_assert!(!event.wait_secs(seconds));
        prop_assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_raised_flag_short_circuits_any_timeout(millis in 0u64..100_000) {
        let event = PrecisionEvent::new();
        event.set();
        let start = Instant::now();

        prop_assert!(event.wait(Some(Duration::from_millis(millis))));
        prop_assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_threshold_is_preserved(micros in 0u64..10_000) {
        let threshold = Duration::from_micros(micros);
        let event = PrecisionEvent::with_spin_threshold(threshold);
        prop_assert_eq!(event.spin_threshold(), threshold);
    }
}
