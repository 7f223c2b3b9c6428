//! Integration tests for the precision event.

use cadence_event::{DEFAULT_SPIN_THRESHOLD, PrecisionEvent};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::{Duration, Instant};

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn wait_for_waiters(event: &PrecisionEvent, expected: usize) {
    let give_up = Instant::now() + Duration::from_secs(5);
    while event.waiter_count() < expected && Instant::now() < give_up {
        thread::yield_now();
    }
}

#[test]
fn test_set_wakes_every_waiter() {
    let event = Arc::new(PrecisionEvent::new());
    let released = Arc::new(AtomicUsize::new(0));
    let mut handles = vec![];

    for _ in 0..8 {
        let event = Arc::clone(&event);
        let released = Arc::clone(&released);
        handles.push(thread::spawn(move || {
            if event.wait(None) {
                released.fetch_add(1, Ordering::SeqCst);
            }
        }));
    }

    wait_for_waiters(&event, 8);
    event.set();

    for handle in handles {
        assert!(handle.join().is_ok(), "Waiter thread should not panic");
    }
    assert_eq!(released.load(Ordering::SeqCst), 8);
    assert_eq!(event.waiter_count(), 0);
}

#[test]
fn test_clear_does_not_release_waiters() -> TestResult {
    let event = Arc::new(PrecisionEvent::new());
    let waiter = Arc::clone(&event);

    let handle = thread::spawn(move || waiter.wait_timeout(Duration::from_millis(150)));

    wait_for_waiters(&event, 1);
    event.clear();
    thread::sleep(Duration::from_millis(20));
    assert_eq!(event.waiter_count(), 1, "clear must leave the waiter parked");

    let woke_signaled = handle.join().map_err(|_| "waiter panicked")?;
    assert!(!woke_signaled);
    Ok(())
}

#[test]
fn test_late_arrivals_see_raised_flag() -> TestResult {
    let event = Arc::new(PrecisionEvent::new());
    event.set();

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let event = Arc::clone(&event);
            thread::spawn(move || {
                let start = Instant::now();
                let signaled = event.wait(Some(Duration::from_secs(10)));
                (signaled, start.elapsed())
            })
        })
        .collect();

    for handle in handles {
        let (signaled, elapsed) = handle.join().map_err(|_| "waiter panicked")?;
        assert!(signaled);
        assert!(elapsed < Duration::from_secs(1));
    }
    Ok(())
}

#[test]
fn test_timed_wait_accuracy_over_many_waits() {
    let event = PrecisionEvent::new();
    let timeout = Duration::from_millis(5);
    let mut worst = Duration::ZERO;

    for _ in 0..20 {
        let start = Instant::now();
        assert!(!event.wait_timeout(timeout));
        let elapsed = start.elapsed();
        assert!(elapsed >= timeout, "woke early after {elapsed:?}");
        worst = worst.max(elapsed.saturating_sub(timeout));
    }

    // Loose bound: a loaded CI host can preempt the spin tail.
    assert!(worst < Duration::from_millis(20), "worst overshoot {worst:?}");
}

#[test]
fn test_interrupt_latency_is_independent_of_remaining_time() -> TestResult {
    let event = Arc::new(PrecisionEvent::new());
    let waiter = Arc::clone(&event);

    let handle = thread::spawn(move || {
        let start = Instant::now();
        let signaled = waiter.wait_timeout(Duration::from_secs(30));
        (signaled, start.elapsed())
    });

    wait_for_waiters(&event, 1);
    event.set();

    let (signaled, elapsed) = handle.join().map_err(|_| "waiter panicked")?;
    assert!(signaled);
    assert!(elapsed < Duration::from_secs(2), "interrupt took {elapsed:?}");
    Ok(())
}

#[test]
fn test_set_during_spin_tail_is_observed() -> TestResult {
    let threshold = Duration::from_millis(50);
    let event = Arc::new(PrecisionEvent::with_spin_threshold(threshold));
    let setter = Arc::clone(&event);

    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(10));
        setter.set();
    });

    let start = Instant::now();
    assert!(event.wait_timeout(Duration::from_millis(40)));
    assert!(start.elapsed() < Duration::from_millis(40) + Duration::from_secs(1));
    handle.join().map_err(|_| "setter panicked")?;
    Ok(())
}

#[test]
fn test_indefinite_wait_released_by_set() -> TestResult {
    let event = Arc::new(PrecisionEvent::new());
    let waiter = Arc::clone(&event);

    let handle = thread::spawn(move || waiter.wait(None));
    wait_for_waiters(&event, 1);
    event.set();

    let signaled = handle.join().map_err(|_| "waiter panicked")?;
    assert!(signaled);
    Ok(())
}

#[test]
fn test_default_threshold_used_by_new() {
    assert_eq!(PrecisionEvent::new().spin_threshold(), DEFAULT_SPIN_THRESHOLD);
}
