//! Control operations issued from other threads while a checkpoint waits.

use cadence_timer::countdown::{Countdown, CountdownStatus, spawn_clock};
use cadence_timer::{CheckpointOutcome, IntervalChange, InteractiveLoop, TimedLoop, Timer};
use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::{Duration, Instant};

type TestResult = Result<(), Box<dyn std::error::Error>>;

/// Run `control` on another thread after `delay`.
fn after(delay: Duration, control: impl FnOnce() + Send + 'static) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        thread::sleep(delay);
        control();
    })
}

#[test]
fn test_immediate_interval_change_interrupts_wait() -> TestResult {
    let timer = Arc::new(Timer::new(10.0, "long", false)?);
    let control = Arc::clone(&timer);
    let handle = after(Duration::from_millis(50), move || {
        assert!(control.set_interval(0.01, IntervalChange::Immediate).is_ok());
    });

    let start = Instant::now();
    let outcome = timer.checkpoint();
    let first = start.elapsed();

    assert_eq!(outcome, CheckpointOutcome::Interrupted);
    assert!(first < Duration::from_millis(500), "returned after {first:?}");

    // The next checkpoint runs on the new interval.
    let start = Instant::now();
    timer.checkpoint();
    assert!(start.elapsed() < Duration::from_millis(200));

    assert!(handle.join().is_ok(), "Control thread should not panic");
    timer.stop();
    Ok(())
}

#[test]
fn test_deferred_interval_change_does_not_interrupt() -> TestResult {
    let timer = Arc::new(Timer::new(0.2, "deferred", false)?);
    let control = Arc::clone(&timer);
    let handle = after(Duration::from_millis(20), move || {
        assert!(control.set_interval(0.01, IntervalChange::Deferred).is_ok());
    });

    let start = Instant::now();
    let outcome = timer.checkpoint();

    assert!(matches!(outcome, CheckpointOutcome::OnTime { .. }));
    assert!(start.elapsed() >= Duration::from_millis(150));
    assert!(handle.join().is_ok(), "Control thread should not panic");
    timer.stop();
    Ok(())
}

#[test]
fn test_stop_interrupts_promptly() -> TestResult {
    let timer = Arc::new(Timer::new(10.0, "stop", false)?);
    let control = Arc::clone(&timer);
    let handle = after(Duration::from_millis(50), move || control.stop());

    let start = Instant::now();
    let outcome = timer.checkpoint();

    assert_eq!(outcome, CheckpointOutcome::Interrupted);
    assert!(start.elapsed() < Duration::from_millis(500));
    assert!(timer.is_stopped());
    assert_eq!(timer.checkpoint(), CheckpointOutcome::Stopped);
    assert!(handle.join().is_ok(), "Control thread should not panic");
    Ok(())
}

#[test]
fn test_pause_blocks_next_checkpoint_until_resume() -> TestResult {
    let timer = Arc::new(Timer::new(10.0, "pause", false)?);
    let control = Arc::clone(&timer);
    let handle = thread::spawn(move || {
        thread::sleep(Duration::from_millis(50));
        control.pause();
        thread::sleep(Duration::from_millis(200));
        control.resume();
    });

    let start = Instant::now();
    assert_eq!(timer.checkpoint(), CheckpointOutcome::Interrupted);
    assert!(start.elapsed() < Duration::from_millis(200));

    // Paused: this call blocks until the resume.
    assert_eq!(timer.checkpoint(), CheckpointOutcome::Resumed);
    let resumed_at = Instant::now();
    assert!(start.elapsed() >= Duration::from_millis(200));

    // The schedule restarts from the resume instant.
    assert!(timer.target() > resumed_at);
    assert!(handle.join().is_ok(), "Control thread should not panic");
    timer.stop();
    Ok(())
}

#[test]
fn test_stop_releases_paused_checkpoint() -> TestResult {
    let timer = Arc::new(Timer::new(0.05, "paused-stop", false)?);
    timer.pause();
    let control = Arc::clone(&timer);
    let handle = after(Duration::from_millis(50), move || control.stop());

    let start = Instant::now();
    assert_eq!(timer.checkpoint(), CheckpointOutcome::Stopped);
    assert!(start.elapsed() < Duration::from_millis(500));
    assert!(handle.join().is_ok(), "Control thread should not panic");
    Ok(())
}

#[test]
fn test_no_catch_up_burst_after_overrun() -> TestResult {
    let timer = Timer::new(0.02, "burst", false)?;

    thread::sleep(Duration::from_millis(60));
    assert!(matches!(timer.checkpoint(), CheckpointOutcome::Overrun { .. }));

    let start = Instant::now();
    for _ in 0..3 {
        timer.checkpoint();
    }
    // Three full periods, not three instant releases for the missed targets.
    assert!(start.elapsed() >= Duration::from_millis(55));
    timer.stop();
    Ok(())
}

#[test]
fn test_readers_see_consistent_accounting() -> TestResult {
    let timer = Arc::new(Timer::new(0.01, "readers", false)?);
    let toggler = Arc::clone(&timer);
    let handle = thread::spawn(move || {
        for _ in 0..50 {
            toggler.pause();
            thread::sleep(Duration::from_millis(1));
            toggler.resume();
        }
    });

    let mut last_paused = Duration::ZERO;
    while !handle.is_finished() {
        let snapshot = timer.snapshot();
        assert_eq!(snapshot.elapsed + snapshot.paused, snapshot.total);
        assert!(snapshot.paused >= last_paused);
        last_paused = snapshot.paused;
    }
    assert!(handle.join().is_ok(), "Toggle thread should not panic");
    timer.stop();
    Ok(())
}

#[test]
fn test_timed_loop_stopped_from_other_thread() -> TestResult {
    let timer = Arc::new(Timer::new(0.01, "loop", false)?);
    let runs = Arc::new(AtomicU64::new(0));
    let counter = Arc::clone(&runs);

    let control = Arc::clone(&timer);
    let handle = after(Duration::from_millis(105), move || control.stop());

    let stats = TimedLoop::new(Arc::clone(&timer), move || {
        counter.fetch_add(1, Ordering::SeqCst);
    })
    .run();

    assert_eq!(stats.iterations, runs.load(Ordering::SeqCst));
    assert!((8..=13).contains(&stats.iterations), "ran {} times", stats.iterations);
    assert!(handle.join().is_ok(), "Control thread should not panic");
    Ok(())
}

#[test]
fn test_interactive_loop_follows_commands() -> TestResult {
    let timer = Arc::new(Timer::new(0.01, "interactive", false)?);
    // Ends with EOF, which stops the timer.
    let input = Cursor::new("0.005\np\nr\nt\n");

    let start = Instant::now();
    InteractiveLoop::new(Arc::clone(&timer), || {}).run(input, std::io::sink())?;

    assert!(timer.is_stopped());
    assert_eq!(timer.interval(), Duration::from_millis(5));
    assert!(start.elapsed() < Duration::from_secs(2));
    Ok(())
}

#[test]
fn test_countdown_clock_reports_until_stopped() -> TestResult {
    let timer = Arc::new(Timer::new(0.01, "countdown", false)?);
    let (clock, receiver) = spawn_clock(Arc::clone(&timer), Countdown::new(Duration::from_secs(3)))?;

    let first = receiver.recv_timeout(Duration::from_secs(1))?;
    assert_eq!(first, CountdownStatus::Counting(Duration::from_secs(3)));

    timer.stop();
    assert!(clock.join().is_ok(), "Clock thread should not panic");
    Ok(())
}

#[test]
fn test_countdown_clock_never_backlogs_slow_reader() -> TestResult {
    // A zero interval releases every checkpoint at once.
    let timer = Arc::new(Timer::new(0.0, "flood", false)?);
    let (clock, receiver) = spawn_clock(Arc::clone(&timer), Countdown::new(Duration::from_secs(3)))?;

    for _ in 0..5 {
        thread::sleep(Duration::from_millis(20));
        assert!(receiver.len() <= 1, "backlog of {}", receiver.len());
        receiver.recv_timeout(Duration::from_secs(1))?;
    }

    drop(receiver);
    timer.stop();
    assert!(clock.join().is_ok(), "Clock thread should not panic");
    Ok(())
}
