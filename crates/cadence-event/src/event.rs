//! Manual-reset event with a sleep-then-spin timed wait.
//!
//! The flag itself is an atomic so the spin tail can poll it without taking
//! the lock. Parked waiters are counted under the mutex, and every [`set`]
//! bumps an epoch so a waiter released by `set` leaves even if the flag has
//! been cleared again before it gets scheduled.
//!
//! [`set`]: PrecisionEvent::set

use crate::platform::DEFAULT_SPIN_THRESHOLD;
use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

/// Bookkeeping for threads parked on the condition variable.
#[derive(Debug, Default)]
struct Waiters {
    /// Threads currently parked inside `wait`.
    count: usize,
    /// Incremented by every `set`.
    epoch: u64,
}

/// Boolean event offering an interruptible, high-accuracy timed wait.
///
/// # Timing
///
/// For a timed wait longer than the spin threshold the calling thread is
/// parked until `deadline - threshold`, then polls the monotonic clock until
/// the deadline. Shorter waits spin for their whole duration. Only the final
/// slice of a wait ever burns CPU.
///
/// # Example
///
/// ```
/// use cadence_event::PrecisionEvent;
/// use std::time::{Duration, Instant};
///
/// let event = PrecisionEvent::new();
/// let start = Instant::now();
/// assert!(!event.wait(Some(Duration::from_millis(10))));
/// assert!(start.elapsed() >= Duration::from_millis(10));
///
/// event.set();
/// assert!(event.wait(None));
/// ```
#[derive(Debug)]
pub struct PrecisionEvent {
    flag: AtomicBool,
    waiters: Mutex<Waiters>,
    wakeup: Condvar,
    spin_threshold: Duration,
}

impl PrecisionEvent {
    /// Create a cleared event using the platform default spin threshold.
    #[must_use]
    pub fn new() -> Self {
        Self::with_spin_threshold(DEFAULT_SPIN_THRESHOLD)
    }

    /// Create a cleared event with a custom spin threshold.
    ///
    /// A zero threshold disables the spin tail entirely and leaves wake
    /// accuracy to the native timed wait.
    #[must_use]
    pub fn with_spin_threshold(spin_threshold: Duration) -> Self {
        Self {
            flag: AtomicBool::new(false),
            waiters: Mutex::new(Waiters::default()),
            wakeup: Condvar::new(),
            spin_threshold,
        }
    }

    /// Slice before a deadline that is busy-polled rather than parked.
    #[inline]
    pub fn spin_threshold(&self) -> Duration {
        self.spin_threshold
    }

    /// Whether the flag is currently raised.
    #[inline]
    pub fn is_set(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }

    /// Number of threads currently parked in a wait.
    ///
    /// Threads in the spin tail of a timed wait are not counted.
    pub fn waiter_count(&self) -> usize {
        self.waiters.lock().count
    }

    /// Raise the flag and release every current waiter.
    ///
    /// The flag is raised before anyone is woken, so a thread arriving at
    /// [`wait`](Self::wait) afterwards returns without blocking.
    pub fn set(&self) {
        let mut waiters = self.waiters.lock();
        self.flag.store(true, Ordering::Release);
        waiters.epoch = waiters.epoch.wrapping_add(1);
        if waiters.count > 0 {
            tracing::trace!(waiters = waiters.count, "releasing parked waiters");
            self.wakeup.notify_all();
        }
    }

    /// Lower the flag. Nobody is released.
    pub fn clear(&self) {
        let _waiters = self.waiters.lock();
        self.flag.store(false, Ordering::Release);
    }

    /// Block until the flag is raised or `timeout` elapses.
    ///
    /// `None` waits indefinitely. A zero timeout polls the flag without
    /// blocking. Returns whether the flag ended up raised.
    pub fn wait(&self, timeout: Option<Duration>) -> bool {
        if self.is_set() {
            return true;
        }

        match timeout {
            None => {
                self.park(None);
                true
            }
            Some(timeout) if timeout.is_zero() => false,
            Some(timeout) => match Instant::now().checked_add(timeout) {
                Some(deadline) => self.wait_until(deadline),
                // Unrepresentable deadline: nothing but `set` can end the wait.
                None => {
                    self.park(None);
                    true
                }
            },
        }
    }

    /// Block for at most `timeout`. Shorthand for `wait(Some(timeout))`.
    #[inline]
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        self.wait(Some(timeout))
    }

    /// Block for at most `seconds`.
    ///
    /// Zero, negative and NaN values poll the flag without blocking. Values
    /// too large to represent wait indefinitely.
    pub fn wait_secs(&self, seconds: f64) -> bool {
        if seconds.is_nan() || seconds <= 0.0 {
            return self.is_set();
        }
        self.wait(Duration::try_from_secs_f64(seconds).ok())
    }

    /// Block until the flag is raised or `deadline` is reached.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        if self.is_set() {
            return true;
        }

        let now = Instant::now();
        if deadline <= now {
            return false;
        }

        if deadline.saturating_duration_since(now) > self.spin_threshold {
            if let Some(mark) = deadline.checked_sub(self.spin_threshold) {
                self.park(Some(mark));
            }
        }

        while !self.is_set() && Instant::now() < deadline {
            std::hint::spin_loop();
        }

        self.is_set()
    }

    /// Park on the condition variable until `set` is called or `until` passes.
    ///
    /// The waiter is registered for exactly the span it is parked.
    fn park(&self, until: Option<Instant>) {
        let mut waiters = self.waiters.lock();
        if self.flag.load(Ordering::Acquire) {
            return;
        }

        let epoch = waiters.epoch;
        waiters.count = waiters.count.saturating_add(1);

        while waiters.epoch == epoch {
            match until {
                Some(mark) => {
                    if self.wakeup.wait_until(&mut waiters, mark).timed_out() {
                        break;
                    }
                }
                None => self.wakeup.wait(&mut waiters),
            }
        }

        waiters.count = waiters.count.saturating_sub(1);
    }
}

impl Default for PrecisionEvent {
    fn default() -> Self {
        Self::new()
    }
}
