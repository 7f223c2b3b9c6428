//! Run a function once after a delay.

use std::io;
use std::thread::{self, JoinHandle};
use std::time::Duration;

/// Block for `delay`, then run `f` and return its result.
pub fn run_after<T>(delay: Duration, f: impl FnOnce() -> T) -> T {
    thread::sleep(delay);
    f()
}

/// Run `f` on a new thread after `delay`.
///
/// # Errors
///
/// Returns an error if the thread cannot be spawned.
pub fn spawn_after<T, F>(delay: Duration, f: F) -> io::Result<JoinHandle<T>>
where
    T: Send + 'static,
    F: FnOnce() -> T + Send + 'static,
{
    thread::Builder::new()
        .name("cadence-after".to_string())
        .spawn(move || run_after(delay, f))
}
