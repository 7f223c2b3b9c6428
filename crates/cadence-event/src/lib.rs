//! Interruptible boolean event with precise timed waits.
//!
//! [`PrecisionEvent`] behaves like a classic manual-reset event: [`set`] wakes
//! every blocked waiter and leaves the flag raised, [`clear`] lowers it without
//! waking anyone, and [`wait`] blocks until the flag is raised or a timeout
//! elapses.
//!
//! Native timed waits commonly overshoot by a millisecond or more. Timed waits
//! here park the thread until a short spin threshold before the deadline and
//! then poll the monotonic clock for the final slice, so wake-ups land within
//! microseconds of the deadline while the CPU stays idle for the bulk of the
//! wait.
//!
//! # Example
//!
//! ```
//! use cadence_event::PrecisionEvent;
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! let event = Arc::new(PrecisionEvent::new());
//! let setter = Arc::clone(&event);
//!
//! let handle = std::thread::spawn(move || setter.set());
//! assert!(event.wait(Some(Duration::from_secs(5))));
//! assert!(handle.join().is_ok());
//! ```
//!
//! [`set`]: PrecisionEvent::set
//! [`clear`]: PrecisionEvent::clear
//! [`wait`]: PrecisionEvent::wait

#![deny(unsafe_op_in_unsafe_fn)]
#![deny(clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![deny(missing_docs, missing_debug_implementations)]

pub mod event;
pub mod platform;

pub mod prelude;

pub use event::PrecisionEvent;
pub use platform::DEFAULT_SPIN_THRESHOLD;
