//! Prelude module for common event types.

pub use crate::event::PrecisionEvent;
pub use crate::platform::DEFAULT_SPIN_THRESHOLD;
