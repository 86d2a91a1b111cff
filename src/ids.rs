//! Timestamp-derived identifiers.
//!
//! Backlog items and feedback batches are identified by the wall-clock
//! millisecond at which they were created. Two creations inside the same
//! millisecond would collide, so an `IdClock` never hands out the same value
//! twice: it returns the current time or one past the last value, whichever
//! is larger.

use chrono::Utc;

/// Monotonic millisecond clock for id generation.
#[derive(Debug, Clone, Default)]
pub struct IdClock {
    last: i64,
}

impl IdClock {
    /// Create a new clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next strictly increasing millisecond timestamp.
    pub fn next_millis(&mut self) -> i64 {
        self.advance(Utc::now().timestamp_millis())
    }

    fn advance(&mut self, now: i64) -> i64 {
        let next = if now > self.last { now } else { self.last + 1 };
        self.last = next;
        next
    }
}

/// ID for a feedback item pasted in batch `batch` at position `index`.
pub fn feedback_id(batch: i64, index: usize) -> String {
    format!("fb-{}-{}", batch, index)
}

/// ID for a backlog item promoted from the cluster at `index`.
pub fn promoted_id(millis: i64, index: usize) -> String {
    format!("promoted-{}-{}", millis, index)
}
