//! Randomized backoff between acquisition attempts.

use std::time::Duration;

use rand::Rng;

/// Shortest pause between two acquisition attempts.
pub const BACKOFF_MIN: Duration = Duration::from_millis(150);

/// Longest pause between two acquisition attempts.
pub const BACKOFF_MAX: Duration = Duration::from_millis(300);

/// Picks a pause uniformly from `[BACKOFF_MIN, BACKOFF_MAX]` at millisecond granularity.
pub fn jitter() -> Duration {
    let millis = rand::thread_rng()
        .gen_range(BACKOFF_MIN.as_millis() as u64..=BACKOFF_MAX.as_millis() as u64);
    Duration::from_millis(millis)
}
