//! Wall-clock stopwatch for search timing.

use chrono::Utc;

/// Millisecond stopwatch. `stop` does not reset, it just reads the elapsed
/// time, so one timer can be sampled repeatedly.
#[derive(Default)]
pub struct Timer {
    started: i64,
}

impl Timer {
    pub fn start() -> Timer {
        Timer {
            started: Utc::now().timestamp_millis(),
        }
    }

    pub fn stop(&self) -> i64 {
        Utc::now().timestamp_millis() - self.started
    }
}
