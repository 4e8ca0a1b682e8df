use std::time::{SystemTime, UNIX_EPOCH};

/// Wall-clock instant in seconds since the Unix epoch.
///
/// Kept as a plain value so callers can inject deterministic times in tests.
#[derive(Copy, Clone, Debug, PartialEq, PartialOrd)]
pub struct Time(pub f64);

impl Time {
    pub fn now() -> Self {
        let secs = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs_f64())
            .unwrap_or(0.0);
        Time(secs)
    }

    pub fn from_millis(ms: u64) -> Self {
        Time(ms as f64 / 1000.0)
    }

    /// Whole milliseconds, used as the cache-bust query value.
    pub fn as_millis(self) -> u64 {
        if self.0 <= 0.0 {
            return 0;
        }
        (self.0 * 1000.0).round() as u64
    }
}
