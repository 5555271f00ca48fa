//! Relative time window resolution.
//!
//! Turns a duration token like "5m", "2h" or "3d" into the absolute
//! start of the history replay window.

use chrono::Local;
use std::time::Duration;
use thiserror::Error;

/// Closed set of supported suffixes and their length in seconds.
const UNITS: &[(char, u64)] = &[('m', 60), ('h', 3600), ('d', 86400)];

#[derive(Debug, Error)]
pub enum WindowError {
    #[error("unsupported time unit in {0:?}: expected <n>m, <n>h or <n>d")]
    UnsupportedUnit(String),
    #[error("invalid magnitude in {0:?}: expected <n>m, <n>h or <n>d")]
    BadMagnitude(String),
}

/// Parse a `<integer><unit>` token into a duration.
pub fn parse_window(token: &str) -> Result<Duration, WindowError> {
    let Some(suffix) = token.chars().last() else {
        return Err(WindowError::UnsupportedUnit(token.to_string()));
    };
    let Some(&(_, seconds_per_unit)) = UNITS.iter().find(|(unit, _)| *unit == suffix) else {
        return Err(WindowError::UnsupportedUnit(token.to_string()));
    };

    let magnitude: u64 = token[..token.len() - suffix.len_utf8()]
        .parse()
        .map_err(|_| WindowError::BadMagnitude(token.to_string()))?;

    magnitude
        .checked_mul(seconds_per_unit)
        .map(Duration::from_secs)
        .ok_or_else(|| WindowError::BadMagnitude(token.to_string()))
}

/// The [start, now) range history replay is restricted to.
///
/// `now` is captured once at construction and never refreshed.
#[derive(Debug, Clone, Copy)]
pub struct TimeWindow {
    pub start_millis: i64,
    pub now_millis: i64,
}

impl TimeWindow {
    /// Window spanning the given duration back from the current instant.
    pub fn ending_now(span: Duration) -> Self {
        let now_millis = Local::now().timestamp_millis();
        Self {
            start_millis: now_millis - span.as_millis() as i64,
            now_millis,
        }
    }

    pub fn contains(&self, timestamp_millis: i64) -> bool {
        timestamp_millis >= self.start_millis
    }
}
