//! Clock-style formatting for playback positions.

use chrono::format::{Item, StrftimeItems};
use chrono::NaiveTime;

use crate::error::{PlaybackError, Result};

const SECONDS_PER_DAY: u64 = 24 * 60 * 60;
const DEFAULT_FORMAT: &str = "%H:%M:%S";
const ZERO: &str = "00:00:00";

/// Format a position in seconds as `HH:MM:SS`.
///
/// The value is rendered as a UTC time of day: fractional seconds are
/// truncated and hours wrap after 23 (there is no day component). Negative
/// and non-finite inputs render as `00:00:00`.
pub fn format_time(seconds: f64) -> String {
    format_time_with(seconds, DEFAULT_FORMAT).unwrap_or_else(|_| ZERO.to_string())
}

/// Format a position in seconds with a `strftime` pattern, e.g. `"%M:%S"`.
///
/// Follows the same time-of-day rules as [`format_time`]. Patterns with
/// unknown specifiers are rejected with [`PlaybackError::InvalidTimeFormat`].
pub fn format_time_with(seconds: f64, pattern: &str) -> Result<String> {
    let items: Vec<Item<'_>> = StrftimeItems::new(pattern).collect();
    if items.iter().any(|item| matches!(item, Item::Error)) {
        return Err(PlaybackError::InvalidTimeFormat(pattern.to_string()));
    }

    Ok(time_of_day(seconds)
        .format_with_items(items.into_iter())
        .to_string())
}

fn time_of_day(seconds: f64) -> NaiveTime {
    let of_day = if seconds.is_finite() && seconds > 0.0 {
        (seconds.trunc() as u64 % SECONDS_PER_DAY) as u32
    } else {
        0
    };
    NaiveTime::from_num_seconds_from_midnight_opt(of_day, 0).unwrap_or(NaiveTime::MIN)
}
