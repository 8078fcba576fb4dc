//! Stats period parsing.

use chrono::Duration;
use lazy_static::lazy_static;
use regex::Regex;

pub const ONE_MINUTE: i64 = 60;
pub const ONE_HOUR: i64 = 60 * ONE_MINUTE;
pub const ONE_DAY: i64 = 24 * ONE_HOUR;
pub const ONE_WEEK: i64 = 7 * ONE_DAY;

/// Largest period accepted, in seconds. `chrono::Duration` is millisecond based.
const MAX_PERIOD_SECS: i64 = i64::MAX / 1000;

lazy_static! {
    /// `<number><unit>` where unit is one of s, m, h, d, w. No unit means seconds.
    static ref STATS_PERIOD_PATTERN: Regex = Regex::new(r"^(\d+)([smhdw]?)$").unwrap();
}

/// Parse a period such as `14d`, `6h`, `10m`, `2w`, `30s` or `90`.
///
/// # Examples
/// ```
/// use outcomes_core::timeseries::parse_stats_period;
/// assert_eq!(parse_stats_period("6h").map(|d| d.num_seconds()), Some(21_600));
/// assert_eq!(parse_stats_period("1y"), None);
/// ```
pub fn parse_stats_period(raw: &str) -> Option<Duration> {
    let captures = STATS_PERIOD_PATTERN.captures(raw)?;
    let amount: i64 = captures.get(1)?.as_str().parse().ok()?;
    let unit = match captures.get(2).map(|m| m.as_str()) {
        Some("m") => ONE_MINUTE,
        Some("h") => ONE_HOUR,
        Some("d") => ONE_DAY,
        Some("w") => ONE_WEEK,
        _ => 1,
    };

    let secs = amount.checked_mul(unit)?;
    if secs > MAX_PERIOD_SECS {
        return None;
    }
    Some(Duration::seconds(secs))
}
