//! Constrained date range and rollup selection.

use chrono::{DateTime, Duration, TimeZone, Utc};

use crate::error::{QueryError, Result};
use crate::logging::structured::LogContext;
use crate::query::raw::RawQuery;

use super::period::{parse_stats_period, ONE_DAY, ONE_HOUR, ONE_MINUTE};

/// Window used when neither `statsPeriod` nor `start`/`end` are given.
pub const DEFAULT_STATS_PERIOD: i64 = 14 * ONE_DAY;

/// Bucket size used when `interval` is not given.
pub const DEFAULT_INTERVAL: i64 = ONE_HOUR;

/// Upper bound on buckets for minute-resolution queries.
pub const MAX_POINTS: i64 = 1000;

/// Minute-resolution data is only retained this long.
pub const MINUTE_RESOLUTION_MAX_AGE: i64 = 30 * ONE_DAY;

/// Resolved query window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
    /// Bucket size in seconds.
    pub rollup: i64,
}

impl TimeWindow {
    /// Whether buckets are finer than an hour.
    pub fn is_minute_resolution(&self) -> bool {
        self.rollup % ONE_HOUR != 0
    }
}

/// Resolve the window and rollup for a request.
///
/// Without minute resolution an interval that is not a whole number of hours
/// is raised to the next hour. The range is rounded up to whole (hour-rounded)
/// intervals and its end aligned to the next interval boundary, so repeated
/// requests produce identical windows. An end in the future is clamped to the
/// next whole minute; a window that starts after that clamp is rejected.
pub fn constrained_window(
    query: &RawQuery,
    now: DateTime<Utc>,
    allow_minute_resolution: bool,
    ctx: &LogContext,
) -> Result<TimeWindow> {
    let interval = resolve_interval(query, allow_minute_resolution, ctx)?;
    let using_minute_resolution = interval % ONE_HOUR != 0;

    let (start, mut end) = date_range_from_params(query, now)?;
    if query.contains_key("end") && !query.contains_key("statsPeriod") {
        // an explicit end is inclusive
        end += Duration::seconds(1);
    }

    let rounding_interval = ceil_div(interval, ONE_HOUR) * ONE_HOUR;
    let range = ceil_div((end - start).num_seconds(), rounding_interval) * rounding_interval;

    if using_minute_resolution {
        if (now - start).num_seconds() > MINUTE_RESOLUTION_MAX_AGE {
            return Err(QueryError::InvalidParams(
                "The time-range when using one-minute resolution intervals is restricted to the last 30 days."
                    .to_string(),
            ));
        }
        if range / interval > MAX_POINTS {
            return Err(QueryError::InvalidParams(
                "Your interval and date range would create too many results. Use a larger interval, or a smaller date range."
                    .to_string(),
            ));
        }
    }

    let aligned_end = ceil_div(end.timestamp(), interval) * interval;
    let mut end = timestamp(aligned_end)?;
    let start = end
        .checked_sub_signed(Duration::seconds(range))
        .ok_or_else(|| QueryError::InvalidParams("Date range is out of bounds.".to_string()))?;

    if end > now {
        end = timestamp(ONE_MINUTE * (now.timestamp().div_euclid(ONE_MINUTE) + 1))?;
    }

    if start > end {
        return Err(QueryError::InvalidParams(
            "The requested time range lies in the future.".to_string(),
        ));
    }

    Ok(TimeWindow {
        start,
        end,
        rollup: interval,
    })
}

fn resolve_interval(
    query: &RawQuery,
    allow_minute_resolution: bool,
    ctx: &LogContext,
) -> Result<i64> {
    let interval = match query.get("interval") {
        Some(raw) => parse_stats_period(raw)
            .ok_or_else(|| QueryError::InvalidParams(format!("Invalid interval: \"{}\"", raw)))?
            .num_seconds(),
        None => DEFAULT_INTERVAL,
    };

    if interval <= 0 {
        return Err(QueryError::InvalidParams(
            "The interval has to be greater than zero.".to_string(),
        ));
    }

    let interval = if allow_minute_resolution {
        if interval % ONE_MINUTE != 0 {
            return Err(QueryError::InvalidParams(
                "The interval has to be a multiple of the minimum interval, one minute."
                    .to_string(),
            ));
        }
        interval
    } else if interval % ONE_HOUR != 0 {
        let coerced = ceil_div(interval, ONE_HOUR) * ONE_HOUR;
        crate::log_info!(ctx, "ROLLUP_COERCED", requested = interval, rollup = coerced);
        coerced
    } else {
        interval
    };

    if interval > ONE_DAY {
        return Err(QueryError::InvalidParams(
            "The interval has to be less than one day.".to_string(),
        ));
    }
    if ONE_DAY % interval != 0 {
        return Err(QueryError::InvalidParams(
            "The interval should divide one day without a remainder.".to_string(),
        ));
    }

    Ok(interval)
}

/// Unaligned `(start, end)` from `statsPeriod`, or `start` + `end`, or the default period.
fn date_range_from_params(
    query: &RawQuery,
    now: DateTime<Utc>,
) -> Result<(DateTime<Utc>, DateTime<Utc>)> {
    if let Some(raw) = query.get("statsPeriod") {
        let period = parse_stats_period(raw)
            .ok_or_else(|| QueryError::InvalidParams(format!("Invalid statsPeriod: \"{}\"", raw)))?;
        if period.num_seconds() <= 0 {
            return Err(QueryError::InvalidParams(
                "statsPeriod has to be greater than zero.".to_string(),
            ));
        }
        let start = now.checked_sub_signed(period).ok_or_else(|| {
            QueryError::InvalidParams(format!("Invalid statsPeriod: \"{}\"", raw))
        })?;
        return Ok((start, now));
    }

    match (query.get("start"), query.get("end")) {
        (Some(raw_start), Some(raw_end)) => {
            let start = parse_datetime("start", raw_start)?;
            let end = parse_datetime("end", raw_end)?;
            if start > end {
                return Err(QueryError::InvalidParams(
                    "start must be before end".to_string(),
                ));
            }
            Ok((start, end))
        }
        (None, None) => Ok((now - Duration::seconds(DEFAULT_STATS_PERIOD), now)),
        _ => Err(QueryError::InvalidParams(
            "start and end are both required".to_string(),
        )),
    }
}

fn parse_datetime(name: &str, raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| QueryError::InvalidParams(format!("Invalid {}: \"{}\" ({})", name, raw, e)))
}

fn timestamp(secs: i64) -> Result<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0)
        .single()
        .ok_or_else(|| QueryError::InvalidParams("Date range is out of bounds.".to_string()))
}

fn ceil_div(value: i64, divisor: i64) -> i64 {
    (value + divisor - 1).div_euclid(divisor)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 10, 12, 34, 56).unwrap()
    }

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, mo, d, h, mi, 0).unwrap()
    }

    fn window(qs: &str, allow_minute_resolution: bool) -> Result<TimeWindow> {
        let ctx = LogContext::new("test-request", None);
        constrained_window(&RawQuery::parse(qs), now(), allow_minute_resolution, &ctx)
    }

    #[test]
    fn test_ten_minute_buckets() {
        let w = window("statsPeriod=6h&interval=10m", true).unwrap();
        assert_eq!(w.rollup, 600);
        assert!(w.is_minute_resolution());
        assert_eq!(w.start, at(2026, 3, 10, 6, 40));
        // clamped to the next minute after now
        assert_eq!(w.end, at(2026, 3, 10, 12, 35));
    }

    #[test]
    fn test_daily_buckets() {
        let w = window("statsPeriod=4d&interval=1d", true).unwrap();
        assert_eq!(w.rollup, ONE_DAY);
        assert!(!w.is_minute_resolution());
        assert_eq!(w.start, at(2026, 3, 7, 0, 0));
        assert_eq!(w.end, at(2026, 3, 10, 12, 35));
    }

    #[test]
    fn test_defaults() {
        let w = window("", false).unwrap();
        assert_eq!(w.rollup, ONE_HOUR);
        assert_eq!(w.start, at(2026, 2, 24, 13, 0));
    }

    #[test]
    fn test_sub_hour_coerced_without_minute_resolution() {
        let w = window("statsPeriod=6h&interval=10m", false).unwrap();
        assert_eq!(w.rollup, ONE_HOUR);

        let w = window("statsPeriod=1d&interval=90m", false).unwrap();
        assert_eq!(w.rollup, 2 * ONE_HOUR);
    }

    #[test]
    fn test_absolute_range_end_is_inclusive() {
        let w = window(
            "start=2026-03-01T00:00:00Z&end=2026-03-02T00:00:00Z&interval=1h",
            false,
        )
        .unwrap();
        assert_eq!(w.start, at(2026, 3, 1, 0, 0));
        assert_eq!(w.end, at(2026, 3, 2, 1, 0));
    }

    #[test]
    fn test_inclusive_end_on_boundary_keeps_first_bucket() {
        let w = window(
            "start=2026-03-01T00:00:00Z&end=2026-03-01T05:59:59Z&interval=1h",
            false,
        )
        .unwrap();
        assert_eq!(w.start, at(2026, 3, 1, 0, 0));
        assert_eq!(w.end, at(2026, 3, 1, 6, 0));
    }

    #[test]
    fn test_zero_stats_period_rejected() {
        let err = window("statsPeriod=0&interval=1d", true).unwrap_err();
        assert!(matches!(err, QueryError::InvalidParams(_)));
    }

    #[test]
    fn test_future_range_rejected() {
        for qs in [
            "start=9999-12-31T23:59:59Z&end=9999-12-31T23:59:59Z",
            "start=2026-03-11T00:00:00Z&end=2026-03-12T00:00:00Z",
        ] {
            assert!(
                matches!(window(qs, false), Err(QueryError::InvalidParams(_))),
                "{}",
                qs
            );
        }
    }

    #[test]
    fn test_window_never_inverted() {
        for qs in [
            "statsPeriod=1s&interval=1d",
            "statsPeriod=6h&interval=10m",
            "start=2026-03-10T12:00:00Z&end=2026-03-10T12:34:00Z&interval=10m",
        ] {
            let w = window(qs, true).unwrap();
            assert!(w.start <= w.end, "{}", qs);
        }
    }

    #[test]
    fn test_stats_period_wins_over_absolute_range() {
        let w = window(
            "statsPeriod=1d&start=2026-01-01T00:00:00Z&end=2026-01-02T00:00:00Z",
            false,
        )
        .unwrap();
        assert_eq!(w.start, at(2026, 3, 9, 13, 0));
    }

    #[test]
    fn test_invalid_intervals() {
        for qs in [
            "interval=0",
            "interval=90s",
            "interval=7h",
            "interval=2d",
            "interval=banana",
        ] {
            assert!(
                matches!(window(qs, true), Err(QueryError::InvalidParams(_))),
                "{}",
                qs
            );
        }
    }

    #[test]
    fn test_too_many_points() {
        let err = window("statsPeriod=2d&interval=1m", true).unwrap_err();
        assert!(err.to_string().contains("too many results"));
        // the same range is fine at hourly resolution
        assert!(window("statsPeriod=2d&interval=1h", true).is_ok());
    }

    #[test]
    fn test_minute_resolution_age_limit() {
        let err = window(
            "start=2026-01-20T00:00:00Z&end=2026-01-20T06:00:00Z&interval=10m",
            true,
        )
        .unwrap_err();
        assert!(matches!(err, QueryError::InvalidParams(_)));
    }

    #[test]
    fn test_invalid_ranges() {
        assert!(matches!(
            window("statsPeriod=4x", true),
            Err(QueryError::InvalidParams(_))
        ));
        assert!(matches!(
            window("start=2026-03-01T00:00:00Z", true),
            Err(QueryError::InvalidParams(_))
        ));
        assert!(matches!(
            window("start=2026-03-02T00:00:00Z&end=2026-03-01T00:00:00Z", true),
            Err(QueryError::InvalidParams(_))
        ));
        assert!(matches!(
            window("start=yesterday&end=today", true),
            Err(QueryError::InvalidParams(_))
        ));
    }

    #[test]
    fn test_repeatable() {
        assert_eq!(
            window("statsPeriod=6h&interval=10m", true).unwrap(),
            window("statsPeriod=6h&interval=10m", true).unwrap()
        );
    }
}
