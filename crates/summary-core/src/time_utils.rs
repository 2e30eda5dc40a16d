use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Utc};
use tracing::warn;

use crate::error::{Result, SummaryError};

/// Filename timestamp format, e.g. `20181121_151127`.
pub const RUN_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

// ── Event timestamps ──────────────────────────────────────────────────────────

/// Parse an event timestamp cell into a UTC [`DateTime`].
///
/// Handles:
/// * integer → Unix epoch milliseconds (the event-history export format).
/// * RFC 3339 string, including the `Z` suffix.
/// * naive `%Y-%m-%d %H:%M:%S` / `%Y-%m-%dT%H:%M:%S` patterns, read as UTC.
pub fn parse_event_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    let s = raw.trim();
    if s.is_empty() {
        return Err(SummaryError::TimestampParse(raw.to_string()));
    }

    if let Ok(millis) = s.parse::<i64>() {
        return DateTime::from_timestamp_millis(millis)
            .ok_or_else(|| SummaryError::TimestampParse(raw.to_string()));
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }

    const FORMATS: &[&str] = &[
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%d %H:%M:%S%.f",
        "%Y-%m-%d %H:%M:%S",
    ];
    for fmt in FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(Utc.from_utc_datetime(&naive));
        }
    }

    warn!("could not parse event timestamp \"{}\"", raw);
    Err(SummaryError::TimestampParse(raw.to_string()))
}

// ── Calendar months ───────────────────────────────────────────────────────────

/// First day of the calendar month containing `ts`.
pub fn month_start(ts: DateTime<Utc>) -> NaiveDate {
    // Day 1 exists in every month, so the fallback is never taken.
    NaiveDate::from_ymd_opt(ts.year(), ts.month(), 1).unwrap_or_else(|| ts.date_naive())
}

/// First day of the month following `month`.
pub fn next_month(month: NaiveDate) -> NaiveDate {
    let (year, m) = if month.month() == 12 {
        (month.year() + 1, 1)
    } else {
        (month.year(), month.month() + 1)
    };
    NaiveDate::from_ymd_opt(year, m, 1).unwrap_or(month)
}

/// Every month from `first` to `last` inclusive, as first-of-month dates.
///
/// Returns an empty vector when `first` is after `last`.
pub fn month_range(first: NaiveDate, last: NaiveDate) -> Vec<NaiveDate> {
    let mut months = Vec::new();
    let mut current = month_start_of(first);
    let last = month_start_of(last);
    while current <= last {
        months.push(current);
        let next = next_month(current);
        if next == current {
            break;
        }
        current = next;
    }
    months
}

/// Axis label for a month, e.g. `"Jan 2001"`.
pub fn format_month_label(month: NaiveDate) -> String {
    month.format("%b %Y").to_string()
}

/// Format the run timestamp embedded in output filenames.
pub fn format_run_timestamp<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    now.format(RUN_TIMESTAMP_FORMAT).to_string()
}

fn month_start_of(date: NaiveDate) -> NaiveDate {
    NaiveDate::from_ymd_opt(date.year(), date.month(), 1).unwrap_or(date)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
