//! Timestamp and calendar-date utilities

use chrono::{DateTime, NaiveDate, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC calendar date
///
/// Only the transport layer reads this; the valuation pipeline receives its
/// reference date as a parameter.
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Whole days from `earlier` to `later`, floored at zero
pub fn days_between(earlier: NaiveDate, later: NaiveDate) -> i64 {
    (later - earlier).num_days().max(0)
}

/// Parse a `YYYY-MM-DD` date
pub fn parse_date(s: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
}
