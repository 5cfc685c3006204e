//! Timestamp utilities
//!
//! The clock is only read at the service edge; core functions take the date
//! as a parameter.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};

/// Get current UTC timestamp
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// Current UTC calendar date
pub fn today() -> NaiveDate {
    now().date_naive()
}

/// RFC 3339 text used for stored timestamps
///
/// Fixed width, so stored values sort chronologically as text.
pub fn to_storage_string(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}
