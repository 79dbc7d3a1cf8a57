//! Fixed-width UTC timestamps for log records.
//!
//! Every record carries the instant it was sampled, formatted as
//! `YYYY-MM-DDTHH:MM:SS.nnnnnnnnnZ` (nanosecond field always nine digits,
//! zero padded) so that lexicographic order equals chronological order.

use chrono::{DateTime, Utc};

/// Format an instant as `YYYY-MM-DDTHH:MM:SS.nnnnnnnnnZ`.
pub fn format_timestamp(instant: DateTime<Utc>) -> String {
    // %.9f always emits the dot plus exactly nine fractional digits.
    instant.format("%Y-%m-%dT%H:%M:%S%.9fZ").to_string()
}

/// Current wall-clock instant, formatted for a record.
pub fn now_timestamp() -> String {
    format_timestamp(Utc::now())
}
