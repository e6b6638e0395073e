//! Time and timestamp helpers.

use chrono::{DateTime, SecondsFormat, Utc};

/// UTC timestamp used for `last_changed` and `last_updated`.
pub type Timestamp = DateTime<Utc>;

/// Format a timestamp as ISO-8601 with an explicit `+00:00` offset.
///
/// The fraction is omitted on whole seconds and otherwise always written
/// with six digits (`12:30:05.250000`).
#[must_use]
pub fn to_iso8601(ts: &Timestamp) -> String {
    let precision = if ts.timestamp_subsec_micros() == 0 {
        SecondsFormat::Secs
    } else {
        SecondsFormat::Micros
    };
    ts.to_rfc3339_opts(precision, false)
}
