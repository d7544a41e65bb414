//! Wall-clock timestamps.
//!
//! Historical snapshots and GUI updates are stamped with local time at
//! millisecond precision, `YYYY-MM-DD HH:MM:SS.mmm`. The millisecond field is
//! always three zero-padded digits.

use chrono::{DateTime, Local, TimeZone};

/// `strftime` pattern used for every desk timestamp.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

/// Current local time formatted with [`TIMESTAMP_FORMAT`].
pub fn timestamp() -> String {
    format_timestamp(&Local::now())
}

/// Formats any zoned time with [`TIMESTAMP_FORMAT`].
///
/// ```
/// use bond_core::time::format_timestamp;
/// use chrono::{TimeZone, Utc};
///
/// let t = Utc.with_ymd_and_hms(2024, 3, 5, 9, 7, 2).unwrap()
///     + chrono::Duration::milliseconds(4);
/// assert_eq!(format_timestamp(&t), "2024-03-05 09:07:02.004");
/// ```
pub fn format_timestamp<Tz: TimeZone>(time: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    time.format(TIMESTAMP_FORMAT).to_string()
}

/// Milliseconds since the Unix epoch.
pub fn millis_now() -> i64 {
    Local::now().timestamp_millis()
}
