//! Fixed display timezone.
//!
//! All display formatting and day-boundary computations are anchored to a
//! single fixed offset (Asia/Tokyo). The timezone label in user settings is
//! informational only.

use chrono::{DateTime, FixedOffset, NaiveTime, Utc};

/// Timezone label recorded in user settings.
pub const TZ_LABEL: &str = "Asia/Tokyo";

const JST_OFFSET_SECS: i32 = 9 * 3600;

/// The fixed display offset (UTC+9).
pub fn fixed_offset() -> FixedOffset {
    // In range by construction, east_opt cannot fail here.
    FixedOffset::east_opt(JST_OFFSET_SECS).unwrap()
}

/// Format a timestamp for the Slack workflow trigger: `YYYY/MM/DD HH:mm:ss`
/// in the fixed timezone.
pub fn format_slack(at: DateTime<Utc>) -> String {
    at.with_timezone(&fixed_offset())
        .format("%Y/%m/%d %H:%M:%S")
        .to_string()
}

/// Midnight of `at`'s calendar day in the fixed timezone, expressed in UTC.
///
/// Used as the lower bound when looking up "today's" finished session.
pub fn day_start(at: DateTime<Utc>) -> DateTime<Utc> {
    let local = at.with_timezone(&fixed_offset());
    at - local.time().signed_duration_since(NaiveTime::MIN)
}
