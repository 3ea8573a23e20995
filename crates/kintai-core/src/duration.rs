//! Derived time accounting.
//!
//! Work minutes are computed from the raw timestamps on every read; nothing
//! derived is ever stored. Whole-minute truncation, no rounding. A negative
//! figure means the underlying records contradict an invariant and is
//! surfaced as an error rather than clamped.

use crate::error::{AttendanceError, Result};
use crate::model::{Break, WorkSession};

/// Sum of the closed breaks' durations in whole minutes.
///
/// Open breaks contribute zero: their duration is not yet determined.
pub fn break_minutes(breaks: &[Break]) -> Result<i64> {
    let mut total = 0;
    for brk in breaks {
        let Some(end) = brk.end_at else {
            continue;
        };
        let minutes = (end - brk.start_at).num_minutes();
        if minutes < 0 {
            return Err(AttendanceError::InvariantViolation(format!(
                "break {} ends before it starts",
                brk.id
            )));
        }
        total += minutes;
    }
    Ok(total)
}

/// Minutes worked: elapsed session span minus closed break time.
///
/// `None` while the session is still open.
pub fn work_minutes(session: &WorkSession, breaks: &[Break]) -> Result<Option<i64>> {
    let Some(end) = session.end_at else {
        return Ok(None);
    };

    let elapsed = (end - session.start_at).num_minutes();
    if elapsed < 0 {
        return Err(AttendanceError::InvariantViolation(format!(
            "session {} ends before it starts",
            session.id
        )));
    }

    let worked = elapsed - break_minutes(breaks)?;
    if worked < 0 {
        return Err(AttendanceError::InvariantViolation(format!(
            "session {} has more break time than elapsed time",
            session.id
        )));
    }
    Ok(Some(worked))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use proptest::prelude::*;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 10, h, m, 0).unwrap()
    }

    fn session(start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> WorkSession {
        WorkSession {
            id: "s1".into(),
            user_id: "u1".into(),
            dept: "product".into(),
            project_channel_id: "C0123ABCDE".into(),
            project_channel_name: "#20_product".into(),
            start_at: start,
            end_at: end,
            slack_posted_at: None,
            note: None,
        }
    }

    fn brk(id: &str, start: DateTime<Utc>, end: Option<DateTime<Utc>>) -> Break {
        Break {
            id: id.into(),
            session_id: "s1".into(),
            start_at: start,
            end_at: end,
        }
    }

    #[test]
    fn nine_to_six_with_two_breaks_is_500_minutes() {
        let session = session(at(9, 0), Some(at(18, 0)));
        let breaks = vec![
            brk("b1", at(12, 0), Some(at(12, 30))),
            brk("b2", at(15, 0), Some(at(15, 10))),
        ];
        assert_eq!(work_minutes(&session, &breaks).unwrap(), Some(500));
    }

    #[test]
    fn open_session_has_no_work_minutes() {
        let session = session(at(9, 0), None);
        assert_eq!(work_minutes(&session, &[]).unwrap(), None);
    }

    #[test]
    fn open_break_contributes_zero() {
        let session = session(at(9, 0), Some(at(18, 0)));
        let breaks = vec![brk("b1", at(12, 0), None)];
        assert_eq!(work_minutes(&session, &breaks).unwrap(), Some(540));
    }

    #[test]
    fn sub_minute_remainders_truncate() {
        let start = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 30).unwrap();
        let end = Utc.with_ymd_and_hms(2025, 3, 10, 9, 2, 29).unwrap();
        let session = session(start, Some(end));
        assert_eq!(work_minutes(&session, &[]).unwrap(), Some(1));
    }

    #[test]
    fn end_before_start_is_surfaced() {
        let session = session(at(18, 0), Some(at(9, 0)));
        assert!(matches!(
            work_minutes(&session, &[]).unwrap_err(),
            AttendanceError::InvariantViolation(_)
        ));

        let breaks = vec![brk("b1", at(12, 30), Some(at(12, 0)))];
        assert!(matches!(
            break_minutes(&breaks).unwrap_err(),
            AttendanceError::InvariantViolation(_)
        ));
    }

    #[test]
    fn breaks_longer_than_session_are_surfaced() {
        let session = session(at(9, 0), Some(at(9, 30)));
        let breaks = vec![brk("b1", at(9, 0), Some(at(10, 30)))];
        assert!(matches!(
            work_minutes(&session, &breaks).unwrap_err(),
            AttendanceError::InvariantViolation(_)
        ));
    }

    proptest! {
        /// Work minutes do not depend on the order of non-overlapping
        /// closed breaks.
        #[test]
        fn invariant_to_break_order(perm in 0usize..6) {
            let mut breaks = vec![
                brk("b1", at(10, 0), Some(at(10, 10))),
                brk("b2", at(12, 0), Some(at(12, 30))),
                brk("b3", at(15, 0), Some(at(15, 5))),
            ];
            let len = breaks.len();
            breaks.rotate_left(perm % len);
            if perm >= 3 {
                breaks.swap(0, 1);
            }
            let session = session(at(9, 0), Some(at(18, 0)));
            prop_assert_eq!(work_minutes(&session, &breaks).unwrap(), Some(540 - 45));
        }
    }
}
