//! Attendance data model.
//!
//! Lifecycle state is never stored: `WorkStatus` is recomputed on every read
//! from the nullable `end_at` fields of the session and its breaks, so the
//! records themselves remain the single source of truth.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One contiguous clock-in-to-clock-out attendance record.
///
/// `end_at = None` means the session is open (in progress);
/// `slack_posted_at = None` means the summary has not been sent yet.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkSession {
    pub id: String,
    pub user_id: String,
    pub dept: String,
    pub project_channel_id: String,
    pub project_channel_name: String,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
    pub slack_posted_at: Option<DateTime<Utc>>,
    pub note: Option<String>,
}

impl WorkSession {
    pub fn is_open(&self) -> bool {
        self.end_at.is_none()
    }
}

/// One contiguous interruption within an open session.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Break {
    pub id: String,
    pub session_id: String,
    pub start_at: DateTime<Utc>,
    pub end_at: Option<DateTime<Utc>>,
}

impl Break {
    pub fn is_open(&self) -> bool {
        self.end_at.is_none()
    }
}

/// A session joined with its breaks, ascending by break start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionWithBreaks {
    #[serde(flatten)]
    pub session: WorkSession,
    pub breaks: Vec<Break>,
}

impl SessionWithBreaks {
    pub fn open_break(&self) -> Option<&Break> {
        self.breaks.iter().find(|b| b.is_open())
    }
}

/// Per-user settings record. Read-only from the lifecycle's perspective;
/// the only write path is [`crate::settings::save`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserSettings {
    pub user_id: String,
    pub timezone: String,
    pub slack_user_id: Option<String>,
}

impl UserSettings {
    /// Settings used when no record exists yet.
    pub fn defaults_for(user_id: &str) -> Self {
        Self {
            user_id: user_id.to_string(),
            timezone: crate::tz::TZ_LABEL.to_string(),
            slack_user_id: None,
        }
    }
}

/// Derived per-user attendance state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkStatus {
    NotStarted,
    Working,
    OnBreak,
    Finished,
}

impl WorkStatus {
    /// Recompute the state from the presence of an open session / open break
    /// and of a session finished today.
    pub fn derive(
        open: Option<&SessionWithBreaks>,
        finished_today: Option<&WorkSession>,
    ) -> Self {
        match open {
            Some(s) if s.open_break().is_some() => WorkStatus::OnBreak,
            Some(_) => WorkStatus::Working,
            None if finished_today.is_some() => WorkStatus::Finished,
            None => WorkStatus::NotStarted,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn session(end: Option<DateTime<Utc>>) -> WorkSession {
        WorkSession {
            id: "s1".into(),
            user_id: "u1".into(),
            dept: "product".into(),
            project_channel_id: "C0123ABCDE".into(),
            project_channel_name: "#20_product".into(),
            start_at: Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap(),
            end_at: end,
            slack_posted_at: None,
            note: None,
        }
    }

    fn brk(end: Option<DateTime<Utc>>) -> Break {
        Break {
            id: "b1".into(),
            session_id: "s1".into(),
            start_at: Utc.with_ymd_and_hms(2025, 3, 10, 3, 0, 0).unwrap(),
            end_at: end,
        }
    }

    #[test]
    fn status_walks_the_state_machine() {
        assert_eq!(WorkStatus::derive(None, None), WorkStatus::NotStarted);

        let working = SessionWithBreaks {
            session: session(None),
            breaks: vec![],
        };
        assert_eq!(WorkStatus::derive(Some(&working), None), WorkStatus::Working);

        let on_break = SessionWithBreaks {
            session: session(None),
            breaks: vec![brk(None)],
        };
        assert_eq!(
            WorkStatus::derive(Some(&on_break), None),
            WorkStatus::OnBreak
        );

        let back = SessionWithBreaks {
            session: session(None),
            breaks: vec![brk(Some(Utc.with_ymd_and_hms(2025, 3, 10, 3, 30, 0).unwrap()))],
        };
        assert_eq!(WorkStatus::derive(Some(&back), None), WorkStatus::Working);

        let finished = session(Some(Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap()));
        assert_eq!(
            WorkStatus::derive(None, Some(&finished)),
            WorkStatus::Finished
        );
    }

    #[test]
    fn status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&WorkStatus::OnBreak).unwrap(),
            "\"on_break\""
        );
    }
}
