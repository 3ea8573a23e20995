//! Attendance lifecycle engine.
//!
//! Enforces the legal transitions of the per-user state machine:
//!
//! ```text
//! NOT_STARTED -> WORKING -> ON_BREAK -> WORKING -> FINISHED -> (new clock-in)
//! ```
//!
//! The state is derived, never stored. Exclusivity ("one open session per
//! user", "one open break per session") is enforced by the storage layer's
//! partial unique indexes at insert time; multi-step writes run inside a
//! `BEGIN IMMEDIATE` transaction so a session cannot close underneath a
//! break that is being opened.
//!
//! Every public operation has an `*_at` sibling taking an explicit timestamp;
//! the plain form passes the wall clock.

use chrono::{DateTime, Utc};
use rusqlite::TransactionBehavior;
use uuid::Uuid;

use crate::error::{AttendanceError, Result};
use crate::model::{Break, SessionWithBreaks, WorkSession, WorkStatus};
use crate::storage::{queries, Database};
use crate::tz;

/// Request-scoped lifecycle operations over one database handle.
pub struct LifecycleEngine<'a> {
    db: &'a mut Database,
}

impl<'a> LifecycleEngine<'a> {
    pub fn new(db: &'a mut Database) -> Self {
        Self { db }
    }

    // ── Clock in / out ───────────────────────────────────────────────

    /// Start a new open session for the user.
    ///
    /// Fails with `AlreadyActive` when an open session already exists; the
    /// check is atomic with the insert, so two racing clock-ins cannot both
    /// succeed.
    pub fn clock_in(
        &mut self,
        user_id: &str,
        dept: &str,
        channel_id: &str,
        channel_name: &str,
    ) -> Result<WorkSession> {
        self.clock_in_at(user_id, dept, channel_id, channel_name, Utc::now())
    }

    pub fn clock_in_at(
        &mut self,
        user_id: &str,
        dept: &str,
        channel_id: &str,
        channel_name: &str,
        now: DateTime<Utc>,
    ) -> Result<WorkSession> {
        let session = WorkSession {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            dept: dept.to_string(),
            project_channel_id: channel_id.to_string(),
            project_channel_name: channel_name.to_string(),
            start_at: now,
            end_at: None,
            slack_posted_at: None,
            note: None,
        };
        queries::insert_session(self.db.conn(), &session)?;
        Ok(session)
    }

    /// Close the session, force-closing its open break first so the break
    /// never outlives the session.
    pub fn clock_out(&mut self, user_id: &str, session_id: &str) -> Result<WorkSession> {
        self.clock_out_at(user_id, session_id, Utc::now())
    }

    pub fn clock_out_at(
        &mut self,
        user_id: &str,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<WorkSession> {
        let tx = self
            .db
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let mut session =
            queries::get_session(&tx, user_id, session_id)?.ok_or(AttendanceError::NotFound)?;
        if session.end_at.is_some() {
            return Err(AttendanceError::AlreadyFinished);
        }

        queries::close_open_break(&tx, session_id, now)?;
        queries::set_session_end(&tx, session_id, now)?;
        tx.commit()?;

        session.end_at = Some(now);
        Ok(session)
    }

    // ── Breaks ───────────────────────────────────────────────────────

    /// Open a break on the session.
    ///
    /// The session check and the insert share one immediate transaction:
    /// a concurrent clock-out cannot slip between them.
    pub fn start_break(&mut self, user_id: &str, session_id: &str) -> Result<Break> {
        self.start_break_at(user_id, session_id, Utc::now())
    }

    pub fn start_break_at(
        &mut self,
        user_id: &str,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Break> {
        let tx = self
            .db
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let session =
            queries::get_session(&tx, user_id, session_id)?.ok_or(AttendanceError::NotFound)?;
        if session.end_at.is_some() {
            return Err(AttendanceError::AlreadyFinished);
        }

        let brk = Break {
            id: Uuid::new_v4().to_string(),
            session_id: session_id.to_string(),
            start_at: now,
            end_at: None,
        };
        queries::insert_break(&tx, &brk)?;
        tx.commit()?;
        Ok(brk)
    }

    /// Close the unique open break on the session.
    pub fn end_break(&mut self, user_id: &str, session_id: &str) -> Result<Break> {
        self.end_break_at(user_id, session_id, Utc::now())
    }

    pub fn end_break_at(
        &mut self,
        user_id: &str,
        session_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Break> {
        let tx = self
            .db
            .conn_mut()
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        queries::get_session(&tx, user_id, session_id)?.ok_or(AttendanceError::NotFound)?;
        let brk =
            queries::close_open_break(&tx, session_id, now)?.ok_or(AttendanceError::NotOnBreak)?;
        tx.commit()?;
        Ok(brk)
    }

    // ── Queries ──────────────────────────────────────────────────────

    /// The user's open session with its breaks, if any.
    pub fn current_open_session(&self, user_id: &str) -> Result<Option<SessionWithBreaks>> {
        let Some(session) = queries::open_session(self.db.conn(), user_id)? else {
            return Ok(None);
        };
        let breaks = queries::breaks_for_session(self.db.conn(), &session.id)?;
        Ok(Some(SessionWithBreaks { session, breaks }))
    }

    /// Most recent session finished today (fixed-timezone calendar day).
    ///
    /// Keeps a just-finished session addressable for a late notification
    /// resend after it is no longer "current".
    pub fn todays_finished_session(&self, user_id: &str) -> Result<Option<WorkSession>> {
        self.todays_finished_session_at(user_id, Utc::now())
    }

    pub fn todays_finished_session_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<WorkSession>> {
        queries::finished_session_since(self.db.conn(), user_id, tz::day_start(now))
    }

    /// Derived attendance state for the user.
    pub fn status(&self, user_id: &str) -> Result<WorkStatus> {
        self.status_at(user_id, Utc::now())
    }

    pub fn status_at(&self, user_id: &str, now: DateTime<Utc>) -> Result<WorkStatus> {
        let open = self.current_open_session(user_id)?;
        let finished = match open {
            Some(_) => None,
            None => self.todays_finished_session_at(user_id, now)?,
        };
        Ok(WorkStatus::derive(open.as_ref(), finished.as_ref()))
    }
}
