//! Row-level queries for the session store.
//!
//! Every helper takes a `&Connection` so it composes inside transactions
//! (`rusqlite::Transaction` derefs to `Connection`). Timestamps are stored
//! as RFC 3339 UTC strings; with a fixed `+00:00` offset they compare and
//! sort correctly as text.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::error::{map_unique_violation, AttendanceError, Result};
use crate::model::{Break, UserSettings, WorkSession};

const SESSION_COLS: &str =
    "id, user_id, dept, project_channel_id, project_channel_name, start_at, end_at, slack_posted_at, note";

fn encode_ts(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

fn parse_ts(idx: usize, value: String) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(&value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn parse_ts_opt(idx: usize, value: Option<String>) -> rusqlite::Result<Option<DateTime<Utc>>> {
    value.map(|v| parse_ts(idx, v)).transpose()
}

fn session_from_row(row: &Row) -> rusqlite::Result<WorkSession> {
    Ok(WorkSession {
        id: row.get(0)?,
        user_id: row.get(1)?,
        dept: row.get(2)?,
        project_channel_id: row.get(3)?,
        project_channel_name: row.get(4)?,
        start_at: parse_ts(5, row.get(5)?)?,
        end_at: parse_ts_opt(6, row.get(6)?)?,
        slack_posted_at: parse_ts_opt(7, row.get(7)?)?,
        note: row.get(8)?,
    })
}

fn break_from_row(row: &Row) -> rusqlite::Result<Break> {
    Ok(Break {
        id: row.get(0)?,
        session_id: row.get(1)?,
        start_at: parse_ts(2, row.get(2)?)?,
        end_at: parse_ts_opt(3, row.get(3)?)?,
    })
}

// ── Sessions ─────────────────────────────────────────────────────────

/// Insert a new session. A second open session for the same user trips the
/// partial unique index and is reported as `AlreadyActive`.
pub(crate) fn insert_session(conn: &Connection, session: &WorkSession) -> Result<()> {
    conn.execute(
        "INSERT INTO work_sessions
             (id, user_id, dept, project_channel_id, project_channel_name,
              start_at, end_at, slack_posted_at, note)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            session.id,
            session.user_id,
            session.dept,
            session.project_channel_id,
            session.project_channel_name,
            encode_ts(session.start_at),
            session.end_at.map(encode_ts),
            session.slack_posted_at.map(encode_ts),
            session.note,
        ],
    )
    .map_err(|e| map_unique_violation(e, AttendanceError::AlreadyActive))?;
    Ok(())
}

/// Fetch a session by id, scoped to its owner.
pub(crate) fn get_session(
    conn: &Connection,
    user_id: &str,
    session_id: &str,
) -> Result<Option<WorkSession>> {
    let session = conn
        .query_row(
            &format!("SELECT {SESSION_COLS} FROM work_sessions WHERE id = ?1 AND user_id = ?2"),
            params![session_id, user_id],
            session_from_row,
        )
        .optional()?;
    Ok(session)
}

/// The user's open session, if any (unique by construction).
pub(crate) fn open_session(conn: &Connection, user_id: &str) -> Result<Option<WorkSession>> {
    let session = conn
        .query_row(
            &format!(
                "SELECT {SESSION_COLS} FROM work_sessions
                 WHERE user_id = ?1 AND end_at IS NULL"
            ),
            params![user_id],
            session_from_row,
        )
        .optional()?;
    Ok(session)
}

/// Set a session's end. Guarded so a finished session is never re-closed;
/// reports whether a row changed.
pub(crate) fn set_session_end(
    conn: &Connection,
    session_id: &str,
    end_at: DateTime<Utc>,
) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE work_sessions SET end_at = ?1 WHERE id = ?2 AND end_at IS NULL",
        params![encode_ts(end_at), session_id],
    )?;
    Ok(changed == 1)
}

/// Most recent finished session whose start falls at or after `since`.
pub(crate) fn finished_session_since(
    conn: &Connection,
    user_id: &str,
    since: DateTime<Utc>,
) -> Result<Option<WorkSession>> {
    let session = conn
        .query_row(
            &format!(
                "SELECT {SESSION_COLS} FROM work_sessions
                 WHERE user_id = ?1 AND end_at IS NOT NULL AND start_at >= ?2
                 ORDER BY start_at DESC LIMIT 1"
            ),
            params![user_id, encode_ts(since)],
            session_from_row,
        )
        .optional()?;
    Ok(session)
}

/// The user's sessions, newest first.
pub(crate) fn recent_sessions(
    conn: &Connection,
    user_id: &str,
    limit: u32,
) -> Result<Vec<WorkSession>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {SESSION_COLS} FROM work_sessions
         WHERE user_id = ?1
         ORDER BY start_at DESC LIMIT ?2"
    ))?;
    let rows = stmt.query_map(params![user_id, limit], session_from_row)?;
    let mut sessions = Vec::new();
    for row in rows {
        sessions.push(row?);
    }
    Ok(sessions)
}

/// Record that the summary was posted. Fires at most once per session and
/// only after the session is finished; reports whether a row changed.
pub(crate) fn mark_slack_posted(
    conn: &Connection,
    session_id: &str,
    posted_at: DateTime<Utc>,
) -> Result<bool> {
    let changed = conn.execute(
        "UPDATE work_sessions SET slack_posted_at = ?1
         WHERE id = ?2 AND slack_posted_at IS NULL AND end_at IS NOT NULL",
        params![encode_ts(posted_at), session_id],
    )?;
    Ok(changed == 1)
}

// ── Breaks ───────────────────────────────────────────────────────────

/// Insert a new break. A second open break on the same session trips the
/// partial unique index and is reported as `AlreadyOnBreak`.
pub(crate) fn insert_break(conn: &Connection, brk: &Break) -> Result<()> {
    conn.execute(
        "INSERT INTO breaks (id, session_id, start_at, end_at) VALUES (?1, ?2, ?3, ?4)",
        params![
            brk.id,
            brk.session_id,
            encode_ts(brk.start_at),
            brk.end_at.map(encode_ts),
        ],
    )
    .map_err(|e| map_unique_violation(e, AttendanceError::AlreadyOnBreak))?;
    Ok(())
}

/// Close the session's open break if one exists, returning the closed break.
pub(crate) fn close_open_break(
    conn: &Connection,
    session_id: &str,
    end_at: DateTime<Utc>,
) -> Result<Option<Break>> {
    let open = conn
        .query_row(
            "SELECT id, session_id, start_at, end_at FROM breaks
             WHERE session_id = ?1 AND end_at IS NULL",
            params![session_id],
            break_from_row,
        )
        .optional()?;

    let Some(mut brk) = open else {
        return Ok(None);
    };

    conn.execute(
        "UPDATE breaks SET end_at = ?1 WHERE id = ?2",
        params![encode_ts(end_at), brk.id],
    )?;
    brk.end_at = Some(end_at);
    Ok(Some(brk))
}

/// All breaks of one session, ascending by start.
pub(crate) fn breaks_for_session(conn: &Connection, session_id: &str) -> Result<Vec<Break>> {
    let mut stmt = conn.prepare(
        "SELECT id, session_id, start_at, end_at FROM breaks
         WHERE session_id = ?1 ORDER BY start_at ASC",
    )?;
    let rows = stmt.query_map(params![session_id], break_from_row)?;
    let mut breaks = Vec::new();
    for row in rows {
        breaks.push(row?);
    }
    Ok(breaks)
}

/// Breaks for a batch of sessions in one query, ascending by start.
pub(crate) fn breaks_for_sessions(conn: &Connection, session_ids: &[String]) -> Result<Vec<Break>> {
    if session_ids.is_empty() {
        return Ok(Vec::new());
    }

    let placeholders = (1..=session_ids.len())
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ");
    let mut stmt = conn.prepare(&format!(
        "SELECT id, session_id, start_at, end_at FROM breaks
         WHERE session_id IN ({placeholders}) ORDER BY start_at ASC"
    ))?;
    let rows = stmt.query_map(
        rusqlite::params_from_iter(session_ids.iter()),
        break_from_row,
    )?;
    let mut breaks = Vec::new();
    for row in rows {
        breaks.push(row?);
    }
    Ok(breaks)
}

// ── Settings ─────────────────────────────────────────────────────────

pub(crate) fn get_settings(conn: &Connection, user_id: &str) -> Result<Option<UserSettings>> {
    let settings = conn
        .query_row(
            "SELECT user_id, timezone, slack_user_id FROM user_settings WHERE user_id = ?1",
            params![user_id],
            |row| {
                Ok(UserSettings {
                    user_id: row.get(0)?,
                    timezone: row.get(1)?,
                    slack_user_id: row.get(2)?,
                })
            },
        )
        .optional()?;
    Ok(settings)
}

pub(crate) fn upsert_settings(conn: &Connection, settings: &UserSettings) -> Result<()> {
    conn.execute(
        "INSERT INTO user_settings (user_id, timezone, slack_user_id)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(user_id) DO UPDATE SET
             timezone = excluded.timezone,
             slack_user_id = excluded.slack_user_id",
        params![settings.user_id, settings.timezone, settings.slack_user_id],
    )?;
    Ok(())
}
