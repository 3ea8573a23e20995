//! Read-only reporting projection.
//!
//! Batches sessions with their breaks; no invariant enforcement happens
//! here.

use std::collections::HashMap;

use crate::error::Result;
use crate::model::{Break, SessionWithBreaks};
use crate::storage::{queries, Database};

/// Default number of sessions returned when the caller does not say.
pub const DEFAULT_HISTORY_LIMIT: u32 = 30;

/// Up to `limit` of the user's sessions, newest first, each joined with its
/// breaks ascending by start. Breaks are fetched in one batch query.
pub fn history(db: &Database, user_id: &str, limit: u32) -> Result<Vec<SessionWithBreaks>> {
    let sessions = queries::recent_sessions(db.conn(), user_id, limit)?;
    if sessions.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<String> = sessions.iter().map(|s| s.id.clone()).collect();
    let mut by_session: HashMap<String, Vec<Break>> = HashMap::new();
    for brk in queries::breaks_for_sessions(db.conn(), &ids)? {
        by_session.entry(brk.session_id.clone()).or_default().push(brk);
    }

    Ok(sessions
        .into_iter()
        .map(|session| {
            let breaks = by_session.remove(&session.id).unwrap_or_default();
            SessionWithBreaks { session, breaks }
        })
        .collect())
}
