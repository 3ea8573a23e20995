pub mod breaks;
pub mod catalog;
pub mod clock;
pub mod history;
pub mod settings;
pub mod slack;
pub mod status;

use kintai_core::LifecycleEngine;

/// Resolve the session a break/clock-out command targets: an explicit id or
/// the user's open session.
pub(crate) fn resolve_open_session(
    engine: &LifecycleEngine<'_>,
    user: &str,
    session: Option<String>,
) -> Result<String, Box<dyn std::error::Error>> {
    match session {
        Some(id) => Ok(id),
        None => Ok(engine
            .current_open_session(user)?
            .ok_or("no open work session")?
            .session
            .id),
    }
}
