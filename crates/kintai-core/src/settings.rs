//! Per-user settings access.
//!
//! Reads fall back to defaults (fixed timezone, no recipient). The single
//! write path validates the Slack member id format before persisting.

use crate::error::{AttendanceError, Result};
use crate::model::UserSettings;
use crate::storage::{queries, Database};

/// The user's settings, or defaults when no record exists yet.
pub fn get(db: &Database, user_id: &str) -> Result<UserSettings> {
    Ok(queries::get_settings(db.conn(), user_id)?
        .unwrap_or_else(|| UserSettings::defaults_for(user_id)))
}

/// Persist the user's Slack recipient id (upsert).
pub fn save(db: &Database, user_id: &str, slack_user_id: &str) -> Result<UserSettings> {
    let slack_user_id = slack_user_id.trim();
    validate_slack_user_id(slack_user_id)?;

    let mut settings = get(db, user_id)?;
    settings.slack_user_id = Some(slack_user_id.to_string());
    queries::upsert_settings(db.conn(), &settings)?;
    Ok(settings)
}

/// Slack member ids start with `U` followed by alphanumerics.
fn validate_slack_user_id(id: &str) -> Result<()> {
    let valid = id.len() >= 2
        && id.starts_with('U')
        && id.chars().all(|c| c.is_ascii_alphanumeric());
    if valid {
        Ok(())
    } else {
        Err(AttendanceError::InvalidValue {
            field: "slack_user_id",
            message: format!("'{id}' is not a Slack member id (expected U followed by alphanumerics)"),
        })
    }
}
