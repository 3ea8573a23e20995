//! Slack workflow notification dispatcher.
//!
//! Pushes a finished session's summary to a Slack Workflow Builder webhook
//! trigger, at most once per session. Delivery is a single bounded-timeout
//! POST with no retry queue; recovery from a failed delivery is the
//! user-triggered resend. The delivered/recorded steps are two systems with
//! no shared transaction, so a successful POST followed by a failed write is
//! reported as the distinct `PartialFailure` -- a blind retry there would
//! double-post.

use std::time::Duration;

use chrono::{DateTime, Utc};
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::{AttendanceError, Result};
use crate::model::{UserSettings, WorkSession};
use crate::storage::{queries, Config, Database};
use crate::tz;

/// Environment variable consulted when the config file carries no trigger URL.
pub const TRIGGER_URL_ENV: &str = "SLACK_WORKFLOW_TRIGGER_URL";

/// Flat payload for the workflow trigger.
///
/// Workflow Builder's "from a webhook" trigger accepts flat JSON only; the
/// shape and the `YYYY/MM/DD HH:mm:ss` fixed-timezone timestamps are fixed
/// by the receiving workflow.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlackWorkflowPayload {
    pub user_id: String,
    pub dept: String,
    pub project_channel: String,
    pub start_at: String,
    pub end_at: String,
}

impl SlackWorkflowPayload {
    /// Build the payload for a finished session.
    pub fn for_session(session: &WorkSession, recipient_id: &str) -> Result<Self> {
        let end_at = session.end_at.ok_or(AttendanceError::NotFinished)?;
        Ok(Self {
            user_id: recipient_id.to_string(),
            dept: session.dept.clone(),
            project_channel: session.project_channel_id.clone(),
            start_at: tz::format_slack(session.start_at),
            end_at: tz::format_slack(end_at),
        })
    }
}

/// HTTP client for the workflow trigger endpoint.
#[derive(Debug)]
pub struct WorkflowClient {
    trigger_url: String,
    client: Client,
}

impl WorkflowClient {
    /// Create a client for the given trigger URL with a bounded timeout.
    ///
    /// An empty URL is accepted here and reported as missing configuration
    /// when a send is actually attempted.
    pub fn new(trigger_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let trigger_url = trigger_url.into();
        if !trigger_url.is_empty() {
            Url::parse(&trigger_url).map_err(|e| {
                AttendanceError::Config(format!("invalid Slack trigger URL: {e}"))
            })?;
        }
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AttendanceError::Config(e.to_string()))?;
        Ok(Self {
            trigger_url,
            client,
        })
    }

    /// Build from application config, falling back to the
    /// SLACK_WORKFLOW_TRIGGER_URL environment variable.
    pub fn from_config(config: &Config) -> Result<Self> {
        let trigger_url = if config.slack.trigger_url.is_empty() {
            std::env::var(TRIGGER_URL_ENV).unwrap_or_default()
        } else {
            config.slack.trigger_url.clone()
        };
        Self::new(trigger_url, Duration::from_secs(config.slack.timeout_secs))
    }

    pub fn is_configured(&self) -> bool {
        !self.trigger_url.is_empty()
    }

    /// Issue the single outbound POST. Any transport failure, timeout, or
    /// non-success status is `DeliveryFailed`; nothing is left ambiguous.
    fn post(&self, payload: &SlackWorkflowPayload) -> Result<()> {
        if self.trigger_url.is_empty() {
            return Err(AttendanceError::MissingConfiguration(format!(
                "no Slack workflow trigger URL; set slack.trigger_url or {TRIGGER_URL_ENV}"
            )));
        }

        let resp = self
            .client
            .post(&self.trigger_url)
            .json(payload)
            .send()
            .map_err(|e| AttendanceError::DeliveryFailed {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(AttendanceError::DeliveryFailed {
                reason: format!("HTTP {status}: {body}"),
            });
        }
        Ok(())
    }
}

/// Send the session's summary and record the posting time.
///
/// Guard order: ownership, completion, duplicate post, recipient
/// configuration. On `DeliveryFailed` the posted marker stays null and the
/// call may simply be repeated; on `PartialFailure` the summary went out but
/// the marker write failed.
pub fn dispatch(
    db: &Database,
    client: &WorkflowClient,
    user_id: &str,
    session_id: &str,
) -> Result<WorkSession> {
    dispatch_at(db, client, user_id, session_id, Utc::now())
}

pub fn dispatch_at(
    db: &Database,
    client: &WorkflowClient,
    user_id: &str,
    session_id: &str,
    now: DateTime<Utc>,
) -> Result<WorkSession> {
    let mut session =
        queries::get_session(db.conn(), user_id, session_id)?.ok_or(AttendanceError::NotFound)?;
    if session.end_at.is_none() {
        return Err(AttendanceError::NotFinished);
    }
    if session.slack_posted_at.is_some() {
        return Err(AttendanceError::AlreadyPosted);
    }

    let settings = queries::get_settings(db.conn(), user_id)?
        .unwrap_or_else(|| UserSettings::defaults_for(user_id));
    let recipient = settings
        .slack_user_id
        .filter(|id| !id.is_empty())
        .ok_or_else(|| {
            AttendanceError::MissingConfiguration(
                "no Slack recipient configured; set slack_user_id in settings".into(),
            )
        })?;

    let payload = SlackWorkflowPayload::for_session(&session, &recipient)?;
    client.post(&payload)?;

    match queries::mark_slack_posted(db.conn(), session_id, now) {
        Ok(true) => {
            session.slack_posted_at = Some(now);
            Ok(session)
        }
        // The summary went out but the marker did not land (or the row
        // changed underneath us). The caller must be told explicitly.
        Ok(false) => Err(AttendanceError::PartialFailure {
            reason: "posted marker was not written; the session changed underneath".into(),
        }),
        Err(e) => Err(AttendanceError::PartialFailure {
            reason: e.to_string(),
        }),
    }
}
