use clap::Subcommand;
use kintai_core::{notify, AttendanceError, Config, Database, LifecycleEngine, WorkflowClient};
use serde::Serialize;

#[derive(Subcommand)]
pub enum SlackAction {
    /// Send (or resend) a finished session's summary to the workflow webhook
    Send {
        /// Session id (defaults to today's finished session)
        #[arg(long)]
        session: Option<String>,
    },
}

#[derive(Serialize)]
struct SendReport {
    posted: bool,
    session_id: String,
    slack_posted_at: Option<chrono::DateTime<chrono::Utc>>,
}

pub fn run(action: SlackAction, user: &str) -> Result<(), Box<dyn std::error::Error>> {
    let SlackAction::Send { session } = action;

    let mut db = Database::open()?;
    let session_id = {
        let engine = LifecycleEngine::new(&mut db);
        match session {
            Some(id) => id,
            None => engine
                .todays_finished_session(user)?
                .ok_or("no finished session today; clock out first or pass --session")?
                .id,
        }
    };

    let client = WorkflowClient::from_config(&Config::load_or_default())?;
    match notify::dispatch(&db, &client, user, &session_id) {
        Ok(session) => {
            let report = SendReport {
                posted: true,
                session_id: session.id.clone(),
                slack_posted_at: session.slack_posted_at,
            };
            println!("{}", serde_json::to_string_pretty(&report)?);
            Ok(())
        }
        Err(e @ AttendanceError::DeliveryFailed { .. }) => {
            eprintln!("nothing was posted or recorded; retry with `kintai slack send`");
            Err(e.into())
        }
        Err(e @ AttendanceError::PartialFailure { .. }) => {
            eprintln!(
                "warning: the summary WAS delivered; do not resend blindly, \
                 check the session record first"
            );
            Err(e.into())
        }
        Err(e) => Err(e.into()),
    }
}
