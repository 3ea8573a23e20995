use clap::Subcommand;
use kintai_core::{Database, LifecycleEngine};

#[derive(Subcommand)]
pub enum BreakAction {
    /// Start a break on the open session
    Start {
        /// Session id (defaults to the open session)
        #[arg(long)]
        session: Option<String>,
    },
    /// End the break in progress
    End {
        /// Session id (defaults to the open session)
        #[arg(long)]
        session: Option<String>,
    },
}

pub fn run(action: BreakAction, user: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open()?;
    let mut engine = LifecycleEngine::new(&mut db);

    match action {
        BreakAction::Start { session } => {
            let session_id = super::resolve_open_session(&engine, user, session)?;
            let brk = engine.start_break(user, &session_id)?;
            println!("{}", serde_json::to_string_pretty(&brk)?);
        }
        BreakAction::End { session } => {
            let session_id = super::resolve_open_session(&engine, user, session)?;
            let brk = engine.end_break(user, &session_id)?;
            println!("{}", serde_json::to_string_pretty(&brk)?);
        }
    }
    Ok(())
}
