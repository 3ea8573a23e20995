use clap::Subcommand;
use kintai_core::{catalog, Database, LifecycleEngine};

#[derive(Subcommand)]
pub enum ClockAction {
    /// Start a work session
    In {
        /// Department id (see `kintai catalog depts`)
        #[arg(long)]
        dept: String,
        /// Project channel id (see `kintai catalog channels`)
        #[arg(long)]
        channel: String,
    },
    /// End the open work session
    Out {
        /// Session id (defaults to the open session)
        #[arg(long)]
        session: Option<String>,
    },
}

pub fn run(action: ClockAction, user: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open()?;
    let mut engine = LifecycleEngine::new(&mut db);

    match action {
        ClockAction::In { dept, channel } => {
            let dept = catalog::department_by_id(&dept)
                .ok_or_else(|| format!("unknown department id: {dept}"))?;
            let channel = catalog::project_channel_by_id(&channel)
                .ok_or_else(|| format!("unknown project channel id: {channel}"))?;

            let session = engine.clock_in(user, dept.id, channel.id, channel.name)?;
            println!("{}", serde_json::to_string_pretty(&session)?);
        }
        ClockAction::Out { session } => {
            let session_id = super::resolve_open_session(&engine, user, session)?;
            let session = engine.clock_out(user, &session_id)?;
            println!("{}", serde_json::to_string_pretty(&session)?);
            eprintln!("clocked out; post the summary with `kintai slack send`");
        }
    }
    Ok(())
}
