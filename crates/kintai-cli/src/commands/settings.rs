use clap::Subcommand;
use kintai_core::{settings, Database};

#[derive(Subcommand)]
pub enum SettingsAction {
    /// Show the user's settings
    Show,
    /// Set the Slack recipient id used in the workflow payload
    Set {
        /// Slack member id (starts with U)
        #[arg(long)]
        slack_user_id: String,
    },
}

pub fn run(action: SettingsAction, user: &str) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    let settings = match action {
        SettingsAction::Show => settings::get(&db, user)?,
        SettingsAction::Set { slack_user_id } => settings::save(&db, user, &slack_user_id)?,
    };
    println!("{}", serde_json::to_string_pretty(&settings)?);
    Ok(())
}
