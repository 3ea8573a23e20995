use clap::{Parser, Subcommand};
use kintai_core::Config;

mod commands;

#[derive(Parser)]
#[command(name = "kintai", version, about = "Kintai attendance CLI")]
struct Cli {
    /// Act as this user id (defaults to user.id from config)
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clock in / clock out
    Clock {
        #[command(subcommand)]
        action: commands::clock::ClockAction,
    },
    /// Start or end a break
    Break {
        #[command(subcommand)]
        action: commands::breaks::BreakAction,
    },
    /// Current attendance state
    Status,
    /// Session history with breaks
    History {
        /// Maximum number of sessions
        #[arg(long, default_value_t = kintai_core::history::DEFAULT_HISTORY_LIMIT)]
        limit: u32,
    },
    /// Slack workflow notification
    Slack {
        #[command(subcommand)]
        action: commands::slack::SlackAction,
    },
    /// User settings
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Reference catalogs (departments, project channels)
    Catalog {
        #[command(subcommand)]
        action: commands::catalog::CatalogAction,
    },
}

fn main() {
    let cli = Cli::parse();
    let user = cli
        .user
        .unwrap_or_else(|| Config::load_or_default().user.id);
    if user.trim().is_empty() {
        eprintln!("error: {}", kintai_core::AttendanceError::AuthRequired);
        std::process::exit(1);
    }

    let result = match cli.command {
        Commands::Clock { action } => commands::clock::run(action, &user),
        Commands::Break { action } => commands::breaks::run(action, &user),
        Commands::Status => commands::status::run(&user),
        Commands::History { limit } => commands::history::run(&user, limit),
        Commands::Slack { action } => commands::slack::run(action, &user),
        Commands::Settings { action } => commands::settings::run(action, &user),
        Commands::Catalog { action } => commands::catalog::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
