use clap::Subcommand;
use kintai_core::catalog;

#[derive(Subcommand)]
pub enum CatalogAction {
    /// List department ids and names
    Depts,
    /// List project channel ids and names
    Channels,
}

pub fn run(action: CatalogAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        CatalogAction::Depts => {
            println!("{}", serde_json::to_string_pretty(catalog::DEPARTMENTS)?);
        }
        CatalogAction::Channels => {
            println!("{}", serde_json::to_string_pretty(catalog::PROJECT_CHANNELS)?);
        }
    }
    Ok(())
}
