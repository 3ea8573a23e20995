mod config;
pub mod database;
pub(crate) mod queries;

pub use config::Config;
pub use database::Database;

use std::path::PathBuf;

use crate::error::Result;

/// Returns `~/.config/kintai[-dev]/` based on KINTAI_ENV.
///
/// Set KINTAI_ENV=dev to use a separate development data directory.
pub fn data_dir() -> Result<PathBuf> {
    let base_dir = dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config");

    let env = std::env::var("KINTAI_ENV").unwrap_or_else(|_| "production".to_string());

    let dir = if env == "dev" {
        base_dir.join("kintai-dev")
    } else {
        base_dir.join("kintai")
    };

    std::fs::create_dir_all(&dir)?;
    Ok(dir)
}
