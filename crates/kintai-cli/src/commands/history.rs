use kintai_core::{duration, history, Database, SessionWithBreaks};
use serde::Serialize;

#[derive(Serialize)]
struct HistoryEntry {
    #[serde(flatten)]
    entry: SessionWithBreaks,
    work_minutes: Option<i64>,
    break_minutes: Option<i64>,
}

pub fn run(user: &str, limit: u32) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    let entries: Vec<HistoryEntry> = history::history(&db, user, limit)?
        .into_iter()
        .map(|entry| {
            let work_minutes = surfaced(duration::work_minutes(&entry.session, &entry.breaks));
            let break_minutes = surfaced(duration::break_minutes(&entry.breaks).map(Some));
            HistoryEntry {
                entry,
                work_minutes,
                break_minutes,
            }
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&entries)?);
    Ok(())
}

/// Print an integrity warning instead of failing the whole listing.
fn surfaced(result: kintai_core::Result<Option<i64>>) -> Option<i64> {
    match result {
        Ok(v) => v,
        Err(e) => {
            eprintln!("warning: {e}");
            None
        }
    }
}
