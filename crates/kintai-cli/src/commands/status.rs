use kintai_core::{duration, Database, LifecycleEngine, SessionWithBreaks, WorkSession, WorkStatus};
use serde::Serialize;

/// Snapshot printed by `kintai status`.
#[derive(Serialize)]
struct StatusReport {
    status: WorkStatus,
    session: Option<SessionWithBreaks>,
    /// Closed break minutes accumulated so far on the open session.
    break_minutes: Option<i64>,
    finished_today: Option<WorkSession>,
    /// Worked minutes of today's finished session.
    work_minutes: Option<i64>,
}

pub fn run(user: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut db = Database::open()?;
    let engine = LifecycleEngine::new(&mut db);

    let session = engine.current_open_session(user)?;
    let finished_today = match session {
        Some(_) => None,
        None => engine.todays_finished_session(user)?,
    };
    let status = WorkStatus::derive(session.as_ref(), finished_today.as_ref());

    let break_minutes = match &session {
        Some(s) => surfaced(duration::break_minutes(&s.breaks).map(Some)),
        None => None,
    };
    let work_minutes = match &finished_today {
        Some(s) => {
            // Breaks of a finished session still count against it.
            let breaks = kintai_core::history::history(&db, user, 1)?
                .into_iter()
                .find(|e| e.session.id == s.id)
                .map(|e| e.breaks)
                .unwrap_or_default();
            surfaced(duration::work_minutes(s, &breaks))
        }
        None => None,
    };

    let report = StatusReport {
        status,
        session,
        break_minutes,
        finished_today,
        work_minutes,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}

/// Print an integrity warning instead of failing the whole status read.
fn surfaced(result: kintai_core::Result<Option<i64>>) -> Option<i64> {
    match result {
        Ok(v) => v,
        Err(e) => {
            eprintln!("warning: {e}");
            None
        }
    }
}
