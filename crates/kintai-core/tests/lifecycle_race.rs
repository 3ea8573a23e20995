//! Exclusivity under concurrent writers.
//!
//! The open-session and open-break invariants are check-then-act conditions;
//! these tests hammer them from multiple connections to the same on-disk
//! database and assert that the storage-level constraints admit exactly one
//! winner.

use std::sync::{Arc, Barrier};
use std::thread;

use kintai_core::{AttendanceError, Database, LifecycleEngine};

const WRITERS: usize = 8;

fn spawn_writers<F, T>(path: std::path::PathBuf, op: F) -> Vec<Result<T, AttendanceError>>
where
    F: Fn(&mut LifecycleEngine) -> Result<T, AttendanceError> + Send + Sync + 'static,
    T: Send + 'static,
{
    let barrier = Arc::new(Barrier::new(WRITERS));
    let op = Arc::new(op);
    let mut handles = Vec::new();
    for _ in 0..WRITERS {
        let path = path.clone();
        let barrier = Arc::clone(&barrier);
        let op = Arc::clone(&op);
        handles.push(thread::spawn(move || {
            let mut db = Database::open_path(&path).unwrap();
            let mut engine = LifecycleEngine::new(&mut db);
            barrier.wait();
            op(&mut engine)
        }));
    }
    handles.into_iter().map(|h| h.join().unwrap()).collect()
}

#[test]
fn concurrent_clock_ins_admit_exactly_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kintai.db");
    drop(Database::open_path(&path).unwrap()); // create the schema once

    let results = spawn_writers(path.clone(), |engine| {
        engine.clock_in("u1", "product", "C0123ABCDE", "#20_product")
    });

    let mut accepted = 0;
    let mut rejected = 0;
    for result in results {
        match result {
            Ok(_) => accepted += 1,
            Err(AttendanceError::AlreadyActive) => rejected += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(accepted, 1);
    assert_eq!(rejected, WRITERS - 1);

    // Invariant holds in the store itself.
    let mut db = Database::open_path(&path).unwrap();
    let engine = LifecycleEngine::new(&mut db);
    assert!(engine.current_open_session("u1").unwrap().is_some());
}

#[test]
fn concurrent_break_starts_admit_exactly_one() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("kintai.db");

    let session_id = {
        let mut db = Database::open_path(&path).unwrap();
        let mut engine = LifecycleEngine::new(&mut db);
        engine
            .clock_in("u1", "product", "C0123ABCDE", "#20_product")
            .unwrap()
            .id
    };

    let sid = session_id.clone();
    let results = spawn_writers(path.clone(), move |engine| engine.start_break("u1", &sid));

    let mut accepted = 0;
    let mut rejected = 0;
    for result in results {
        match result {
            Ok(_) => accepted += 1,
            Err(AttendanceError::AlreadyOnBreak) => rejected += 1,
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(accepted, 1);
    assert_eq!(rejected, WRITERS - 1);

    let mut db = Database::open_path(&path).unwrap();
    let engine = LifecycleEngine::new(&mut db);
    let open = engine.current_open_session("u1").unwrap().unwrap();
    assert_eq!(open.breaks.iter().filter(|b| b.is_open()).count(), 1);
}
