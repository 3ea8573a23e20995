//! Webhook dispatch tests against a mock HTTP server.

use std::time::Duration;

use chrono::{TimeZone, Utc};
use kintai_core::{notify, settings, AttendanceError, Database, LifecycleEngine, WorkflowClient};
use serde_json::json;

/// Clock in at 09:00 and out at 18:00 JST; returns the session id.
fn finished_session(db: &mut Database) -> String {
    let start = Utc.with_ymd_and_hms(2025, 3, 10, 0, 0, 0).unwrap();
    let end = Utc.with_ymd_and_hms(2025, 3, 10, 9, 0, 0).unwrap();
    let mut engine = LifecycleEngine::new(db);
    let session = engine
        .clock_in_at("u1", "product", "C0123ABCDE", "#20_product", start)
        .unwrap();
    engine.clock_out_at("u1", &session.id, end).unwrap();
    session.id
}

fn posted_at(db: &Database, session_id: &str) -> Option<chrono::DateTime<Utc>> {
    kintai_core::history::history(db, "u1", 10)
        .unwrap()
        .into_iter()
        .find(|s| s.session.id == session_id)
        .unwrap()
        .session
        .slack_posted_at
}

fn client_for(server: &mockito::Server) -> WorkflowClient {
    WorkflowClient::new(server.url(), Duration::from_secs(5)).unwrap()
}

#[test]
fn successful_dispatch_posts_flat_payload_and_records_once() {
    let mut server = mockito::Server::new();
    let mock = server
        .mock("POST", "/")
        .match_header("content-type", "application/json")
        .match_body(mockito::Matcher::Json(json!({
            "user_id": "U123ABC45",
            "dept": "product",
            "project_channel": "C0123ABCDE",
            "start_at": "2025/03/10 09:00:00",
            "end_at": "2025/03/10 18:00:00",
        })))
        .with_status(200)
        .expect(1)
        .create();

    let mut db = Database::open_memory().unwrap();
    let session_id = finished_session(&mut db);
    settings::save(&db, "u1", "U123ABC45").unwrap();

    let client = client_for(&server);
    let sent = notify::dispatch(&db, &client, "u1", &session_id).unwrap();
    assert!(sent.slack_posted_at.is_some());
    assert!(posted_at(&db, &session_id).is_some());

    // Second dispatch is refused before any HTTP happens.
    let err = notify::dispatch(&db, &client, "u1", &session_id).unwrap_err();
    assert!(matches!(err, AttendanceError::AlreadyPosted));
    mock.assert();
}

#[test]
fn failed_delivery_leaves_marker_null_and_is_retryable() {
    let mut server = mockito::Server::new();
    let failing = server.mock("POST", "/").with_status(500).expect(1).create();

    let mut db = Database::open_memory().unwrap();
    let session_id = finished_session(&mut db);
    settings::save(&db, "u1", "U123ABC45").unwrap();

    let client = client_for(&server);
    let err = notify::dispatch(&db, &client, "u1", &session_id).unwrap_err();
    assert!(matches!(err, AttendanceError::DeliveryFailed { .. }));
    assert!(err.is_retryable());
    assert!(posted_at(&db, &session_id).is_none());
    failing.assert();

    // The resend is permitted and records the marker exactly once.
    server.reset();
    let ok = server.mock("POST", "/").with_status(200).expect(1).create();
    notify::dispatch(&db, &client, "u1", &session_id).unwrap();
    assert!(posted_at(&db, &session_id).is_some());
    ok.assert();
}

#[test]
fn missing_recipient_blocks_before_any_http() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/").expect(0).create();

    let mut db = Database::open_memory().unwrap();
    let session_id = finished_session(&mut db);
    // No settings saved: no recipient configured.

    let client = client_for(&server);
    let err = notify::dispatch(&db, &client, "u1", &session_id).unwrap_err();
    assert!(matches!(err, AttendanceError::MissingConfiguration(_)));
    assert!(posted_at(&db, &session_id).is_none());
    mock.assert();
}

#[test]
fn dispatch_guards_ownership_and_completion() {
    let mut server = mockito::Server::new();
    let mock = server.mock("POST", "/").expect(0).create();
    let client = client_for(&server);

    let mut db = Database::open_memory().unwrap();

    let err = notify::dispatch(&db, &client, "u1", "missing").unwrap_err();
    assert!(matches!(err, AttendanceError::NotFound));

    // Open session: not notifiable yet.
    let open = {
        let mut engine = LifecycleEngine::new(&mut db);
        engine
            .clock_in("u1", "product", "C0123ABCDE", "#20_product")
            .unwrap()
    };
    let err = notify::dispatch(&db, &client, "u1", &open.id).unwrap_err();
    assert!(matches!(err, AttendanceError::NotFinished));

    // Wrong owner.
    let err = notify::dispatch(&db, &client, "u2", &open.id).unwrap_err();
    assert!(matches!(err, AttendanceError::NotFound));
    mock.assert();
}
