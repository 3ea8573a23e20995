//! # Kintai Core Library
//!
//! Core business logic for Kintai, a single-user-per-request attendance
//! tracker: clock-in/clock-out sessions, break periods inside a session, and
//! a one-time push of a finished session's summary to a Slack workflow
//! webhook. The CLI binary is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Lifecycle engine**: legal state transitions derived from nullable
//!   timestamps, with exclusivity pushed into SQLite (partial unique indexes
//!   plus immediate transactions) rather than application-level checks
//! - **Storage**: SQLite session store and TOML-based configuration
//! - **Notification**: at-most-once Slack workflow dispatch with an explicit
//!   delivered-but-unrecorded outcome
//! - **History**: read-only sessions-with-breaks projection
//!
//! ## Key Components
//!
//! - [`LifecycleEngine`]: clock-in/out and break transitions
//! - [`Database`]: session, break, and settings persistence
//! - [`notify::dispatch`]: the idempotent-by-retry notification path
//! - [`WorkStatus`]: per-user state recomputed on every read

pub mod catalog;
pub mod duration;
pub mod error;
pub mod history;
pub mod lifecycle;
pub mod model;
pub mod notify;
pub mod settings;
pub mod storage;
pub mod tz;

pub use error::{AttendanceError, Result};
pub use lifecycle::LifecycleEngine;
pub use model::{Break, SessionWithBreaks, UserSettings, WorkSession, WorkStatus};
pub use notify::{SlackWorkflowPayload, WorkflowClient};
pub use storage::{Config, Database};
