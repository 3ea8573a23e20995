//! Core error types for kintai-core.
//!
//! Every lifecycle guard failure is a typed variant returned to the caller;
//! only storage transport failures surface as `Database`.

use thiserror::Error;

/// Core error type for kintai-core.
#[derive(Error, Debug)]
pub enum AttendanceError {
    /// No authenticated identity was supplied by the caller.
    #[error("authentication required")]
    AuthRequired,

    /// Referenced session is absent or not owned by the caller.
    #[error("session not found")]
    NotFound,

    /// An open work session already exists for this user.
    #[error("a work session is already in progress")]
    AlreadyActive,

    /// An open break already exists on this session.
    #[error("a break is already in progress")]
    AlreadyOnBreak,

    /// The session has already been clocked out.
    #[error("the session is already clocked out")]
    AlreadyFinished,

    /// No open break exists on this session.
    #[error("no break is in progress")]
    NotOnBreak,

    /// The session has not been clocked out yet.
    #[error("the session is not clocked out yet")]
    NotFinished,

    /// Required configuration (notification recipient, webhook URL) is absent.
    #[error("missing configuration: {0}")]
    MissingConfiguration(String),

    /// The session summary was already posted.
    #[error("the session summary was already posted to Slack")]
    AlreadyPosted,

    /// The outbound webhook call failed; nothing was recorded. Retryable.
    #[error("Slack delivery failed: {reason}")]
    DeliveryFailed { reason: String },

    /// The webhook call succeeded but the posted marker could not be
    /// recorded. A blind retry risks a duplicate post.
    #[error("summary delivered but not recorded: {reason}")]
    PartialFailure { reason: String },

    /// Stored data contradicts an invariant (end before start, negative
    /// duration). Surfaced, never auto-corrected.
    #[error("data integrity violation: {0}")]
    InvariantViolation(String),

    /// Invalid caller-supplied value.
    #[error("invalid value for '{field}': {message}")]
    InvalidValue {
        field: &'static str,
        message: String,
    },

    /// Configuration file errors.
    #[error("configuration error: {0}")]
    Config(String),

    /// Database transport errors.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// IO errors.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AttendanceError {
    /// Whether the same call may simply be issued again.
    ///
    /// Only a failed delivery is safely retryable: nothing was sent and
    /// nothing was recorded. `PartialFailure` is deliberately excluded.
    pub fn is_retryable(&self) -> bool {
        matches!(self, AttendanceError::DeliveryFailed { .. })
    }
}

/// Result type alias for AttendanceError.
pub type Result<T, E = AttendanceError> = std::result::Result<T, E>;

/// Translate a unique-constraint failure on an insert into the lifecycle
/// guard it enforces, leaving other database errors untouched.
pub(crate) fn map_unique_violation(
    err: rusqlite::Error,
    guard: AttendanceError,
) -> AttendanceError {
    match &err {
        rusqlite::Error::SqliteFailure(e, _) if e.code == rusqlite::ErrorCode::ConstraintViolation => {
            guard
        }
        _ => AttendanceError::Database(err),
    }
}
