//! SQLite-backed session store.
//!
//! Persists the three record types of the attendance core: work sessions,
//! breaks, and per-user settings. The exclusivity invariants ("at most one
//! open session per user", "at most one open break per session") are
//! enforced by the storage layer itself through partial unique indexes, so a
//! racing second insert fails atomically instead of relying on a
//! check-then-act read in application code.

use rusqlite::Connection;

use super::data_dir;
use crate::error::Result;

/// SQLite database at `~/.config/kintai/kintai.db`.
pub struct Database {
    conn: Connection,
}

impl Database {
    /// Open the default database, creating file and schema if needed.
    pub fn open() -> Result<Self> {
        let path = data_dir()?.join("kintai.db");
        Self::open_path(path)
    }

    /// Open a database at an explicit path.
    pub fn open_path<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Self { conn };
        db.tune()?;
        db.migrate()?;
        Ok(db)
    }

    /// Open an in-memory database (for tests).
    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Self { conn };
        db.tune()?;
        db.migrate()?;
        Ok(db)
    }

    fn tune(&self) -> Result<()> {
        self.conn.pragma_update(None, "foreign_keys", "ON")?;
        // Writers from other connections wait instead of failing immediately.
        self.conn.busy_timeout(std::time::Duration::from_secs(5))?;
        Ok(())
    }

    fn migrate(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS work_sessions (
                id                   TEXT PRIMARY KEY,
                user_id              TEXT NOT NULL,
                dept                 TEXT NOT NULL,
                project_channel_id   TEXT NOT NULL,
                project_channel_name TEXT NOT NULL,
                start_at             TEXT NOT NULL,
                end_at               TEXT,
                slack_posted_at      TEXT,
                note                 TEXT
            );

            -- Invariant: at most one open session per user, enforced at
            -- insert time.
            CREATE UNIQUE INDEX IF NOT EXISTS idx_work_sessions_open
                ON work_sessions(user_id) WHERE end_at IS NULL;

            CREATE INDEX IF NOT EXISTS idx_work_sessions_user_start
                ON work_sessions(user_id, start_at);

            CREATE TABLE IF NOT EXISTS breaks (
                id         TEXT PRIMARY KEY,
                session_id TEXT NOT NULL REFERENCES work_sessions(id),
                start_at   TEXT NOT NULL,
                end_at     TEXT
            );

            -- Invariant: at most one open break per session.
            CREATE UNIQUE INDEX IF NOT EXISTS idx_breaks_open
                ON breaks(session_id) WHERE end_at IS NULL;

            CREATE INDEX IF NOT EXISTS idx_breaks_session_start
                ON breaks(session_id, start_at);

            CREATE TABLE IF NOT EXISTS user_settings (
                user_id       TEXT PRIMARY KEY,
                timezone      TEXT NOT NULL,
                slack_user_id TEXT
            );",
        )?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> &Connection {
        &self.conn
    }

    pub(crate) fn conn_mut(&mut self) -> &mut Connection {
        &mut self.conn
    }
}
