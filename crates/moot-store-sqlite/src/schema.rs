//! SQL schema for the moot SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! the `PRAGMA user_version` number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// `case_sensitive_like` keeps the login substring filter case-sensitive.
/// `foreign_keys` must be on for the enrollment cascades to fire.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;
PRAGMA case_sensitive_like = ON;

CREATE TABLE IF NOT EXISTS participants (
    login         TEXT PRIMARY KEY,
    password_hash TEXT NOT NULL,    -- argon2 PHC string
    first_name    TEXT NOT NULL DEFAULT '',
    last_name     TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS meetings (
    meeting_id  INTEGER PRIMARY KEY AUTOINCREMENT,
    title       TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    date        TEXT                -- RFC 3339 UTC or NULL
);

-- The many-to-many enrollment association. The composite primary key is the
-- final backstop against double enrollment; the cascades keep the table free
-- of dangling references when either side is deleted.
CREATE TABLE IF NOT EXISTS enrollments (
    meeting_id INTEGER NOT NULL REFERENCES meetings(meeting_id) ON DELETE CASCADE,
    login      TEXT    NOT NULL REFERENCES participants(login)  ON DELETE CASCADE,
    PRIMARY KEY (meeting_id, login)
);

CREATE INDEX IF NOT EXISTS enrollments_login_idx ON enrollments(login);

PRAGMA user_version = 1;
";
