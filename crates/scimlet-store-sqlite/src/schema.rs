//! SQL schema for the scimlet SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- AUTOINCREMENT so ids are never reused; list order is newest id first.
CREATE TABLE IF NOT EXISTS users (
    id           INTEGER PRIMARY KEY AUTOINCREMENT,
    external_id  TEXT,
    user_name    TEXT    NOT NULL UNIQUE,
    first_name   TEXT    NOT NULL,
    middle_name  TEXT,
    last_name    TEXT    NOT NULL,
    display_name TEXT    NOT NULL,
    active       INTEGER NOT NULL DEFAULT 1
);

-- Owned by users; (value, user_id) is the natural key.
CREATE TABLE IF NOT EXISTS emails (
    value      TEXT    NOT NULL,
    user_id    INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    type       TEXT    NOT NULL,
    is_primary INTEGER NOT NULL DEFAULT 0,
    PRIMARY KEY (value, user_id)
);

CREATE INDEX IF NOT EXISTS emails_user_idx ON emails(user_id);

PRAGMA user_version = 1;
";
