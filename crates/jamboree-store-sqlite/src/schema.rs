//! SQL schema for the Jamboree SQLite store.
//!
//! Executed once at connection startup via `PRAGMA user_version`. Future
//! migrations will be gated on that version number.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

-- The name is the primary key and never changes.
CREATE TABLE IF NOT EXISTS parties (
    name                     TEXT PRIMARY KEY,
    admin_secret             TEXT NOT NULL,
    creator                  TEXT NOT NULL,
    date_options_enabled     INTEGER NOT NULL DEFAULT 0,
    date_voting_enabled      INTEGER NOT NULL DEFAULT 0,
    location_options_enabled INTEGER NOT NULL DEFAULT 0,
    location_voting_enabled  INTEGER NOT NULL DEFAULT 0,
    playlist_options_enabled INTEGER NOT NULL DEFAULT 0,
    playlist_voting_enabled  INTEGER NOT NULL DEFAULT 0,
    created_at               TEXT NOT NULL
);

-- Dates, locations and playlists share one table.
CREATE TABLE IF NOT EXISTS options (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    party_name  TEXT NOT NULL REFERENCES parties(name),
    kind        TEXT NOT NULL,   -- 'date' | 'location' | 'playlist'
    value       TEXT NOT NULL,   -- RFC 3339 for dates, free text otherwise
    created_at  TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS votes (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    option_id   INTEGER NOT NULL REFERENCES options(id) ON DELETE CASCADE,
    username    TEXT NOT NULL,
    created_at  TEXT NOT NULL,
    UNIQUE (option_id, username)
);

CREATE TABLE IF NOT EXISTS supplies (
    id          INTEGER PRIMARY KEY AUTOINCREMENT,
    party_name  TEXT NOT NULL REFERENCES parties(name),
    name        TEXT NOT NULL,
    quantity    INTEGER NOT NULL CHECK (quantity > 0),
    assignee    TEXT NOT NULL DEFAULT '',
    is_urgent   INTEGER NOT NULL DEFAULT 0,
    emoji       TEXT NOT NULL DEFAULT '',
    created_at  TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS parties_secret_idx  ON parties(admin_secret);
CREATE INDEX IF NOT EXISTS options_party_idx   ON options(party_name, kind);
CREATE INDEX IF NOT EXISTS supplies_party_idx  ON supplies(party_name);

PRAGMA user_version = 1;
";
