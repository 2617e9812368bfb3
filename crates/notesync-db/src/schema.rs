//! Schema migration.
//!
//! Two durable record sets: users (unique username index) and notes
//! (primary key on note id, secondary access path by owner and
//! recency). Every statement is idempotent, so `migrate` runs on
//! every startup.

use sqlx::{Pool, Sqlite};
use tracing::info;

use notesync_core::{Error, Result};

const CREATE_USERS: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT UNIQUE NOT NULL,
    password_hash TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL
)
"#;

const CREATE_NOTES: &str = r#"
CREATE TABLE IF NOT EXISTS notes (
    id TEXT PRIMARY KEY,
    owner_id INTEGER NOT NULL,
    title TEXT NOT NULL,
    content TEXT NOT NULL,
    created_at TIMESTAMP NOT NULL,
    updated_at TIMESTAMP NOT NULL,
    FOREIGN KEY (owner_id) REFERENCES users (id)
)
"#;

// Serves the list-by-owner, newest-first access path.
const CREATE_NOTES_OWNER_IDX: &str =
    "CREATE INDEX IF NOT EXISTS idx_notes_owner_updated ON notes (owner_id, updated_at DESC)";

/// Apply the schema to a pool.
pub async fn migrate(pool: &Pool<Sqlite>) -> Result<()> {
    for statement in [CREATE_USERS, CREATE_NOTES, CREATE_NOTES_OWNER_IDX] {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(Error::Database)?;
    }

    info!(
        subsystem = "database",
        component = "schema",
        op = "migrate",
        "Schema migration complete"
    );
    Ok(())
}
