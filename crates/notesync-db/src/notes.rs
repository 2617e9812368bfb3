//! Note repository implementation.
//!
//! All accessors are owner-scoped: a note that exists under another
//! owner is reported as `NotFound`, exactly like one that does not
//! exist, so callers cannot probe for foreign note ids.

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnection, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use tracing::{debug, warn};

use notesync_core::{
    new_note_id, owns, CreateNoteRequest, Error, Note, NoteRepository, Result, UpdateNoteRequest,
    DEFAULT_NOTE_TITLE,
};

/// SQLite implementation of NoteRepository.
pub struct SqliteNoteRepository {
    pool: Pool<Sqlite>,
}

impl SqliteNoteRepository {
    /// Create a new SqliteNoteRepository with the given connection pool.
    pub fn new(pool: Pool<Sqlite>) -> Self {
        Self { pool }
    }

    /// Open a write transaction that holds the writer lock from the
    /// start.
    ///
    /// A deferred transaction that reads before writing cannot wait on
    /// the busy timeout when it upgrades to the writer lock: a stale
    /// snapshot fails the upgrade immediately (SQLITE_BUSY_SNAPSHOT).
    /// BEGIN IMMEDIATE takes the lock up front, so contending writers
    /// queue on the busy timeout and serialize instead of erroring.
    async fn begin_write(&self) -> Result<PoolConnection<Sqlite>> {
        let mut conn = self.pool.acquire().await.map_err(Error::Database)?;
        sqlx::query("BEGIN IMMEDIATE")
            .execute(&mut *conn)
            .await
            .map_err(Error::Database)?;
        Ok(conn)
    }

    /// Commit on success, roll back on failure, and hand back the
    /// original result. A connection whose rollback fails is in an
    /// unknown state and is dropped rather than returned to the pool.
    async fn finish_write<T>(mut conn: PoolConnection<Sqlite>, result: Result<T>) -> Result<T> {
        match result {
            Ok(value) => {
                sqlx::query("COMMIT")
                    .execute(&mut *conn)
                    .await
                    .map_err(Error::Database)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = sqlx::query("ROLLBACK").execute(&mut *conn).await {
                    warn!(
                        subsystem = "database",
                        component = "notes",
                        error = %rollback_err,
                        "Rollback failed; discarding connection"
                    );
                    drop(conn.detach());
                }
                Err(err)
            }
        }
    }

    /// Fetch a note row by id on the given connection, without the
    /// ownership gate applied.
    async fn fetch_any(conn: &mut SqliteConnection, id: &str) -> Result<Option<Note>> {
        let row = sqlx::query("SELECT * FROM notes WHERE id = $1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(Error::Database)?;

        Ok(row.map(map_row_to_note))
    }

    async fn update_locked(
        conn: &mut SqliteConnection,
        id: &str,
        owner_id: i64,
        req: UpdateNoteRequest,
    ) -> Result<Note> {
        let existing = gate(Self::fetch_any(conn, id).await?, id, owner_id)?;

        let updated = Note {
            title: req.title.unwrap_or(existing.title),
            content: req.content.unwrap_or(existing.content),
            updated_at: next_updated_at(existing.updated_at),
            ..existing
        };

        sqlx::query(
            "UPDATE notes SET title = $1, content = $2, updated_at = $3
             WHERE id = $4 AND owner_id = $5",
        )
        .bind(&updated.title)
        .bind(&updated.content)
        .bind(updated.updated_at)
        .bind(id)
        .bind(owner_id)
        .execute(&mut *conn)
        .await
        .map_err(Error::Database)?;

        Ok(updated)
    }

    async fn delete_locked(conn: &mut SqliteConnection, id: &str, owner_id: i64) -> Result<()> {
        gate(Self::fetch_any(conn, id).await?, id, owner_id)?;

        sqlx::query("DELETE FROM notes WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&mut *conn)
            .await
            .map_err(Error::Database)?;

        Ok(())
    }
}

/// Map a database row to a Note.
fn map_row_to_note(row: SqliteRow) -> Note {
    Note {
        id: row.get("id"),
        owner_id: row.get("owner_id"),
        title: row.get("title"),
        content: row.get("content"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
    }
}

/// Apply the access gate to a fetch result.
///
/// Absence and ownership mismatch collapse into the same `NotFound`.
fn gate(found: Option<Note>, id: &str, owner_id: i64) -> Result<Note> {
    match found {
        Some(note) if owns(&note, owner_id) => Ok(note),
        _ => Err(Error::NotFound(id.to_string())),
    }
}

/// A mutation timestamp strictly later than `prev`.
///
/// Wall clocks can be coarse enough that two mutations in the same
/// tick would otherwise share a timestamp, breaking the recency
/// ordering that list() promises.
fn next_updated_at(prev: DateTime<Utc>) -> DateTime<Utc> {
    let now = Utc::now();
    if now > prev {
        now
    } else {
        prev + Duration::microseconds(1)
    }
}

#[async_trait]
impl NoteRepository for SqliteNoteRepository {
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note> {
        // created_at = updated_at at birth
        let now = Utc::now();
        let note = Note {
            id: new_note_id(),
            owner_id: req.owner_id,
            title: match req.title {
                Some(t) if !t.is_empty() => t,
                _ => DEFAULT_NOTE_TITLE.to_string(),
            },
            content: req.content.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };

        sqlx::query(
            "INSERT INTO notes (id, owner_id, title, content, created_at, updated_at)
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&note.id)
        .bind(note.owner_id)
        .bind(&note.title)
        .bind(&note.content)
        .bind(note.created_at)
        .bind(note.updated_at)
        .execute(&self.pool)
        .await
        .map_err(Error::Database)?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "insert",
            note_id = %note.id,
            owner_id = note.owner_id,
            "Note created"
        );
        Ok(note)
    }

    async fn list(&self, owner_id: i64) -> Result<Vec<Note>> {
        let rows = sqlx::query(
            "SELECT * FROM notes WHERE owner_id = $1 ORDER BY updated_at DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(Error::Database)?;

        let notes: Vec<Note> = rows.into_iter().map(map_row_to_note).collect();
        debug!(
            subsystem = "database",
            component = "notes",
            op = "list",
            owner_id = owner_id,
            result_count = notes.len(),
            "Notes listed"
        );
        Ok(notes)
    }

    async fn fetch(&self, id: &str, owner_id: i64) -> Result<Note> {
        let row = sqlx::query("SELECT * FROM notes WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(Error::Database)?;

        gate(row.map(map_row_to_note), id, owner_id)
    }

    async fn update(&self, id: &str, owner_id: i64, req: UpdateNoteRequest) -> Result<Note> {
        // The read-merge-write runs inside one immediate transaction
        // so that concurrent writers to the same id serialize; the
        // final row is exactly one writer's intended state
        // (last-write-wins).
        let mut conn = self.begin_write().await?;
        let result = Self::update_locked(&mut conn, id, owner_id, req).await;
        let updated = Self::finish_write(conn, result).await?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "update",
            note_id = %id,
            owner_id = owner_id,
            "Note updated"
        );
        Ok(updated)
    }

    async fn delete(&self, id: &str, owner_id: i64) -> Result<()> {
        let mut conn = self.begin_write().await?;
        let result = Self::delete_locked(&mut conn, id, owner_id).await;
        Self::finish_write(conn, result).await?;

        debug!(
            subsystem = "database",
            component = "notes",
            op = "delete",
            note_id = %id,
            owner_id = owner_id,
            "Note deleted"
        );
        Ok(())
    }
}
