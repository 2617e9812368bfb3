//! Core traits for notesync abstractions.
//!
//! These traits define the interfaces that concrete storage
//! implementations must satisfy, enabling pluggable backends and
//! testability.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::Result;
use crate::models::{Note, User};

/// Request for creating a new note.
///
/// `title` and `content` are optional; the store fills in
/// [`crate::models::DEFAULT_NOTE_TITLE`] and the empty string.
#[derive(Debug, Clone, Default)]
pub struct CreateNoteRequest {
    pub owner_id: i64,
    pub title: Option<String>,
    pub content: Option<String>,
}

/// Partial-update request for a note.
///
/// Field presence is explicit: `None` keeps the stored value, while
/// `Some(s)` replaces it — including `Some("")`, which clears the
/// field. This is distinct from "only update non-empty fields": a
/// caller can intentionally empty a title or body through update.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateNoteRequest {
    pub title: Option<String>,
    pub content: Option<String>,
}

impl UpdateNoteRequest {
    /// True when neither field is supplied. Such an update still
    /// refreshes `updated_at`.
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.content.is_none()
    }
}

/// Repository for user records.
///
/// Exposes no update or delete: accounts are permanent once created.
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user with an already-derived credential hash.
    ///
    /// Fails with [`crate::Error::DuplicateUsername`] when the
    /// username is taken.
    async fn insert(&self, username: &str, password_hash: &str) -> Result<User>;

    /// Look up a user by username. Absence is `Ok(None)`, not an error.
    async fn find_by_username(&self, username: &str) -> Result<Option<User>>;
}

/// Repository for note CRUD operations.
///
/// Every accessor takes the caller's `owner_id`; a note that exists
/// under a different owner is reported exactly like one that does not
/// exist at all.
#[async_trait]
pub trait NoteRepository: Send + Sync {
    /// Insert a new note and return the full stored record.
    ///
    /// Does not verify that the owner exists; callers establish that
    /// precondition through the user repository.
    async fn insert(&self, req: CreateNoteRequest) -> Result<Note>;

    /// List all notes owned by `owner_id`, most recently updated first.
    async fn list(&self, owner_id: i64) -> Result<Vec<Note>>;

    /// Fetch a single note by id, scoped to `owner_id`.
    async fn fetch(&self, id: &str, owner_id: i64) -> Result<Note>;

    /// Apply a partial update and return the post-update record.
    ///
    /// Refreshes `updated_at` on every success, even when the request
    /// supplies no fields.
    async fn update(&self, id: &str, owner_id: i64, req: UpdateNoteRequest) -> Result<Note>;

    /// Permanently remove a note. A second delete of the same id
    /// fails with `NotFound`.
    async fn delete(&self, id: &str, owner_id: i64) -> Result<()>;
}
