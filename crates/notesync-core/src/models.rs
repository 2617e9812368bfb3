//! Data models for notesync.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Title applied when a note is created without one.
pub const DEFAULT_NOTE_TITLE: &str = "Untitled";

/// A registered user account.
///
/// Accounts are permanent: there is no update or delete path once a
/// user has been created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Sequential identifier assigned by the store.
    pub id: i64,
    /// Globally unique login name.
    pub username: String,
    /// Opaque credential hash. Never serialized to clients.
    #[serde(skip_serializing, default)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// A stored Markdown note.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Opaque 128-bit random identifier, immutable and never reused.
    pub id: String,
    /// Owning user. Immutable after creation.
    pub owner_id: i64,
    pub title: String,
    /// Markdown body. May be empty.
    pub content: String,
    /// Set once at creation.
    pub created_at: DateTime<Utc>,
    /// Refreshed on every successful mutation; always >= created_at.
    pub updated_at: DateTime<Utc>,
}
