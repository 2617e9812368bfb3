//! # notesync-db
//!
//! SQLite storage layer for notesync.
//!
//! This crate provides:
//! - Connection pool management
//! - Idempotent schema migration
//! - Repository implementations for users and notes
//!
//! ## Example
//!
//! ```rust,ignore
//! use notesync_db::Database;
//! use notesync_core::{CreateNoteRequest, NoteRepository};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let db = Database::connect("sqlite:notesync.db").await?;
//!     db.migrate().await?;
//!
//!     let note = db.notes.insert(CreateNoteRequest {
//!         owner_id: 1,
//!         title: Some("Hello".to_string()),
//!         content: Some("world".to_string()),
//!     }).await?;
//!
//!     println!("Created note: {}", note.id);
//!     Ok(())
//! }
//! ```

pub mod notes;
pub mod pool;
pub mod schema;
pub mod users;

// Test fixtures for integration tests.
// Always compiled so integration tests (in tests/) can use TestDatabase.
pub mod test_fixtures;

// Re-export core types
pub use notesync_core::*;

// Re-export repository implementations
pub use notes::SqliteNoteRepository;
pub use pool::{create_pool, create_pool_with_config, log_pool_metrics, PoolConfig};
pub use users::SqliteUserRepository;

use sqlx::{Pool, Sqlite};

/// Combined database context with all repositories.
///
/// One pool is shared by every repository; each operation acquires a
/// connection from it and releases it on every exit path.
pub struct Database {
    /// The underlying connection pool.
    pub pool: Pool<Sqlite>,
    /// User repository (registration lookups).
    pub users: SqliteUserRepository,
    /// Note repository for CRUD operations.
    pub notes: SqliteNoteRepository,
}

impl Database {
    /// Connect with default pool configuration.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with_config(database_url, PoolConfig::default()).await
    }

    /// Connect with custom pool configuration.
    pub async fn connect_with_config(database_url: &str, config: PoolConfig) -> Result<Self> {
        let pool = create_pool_with_config(database_url, config).await?;
        Ok(Self::from_pool(pool))
    }

    /// Build a database context over an existing pool.
    pub fn from_pool(pool: Pool<Sqlite>) -> Self {
        Self {
            users: SqliteUserRepository::new(pool.clone()),
            notes: SqliteNoteRepository::new(pool.clone()),
            pool,
        }
    }

    /// Apply the schema. Safe to run on every startup.
    pub async fn migrate(&self) -> Result<()> {
        schema::migrate(&self.pool).await
    }
}
