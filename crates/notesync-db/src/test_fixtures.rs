//! Test fixtures for database tests.
//!
//! Provides a hermetic in-memory database so repository and API tests
//! run without external services.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use notesync_db::test_fixtures::TestDatabase;
//!
//! #[tokio::test]
//! async fn test_something() {
//!     let test_db = TestDatabase::new().await;
//!     let user = test_db.user("alice").await;
//!     // Run your tests...
//! }
//! ```

use sqlx::{Pool, Sqlite};

use crate::pool::{create_pool_with_config, PoolConfig};
use crate::Database;
use notesync_core::{User, UserRepository};

/// Build a single-connection in-memory pool.
///
/// An in-memory SQLite database lives and dies with its connection,
/// so the pool is pinned to exactly one.
pub async fn memory_pool() -> Pool<Sqlite> {
    create_pool_with_config(
        "sqlite::memory:",
        PoolConfig::default().max_connections(1).min_connections(1),
    )
    .await
    .expect("in-memory pool")
}

/// A migrated in-memory database for tests.
pub struct TestDatabase {
    pub db: Database,
}

impl TestDatabase {
    /// Create a fresh, fully migrated in-memory database.
    pub async fn new() -> Self {
        let db = Database::from_pool(memory_pool().await);
        db.migrate().await.expect("schema migration");
        Self { db }
    }

    /// Register a user directly through the repository, bypassing
    /// password hashing. The stored hash is a placeholder.
    pub async fn user(&self, username: &str) -> User {
        self.db
            .users
            .insert(username, "test-hash")
            .await
            .expect("insert test user")
    }
}
