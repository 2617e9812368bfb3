//! Identity operations: registration and authentication.

use std::sync::Arc;

use tracing::{debug, info};

use notesync_core::{hash_password, verify_password, Error, Result, User, UserRepository};

/// Orchestrates the user repository behind the register/authenticate
/// contract. Accounts are permanent; there is no update or delete.
#[derive(Clone)]
pub struct IdentityService {
    users: Arc<dyn UserRepository>,
}

impl IdentityService {
    pub fn new(users: Arc<dyn UserRepository>) -> Self {
        Self { users }
    }

    /// Register a new user and return their id.
    ///
    /// Fails with `InvalidInput` on empty username or password and
    /// `DuplicateUsername` when the name is taken.
    pub async fn register(&self, username: &str, password: &str) -> Result<i64> {
        if username.is_empty() || password.is_empty() {
            return Err(Error::InvalidInput(
                "Username and password are required".to_string(),
            ));
        }

        let password_hash = hash_password(password).await?;
        let user = self.users.insert(username, &password_hash).await?;

        info!(
            subsystem = "api",
            component = "identity",
            op = "register",
            user_id = user.id,
            "User registered"
        );
        Ok(user.id)
    }

    /// Authenticate a user by username and password.
    ///
    /// An unknown username and a wrong password both yield
    /// `InvalidCredentials`; the caller cannot tell which occurred.
    pub async fn authenticate(&self, username: &str, password: &str) -> Result<User> {
        if username.is_empty() || password.is_empty() {
            return Err(Error::InvalidInput(
                "Username and password are required".to_string(),
            ));
        }

        let user = match self.users.find_by_username(username).await? {
            Some(user) => user,
            None => return Err(Error::InvalidCredentials),
        };

        if !verify_password(password, &user.password_hash).await? {
            return Err(Error::InvalidCredentials);
        }

        debug!(
            subsystem = "api",
            component = "identity",
            op = "authenticate",
            user_id = user.id,
            "Login successful"
        );
        Ok(user)
    }
}
