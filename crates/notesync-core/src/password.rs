//! Password hashing and verification.
//!
//! The service treats credential checking as an opaque capability:
//! nothing outside this module depends on the hash format. Hashing is
//! bcrypt and runs on the blocking thread pool, since a cost-12 hash
//! takes long enough to stall the async runtime.

use bcrypt::DEFAULT_COST;

use crate::error::{Error, Result};

/// Bcrypt cost factor for new hashes.
pub const BCRYPT_COST: u32 = DEFAULT_COST;

/// Hash a password for storage.
pub async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    tokio::task::spawn_blocking(move || {
        bcrypt::hash(password, BCRYPT_COST).map_err(|e| Error::Credential(e.to_string()))
    })
    .await
    .map_err(|e| Error::Credential(format!("join error: {e}")))?
}

/// Verify a password against a stored hash.
///
/// `Ok(false)` means the password does not match; `Err` is reserved
/// for malformed hashes or runtime failures.
pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_string();
    let hash = hash.to_string();
    tokio::task::spawn_blocking(move || {
        bcrypt::verify(password, &hash).map_err(|e| Error::Credential(e.to_string()))
    })
    .await
    .map_err(|e| Error::Credential(format!("join error: {e}")))?
}
