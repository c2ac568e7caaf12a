//! Password hashing and verification.
//!
//! bcrypt is deliberately slow and salts every hash, so a leaked credential
//! table resists offline brute force and precomputed tables. The cost factor
//! is a crate constant, never user supplied.

use thiserror::Error;
use tracing::error;

/// Fixed bcrypt cost factor
pub const HASH_COST: u32 = 10;

#[derive(Debug, Error)]
pub enum HashError {
    #[error("password hashing failed: {0}")]
    Bcrypt(#[from] bcrypt::BcryptError),
    #[error("password hashing task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Hash a plaintext password with a random per-call salt.
///
/// bcrypt is CPU-bound, so the work runs on the blocking pool to keep the
/// request tasks responsive.
///
/// # Errors
///
/// Returns an error if hashing fails or the blocking task is cancelled
pub async fn hash(plain: &str) -> Result<String, HashError> {
    let plain = plain.to_owned();

    let hashed = tokio::task::spawn_blocking(move || bcrypt::hash(plain, HASH_COST)).await??;

    Ok(hashed)
}

/// Verify a plaintext password against a stored hash.
///
/// Comparison is delegated to bcrypt's own verification routine; a hash that
/// cannot be parsed counts as a mismatch.
pub async fn verify(plain: &str, hashed: &str) -> bool {
    let plain = plain.to_owned();
    let hashed = hashed.to_owned();

    match tokio::task::spawn_blocking(move || bcrypt::verify(plain, &hashed)).await {
        Ok(Ok(matched)) => matched,
        Ok(Err(e)) => {
            error!("Failed to verify password hash: {}", e);

            false
        }
        Err(e) => {
            error!("Password verification task failed: {}", e);

            false
        }
    }
}
