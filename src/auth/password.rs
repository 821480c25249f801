use tracing::{error, warn};

use super::error::AuthError;

/// Salted bcrypt hash of `plain` at the given work factor.
///
/// The output embeds algorithm, cost and salt, so two calls never agree.
pub fn hash_password(plain: &str, cost: u32) -> Result<String, AuthError> {
    bcrypt::hash(plain, cost).map_err(|e| {
        error!(error = %e, "bcrypt hash error");
        AuthError::HashFailure(e.to_string())
    })
}

/// Constant-time check of `plain` against a stored hash.
///
/// A stored value that is not a bcrypt hash counts as a mismatch.
pub fn verify_password(plain: &str, hash: &str) -> bool {
    match bcrypt::verify(plain, hash) {
        Ok(matches) => matches,
        Err(e) => {
            warn!(error = %e, "stored password hash is malformed");
            false
        }
    }
}

/// Runs [`hash_password`] on the blocking pool so other requests keep moving.
pub async fn hash_password_async(plain: String, cost: u32) -> Result<String, AuthError> {
    tokio::task::spawn_blocking(move || hash_password(&plain, cost))
        .await
        .map_err(|e| AuthError::HashFailure(e.to_string()))?
}

pub async fn verify_password_async(plain: String, hash: String) -> Result<bool, AuthError> {
    tokio::task::spawn_blocking(move || verify_password(&plain, &hash))
        .await
        .map_err(|e| AuthError::HashFailure(e.to_string()))
}
