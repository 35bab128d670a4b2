use anyhow::Context;
use sha2::{Digest, Sha256};

pub mod jwt;

/// Hashes `password` with bcrypt at the given cost. Runs on the blocking pool
/// since a single hash at production cost takes hundreds of milliseconds.
pub async fn hash_password(password: &str, cost: u32) -> anyhow::Result<String> {
    let password = password.to_owned();
    tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .context("password hashing task failed")?
        .context("bcrypt hash failed")
}

/// Returns false on mismatch and on hashes bcrypt cannot parse.
pub async fn verify_password(password: &str, hash: &str) -> bool {
    let password = password.to_owned();
    let hash = hash.to_owned();
    match tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash)).await {
        Ok(Ok(matches)) => matches,
        Ok(Err(e)) => {
            tracing::warn!(error = ?e, "password_verification_failed");
            false
        }
        Err(e) => {
            tracing::error!(error = ?e, "password_verification_task_failed");
            false
        }
    }
}

/// Lowercase hex SHA-256 of a compact token; what the blacklist stores.
pub fn token_fingerprint(token: &str) -> String {
    let digest = Sha256::digest(token.as_bytes());
    digest.iter().map(|b| format!("{:02x}", b)).collect()
}
