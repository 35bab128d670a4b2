use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Revoked tokens, keyed by their fingerprint (see `crypto::token_fingerprint`).
#[async_trait]
pub trait TokenBlacklistRepository: Send + Sync {
    /// Revoking an already revoked token is a no-op.
    async fn revoke(&self, fingerprint: &str, expires_at: DateTime<Utc>) -> anyhow::Result<()>;
    async fn is_revoked(&self, fingerprint: &str) -> anyhow::Result<bool>;
    /// Drops entries whose token has expired by `now`; returns how many were removed.
    async fn purge_expired(&self, now: DateTime<Utc>) -> anyhow::Result<u64>;
}
