use chrono::{DateTime, Utc};

use crate::application::ports::token_blacklist_repository::TokenBlacklistRepository;

/// Revoked tokens past their `exp` would be rejected anyway; drop their rows.
pub struct PurgeExpiredTokens<'a, B: TokenBlacklistRepository + ?Sized> {
    pub blacklist: &'a B,
}

impl<'a, B: TokenBlacklistRepository + ?Sized> PurgeExpiredTokens<'a, B> {
    pub async fn execute(&self, now: DateTime<Utc>) -> anyhow::Result<u64> {
        let removed = self.blacklist.purge_expired(now).await?;
        if removed > 0 {
            tracing::info!(removed, "blacklist_purged");
        }
        Ok(removed)
    }
}
