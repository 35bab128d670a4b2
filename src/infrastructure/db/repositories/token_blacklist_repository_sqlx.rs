use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::application::ports::token_blacklist_repository::TokenBlacklistRepository;
use crate::infrastructure::db::MySqlPool;

pub struct SqlxTokenBlacklistRepository {
    pub pool: MySqlPool,
}

impl SqlxTokenBlacklistRepository {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TokenBlacklistRepository for SqlxTokenBlacklistRepository {
    async fn revoke(&self, fingerprint: &str, expires_at: DateTime<Utc>) -> anyhow::Result<()> {
        sqlx::query("INSERT IGNORE INTO jwt_blacklist (token_hash, expiry_date) VALUES (?, ?)")
            .bind(fingerprint)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn is_revoked(&self, fingerprint: &str) -> anyhow::Result<bool> {
        let count: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM jwt_blacklist WHERE token_hash = ?")
                .bind(fingerprint)
                .fetch_one(&self.pool)
                .await?;
        Ok(count > 0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> anyhow::Result<u64> {
        let res = sqlx::query("DELETE FROM jwt_blacklist WHERE expiry_date < ?")
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected())
    }
}
