use std::str::FromStr;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use sqlx::mysql::{MySqlConnectOptions, MySqlPoolOptions};
use sqlx::{MySql, Pool};

use crate::application::ports::database_health::DatabaseHealth;
use crate::bootstrap::config::DatabaseConfig;

pub type MySqlPool = Pool<MySql>;

pub async fn connect_pool(cfg: &DatabaseConfig) -> anyhow::Result<MySqlPool> {
    let options = MySqlConnectOptions::from_str(&cfg.url)
        .with_context(|| format!("invalid DB_URL '{}'", cfg.url))?
        .username(&cfg.user)
        .password(&cfg.password)
        .statement_cache_capacity(cfg.statement_cache);
    let pool = MySqlPoolOptions::new()
        .max_connections(cfg.max_connections)
        .min_connections(cfg.min_connections)
        .acquire_timeout(Duration::from_secs(cfg.acquire_timeout_secs))
        .idle_timeout(Duration::from_secs(cfg.idle_timeout_secs))
        .max_lifetime(Duration::from_secs(cfg.max_lifetime_secs))
        .connect_with(options)
        .await
        .context("could not open database connection pool")?;
    Ok(pool)
}

pub async fn migrate(pool: &MySqlPool) -> anyhow::Result<()> {
    // Uses compile-time embedded migrations under ./migrations
    sqlx::migrate!("./migrations").run(pool).await?;
    Ok(())
}

pub struct MySqlHealth {
    pub pool: MySqlPool,
}

#[async_trait]
impl DatabaseHealth for MySqlHealth {
    async fn ping(&self) -> bool {
        sqlx::query_scalar::<_, i32>("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .is_ok()
    }
}

pub mod repositories;
