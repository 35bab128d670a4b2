use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::infrastructure::crypto::jwt::JwtKeys;

const DEFAULT_ADMIN_EMAIL: &str = "admin@system.com";
const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
/// Revocation rows keep `exp` in a MySQL `TIMESTAMP`, which ends in 2038.
const MAX_JWT_EXPIRES_SECS: i64 = 365 * 24 * 60 * 60;

#[derive(Clone)]
pub struct Config {
    pub api_port: u16,
    pub frontend_url: Option<String>,
    pub database: DatabaseConfig,
    pub jwt_secret: String,
    pub jwt_expires_secs: i64,
    pub bcrypt_cost: u32,
    pub admin: AdminSeed,
    pub blacklist_purge_interval_secs: u64,
    pub is_production: bool,
}

#[derive(Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub user: String,
    pub password: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub acquire_timeout_secs: u64,
    pub idle_timeout_secs: u64,
    pub max_lifetime_secs: u64,
    pub statement_cache: usize,
}

/// Administrator account created on first start.
#[derive(Clone)]
pub struct AdminSeed {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

/// `.env.test` when `APP_ENV=test`, `.env` otherwise.
pub fn env_file_name(app_env: Option<&str>) -> &'static str {
    match app_env {
        Some("test") => ".env.test",
        _ => ".env",
    }
}

/// Loads the env file for the current `APP_ENV` from the working directory.
/// Variables already set in the process environment are not overridden.
pub fn load_env_file() -> Option<PathBuf> {
    let name = env_file_name(env::var("APP_ENV").ok().as_deref());
    dotenvy::from_filename(name).ok()
}

impl Config {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(get: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            get(key).ok_or_else(|| {
                anyhow::anyhow!("required environment variable '{}' is not set", key)
            })
        };
        let parsed = |key: &str| get(key).map(|s| s.trim().to_string());

        let url = normalize_db_url(&required("DB_URL")?);
        let user = required("DB_USER")?;
        let password = required("DB_PASSWORD")?;
        let jwt_secret = required("JWT_SECRET_KEY")?;

        let api_port = parse_or(&get, "API_PORT", 8080u16);
        let frontend_url = parsed("FRONTEND_URL").filter(|u| !u.is_empty());
        let jwt_expires_secs = parse_or(&get, "JWT_EXPIRES_SECS", 24 * 60 * 60i64);
        if !(1..=MAX_JWT_EXPIRES_SECS).contains(&jwt_expires_secs) {
            anyhow::bail!(
                "JWT_EXPIRES_SECS must be between 1 and {}, got {}",
                MAX_JWT_EXPIRES_SECS,
                jwt_expires_secs
            );
        }
        let bcrypt_cost = parse_or(&get, "BCRYPT_COST", bcrypt::DEFAULT_COST);
        if !(4..=31).contains(&bcrypt_cost) {
            anyhow::bail!("BCRYPT_COST must be between 4 and 31, got {}", bcrypt_cost);
        }

        let database = DatabaseConfig {
            url,
            user,
            password,
            max_connections: parse_or(&get, "DB_MAX_CONNECTIONS", 10),
            min_connections: parse_or(&get, "DB_MIN_CONNECTIONS", 2),
            acquire_timeout_secs: parse_or(&get, "DB_ACQUIRE_TIMEOUT_SECS", 30),
            idle_timeout_secs: parse_or(&get, "DB_IDLE_TIMEOUT_SECS", 600),
            max_lifetime_secs: parse_or(&get, "DB_MAX_LIFETIME_SECS", 1800),
            statement_cache: parse_or(&get, "DB_STATEMENT_CACHE", 250),
        };
        if database.min_connections > database.max_connections {
            anyhow::bail!(
                "DB_MIN_CONNECTIONS ({}) exceeds DB_MAX_CONNECTIONS ({})",
                database.min_connections,
                database.max_connections
            );
        }

        let admin = AdminSeed {
            email: parsed("ADMIN_EMAIL")
                .filter(|e| !e.is_empty())
                .unwrap_or_else(|| DEFAULT_ADMIN_EMAIL.into()),
            password: get("ADMIN_PASSWORD")
                .filter(|p| !p.is_empty())
                .unwrap_or_else(|| DEFAULT_ADMIN_PASSWORD.into()),
            first_name: "System".into(),
            last_name: "Administrator".into(),
        };
        let blacklist_purge_interval_secs =
            parse_or(&get, "BLACKLIST_PURGE_INTERVAL_SECS", 60 * 60u64);
        let is_production = matches!(
            get("APP_ENV").as_deref(),
            Some("production") | Some("prod")
        );

        // Fail fast on an unusable signing key instead of on the first login.
        JwtKeys::from_base64_secret(&jwt_secret, jwt_expires_secs)?;

        if is_production && admin.password == DEFAULT_ADMIN_PASSWORD {
            anyhow::bail!("ADMIN_PASSWORD must be changed from its default in production");
        }

        Ok(Self {
            api_port,
            frontend_url,
            database,
            jwt_secret,
            jwt_expires_secs,
            bcrypt_cost,
            admin,
            blacklist_purge_interval_secs,
            is_production,
        })
    }

    pub fn jwt_keys(&self) -> anyhow::Result<JwtKeys> {
        JwtKeys::from_base64_secret(&self.jwt_secret, self.jwt_expires_secs)
    }
}

fn parse_or<F, T>(get: &F, key: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    get(key)
        .and_then(|s| s.trim().parse().ok())
        .unwrap_or(default)
}

/// Accepts JDBC-style URLs (`jdbc:mysql://...`) alongside plain `mysql://` ones.
fn normalize_db_url(raw: &str) -> String {
    let trimmed = raw.trim();
    trimmed.strip_prefix("jdbc:").unwrap_or(trimmed).to_string()
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("api_port", &self.api_port)
            .field("frontend_url", &self.frontend_url)
            .field("database", &self.database)
            .field("jwt_secret", &"<redacted>")
            .field("jwt_expires_secs", &self.jwt_expires_secs)
            .field("bcrypt_cost", &self.bcrypt_cost)
            .field("admin_email", &self.admin.email)
            .field(
                "blacklist_purge_interval_secs",
                &self.blacklist_purge_interval_secs,
            )
            .field("is_production", &self.is_production)
            .finish()
    }
}

impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("url", &self.url)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("max_connections", &self.max_connections)
            .field("min_connections", &self.min_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("idle_timeout_secs", &self.idle_timeout_secs)
            .field("max_lifetime_secs", &self.max_lifetime_secs)
            .field("statement_cache", &self.statement_cache)
            .finish()
    }
}
