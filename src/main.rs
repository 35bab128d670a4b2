use std::net::SocketAddr;
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio::time::{Duration, sleep};
use tracing::{error, info};

use staff_api::application::ports::token_blacklist_repository::TokenBlacklistRepository;
use staff_api::application::use_cases::auth::purge_expired::PurgeExpiredTokens;
use staff_api::application::use_cases::users::ensure_admin::EnsureAdmin;
use staff_api::bootstrap::app_context::{AppContext, AppServices};
use staff_api::bootstrap::config::{self, Config};
use staff_api::infrastructure::db::repositories::token_blacklist_repository_sqlx::SqlxTokenBlacklistRepository;
use staff_api::infrastructure::db::repositories::user_repository_sqlx::SqlxUserRepository;
use staff_api::infrastructure::db::{self, MySqlHealth};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_file = config::load_env_file();

    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG")
                .unwrap_or_else(|_| "staff_api=debug,tower_http=info,axum=info,sqlx=warn".into()),
        )
        .init();

    if let Some(path) = &env_file {
        info!(path = %path.display(), "Loaded environment file");
    }
    let cfg = Config::from_env()?;
    info!(?cfg, "Starting staff API");

    // Database
    let pool = db::connect_pool(&cfg.database).await?;
    db::migrate(&pool).await?;

    let user_repo = Arc::new(SqlxUserRepository::new(pool.clone()));
    let token_blacklist = Arc::new(SqlxTokenBlacklistRepository::new(pool.clone()));
    let db_health = Arc::new(MySqlHealth { pool: pool.clone() });

    let seeded = EnsureAdmin {
        repo: user_repo.as_ref(),
        bcrypt_cost: cfg.bcrypt_cost,
    }
    .execute(&cfg.admin)
    .await?;
    if !seeded {
        info!(email = %cfg.admin.email, "Administrator account already present");
    }

    let services = AppServices::new(
        user_repo,
        token_blacklist.clone(),
        db_health,
        cfg.jwt_keys()?,
    );
    let ctx = AppContext::new(cfg.clone(), services);
    let app = staff_api::presentation::http::build_router(ctx);

    // Background blacklist purge
    let purge_handle: Option<JoinHandle<()>> = if cfg.blacklist_purge_interval_secs == 0 {
        None
    } else {
        let blacklist: Arc<dyn TokenBlacklistRepository> = token_blacklist;
        let interval = Duration::from_secs(cfg.blacklist_purge_interval_secs);
        Some(tokio::spawn(async move {
            loop {
                let uc = PurgeExpiredTokens {
                    blacklist: blacklist.as_ref(),
                };
                if let Err(e) = uc.execute(chrono::Utc::now()).await {
                    error!(error = ?e, "blacklist_purge_failed");
                }
                sleep(interval).await;
            }
        }))
    };

    let api_addr = SocketAddr::from(([0, 0, 0, 0], cfg.api_port));
    info!(%api_addr, "HTTP API listening");
    let listener = tokio::net::TcpListener::bind(api_addr).await?;

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await;

    if let Some(handle) = purge_handle {
        handle.abort();
    }
    info!("Closing database pool");
    pool.close().await;

    if let Err(e) = served {
        error!(?e, "API server failed");
        return Err(e.into());
    }
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!(?e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                error!(?e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    info!("Shutdown signal received");
}
