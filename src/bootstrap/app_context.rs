use std::sync::Arc;

use crate::application::ports::database_health::DatabaseHealth;
use crate::application::ports::token_blacklist_repository::TokenBlacklistRepository;
use crate::application::ports::user_repository::UserRepository;
use crate::bootstrap::config::Config;
use crate::infrastructure::crypto::jwt::JwtKeys;

#[derive(Clone)]
pub struct AppContext {
    pub cfg: Config,
    services: Arc<AppServices>,
}

#[derive(Clone)]
pub struct AppServices {
    user_repo: Arc<dyn UserRepository>,
    token_blacklist: Arc<dyn TokenBlacklistRepository>,
    db_health: Arc<dyn DatabaseHealth>,
    jwt_keys: JwtKeys,
}

impl AppServices {
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        token_blacklist: Arc<dyn TokenBlacklistRepository>,
        db_health: Arc<dyn DatabaseHealth>,
        jwt_keys: JwtKeys,
    ) -> Self {
        Self {
            user_repo,
            token_blacklist,
            db_health,
            jwt_keys,
        }
    }
}

impl AppContext {
    pub fn new(cfg: Config, services: AppServices) -> Self {
        Self {
            cfg,
            services: Arc::new(services),
        }
    }

    pub fn user_repo(&self) -> Arc<dyn UserRepository> {
        self.services.user_repo.clone()
    }

    pub fn token_blacklist(&self) -> Arc<dyn TokenBlacklistRepository> {
        self.services.token_blacklist.clone()
    }

    pub fn db_health(&self) -> Arc<dyn DatabaseHealth> {
        self.services.db_health.clone()
    }

    pub fn jwt_keys(&self) -> &JwtKeys {
        &self.services.jwt_keys
    }
}
