pub mod database_health;
pub mod token_blacklist_repository;
pub mod user_repository;
