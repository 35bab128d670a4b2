pub mod token_blacklist_repository_sqlx;
pub mod user_repository_sqlx;
