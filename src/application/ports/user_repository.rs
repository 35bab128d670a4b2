use async_trait::async_trait;

use crate::domain::users::{NewUser, User};

#[derive(thiserror::Error, Debug)]
pub enum CreateUserError {
    #[error("email already registered")]
    EmailTaken,
    #[error("failed to persist user")]
    Storage(#[source] anyhow::Error),
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>>;
    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>>;
    async fn list_all(&self) -> anyhow::Result<Vec<User>>;
    async fn create_user(&self, user: &NewUser) -> Result<User, CreateUserError>;
}
