use crate::application::ports::user_repository::{CreateUserError, UserRepository};
use crate::bootstrap::config::AdminSeed;
use crate::domain::users::{NewUser, Role};
use crate::infrastructure::crypto;

/// Creates the bootstrap administrator unless an account with its email exists.
pub struct EnsureAdmin<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
    pub bcrypt_cost: u32,
}

impl<'a, R: UserRepository + ?Sized> EnsureAdmin<'a, R> {
    /// Returns true when the account was created by this call.
    pub async fn execute(&self, seed: &AdminSeed) -> anyhow::Result<bool> {
        if self.repo.find_by_email(&seed.email).await?.is_some() {
            return Ok(false);
        }
        let password_hash = crypto::hash_password(&seed.password, self.bcrypt_cost).await?;
        let admin = NewUser {
            first_name: seed.first_name.clone(),
            middle_name: None,
            last_name: seed.last_name.clone(),
            email: seed.email.clone(),
            password_hash,
            role: Role::Admin,
        };
        match self.repo.create_user(&admin).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, email = %user.email, "admin_account_created");
                Ok(true)
            }
            // Another instance seeded it first.
            Err(CreateUserError::EmailTaken) => Ok(false),
            Err(CreateUserError::Storage(e)) => Err(e),
        }
    }
}
