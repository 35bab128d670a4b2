use crate::application::error::{AppError, AppResult};
use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::User;
use crate::infrastructure::crypto::{self, jwt::JwtKeys};

pub struct Login<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
    pub keys: &'a JwtKeys,
}

#[derive(Debug, Clone, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct LoginOutcome {
    pub token: String,
    pub user: User,
}

fn non_blank(v: &Option<String>) -> Option<&str> {
    v.as_deref().filter(|s| !s.trim().is_empty())
}

impl<'a, R: UserRepository + ?Sized> Login<'a, R> {
    pub async fn execute(&self, req: &LoginRequest) -> AppResult<LoginOutcome> {
        let (Some(email), Some(password)) = (non_blank(&req.email), non_blank(&req.password))
        else {
            return Err(AppError::bad_request("Email and password are required."));
        };

        // Same answer for unknown email and wrong password.
        let invalid = || AppError::unauthorized("Invalid credentials.");
        let user = self
            .repo
            .find_by_email(email.trim())
            .await?
            .ok_or_else(invalid)?;
        if !crypto::verify_password(password, &user.password_hash).await {
            tracing::debug!(user_id = user.id, "login_password_mismatch");
            return Err(invalid());
        }

        let issued = self.keys.issue(&user)?;
        tracing::info!(user_id = user.id, role = %user.role, "login_succeeded");
        Ok(LoginOutcome {
            token: issued.token,
            user,
        })
    }
}
