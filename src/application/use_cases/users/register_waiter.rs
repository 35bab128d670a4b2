use crate::application::error::{AppError, AppResult};
use crate::application::ports::user_repository::{CreateUserError, UserRepository};
use crate::domain::users::{NewUser, Role, User};
use crate::infrastructure::crypto;

pub struct RegisterWaiter<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
    pub bcrypt_cost: u32,
}

#[derive(Debug, Clone, Default)]
pub struct RegisterRequest {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

struct Validated<'r> {
    first_name: &'r str,
    middle_name: Option<&'r str>,
    last_name: &'r str,
    email: &'r str,
    /// The email exactly as submitted, for messages.
    submitted_email: &'r str,
    password: &'r str,
}

fn trimmed(v: &Option<String>) -> Option<&str> {
    v.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn validate(req: &RegisterRequest) -> AppResult<Validated<'_>> {
    let password = req.password.as_deref().filter(|p| !p.is_empty());
    let (Some(first_name), Some(last_name), Some(email), Some(password)) = (
        trimmed(&req.first_name),
        trimmed(&req.last_name),
        trimmed(&req.email),
        password,
    ) else {
        return Err(AppError::bad_request(
            "First name, last name, email, and password are required.",
        ));
    };
    if req.confirm_password.as_deref() != Some(password) {
        return Err(AppError::bad_request("Passwords do not match."));
    }
    Ok(Validated {
        first_name,
        middle_name: trimmed(&req.middle_name),
        last_name,
        email,
        submitted_email: req.email.as_deref().unwrap_or(email),
        password,
    })
}

impl<'a, R: UserRepository + ?Sized> RegisterWaiter<'a, R> {
    pub async fn execute(&self, req: &RegisterRequest) -> AppResult<User> {
        let v = validate(req)?;
        let email_taken = || {
            AppError::bad_request(format!("Email '{}' is already in use.", v.submitted_email))
        };

        if self.repo.find_by_email(v.email).await?.is_some() {
            return Err(email_taken());
        }

        let password_hash = crypto::hash_password(v.password, self.bcrypt_cost).await?;
        let new_user = NewUser {
            first_name: v.first_name.to_string(),
            middle_name: v.middle_name.map(str::to_string),
            last_name: v.last_name.to_string(),
            email: v.email.to_string(),
            password_hash,
            role: Role::Waiter,
        };
        // A concurrent registration can still win the race past the lookup above.
        let user = self.repo.create_user(&new_user).await.map_err(|e| match e {
            CreateUserError::EmailTaken => email_taken(),
            CreateUserError::Storage(err) => AppError::Internal(err),
        })?;
        tracing::info!(user_id = user.id, "waiter_registered");
        Ok(user)
    }
}
