use crate::application::error::{AppError, AppResult};
use crate::domain::users::Role;

/// The authenticated caller, as established from a valid access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: i32,
    pub role: Role,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

// Presentation layer is responsible for building Principal from HTTP inputs.

pub fn require_admin(principal: &Principal) -> AppResult<()> {
    if principal.is_admin() {
        Ok(())
    } else {
        Err(AppError::forbidden(
            "Access Denied: Administrator role required.",
        ))
    }
}

/// Admins may read any account; everyone else only their own.
pub fn can_view_user(principal: &Principal, user_id: i32) -> bool {
    principal.is_admin() || principal.user_id == user_id
}
