use crate::application::access::{self, Principal};
use crate::application::error::{AppError, AppResult};
use crate::application::ports::user_repository::UserRepository;
use crate::domain::users::User;

pub struct GetUser<'a, R: UserRepository + ?Sized> {
    pub repo: &'a R,
}

impl<'a, R: UserRepository + ?Sized> GetUser<'a, R> {
    pub async fn execute(&self, viewer: &Principal, user_id: i32) -> AppResult<User> {
        if !access::can_view_user(viewer, user_id) {
            return Err(AppError::forbidden(
                "You are not allowed to view this user's data.",
            ));
        }
        self.repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User with ID {} not found.", user_id)))
    }
}
