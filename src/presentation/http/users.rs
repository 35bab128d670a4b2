use axum::{
    Router,
    extract::{Path, State},
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::error::{AppError, AppResult};
use crate::application::use_cases::users::get_user::GetUser;
use crate::application::use_cases::users::list_users::ListUsers;
use crate::application::use_cases::users::register_waiter::{
    RegisterRequest as RegisterDto, RegisterWaiter,
};
use crate::bootstrap::app_context::AppContext;
use crate::domain::users::{Role, User};
use crate::presentation::http::auth::{AdminUser, AuthUser};
use crate::presentation::http::error::ApiJson;
use crate::presentation::http::response::{self, ApiResponse};

/// Public view of an account; never carries the password hash.
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: i32,
    pub first_name: String,
    pub middle_name: Option<String>,
    pub last_name: String,
    pub email: String,
    pub role: Role,
    pub created_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl From<User> for UserResponse {
    fn from(u: User) -> Self {
        UserResponse {
            id: u.id,
            first_name: u.first_name,
            middle_name: u.middle_name,
            last_name: u.last_name,
            email: u.email,
            role: u.role,
            created_at: u.created_at,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterUserRequest {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub confirm_password: Option<String>,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/register", post(register))
        .route("/users/profile", get(profile))
        .route("/users/:id", get(get_user))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/users/register", tag = "Users", request_body = RegisterUserRequest, responses(
    (status = 201, description = "Waiter account created", body = UserResponse),
    (status = 400, description = "Validation failed or email in use"),
    (status = 403, description = "Caller is not an administrator")
))]
pub async fn register(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
    ApiJson(req): ApiJson<RegisterUserRequest>,
) -> AppResult<ApiResponse<UserResponse>> {
    let repo = ctx.user_repo();
    let uc = RegisterWaiter {
        repo: repo.as_ref(),
        bcrypt_cost: ctx.cfg.bcrypt_cost,
    };
    let dto = RegisterDto {
        first_name: req.first_name,
        middle_name: req.middle_name,
        last_name: req.last_name,
        email: req.email,
        password: req.password,
        confirm_password: req.confirm_password,
    };
    let user = uc.execute(&dto).await?;
    Ok(response::created(
        "Waiter registered successfully",
        user.into(),
    ))
}

#[utoipa::path(get, path = "/api/users", tag = "Users", responses(
    (status = 200, body = [UserResponse]),
    (status = 403, description = "Caller is not an administrator")
))]
pub async fn list_users(
    State(ctx): State<AppContext>,
    _admin: AdminUser,
) -> AppResult<ApiResponse<Vec<UserResponse>>> {
    let repo = ctx.user_repo();
    let uc = ListUsers {
        repo: repo.as_ref(),
    };
    let users = uc.execute().await?;
    Ok(response::ok(users.into_iter().map(Into::into).collect()))
}

#[utoipa::path(get, path = "/api/users/profile", tag = "Users", responses(
    (status = 200, body = UserResponse),
    (status = 401, description = "Missing or invalid token")
))]
pub async fn profile(
    State(ctx): State<AppContext>,
    user: AuthUser,
) -> AppResult<ApiResponse<UserResponse>> {
    let repo = ctx.user_repo();
    let uc = GetUser {
        repo: repo.as_ref(),
    };
    let row = uc
        .execute(&user.principal, user.principal.user_id)
        .await?;
    Ok(response::ok_with_message(
        "Profile data retrieved successfully",
        row.into(),
    ))
}

#[utoipa::path(get, path = "/api/users/{id}", tag = "Users",
    params(("id" = i32, Path, description = "User ID")),
    responses(
        (status = 200, body = UserResponse),
        (status = 403, description = "Waiters may only read their own account"),
        (status = 404, description = "No such user")
))]
pub async fn get_user(
    State(ctx): State<AppContext>,
    user: AuthUser,
    Path(id): Path<String>,
) -> AppResult<ApiResponse<UserResponse>> {
    let id: i32 = id
        .parse()
        .map_err(|_| AppError::bad_request(format!("Invalid user ID '{}'.", id)))?;
    let repo = ctx.user_repo();
    let uc = GetUser {
        repo: repo.as_ref(),
    };
    let row = uc.execute(&user.principal, id).await?;
    Ok(response::ok(row.into()))
}
