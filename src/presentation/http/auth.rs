use axum::{
    Router,
    extract::{FromRequestParts, State},
    http::{StatusCode, header::AUTHORIZATION, request::Parts},
    routing::post,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::access::{self, Principal};
use crate::application::error::{AppError, AppResult};
use crate::application::use_cases::auth::authenticate::Authenticate;
use crate::application::use_cases::auth::login::{Login as LoginUc, LoginRequest as LoginDto};
use crate::application::use_cases::auth::logout::Logout as LogoutUc;
use crate::bootstrap::app_context::AppContext;
use crate::presentation::http::error::ApiJson;
use crate::presentation::http::response::{self, ApiResponse};
use crate::presentation::http::users::UserResponse;

pub const MISSING_TOKEN: &str =
    "Authorization token required. Format must be 'Bearer <token>'.";

#[derive(Debug, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserResponse,
}

pub fn routes(ctx: AppContext) -> Router {
    Router::new()
        .route("/login", post(login))
        .route("/logout", post(logout))
        .with_state(ctx)
}

#[utoipa::path(post, path = "/api/auth/login", tag = "Auth", request_body = LoginRequest, security(()), responses(
    (status = 200, description = "Token issued", body = LoginResponse),
    (status = 400, description = "Email or password missing"),
    (status = 401, description = "Invalid credentials")
))]
pub async fn login(
    State(ctx): State<AppContext>,
    ApiJson(req): ApiJson<LoginRequest>,
) -> AppResult<ApiResponse<LoginResponse>> {
    let repo = ctx.user_repo();
    let uc = LoginUc {
        repo: repo.as_ref(),
        keys: ctx.jwt_keys(),
    };
    let dto = LoginDto {
        email: req.email,
        password: req.password,
    };
    let out = uc.execute(&dto).await?;
    Ok(response::ok_with_message(
        "Login successful",
        LoginResponse {
            token: out.token,
            user: out.user.into(),
        },
    ))
}

#[utoipa::path(post, path = "/api/auth/logout", tag = "Auth", responses(
    (status = 200, description = "Token revoked"),
    (status = 401, description = "Missing, invalid or already revoked token")
))]
pub async fn logout(State(ctx): State<AppContext>, user: AuthUser) -> AppResult<ApiResponse<()>> {
    let blacklist = ctx.token_blacklist();
    let uc = LogoutUc {
        keys: ctx.jwt_keys(),
        blacklist: blacklist.as_ref(),
    };
    uc.execute(&user.token).await?;
    Ok(response::message(StatusCode::OK, "Logout successful"))
}

// --- Bearer extractor & auth guards ---

/// Token from an `Authorization: Bearer <token>` header. The scheme is
/// matched case-insensitively. A present scheme with a blank token yields
/// `Some("")`, which then fails verification rather than counting as missing.
pub fn bearer_token(header: Option<&str>) -> Option<&str> {
    let header = header?;
    let scheme = header.get(..7)?;
    if !scheme.eq_ignore_ascii_case("bearer ") {
        return None;
    }
    Some(header[7..].trim())
}

pub struct Bearer(pub String);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Bearer
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok());
        bearer_token(header)
            .map(|t| Bearer(t.to_string()))
            .ok_or_else(|| AppError::unauthorized(MISSING_TOKEN))
    }
}

/// Any caller holding a valid, unrevoked token.
pub struct AuthUser {
    pub principal: Principal,
    pub token: String,
}

#[axum::async_trait]
impl FromRequestParts<AppContext> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let Bearer(token) = Bearer::from_request_parts(parts, ctx).await?;
        let blacklist = ctx.token_blacklist();
        let uc = Authenticate {
            keys: ctx.jwt_keys(),
            blacklist: blacklist.as_ref(),
        };
        let principal = uc.execute(&token).await?;
        Ok(AuthUser { principal, token })
    }
}

/// An authenticated caller with the `ADMIN` role.
pub struct AdminUser(pub AuthUser);

#[axum::async_trait]
impl FromRequestParts<AppContext> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        ctx: &AppContext,
    ) -> Result<Self, Self::Rejection> {
        let user = AuthUser::from_request_parts(parts, ctx).await?;
        access::require_admin(&user.principal)?;
        Ok(AdminUser(user))
    }
}
