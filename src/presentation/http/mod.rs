use axum::Router;
use axum::extract::MatchedPath;
use http::HeaderValue;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::bootstrap::app_context::AppContext;
use crate::bootstrap::config::Config;

pub mod auth;
pub mod error;
pub mod health;
pub mod response;
pub mod users;

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::login,
        auth::logout,
        users::register,
        users::list_users,
        users::profile,
        users::get_user,
        health::health,
    ),
    components(schemas(
        auth::LoginRequest,
        auth::LoginResponse,
        users::UserResponse,
        users::RegisterUserRequest,
        crate::domain::users::Role,
        health::HealthResp,
    )),
    tags(
        (name = "Auth", description = "Login and token revocation"),
        (name = "Users", description = "Staff accounts"),
        (name = "Health", description = "System health checks")
    )
)]
pub struct ApiDoc;

/// Without `FRONTEND_URL` the request origin is reflected back, so any
/// browser client may call the API with credentials.
fn cors_layer(cfg: &Config) -> CorsLayer {
    let origin = match cfg.frontend_url.as_deref().map(HeaderValue::from_str) {
        Some(Ok(v)) => AllowOrigin::exact(v),
        Some(Err(_)) => {
            tracing::warn!(origin = ?cfg.frontend_url, "invalid FRONTEND_URL, reflecting request origin");
            AllowOrigin::mirror_request()
        }
        None => AllowOrigin::mirror_request(),
    };
    CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            http::Method::GET,
            http::Method::POST,
            http::Method::PUT,
            http::Method::DELETE,
            http::Method::PATCH,
            http::Method::OPTIONS,
        ])
        .allow_headers([http::header::CONTENT_TYPE, http::header::AUTHORIZATION])
        .expose_headers([http::header::AUTHORIZATION])
        .allow_credentials(true)
}

pub fn build_router(ctx: AppContext) -> Router {
    let cors = cors_layer(&ctx.cfg);
    Router::new()
        .nest("/api", health::routes(ctx.clone()))
        .nest("/api/auth", auth::routes(ctx.clone()))
        .nest("/api", users::routes(ctx.clone()))
        .merge(SwaggerUi::new("/api/docs").url("/api/openapi.json", ApiDoc::openapi()))
        .fallback(error::not_found)
        .method_not_allowed_fallback(error::not_found)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http().make_span_with(|req: &http::Request<_>| {
                let method = req.method().clone();
                let uri = req.uri().clone();
                let matched = req
                    .extensions()
                    .get::<MatchedPath>()
                    .map(|p| p.as_str().to_string())
                    .unwrap_or_default();
                tracing::info_span!("http", %method, %uri, matched_path = %matched)
            }),
        )
}
