use axum::{
    extract::{FromRequest, rejection::JsonRejection},
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};

use crate::application::error::AppError;
use crate::presentation::http::response;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        let msg = match &self {
            AppError::Internal(e) => {
                tracing::error!(error = ?e, "request_failed");
                "Internal server error.".to_string()
            }
            other => other.to_string(),
        };
        response::message(status, &msg).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::bad_request(format!("Invalid request body: {}", rejection.body_text()))
    }
}

/// `axum::Json` whose rejections use the JSON error envelope.
#[derive(FromRequest)]
#[from_request(via(axum::Json), rejection(AppError))]
pub struct ApiJson<T>(pub T);

pub async fn not_found(method: Method, uri: Uri) -> Response {
    tracing::warn!(%method, path = %uri.path(), "endpoint_not_found");
    let msg = format!("Endpoint not found: {} {}", method, uri.path());
    response::message(StatusCode::NOT_FOUND, &msg).into_response()
}
