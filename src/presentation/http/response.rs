use axum::{Json, http::StatusCode};
use serde::Serialize;

/// Wire shape shared by every JSON endpoint except `/api/health`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

pub type ApiResponse<T> = (StatusCode, Json<Envelope<T>>);

fn respond<T>(status: StatusCode, message: Option<&str>, data: Option<T>) -> ApiResponse<T> {
    (
        status,
        Json(Envelope {
            success: status.is_success(),
            message: message.map(str::to_string),
            data,
        }),
    )
}

pub fn ok<T>(data: T) -> ApiResponse<T> {
    respond(StatusCode::OK, None, Some(data))
}

pub fn ok_with_message<T>(message: &str, data: T) -> ApiResponse<T> {
    respond(StatusCode::OK, Some(message), Some(data))
}

pub fn created<T>(message: &str, data: T) -> ApiResponse<T> {
    respond(StatusCode::CREATED, Some(message), Some(data))
}

pub fn message(status: StatusCode, message: &str) -> ApiResponse<()> {
    respond(status, Some(message), None)
}
