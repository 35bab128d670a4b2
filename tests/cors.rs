mod common;

use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use tower::ServiceExt;

use common::*;

const ORIGIN: &str = "http://example.test";

async fn with_origin(app: &axum::Router, method: &str, path: &str) -> (StatusCode, HeaderMap) {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::ORIGIN, ORIGIN);
    if method == "OPTIONS" {
        builder = builder
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "authorization,content-type");
    }
    let res = app
        .clone()
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap();
    (res.status(), res.headers().clone())
}

fn header_str<'h>(headers: &'h HeaderMap, name: header::HeaderName) -> &'h str {
    headers
        .get(&name)
        .unwrap_or_else(|| panic!("missing {name}"))
        .to_str()
        .unwrap()
}

#[tokio::test]
async fn request_origin_is_reflected_with_credentials() {
    let app = test_app().await;
    let (status, headers) = with_origin(&app.router, "GET", "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(header_str(&headers, header::ACCESS_CONTROL_ALLOW_ORIGIN), ORIGIN);
    assert_eq!(
        header_str(&headers, header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
        "true"
    );
    assert!(
        header_str(&headers, header::ACCESS_CONTROL_EXPOSE_HEADERS)
            .to_ascii_lowercase()
            .contains("authorization")
    );
}

#[tokio::test]
async fn preflight_allows_authorized_json_posts() {
    let app = test_app().await;
    let (status, headers) = with_origin(&app.router, "OPTIONS", "/api/auth/login").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(header_str(&headers, header::ACCESS_CONTROL_ALLOW_ORIGIN), ORIGIN);
    assert!(header_str(&headers, header::ACCESS_CONTROL_ALLOW_METHODS).contains("POST"));
    let allowed = header_str(&headers, header::ACCESS_CONTROL_ALLOW_HEADERS).to_ascii_lowercase();
    assert!(allowed.contains("authorization"));
    assert!(allowed.contains("content-type"));
}

#[tokio::test]
async fn configured_frontend_is_the_only_allowed_origin() {
    let cfg = test_config_with(&[("FRONTEND_URL", "http://frontend.test")]);
    let app = test_app_from(cfg, true).await;
    let (status, headers) = with_origin(&app.router, "GET", "/api/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        header_str(&headers, header::ACCESS_CONTROL_ALLOW_ORIGIN),
        "http://frontend.test"
    );
    assert_eq!(
        header_str(&headers, header::ACCESS_CONTROL_ALLOW_CREDENTIALS),
        "true"
    );
}
