#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use chrono::{DateTime, Utc};
use serde_json::Value;
use tower::ServiceExt;

use staff_api::application::ports::database_health::DatabaseHealth;
use staff_api::application::ports::token_blacklist_repository::TokenBlacklistRepository;
use staff_api::application::ports::user_repository::{CreateUserError, UserRepository};
use staff_api::application::use_cases::users::ensure_admin::EnsureAdmin;
use staff_api::bootstrap::app_context::{AppContext, AppServices};
use staff_api::bootstrap::config::Config;
use staff_api::domain::users::{NewUser, User};
use staff_api::presentation::http::build_router;

pub const ADMIN_EMAIL: &str = "admin@system.com";
pub const ADMIN_PASSWORD: &str = "admin123";
pub const SECRET: &str = "MDEyMzQ1Njc4OWFiY2RlZjAxMjM0NTY3ODlhYmNkZWY=";

#[derive(Default)]
pub struct InMemoryUsers {
    users: Mutex<Vec<User>>,
}

impl InMemoryUsers {
    pub fn len(&self) -> usize {
        self.users.lock().unwrap().len()
    }
}

#[async_trait]
impl UserRepository for InMemoryUsers {
    async fn find_by_email(&self, email: &str) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.email == email).cloned())
    }

    async fn find_by_id(&self, id: i32) -> anyhow::Result<Option<User>> {
        let users = self.users.lock().unwrap();
        Ok(users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_all(&self) -> anyhow::Result<Vec<User>> {
        Ok(self.users.lock().unwrap().clone())
    }

    async fn create_user(&self, user: &NewUser) -> Result<User, CreateUserError> {
        let mut users = self.users.lock().unwrap();
        if users.iter().any(|u| u.email == user.email) {
            return Err(CreateUserError::EmailTaken);
        }
        let created = User {
            id: users.len() as i32 + 1,
            first_name: user.first_name.clone(),
            middle_name: user.middle_name.clone(),
            last_name: user.last_name.clone(),
            email: user.email.clone(),
            password_hash: user.password_hash.clone(),
            role: user.role,
            created_at: Some(Utc::now()),
        };
        users.push(created.clone());
        Ok(created)
    }
}

#[derive(Default)]
pub struct InMemoryBlacklist {
    entries: Mutex<HashMap<String, DateTime<Utc>>>,
}

impl InMemoryBlacklist {
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }
}

#[async_trait]
impl TokenBlacklistRepository for InMemoryBlacklist {
    async fn revoke(&self, fingerprint: &str, expires_at: DateTime<Utc>) -> anyhow::Result<()> {
        self.entries
            .lock()
            .unwrap()
            .entry(fingerprint.to_string())
            .or_insert(expires_at);
        Ok(())
    }

    async fn is_revoked(&self, fingerprint: &str) -> anyhow::Result<bool> {
        Ok(self.entries.lock().unwrap().contains_key(fingerprint))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> anyhow::Result<u64> {
        let mut entries = self.entries.lock().unwrap();
        let before = entries.len();
        entries.retain(|_, exp| *exp >= now);
        Ok((before - entries.len()) as u64)
    }
}

pub struct FixedHealth(pub bool);

#[async_trait]
impl DatabaseHealth for FixedHealth {
    async fn ping(&self) -> bool {
        self.0
    }
}

pub fn test_config() -> Config {
    test_config_with(&[])
}

/// Test config with `extra` variables layered over the defaults.
pub fn test_config_with(extra: &[(&str, &str)]) -> Config {
    let env: HashMap<&str, &str> = [
        ("DB_URL", "mysql://localhost:3306/restaurant_test"),
        ("DB_USER", "root"),
        ("DB_PASSWORD", ""),
        ("JWT_SECRET_KEY", SECRET),
        ("BCRYPT_COST", "4"),
    ]
    .into_iter()
    .chain(extra.iter().copied())
    .collect();
    Config::from_lookup(|k| env.get(k).map(|v| v.to_string())).expect("test config")
}

pub struct TestApp {
    pub router: Router,
    pub ctx: AppContext,
    pub users: Arc<InMemoryUsers>,
    pub blacklist: Arc<InMemoryBlacklist>,
}

pub async fn test_app_with_health(db_ok: bool) -> TestApp {
    test_app_from(test_config(), db_ok).await
}

pub async fn test_app_from(cfg: Config, db_ok: bool) -> TestApp {
    let users = Arc::new(InMemoryUsers::default());
    let blacklist = Arc::new(InMemoryBlacklist::default());
    EnsureAdmin {
        repo: users.as_ref(),
        bcrypt_cost: cfg.bcrypt_cost,
    }
    .execute(&cfg.admin)
    .await
    .expect("seed admin");

    let services = AppServices::new(
        users.clone(),
        blacklist.clone(),
        Arc::new(FixedHealth(db_ok)),
        cfg.jwt_keys().expect("jwt keys"),
    );
    let ctx = AppContext::new(cfg, services);
    TestApp {
        router: build_router(ctx.clone()),
        ctx,
        users,
        blacklist,
    }
}

pub async fn test_app() -> TestApp {
    test_app_with_health(true).await
}

pub async fn send_raw(
    app: &Router,
    method: &str,
    path: &str,
    body: Option<String>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder()
        .method(method)
        .uri(path)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let req = builder
        .body(body.map(Body::from).unwrap_or_else(Body::empty))
        .unwrap();
    let res = app.clone().oneshot(req).await.unwrap();
    let status = res.status();
    let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, json)
}

pub async fn send(
    app: &Router,
    method: &str,
    path: &str,
    body: Option<Value>,
    token: Option<&str>,
) -> (StatusCode, Value) {
    send_raw(app, method, path, body.map(|b| b.to_string()), token).await
}

pub async fn login(app: &Router, email: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        "POST",
        "/api/auth/login",
        Some(serde_json::json!({ "email": email, "password": password })),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK, "login for {email} failed: {body}");
    body["data"]["token"].as_str().unwrap().to_string()
}

pub async fn admin_token(app: &Router) -> String {
    login(app, ADMIN_EMAIL, ADMIN_PASSWORD).await
}

/// Registers a waiter through the API as admin and returns its id.
pub async fn register_waiter(app: &Router, email: &str, password: &str) -> i64 {
    let token = admin_token(app).await;
    let (status, body) = send(
        app,
        "POST",
        "/api/users/register",
        Some(serde_json::json!({
            "firstName": "Test",
            "lastName": "Waiter",
            "email": email,
            "password": password,
            "confirmPassword": password,
        })),
        Some(&token),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register {email} failed: {body}");
    body["data"]["id"].as_i64().unwrap()
}
