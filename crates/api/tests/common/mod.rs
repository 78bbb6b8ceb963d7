//! Shared helpers for HTTP-level integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use cctv_api::auth::password::hash_password;
use cctv_api::config::{DatabaseConfig, ResetLimitConfig, ServerConfig};
use cctv_api::auth::jwt::JwtConfig;
use cctv_api::mail::{EmailError, Mailer};
use cctv_api::router::build_app_router;
use cctv_api::state::AppState;
use cctv_db::models::cctv::{CctvWithLocation, CreateCctv};
use cctv_db::models::location::{CreateLocation, Location};
use cctv_db::models::user::{CreateUser, User};
use cctv_db::repositories::{CctvRepo, LocationRepo, UserRepo};
use http_body_util::BodyExt;
use serde_json::Value;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_PASSWORD: &str = "password123";

// ---------------------------------------------------------------------------
// Mailers
// ---------------------------------------------------------------------------

/// One captured reset email.
#[derive(Debug, Clone)]
pub struct SentReset {
    pub to: String,
    pub token: String,
}

/// Mailer that records every message instead of sending it.
#[derive(Default)]
pub struct RecordingMailer {
    sent: Mutex<Vec<SentReset>>,
}

impl RecordingMailer {
    pub fn sent(&self) -> Vec<SentReset> {
        self.sent.lock().unwrap().clone()
    }

    pub fn last_token(&self) -> String {
        self.sent().last().expect("no reset email was sent").token.clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send_device_reset(&self, to: &str, token: &str) -> Result<(), EmailError> {
        self.sent.lock().unwrap().push(SentReset {
            to: to.to_string(),
            token: token.to_string(),
        });
        Ok(())
    }
}

/// Mailer whose every send fails.
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send_device_reset(&self, _to: &str, _token: &str) -> Result<(), EmailError> {
        Err(EmailError::Build("simulated outage".into()))
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:3000".to_string()],
        request_timeout_secs: 30,
        database: DatabaseConfig {
            url: String::new(),
            max_connections: 5,
            max_lifetime_secs: 300,
            connect_retries: 1,
            retry_delay_secs: 1,
        },
        jwt: JwtConfig {
            secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
            expiry_hours: 24,
        },
        reset_limit: ResetLimitConfig::default(),
        email: None,
    }
}

/// Build the full application router around the given pool and mailer.
pub fn build_test_app_with_mailer(pool: PgPool, mailer: Arc<dyn Mailer>) -> Router {
    build_app_router(AppState::new(pool, test_config(), mailer))
}

/// Build the full application router with a recording mailer.
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_mailer(pool, Arc::new(RecordingMailer::default()))
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

async fn send(app: Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("authorization", format!("Bearer {token}"));
    }
    let body = match body {
        Some(json) => {
            builder = builder.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_json(app: Router, uri: &str, body: Value) -> Response {
    send(app, Method::POST, uri, None, Some(body)).await
}

pub async fn post_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), Some(body)).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(app: Router, uri: &str, body: Value, token: &str) -> Response {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    send(app, Method::DELETE, uri, Some(token), None).await
}

/// Send a request with a raw (possibly invalid) body.
pub async fn post_raw(app: Router, uri: &str, body: &'static str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body as JSON.
pub async fn body_json(response: Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Assert the status and return the JSON body.
pub async fn expect_status(response: Response, status: StatusCode) -> Value {
    let actual = response.status();
    let json = body_json(response).await;
    assert_eq!(actual, status, "unexpected status, body: {json}");
    json
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`] directly through the repository.
pub async fn create_user(pool: &PgPool, username: &str) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.com"),
        password_hash: hash_password(TEST_PASSWORD).expect("hashing should succeed"),
        name: username.to_string(),
        photo_url: None,
    };
    UserRepo::create(pool, &input)
        .await
        .expect("user creation should succeed")
}

/// Log in through the API and return the session token.
pub async fn login(app: Router, username: &str) -> String {
    let body = serde_json::json!({ "username": username, "password": TEST_PASSWORD });
    let json = expect_status(post_json(app, "/api/auth/login", body).await, StatusCode::OK).await;
    json["data"]["token"].as_str().unwrap().to_string()
}

/// Create a user and log in, returning the user and token.
pub async fn user_with_token(pool: &PgPool, app: Router, username: &str) -> (User, String) {
    let user = create_user(pool, username).await;
    let token = login(app, username).await;
    (user, token)
}

pub async fn create_location(pool: &PgPool, name: &str) -> Location {
    LocationRepo::create(pool, &CreateLocation { name: name.to_string() })
        .await
        .expect("location creation should succeed")
}

pub async fn create_cctv(pool: &PgPool, location_id: i64, name: &str) -> CctvWithLocation {
    let input = CreateCctv {
        location_id,
        name: name.to_string(),
        thumbnail_url: Some(format!("http://cams.example/{name}.jpg")),
        source_url: format!("rtsp://cams.example/{name}"),
    };
    CctvRepo::create(pool, &input)
        .await
        .expect("cctv creation should succeed")
}

/// Seed `count` active CCTVs spread over two locations.
pub async fn seed_cctvs(pool: &PgPool, count: usize) -> Vec<CctvWithLocation> {
    let north = create_location(pool, "North").await;
    let south = create_location(pool, "South").await;
    let mut out = Vec::with_capacity(count);
    for i in 0..count {
        let location = if i % 2 == 0 { north.id } else { south.id };
        out.push(create_cctv(pool, location, &format!("cam-{i:02}")).await);
    }
    out
}

/// Ids of the CCTVs in a listing response.
pub fn listed_ids(json: &Value) -> Vec<i64> {
    json["data"]["cctvs"]
        .as_array()
        .expect("cctvs array")
        .iter()
        .map(|c| c["id"].as_i64().unwrap())
        .collect()
}
