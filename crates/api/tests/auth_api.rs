//! HTTP-level integration tests for registration, login, the session guard,
//! logout, and the account endpoints.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user, expect_status, get, get_auth, login, post_auth, post_json,
    post_json_auth, post_raw, user_with_token, TEST_PASSWORD,
};
use serde_json::json;
use sqlx::PgPool;

use cctv_api::middleware::auth::TOKEN_MISMATCH;
use cctv_db::repositories::UserRepo;


fn alice() -> serde_json::Value {
    json!({
        "username": "alice",
        "email": "alice@x.com",
        "password": "password123",
        "name": "Alice",
    })
}

// ---------------------------------------------------------------------------
// Registration
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_creates_free_account(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = expect_status(
        post_json(app, "/api/auth/register", alice()).await,
        StatusCode::CREATED,
    )
    .await;

    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["username"], "alice");
    assert_eq!(json["data"]["accountStatus"], "free");
    assert_eq!(json["data"]["role"], "user");
    assert!(json["data"].get("passwordHash").is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_duplicate_registration_is_conflict(pool: PgPool) {
    let app = common::build_test_app(pool);
    expect_status(
        post_json(app.clone(), "/api/auth/register", alice()).await,
        StatusCode::CREATED,
    )
    .await;

    let mut same_username = alice();
    same_username["email"] = json!("other@x.com");
    let json = expect_status(
        post_json(app.clone(), "/api/auth/register", same_username).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Username already exists");

    let mut same_email = alice();
    same_email["username"] = json!("alice2");
    let json = expect_status(
        post_json(app, "/api/auth/register", same_email).await,
        StatusCode::CONFLICT,
    )
    .await;
    assert_eq!(json["message"], "Email already exists");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_register_validation_errors(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({
        "username": "al",
        "email": "not-an-email",
        "password": "short",
        "name": "Alice",
        "photoUrl": "nope",
    });

    let json = expect_status(
        post_json(app, "/api/auth/register", body).await,
        StatusCode::BAD_REQUEST,
    )
    .await;

    assert_eq!(json["success"], false);
    let fields: Vec<&str> = json["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(fields, ["email", "password", "photoUrl", "username"]);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_undecodable_body_is_bad_request(pool: PgPool) {
    let app = common::build_test_app(pool);
    let json = expect_status(
        post_raw(app, "/api/auth/login", "{not json").await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["message"], "Invalid request body");
}

// ---------------------------------------------------------------------------
// Login and session guard
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_by_username_or_email(pool: PgPool) {
    create_user(&pool, "bob").await;
    let app = common::build_test_app(pool);

    for identifier in ["bob", "bob@example.com"] {
        let body = json!({ "username": identifier, "password": TEST_PASSWORD });
        let json = expect_status(
            post_json(app.clone(), "/api/auth/login", body).await,
            StatusCode::OK,
        )
        .await;
        assert!(json["data"]["token"].is_string());
        assert_eq!(json["data"]["user"]["username"], "bob");
        assert_eq!(json["data"]["expiresIn"], 24 * 3600);
    }
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    create_user(&pool, "carol").await;
    let app = common::build_test_app(pool);

    let body = json!({ "username": "carol", "password": "incorrect" });
    let json = expect_status(
        post_json(app.clone(), "/api/auth/login", body).await,
        StatusCode::UNAUTHORIZED,
    )
    .await;
    assert_eq!(json["message"], "Invalid username or password");

    let body = json!({ "username": "nobody", "password": "incorrect" });
    expect_status(post_json(app, "/api/auth/login", body).await, StatusCode::UNAUTHORIZED).await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_second_login_invalidates_first_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    expect_status(
        post_json(app.clone(), "/api/auth/register", alice()).await,
        StatusCode::CREATED,
    )
    .await;

    let t1 = login(app.clone(), "alice").await;
    expect_status(get_auth(app.clone(), "/api/account", &t1).await, StatusCode::OK).await;

    let t2 = login(app.clone(), "alice").await;
    assert_ne!(t1, t2);

    let json = expect_status(
        get_auth(app.clone(), "/api/account", &t1).await,
        StatusCode::UNAUTHORIZED,
    )
    .await;
    assert_eq!(json["message"], TOKEN_MISMATCH);

    expect_status(get_auth(app, "/api/account", &t2).await, StatusCode::OK).await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_missing_or_invalid_token_is_unauthorized(pool: PgPool) {
    let app = common::build_test_app(pool);

    let json = expect_status(get(app.clone(), "/api/account").await, StatusCode::UNAUTHORIZED).await;
    assert_eq!(json["message"], "Missing Authorization header");

    let json = expect_status(
        get_auth(app, "/api/account", "garbage").await,
        StatusCode::UNAUTHORIZED,
    )
    .await;
    assert_eq!(json["message"], "Invalid token: Malformed token");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unsigned_token_reports_bad_signature(pool: PgPool) {
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    let app = common::build_test_app(pool.clone());
    let user = create_user(&pool, "mallory").await;
    let now = chrono::Utc::now().timestamp();
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(
        json!({"sub": user.id, "role": "admin", "exp": now + 3600, "iat": now, "jti": "x"})
            .to_string(),
    );
    let token = format!("{header}.{payload}.");

    let json = expect_status(
        get_auth(app, "/api/account", &token).await,
        StatusCode::UNAUTHORIZED,
    )
    .await;
    assert_eq!(json["message"], "Invalid token: Invalid token signature");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_logout_revokes_token(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (user, token) = user_with_token(&pool, app.clone(), "dave").await;

    let json = expect_status(
        post_auth(app.clone(), "/api/auth/logout", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["success"], true);

    assert_eq!(UserRepo::find_session_token(&pool, user.id).await.unwrap(), None);
    let json = expect_status(
        get_auth(app, "/api/account", &token).await,
        StatusCode::UNAUTHORIZED,
    )
    .await;
    assert_eq!(json["message"], TOKEN_MISMATCH);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_device_binding(pool: PgPool) {
    create_user(&pool, "erin").await;
    let app = common::build_test_app(pool.clone());

    let first = json!({ "username": "erin", "password": TEST_PASSWORD, "deviceId": "phone-1" });
    expect_status(post_json(app.clone(), "/api/auth/login", first.clone()).await, StatusCode::OK)
        .await;

    // Same device is fine.
    expect_status(post_json(app.clone(), "/api/auth/login", first).await, StatusCode::OK).await;

    let other = json!({ "username": "erin", "password": TEST_PASSWORD, "deviceId": "tablet-9" });
    let response = post_json(app.clone(), "/api/auth/login", other).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["success"], false);

    // Leaving deviceId out does not get around the binding.
    let anonymous = json!({ "username": "erin", "password": TEST_PASSWORD });
    expect_status(post_json(app, "/api/auth/login", anonymous).await, StatusCode::FORBIDDEN)
        .await;

    let user = UserRepo::find_by_login(&pool, "erin").await.unwrap().unwrap();
    assert_eq!(user.device_id.as_deref(), Some("phone-1"));
}

// ---------------------------------------------------------------------------
// Account
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn test_account_profile_and_upgrade(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (user, token) = user_with_token(&pool, app.clone(), "frank").await;

    let json = expect_status(get_auth(app.clone(), "/api/account", &token).await, StatusCode::OK)
        .await;
    assert_eq!(json["data"]["id"], user.id);
    assert_eq!(json["data"]["accountStatus"], "free");

    let json = expect_status(
        post_auth(app, "/api/account/upgrade", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["accountStatus"], "paid");

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.upgraded_at.is_some());
    assert_eq!(stored.fixed_assignment(), None);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_payment_stub_upgrades(pool: PgPool) {
    let app = common::build_test_app(pool.clone());
    let (_user, token) = user_with_token(&pool, app.clone(), "gina").await;

    let order = expect_status(
        post_auth(app.clone(), "/api/payment/request", &token).await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(order["data"]["amount"], 15000);
    let code = order["data"]["paymentCode"].as_str().unwrap().to_string();
    assert!(code.starts_with("CCTV-"));
    assert!(order["data"]["qrCodeUrl"].as_str().unwrap().ends_with(&code));

    let json = expect_status(
        post_json_auth(
            app.clone(),
            "/api/payment/confirm",
            json!({ "paymentCode": code }),
            &token,
        )
        .await,
        StatusCode::OK,
    )
    .await;
    assert_eq!(json["data"]["accountStatus"], "paid");

    // Empty code fails validation.
    expect_status(
        post_json_auth(app, "/api/payment/confirm", json!({ "paymentCode": "" }), &token).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
}
