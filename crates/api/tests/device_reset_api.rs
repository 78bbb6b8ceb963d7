//! HTTP-level integration tests for the device-reset flow and its throttle.

mod common;

use std::sync::Arc;

use axum::http::StatusCode;
use chrono::{Duration, Utc};
use common::{create_user, expect_status, post_json, FailingMailer, RecordingMailer, TEST_PASSWORD};
use serde_json::json;
use sqlx::PgPool;

use cctv_api::auth::jwt::hash_token;
use cctv_db::repositories::UserRepo;

const REQUEST: &str = "/api/auth/request-device-reset";
const CONFIRM: &str = "/api/auth/confirm-device-reset";

#[sqlx::test(migrations = "../db/migrations")]
async fn test_reset_round_trip_unbinds_device(pool: PgPool) {
    let user = create_user(&pool, "hana").await;
    UserRepo::start_session(&pool, user.id, "tok", Some("phone-1")).await.unwrap();

    let mailer = Arc::new(RecordingMailer::default());
    let app = common::build_test_app_with_mailer(pool.clone(), mailer.clone());

    expect_status(
        post_json(app.clone(), REQUEST, json!({ "email": &user.email })).await,
        StatusCode::OK,
    )
    .await;
    let sent = mailer.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, user.email);

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.reset_requested);
    assert_eq!(stored.reset_token_hash, Some(hash_token(&sent[0].token)));

    expect_status(
        post_json(
            app.clone(),
            CONFIRM,
            json!({ "token": mailer.last_token(), "password": TEST_PASSWORD }),
        )
        .await,
        StatusCode::OK,
    )
    .await;

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(stored.device_id, None);
    assert!(!stored.reset_requested);
    assert_eq!(stored.reset_token_hash, None);

    // Consumed tokens cannot be replayed.
    expect_status(
        post_json(
            app,
            CONFIRM,
            json!({ "token": mailer.last_token(), "password": TEST_PASSWORD }),
        )
        .await,
        StatusCode::NOT_FOUND,
    )
    .await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_unknown_email_is_not_found(pool: PgPool) {
    let app = common::build_test_app(pool);
    expect_status(
        post_json(app, REQUEST, json!({ "email": "ghost@example.com" })).await,
        StatusCode::NOT_FOUND,
    )
    .await;
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_email_failure_rolls_back_reservation(pool: PgPool) {
    let user = create_user(&pool, "ivan").await;
    let app = common::build_test_app_with_mailer(pool.clone(), Arc::new(FailingMailer));

    let json = expect_status(
        post_json(app, REQUEST, json!({ "email": &user.email })).await,
        StatusCode::INTERNAL_SERVER_ERROR,
    )
    .await;
    assert_eq!(json["success"], false);

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(!stored.reset_requested);
    assert_eq!(stored.reset_token_hash, None);
    assert_eq!(stored.reset_token_expires_at, None);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_expired_token_is_rejected(pool: PgPool) {
    let user = create_user(&pool, "judy").await;
    UserRepo::start_session(&pool, user.id, "tok", Some("phone-1")).await.unwrap();
    let token = "expiredtoken";
    UserRepo::reserve_reset_token(
        &pool,
        user.id,
        &hash_token(token),
        Utc::now() - Duration::minutes(1),
    )
    .await
    .unwrap();
    let app = common::build_test_app(pool.clone());

    let json = expect_status(
        post_json(app, CONFIRM, json!({ "token": token, "password": TEST_PASSWORD })).await,
        StatusCode::BAD_REQUEST,
    )
    .await;
    assert_eq!(json["message"], "Reset token has expired");

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(stored.device_id.as_deref(), Some("phone-1"));
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_wrong_password_is_unauthorized(pool: PgPool) {
    let user = create_user(&pool, "kim").await;
    let token = "validtoken";
    UserRepo::reserve_reset_token(
        &pool,
        user.id,
        &hash_token(token),
        Utc::now() + Duration::hours(1),
    )
    .await
    .unwrap();
    let app = common::build_test_app(pool.clone());

    let json = expect_status(
        post_json(app, CONFIRM, json!({ "token": token, "password": "wrong-password" })).await,
        StatusCode::UNAUTHORIZED,
    )
    .await;
    assert_eq!(json["message"], "Invalid password");

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.reset_requested);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn test_fourth_reset_call_is_throttled(pool: PgPool) {
    let app = common::build_test_app(pool);
    let body = json!({ "email": "ghost@example.com" });

    // Request and confirm share one bucket of three.
    for _ in 0..2 {
        expect_status(post_json(app.clone(), REQUEST, body.clone()).await, StatusCode::NOT_FOUND)
            .await;
    }
    expect_status(
        post_json(app.clone(), CONFIRM, json!({ "token": "x", "password": TEST_PASSWORD })).await,
        StatusCode::NOT_FOUND,
    )
    .await;

    let json = expect_status(
        post_json(app, REQUEST, body).await,
        StatusCode::TOO_MANY_REQUESTS,
    )
    .await;
    assert_eq!(json["success"], false);
}
