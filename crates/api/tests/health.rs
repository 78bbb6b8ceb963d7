//! Integration tests for the health endpoint and general HTTP behaviour.

mod common;

use axum::http::StatusCode;
use common::{expect_status, get};
use sqlx::PgPool;

#[sqlx::test(migrations = "../db/migrations")]
async fn health_check_reports_database(pool: PgPool) {
    let app = common::build_test_app(pool);
    let json = expect_status(get(app, "/api/health").await, StatusCode::OK).await;

    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["status"], "ok");
    assert_eq!(json["data"]["dbHealthy"], true);
    assert!(json["data"]["version"].is_string());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn unknown_route_returns_404(pool: PgPool) {
    let app = common::build_test_app(pool);
    let json = expect_status(
        get(app, "/api/this-route-does-not-exist").await,
        StatusCode::NOT_FOUND,
    )
    .await;
    assert_eq!(json["success"], false);
    assert_eq!(json["message"], "Route not found");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn response_contains_x_request_id_header(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = get(app, "/api/health").await;

    let request_id = response
        .headers()
        .get("x-request-id")
        .expect("response must carry x-request-id")
        .to_str()
        .unwrap();
    assert_eq!(request_id.len(), 36);
}
