//! Simulated payment flow. No gateway is contacted; confirming any payment
//! code upgrades the caller.

use axum::extract::State;
use axum::Json;
use chrono::{Duration, Utc};
use cctv_core::types::Timestamp;
use cctv_db::models::user::UserResponse;
use rand::Rng;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::extract::ValidatedJson;
use crate::handlers::account::upgrade_account;
use crate::middleware::auth::AuthUser;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Price of lifetime full access.
pub const UPGRADE_PRICE: i64 = 15_000;

const PAYMENT_DESCRIPTION: &str = "Lifetime full CCTV access";
const PAYMENT_CODE_PREFIX: &str = "CCTV-";
const QR_BASE_URL: &str = "https://api.qrserver.com/v1/create-qr-code/?size=150x150&data=";

/// A simulated payment order.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrder {
    pub amount: i64,
    pub description: String,
    pub payment_code: String,
    pub expires_at: Timestamp,
    pub qr_code_url: String,
}

/// Request body for `POST /payment/confirm`.
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ConfirmPaymentRequest {
    #[validate(length(min = 1, message = "is required"))]
    pub payment_code: String,
}

/// POST /api/payment/request
pub async fn request_payment(auth: AuthUser) -> AppResult<Json<ApiResponse<PaymentOrder>>> {
    let payment_code = format!("{PAYMENT_CODE_PREFIX}{}", random_code(8));
    let order = PaymentOrder {
        amount: UPGRADE_PRICE,
        description: PAYMENT_DESCRIPTION.to_string(),
        qr_code_url: format!("{QR_BASE_URL}{payment_code}"),
        payment_code,
        expires_at: Utc::now() + Duration::hours(24),
    };
    tracing::info!(user_id = auth.user_id, payment_code = %order.payment_code, "Payment requested");
    Ok(Json(ApiResponse::ok(order)))
}

/// POST /api/payment/confirm
pub async fn confirm_payment(
    State(state): State<AppState>,
    auth: AuthUser,
    ValidatedJson(input): ValidatedJson<ConfirmPaymentRequest>,
) -> AppResult<Json<ApiResponse<UserResponse>>> {
    tracing::info!(
        user_id = auth.user_id,
        payment_code = %input.payment_code,
        "Payment confirmed"
    );
    let user = upgrade_account(&state.pool, auth.user_id).await?;
    Ok(Json(ApiResponse::ok(user)))
}

fn random_code(len: usize) -> String {
    rand::rng()
        .sample_iter(&rand::distr::Alphanumeric)
        .take(len)
        .map(|b| char::from(b).to_ascii_uppercase())
        .collect()
}
