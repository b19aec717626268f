use actix_web::{web, HttpResponse};
use serde::Deserialize;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::errors::AppError;
use crate::payment::{CallbackRequest, CallbackResponse, PaymentStarted, ReconcileResult, SweepSummary};
use crate::AppState;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub order_id: Uuid,
}

/// POST /api/payment/zalopay
///
/// Signs and submits a pending order to ZaloPay, stores the `app_trans_id`
/// and schedules a delayed status recheck.
#[utoipa::path(
    post,
    path = "/api/payment/zalopay",
    request_body = CreatePaymentRequest,
    responses(
        (status = 200, description = "Gateway accepted the request", body = PaymentStarted),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order is not pending"),
        (status = 502, description = "Gateway failure"),
    ),
    tag = "payment"
)]
pub async fn create_payment(
    state: web::Data<AppState>,
    body: web::Json<CreatePaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let started = state.payments.start_payment(body.order_id).await?;
    Ok(HttpResponse::Ok().json(started))
}

/// POST /api/payment/zalopay/orders/{id}/check
#[utoipa::path(
    post,
    path = "/api/payment/zalopay/orders/{id}/check",
    params(("id" = Uuid, Path, description = "Order UUID")),
    responses(
        (status = 200, description = "Reconciliation result", body = ReconcileResult),
        (status = 400, description = "Order was never sent to the gateway"),
        (status = 404, description = "Order not found"),
        (status = 502, description = "Gateway failure"),
    ),
    tag = "payment"
)]
pub async fn check_order_status(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let result = state
        .payments
        .reconciler()
        .reconcile_by_id(path.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(result))
}

/// GET /api/payment/zalopay/check-pending-orders
///
/// Re-queries every pending order that was submitted to the gateway.
#[utoipa::path(
    get,
    path = "/api/payment/zalopay/check-pending-orders",
    responses((status = 200, description = "Sweep summary", body = SweepSummary)),
    tag = "payment"
)]
pub async fn check_pending_orders(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let summary = state.payments.reconciler().reconcile_pending().await?;
    Ok(HttpResponse::Ok().json(summary))
}

/// POST /api/payment/callback
///
/// Gateway-to-server notification. Always answers 200 with a protocol
/// `return_code`; the gateway retries on `0`.
#[utoipa::path(
    post,
    path = "/api/payment/callback",
    request_body = CallbackRequest,
    responses((status = 200, description = "Callback acknowledgement", body = CallbackResponse)),
    tag = "payment"
)]
pub async fn callback(
    state: web::Data<AppState>,
    body: web::Json<CallbackRequest>,
) -> HttpResponse {
    let response = state.payments.handle_callback(body.into_inner()).await;
    HttpResponse::Ok().json(response)
}
