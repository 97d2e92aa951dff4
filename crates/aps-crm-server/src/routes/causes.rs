//! Cause Routes - fundraising causes and offline payments

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use aps_crm::domain::AmountOperation;

use crate::error::{ApiError, ApiResult};
use crate::models::{
    AmountRequest, CausePage, CauseResponse, ListParams, OfflinePaymentPage,
    OfflinePaymentResponse, PageResponse, PaymentStatusRequest,
};
use crate::AppState;

const DEFAULT_PAGE_SIZE: u32 = 10;

/// Causes, newest first
#[utoipa::path(
    get,
    path = "/api/v1/cause",
    params(ListParams),
    responses((status = 200, description = "Page of causes", body = CausePage)),
    tag = "Causes"
)]
pub async fn list_causes(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<PageResponse<CauseResponse>>> {
    let params = ListParams::parse(raw.as_deref())?;
    let page = state
        .cause_service
        .list(params.query(), &params.page_request(DEFAULT_PAGE_SIZE))
        .await?;
    Ok(Json(PageResponse::from_page(page, CauseResponse::from)))
}

/// Add to or subtract from the donated amount
#[utoipa::path(
    put,
    path = "/api/v1/cause/{id}/amount",
    params(("id" = u64, Path, description = "Cause post ID")),
    request_body = AmountRequest,
    responses(
        (status = 204, description = "Amount adjusted"),
        (status = 400, description = "Value missing or not positive"),
        (status = 404, description = "Cause has no donated amount")
    ),
    tag = "Causes"
)]
pub async fn adjust_amount(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<AmountRequest>,
) -> ApiResult<StatusCode> {
    let value = payload
        .value
        .ok_or_else(|| ApiError::bad_request("Valoarea este obligatorie."))?;
    let operation = AmountOperation::from_symbol(payload.operation.as_deref().unwrap_or("+"));

    state
        .cause_service
        .adjust_amount(id, value, operation)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Donation orders with their cause title
#[utoipa::path(
    get,
    path = "/api/v1/offline-payments",
    params(ListParams),
    responses((status = 200, description = "Page of orders", body = OfflinePaymentPage)),
    tag = "Causes"
)]
pub async fn list_payments(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<PageResponse<OfflinePaymentResponse>>> {
    let params = ListParams::parse(raw.as_deref())?;
    let page = state
        .cause_service
        .list_payments(params.query(), &params.page_request(DEFAULT_PAGE_SIZE))
        .await?;
    Ok(Json(PageResponse::from_page(page, OfflinePaymentResponse::from)))
}

/// Approve, reject or reset an order
#[utoipa::path(
    put,
    path = "/api/v1/offline-payments/{id}/status",
    params(("id" = u64, Path, description = "Order ID")),
    request_body = PaymentStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = OfflinePaymentResponse),
        (status = 400, description = "Status not allowed"),
        (status = 404, description = "Order not found"),
        (status = 409, description = "Order paid online")
    ),
    tag = "Causes"
)]
pub async fn update_payment_status(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<PaymentStatusRequest>,
) -> ApiResult<Json<OfflinePaymentResponse>> {
    let status = payload
        .status
        .ok_or_else(|| ApiError::bad_request("Statusul este obligatoriu."))?;
    let order = state
        .cause_service
        .update_payment_status(id, &status)
        .await?;
    Ok(Json(order.into()))
}

/// Delete an order
#[utoipa::path(
    delete,
    path = "/api/v1/offline-payments/{id}",
    params(("id" = u64, Path, description = "Order ID")),
    responses(
        (status = 204, description = "Order deleted"),
        (status = 404, description = "Order not found")
    ),
    tag = "Causes"
)]
pub async fn delete_payment(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    state.cause_service.delete_payment(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/cause", get(list_causes))
        .route("/api/v1/cause/:id/amount", put(adjust_amount))
        .route("/api/v1/offline-payments", get(list_payments))
        .route(
            "/api/v1/offline-payments/:id/status",
            put(update_payment_status),
        )
        .route(
            "/api/v1/offline-payments/:id",
            axum::routing::delete(delete_payment),
        )
}
