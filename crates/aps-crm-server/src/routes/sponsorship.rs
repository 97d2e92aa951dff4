//! Sponsorship Routes - company sponsorship contracts

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    routing::{delete, get, put},
    Json, Router,
};

use crate::error::ApiResult;
use crate::models::{FlagsRequest, ListParams, PageResponse, SponsorshipPage, SponsorshipResponse};
use crate::AppState;

async fn page(
    state: &AppState,
    raw: Option<String>,
) -> ApiResult<Json<PageResponse<SponsorshipResponse>>> {
    let params = ListParams::parse(raw.as_deref())?;
    let page = state
        .sponsorship_service
        .list(params.query(), &params.page_request(10))
        .await?;
    Ok(Json(PageResponse::from_page(page, SponsorshipResponse::from)))
}

/// Sponsorship contracts, newest first
#[utoipa::path(
    get,
    path = "/api/v1/sponsorizare",
    params(ListParams),
    responses((status = 200, description = "Page of contracts", body = SponsorshipPage)),
    tag = "Forms"
)]
pub async fn list_sponsorships(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<PageResponse<SponsorshipResponse>>> {
    page(&state, raw).await
}

/// Search over company, fiscal code, contact and IBAN
#[utoipa::path(
    get,
    path = "/api/v1/sponsorizare/search",
    params(ListParams),
    responses((status = 200, description = "Page of contracts", body = SponsorshipPage)),
    tag = "Forms"
)]
pub async fn search_sponsorships(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<PageResponse<SponsorshipResponse>>> {
    page(&state, raw).await
}

/// Update review flags
#[utoipa::path(
    put,
    path = "/api/v1/sponsorizare/{id}/flags",
    params(("id" = u64, Path, description = "Post ID")),
    request_body = FlagsRequest,
    responses(
        (status = 204, description = "Flags stored"),
        (status = 404, description = "Contract not found")
    ),
    tag = "Forms"
)]
pub async fn update_flags(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<FlagsRequest>,
) -> ApiResult<StatusCode> {
    state
        .sponsorship_service
        .update_flags(id, &payload.into())
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a contract post and its meta
#[utoipa::path(
    delete,
    path = "/api/v1/sponsorizare/{id}",
    params(("id" = u64, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Contract deleted"),
        (status = 404, description = "Contract not found")
    ),
    tag = "Forms"
)]
pub async fn delete_sponsorship(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    state.sponsorship_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/sponsorizare", get(list_sponsorships))
        .route("/api/v1/sponsorizare/search", get(search_sponsorships))
        .route("/api/v1/sponsorizare/:id/flags", put(update_flags))
        .route("/api/v1/sponsorizare/:id", delete(delete_sponsorship))
}
