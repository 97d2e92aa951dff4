//! IBAN Routes - beneficiaries of the tax redirection

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::error::ApiResult;
use crate::models::{IbanPage, IbanRequest, IbanResponse, ListParams, PageResponse};
use crate::AppState;

async fn page(
    state: &AppState,
    raw: Option<String>,
) -> ApiResult<Json<PageResponse<IbanResponse>>> {
    let params = ListParams::parse(raw.as_deref())?;
    let page = state
        .iban_service
        .list(params.query(), &params.page_request(10))
        .await?;
    Ok(Json(PageResponse::from_page(page, IbanResponse::from)))
}

/// Beneficiaries, newest first (published and drafts)
#[utoipa::path(
    get,
    path = "/api/v1/iban",
    params(ListParams),
    responses((status = 200, description = "Page of beneficiaries", body = IbanPage)),
    tag = "IBAN"
)]
pub async fn list_ibans(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<PageResponse<IbanResponse>>> {
    page(&state, raw).await
}

/// Search over name and IBAN
#[utoipa::path(
    get,
    path = "/api/v1/iban/search",
    params(ListParams),
    responses((status = 200, description = "Page of beneficiaries", body = IbanPage)),
    tag = "IBAN"
)]
pub async fn search_ibans(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<PageResponse<IbanResponse>>> {
    page(&state, raw).await
}

/// Create a published beneficiary
#[utoipa::path(
    post,
    path = "/api/v1/iban",
    request_body = IbanRequest,
    responses(
        (status = 201, description = "Beneficiary created", body = IbanResponse),
        (status = 400, description = "Name missing or IBAN invalid")
    ),
    tag = "IBAN"
)]
pub async fn create_iban(
    State(state): State<AppState>,
    Json(payload): Json<IbanRequest>,
) -> ApiResult<(StatusCode, Json<IbanResponse>)> {
    let created = state
        .iban_service
        .create(
            payload.name.as_deref().unwrap_or_default(),
            payload.iban.as_deref().unwrap_or_default(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Update name and/or IBAN; blank fields are left unchanged
#[utoipa::path(
    put,
    path = "/api/v1/iban/{id}",
    params(("id" = u64, Path, description = "Post ID")),
    request_body = IbanRequest,
    responses(
        (status = 200, description = "Beneficiary updated", body = IbanResponse),
        (status = 400, description = "IBAN invalid"),
        (status = 404, description = "Beneficiary not found")
    ),
    tag = "IBAN"
)]
pub async fn update_iban(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<IbanRequest>,
) -> ApiResult<Json<IbanResponse>> {
    let updated = state
        .iban_service
        .update(id, payload.name.as_deref(), payload.iban.as_deref())
        .await?;
    Ok(Json(updated.into()))
}

/// Delete a beneficiary
#[utoipa::path(
    delete,
    path = "/api/v1/iban/{id}",
    params(("id" = u64, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Beneficiary deleted"),
        (status = 404, description = "Beneficiary not found")
    ),
    tag = "IBAN"
)]
pub async fn delete_iban(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    state.iban_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/iban", get(list_ibans).post(create_iban))
        .route("/api/v1/iban/search", get(search_ibans))
        .route("/api/v1/iban/:id", put(update_iban).delete(delete_iban))
}
