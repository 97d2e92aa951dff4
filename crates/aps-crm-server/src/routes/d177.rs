//! D177 Routes - sponsorship declarations

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::error::ApiResult;
use crate::models::{
    D177DetailResponse, D177Page, D177Response, FlagsRequest, ListParams, PageResponse,
};
use crate::AppState;

async fn page(
    state: &AppState,
    raw: Option<String>,
) -> ApiResult<Json<PageResponse<D177Response>>> {
    let params = ListParams::parse(raw.as_deref())?;
    let page = state
        .d177_service
        .list(params.query(), &params.page_request(10))
        .await?;
    Ok(Json(PageResponse::from_page(page, D177Response::from)))
}

/// D177 declarations, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/formulare/d177",
    params(ListParams),
    responses((status = 200, description = "Page of declarations", body = D177Page)),
    tag = "Forms"
)]
pub async fn list_d177(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<PageResponse<D177Response>>> {
    page(&state, raw).await
}

/// Search over company, fiscal code and email
#[utoipa::path(
    get,
    path = "/api/v1/formulare/d177/search",
    params(ListParams),
    responses((status = 200, description = "Page of declarations", body = D177Page)),
    tag = "Forms"
)]
pub async fn search_d177(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<PageResponse<D177Response>>> {
    page(&state, raw).await
}

/// Declaration with its company, correspondence, representative and contract sections
#[utoipa::path(
    get,
    path = "/api/v1/formulare/d177/{id}",
    params(("id" = u64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Declaration found", body = D177DetailResponse),
        (status = 404, description = "Declaration not found")
    ),
    tag = "Forms"
)]
pub async fn get_d177(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<D177DetailResponse>> {
    let detail = state.d177_service.get(id).await?;
    Ok(Json(detail.into()))
}

/// Update review flags
#[utoipa::path(
    put,
    path = "/api/v1/formulare/d177/{id}/flags",
    params(("id" = u64, Path, description = "Post ID")),
    request_body = FlagsRequest,
    responses(
        (status = 204, description = "Flags stored"),
        (status = 404, description = "Declaration not found")
    ),
    tag = "Forms"
)]
pub async fn update_flags(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<FlagsRequest>,
) -> ApiResult<StatusCode> {
    state.d177_service.update_flags(id, &payload.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a declaration post and its meta
#[utoipa::path(
    delete,
    path = "/api/v1/formulare/d177/{id}",
    params(("id" = u64, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Declaration deleted"),
        (status = 404, description = "Declaration not found")
    ),
    tag = "Forms"
)]
pub async fn delete_d177(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    state.d177_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/formulare/d177", get(list_d177))
        .route("/api/v1/formulare/d177/search", get(search_d177))
        .route(
            "/api/v1/formulare/d177/:id",
            get(get_d177).delete(delete_d177),
        )
        .route("/api/v1/formulare/d177/:id/flags", put(update_flags))
}
