//! Volunteer Routes

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use aps_crm::SortOrder;

use crate::error::ApiResult;
use crate::models::{
    ListParams, PageResponse, VolunteerDetailResponse, VolunteerPage, VolunteerResponse,
};
use crate::AppState;

/// Volunteer list, oldest first
#[utoipa::path(
    get,
    path = "/api/v1/volunteers",
    params(ListParams),
    responses((status = 200, description = "Page of volunteers", body = VolunteerPage)),
    tag = "Volunteers"
)]
pub async fn list_volunteers(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<PageResponse<VolunteerResponse>>> {
    let params = ListParams::parse(raw.as_deref())?;
    let page = state
        .volunteer_service
        .list(params.query(), &params.page_request(50), SortOrder::asc("id"))
        .await?;
    Ok(Json(PageResponse::from_page(page, VolunteerResponse::from)))
}

/// Volunteer search, newest first
#[utoipa::path(
    get,
    path = "/api/v1/volunteers/search",
    params(ListParams),
    responses((status = 200, description = "Page of volunteers", body = VolunteerPage)),
    tag = "Volunteers"
)]
pub async fn search_volunteers(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<PageResponse<VolunteerResponse>>> {
    let params = ListParams::parse(raw.as_deref())?;
    let page = state
        .volunteer_service
        .list(params.query(), &params.page_request(10), SortOrder::desc("id"))
        .await?;
    Ok(Json(PageResponse::from_page(page, VolunteerResponse::from)))
}

/// Volunteer details
#[utoipa::path(
    get,
    path = "/api/v1/volunteers/{id}",
    params(("id" = u64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Volunteer found", body = VolunteerDetailResponse),
        (status = 404, description = "Volunteer not found")
    ),
    tag = "Volunteers"
)]
pub async fn get_volunteer(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<VolunteerDetailResponse>> {
    let volunteer = state.volunteer_service.get(id).await?;
    Ok(Json(VolunteerDetailResponse::new(volunteer, &state.site)))
}

/// Delete a volunteer post and its meta
#[utoipa::path(
    delete,
    path = "/api/v1/volunteers/{id}",
    params(("id" = u64, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Volunteer deleted"),
        (status = 404, description = "Volunteer not found")
    ),
    tag = "Volunteers"
)]
pub async fn delete_volunteer(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    state.volunteer_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/volunteers", get(list_volunteers))
        .route("/api/v1/volunteers/search", get(search_volunteers))
        .route(
            "/api/v1/volunteers/:id",
            get(get_volunteer).delete(delete_volunteer),
        )
}
