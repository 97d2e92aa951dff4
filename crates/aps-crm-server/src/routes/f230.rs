//! Formular 230 Routes - tax redirection forms and Borderou 230 generation

use axum::{
    extract::{Path, RawQuery, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use chrono::Local;

use crate::error::ApiResult;
use crate::models::{
    BorderouRequest, F230DetailResponse, F230Page, F230Response, FlagsRequest, ListParams,
    PageResponse,
};
use crate::AppState;

async fn page(
    state: &AppState,
    raw: Option<String>,
) -> ApiResult<Json<PageResponse<F230Response>>> {
    let params = ListParams::parse(raw.as_deref())?;
    let page = state
        .f230_service
        .list(params.query(), &params.page_request(10))
        .await?;
    Ok(Json(PageResponse::from_page(page, F230Response::from)))
}

/// Forms, most recently submitted first
#[utoipa::path(
    get,
    path = "/api/v1/f230",
    params(ListParams),
    responses((status = 200, description = "Page of forms", body = F230Page)),
    tag = "Formular 230"
)]
pub async fn list_forms(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<PageResponse<F230Response>>> {
    page(&state, raw).await
}

/// Search over year, IBAN, email and taxpayer name
#[utoipa::path(
    get,
    path = "/api/v1/f230/search",
    params(ListParams),
    responses((status = 200, description = "Page of forms", body = F230Page)),
    tag = "Formular 230"
)]
pub async fn search_forms(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<PageResponse<F230Response>>> {
    page(&state, raw).await
}

/// Form with the taxpayer's address and CNP
#[utoipa::path(
    get,
    path = "/api/v1/f230/{id}",
    params(("id" = u64, Path, description = "Post ID")),
    responses(
        (status = 200, description = "Form found", body = F230DetailResponse),
        (status = 404, description = "Form not found")
    ),
    tag = "Formular 230"
)]
pub async fn get_form(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<Json<F230DetailResponse>> {
    let form = state.f230_service.get(id).await?;
    Ok(Json(form.into()))
}

/// Update review flags
#[utoipa::path(
    put,
    path = "/api/v1/f230/{id}/flags",
    params(("id" = u64, Path, description = "Post ID")),
    request_body = FlagsRequest,
    responses(
        (status = 204, description = "Flags stored"),
        (status = 404, description = "Form not found")
    ),
    tag = "Formular 230"
)]
pub async fn update_flags(
    State(state): State<AppState>,
    Path(id): Path<u64>,
    Json(payload): Json<FlagsRequest>,
) -> ApiResult<StatusCode> {
    state.f230_service.update_flags(id, &payload.into()).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Delete a form post and its meta
#[utoipa::path(
    delete,
    path = "/api/v1/f230/{id}",
    params(("id" = u64, Path, description = "Post ID")),
    responses(
        (status = 204, description = "Form deleted"),
        (status = 404, description = "Form not found")
    ),
    tag = "Formular 230"
)]
pub async fn delete_form(
    State(state): State<AppState>,
    Path(id): Path<u64>,
) -> ApiResult<StatusCode> {
    state.f230_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Generate a Borderou 230 for the selected forms and download its XML
#[utoipa::path(
    post,
    path = "/api/v1/f230/borderou",
    request_body = BorderouRequest,
    responses(
        (status = 200, description = "Borderou XML", content_type = "application/xml"),
        (status = 400, description = "No form selected, or invalid date or settings")
    ),
    tag = "Formular 230"
)]
pub async fn create_borderou(
    State(state): State<AppState>,
    Json(payload): Json<BorderouRequest>,
) -> ApiResult<Response> {
    let date = payload.date_or(Local::now().date_naive())?;
    let borderou = state
        .f230_service
        .create_borderou(&payload.ids, date)
        .await?;

    let disposition = format!("attachment; filename=\"{}\"", borderou.file_name());
    let headers = [
        (header::CONTENT_TYPE, "application/xml; charset=UTF-8".to_string()),
        (header::CONTENT_DISPOSITION, disposition),
    ];
    Ok((headers, borderou.xml).into_response())
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/f230", get(list_forms))
        .route("/api/v1/f230/search", get(search_forms))
        .route("/api/v1/f230/borderou", post(create_borderou))
        .route("/api/v1/f230/:id", get(get_form).delete(delete_form))
        .route("/api/v1/f230/:id/flags", put(update_flags))
}
