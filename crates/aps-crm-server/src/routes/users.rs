//! User Routes - CRM accounts

use axum::{
    extract::{Path, RawQuery, State},
    http::StatusCode,
    routing::{delete, get, put},
    Extension, Json, Router,
};
use uuid::Uuid;

use crate::auth::AuthUser;
use crate::error::ApiResult;
use crate::models::{
    ListParams, PageResponse, UpdatePremiumRequest, UpdateStatusRequest, UserPage, UserResponse,
};
use crate::AppState;

const DEFAULT_PAGE_SIZE: u32 = 10;

/// Profile of the authenticated caller
#[utoipa::path(
    get,
    path = "/api/v1/users/me",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Users"
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.user_service.get(caller.id).await?;
    Ok(Json(user.into()))
}

/// All users
#[utoipa::path(
    get,
    path = "/api/v1/users",
    responses((status = 200, description = "All users", body = Vec<UserResponse>)),
    tag = "Users"
)]
pub async fn list_users(State(state): State<AppState>) -> ApiResult<Json<Vec<UserResponse>>> {
    let users = state.user_service.list_all().await?;
    Ok(Json(users.into_iter().map(Into::into).collect()))
}

async fn search(
    state: &AppState,
    raw: Option<String>,
    web_only: bool,
) -> ApiResult<Json<PageResponse<UserResponse>>> {
    let params = ListParams::parse(raw.as_deref())?;
    let page = state
        .user_service
        .search(params.query(), &params.page_request(DEFAULT_PAGE_SIZE), web_only)
        .await?;
    Ok(Json(PageResponse::from_page(page, UserResponse::from)))
}

/// Paged search over name, email, status and role
#[utoipa::path(
    get,
    path = "/api/v1/users/search",
    params(ListParams),
    responses((status = 200, description = "Page of users", body = UserPage)),
    tag = "Users"
)]
pub async fn search_users(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<PageResponse<UserResponse>>> {
    search(&state, raw, false).await
}

/// Paged search restricted to back-office accounts (ADMIN, VOLUNTEER)
#[utoipa::path(
    get,
    path = "/api/v1/users/web/search",
    params(ListParams),
    responses((status = 200, description = "Page of users", body = UserPage)),
    tag = "Users"
)]
pub async fn search_web_users(
    State(state): State<AppState>,
    RawQuery(raw): RawQuery,
) -> ApiResult<Json<PageResponse<UserResponse>>> {
    search(&state, raw, true).await
}

/// Change the account status (admin)
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/status",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = UserResponse),
        (status = 400, description = "Unknown status"),
        (status = 403, description = "Administrator role required"),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStatusRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state
        .user_service
        .update_status(id, payload.status.as_deref())
        .await?;
    Ok(Json(user.into()))
}

/// Set or clear the premium flag (admin)
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/premium",
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = UpdatePremiumRequest,
    responses(
        (status = 200, description = "Premium flag updated", body = UserResponse),
        (status = 403, description = "Administrator role required"),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn update_premium(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdatePremiumRequest>,
) -> ApiResult<Json<UserResponse>> {
    let user = state.user_service.set_premium(id, payload.premium).await?;
    Ok(Json(user.into()))
}

/// Delete an account and its refresh tokens (admin)
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 204, description = "User deleted"),
        (status = 403, description = "Administrator role required"),
        (status = 404, description = "User not found")
    ),
    tag = "Users"
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state.user_service.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users", get(list_users))
        .route("/api/v1/users/me", get(me))
        .route("/api/v1/users/search", get(search_users))
        .route("/api/v1/users/web/search", get(search_web_users))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/users/:id/status", put(update_status))
        .route("/api/v1/users/:id/premium", put(update_premium))
        .route("/api/v1/users/:id", delete(delete_user))
}
