//! Setting Routes - CRM configuration stored in `crm_settings`

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::error::{ApiError, ApiResult};
use crate::models::{
    RequireActiveRequest, RequireActiveResponse, SettingResponse, SettingValueRequest,
};
use crate::AppState;

/// All settings, ordered by name
#[utoipa::path(
    get,
    path = "/api/v1/settings",
    responses((status = 200, description = "All settings", body = Vec<SettingResponse>)),
    tag = "Settings"
)]
pub async fn list_settings(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SettingResponse>>> {
    let settings = state.setting_service.list_all().await?;
    Ok(Json(settings.into_iter().map(Into::into).collect()))
}

/// Settings used by the Borderou 230 XML
#[utoipa::path(
    get,
    path = "/api/v1/settings/xml",
    responses((status = 200, description = "XML settings", body = Vec<SettingResponse>)),
    tag = "Settings"
)]
pub async fn list_xml_settings(
    State(state): State<AppState>,
) -> ApiResult<Json<Vec<SettingResponse>>> {
    let settings = state.setting_service.list_xml().await?;
    Ok(Json(settings.into_iter().map(Into::into).collect()))
}

/// Store a value, coerced to the setting's type (admin)
#[utoipa::path(
    put,
    path = "/api/v1/settings/{id}",
    params(("id" = i64, Path, description = "Setting ID")),
    request_body = SettingValueRequest,
    responses(
        (status = 200, description = "Setting updated", body = SettingResponse),
        (status = 400, description = "Value missing or not valid for the type"),
        (status = 403, description = "Administrator role required"),
        (status = 404, description = "Setting not found")
    ),
    tag = "Settings"
)]
pub async fn update_setting(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<SettingValueRequest>,
) -> ApiResult<Json<SettingResponse>> {
    let value = payload.text();
    let setting = state
        .setting_service
        .update_value(id, value.as_deref())
        .await?;
    Ok(Json(setting.into()))
}

/// Restore the default value (admin)
#[utoipa::path(
    post,
    path = "/api/v1/settings/{id}/reset",
    params(("id" = i64, Path, description = "Setting ID")),
    responses(
        (status = 200, description = "Setting reset", body = SettingResponse),
        (status = 403, description = "Administrator role required"),
        (status = 404, description = "Setting not found")
    ),
    tag = "Settings"
)]
pub async fn reset_setting(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<SettingResponse>> {
    let setting = state.setting_service.reset(id).await?;
    Ok(Json(setting.into()))
}

/// Whether mobile logins require an ACTIVE account
#[utoipa::path(
    get,
    path = "/api/v1/settings/require-active-for-login",
    responses((status = 200, description = "Current flag", body = RequireActiveResponse)),
    tag = "Settings"
)]
pub async fn get_require_active(
    State(state): State<AppState>,
) -> ApiResult<Json<RequireActiveResponse>> {
    let enabled = state.setting_service.require_active_for_login().await?;
    Ok(Json(RequireActiveResponse {
        require_active_for_login: enabled,
    }))
}

/// Change the mobile login policy (admin)
#[utoipa::path(
    put,
    path = "/api/v1/settings/require-active-for-login",
    request_body = RequireActiveRequest,
    responses(
        (status = 200, description = "Flag stored", body = RequireActiveResponse),
        (status = 400, description = "Flag missing"),
        (status = 403, description = "Administrator role required")
    ),
    tag = "Settings"
)]
pub async fn set_require_active(
    State(state): State<AppState>,
    Json(payload): Json<RequireActiveRequest>,
) -> ApiResult<Json<RequireActiveResponse>> {
    let enabled = payload
        .require_active_for_login
        .ok_or_else(|| ApiError::bad_request("Câmpul requireActiveForLogin este obligatoriu."))?;
    let stored = state
        .setting_service
        .set_require_active_for_login(enabled)
        .await?;
    Ok(Json(RequireActiveResponse {
        require_active_for_login: stored,
    }))
}

/// Readable without a token
pub fn public_router() -> Router<AppState> {
    Router::new().route(
        "/api/v1/settings/require-active-for-login",
        get(get_require_active),
    )
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/settings", get(list_settings))
        .route("/api/v1/settings/xml", get(list_xml_settings))
}

pub fn admin_router() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/settings/require-active-for-login",
            put(set_require_active),
        )
        .route("/api/v1/settings/:id", put(update_setting))
        .route("/api/v1/settings/:id/reset", post(reset_setting))
}
