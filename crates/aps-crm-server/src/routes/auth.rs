//! Auth Routes - registration, sessions and password recovery
//!
//! Everything here is public except `/logout`.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Extension, Json, Router,
};

use aps_crm::domain::services::borderou_xml::escape_xml;

use crate::application::RegisterCommand;
use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::models::{
    ForgotPasswordRequest, LoginRequest, LoginResponse, OtpResetRequest, RefreshRequest,
    RegisterRequest, ResetConfirmRequest, ResetPageQuery, UserResponse,
};
use crate::services::templates::{RESET_FORM, RESET_SUCCESS};
use crate::AppState;

const RESET_SUCCESS_PATH: &str = "/api/v1/auth/reset/success";

/// Register a new account (role USER, status PENDING)
#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid input"),
        (status = 409, description = "Email already registered")
    ),
    tag = "Auth"
)]
pub async fn register(
    State(state): State<AppState>,
    Json(payload): Json<RegisterRequest>,
) -> ApiResult<(StatusCode, Json<UserResponse>)> {
    let user = state
        .auth_service
        .register(RegisterCommand {
            first_name: payload.first_name,
            last_name: payload.last_name,
            gender: payload.gender,
            email: payload.email,
            password: payload.password,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// Log in with email and password
#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Tokens issued", body = LoginResponse),
        (status = 400, description = "Wrong credentials"),
        (status = 403, description = "Account not active (mobile)")
    ),
    tag = "Auth"
)]
pub async fn login(
    State(state): State<AppState>,
    Json(payload): Json<LoginRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let session = state
        .auth_service
        .login(&payload.email, &payload.password, payload.platform())
        .await?;

    Ok(Json(session.into()))
}

/// Exchange a refresh token for new tokens
#[utoipa::path(
    post,
    path = "/api/v1/auth/refresh",
    request_body = RefreshRequest,
    responses(
        (status = 200, description = "Tokens rotated", body = LoginResponse),
        (status = 401, description = "Refresh token invalid, revoked or expired")
    ),
    tag = "Auth"
)]
pub async fn refresh(
    State(state): State<AppState>,
    Json(payload): Json<RefreshRequest>,
) -> ApiResult<Json<LoginResponse>> {
    let session = state.auth_service.refresh(&payload.refresh_token).await?;
    Ok(Json(session.into()))
}

/// Revoke every refresh token of the caller
#[utoipa::path(
    post,
    path = "/api/v1/auth/logout",
    responses(
        (status = 204, description = "Logged out"),
        (status = 401, description = "Unauthorized")
    ),
    tag = "Auth"
)]
pub async fn logout(
    State(state): State<AppState>,
    Extension(caller): Extension<AuthUser>,
) -> ApiResult<StatusCode> {
    state.auth_service.logout(caller.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Email a password reset link
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 202, description = "Accepted, whether or not the account exists"),
        (status = 502, description = "Email could not be sent")
    ),
    tag = "Auth"
)]
pub async fn forgot(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> ApiResult<StatusCode> {
    state
        .auth_service
        .request_password_reset(&payload.email)
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// HTML form for a new password
#[utoipa::path(
    get,
    path = "/api/v1/auth/reset",
    params(("token" = Option<String>, Query, description = "Token from the reset email")),
    responses((status = 200, description = "Reset form", content_type = "text/html")),
    tag = "Auth"
)]
pub async fn reset_page(
    State(state): State<AppState>,
    Query(query): Query<ResetPageQuery>,
) -> ApiResult<Html<String>> {
    let token = escape_xml(query.token.as_deref().unwrap_or_default());
    let page = state.pages.render(RESET_FORM, &[("TOKEN", &token)])?;
    Ok(Html(page))
}

fn is_form(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"))
}

/// Set the new password; a form post redirects, JSON gets 204
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset/confirm",
    request_body(
        content = ResetConfirmRequest,
        content_type = "application/x-www-form-urlencoded",
        description = "Also accepted as application/json"
    ),
    responses(
        (status = 204, description = "Password changed (JSON)"),
        (status = 303, description = "Password changed (form), redirect to the success page"),
        (status = 400, description = "Token missing, unknown or expired, or password rejected")
    ),
    tag = "Auth"
)]
pub async fn reset_confirm(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let form = is_form(&headers);
    let payload: ResetConfirmRequest = if form {
        serde_urlencoded::from_bytes(&body)
            .map_err(|e| ApiError::bad_request(format!("Invalid form body: {}", e)))?
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| ApiError::bad_request(format!("Invalid JSON body: {}", e)))?
    };

    state
        .auth_service
        .confirm_password_reset(&payload.token, &payload.password, &payload.confirm_password)
        .await?;

    if form {
        Ok(Redirect::to(RESET_SUCCESS_PATH).into_response())
    } else {
        Ok(StatusCode::NO_CONTENT.into_response())
    }
}

/// Confirmation page shown after a form reset
#[utoipa::path(
    get,
    path = "/api/v1/auth/reset/success",
    responses((status = 200, description = "Confirmation page", content_type = "text/html")),
    tag = "Auth"
)]
pub async fn reset_success(State(state): State<AppState>) -> ApiResult<Html<String>> {
    let page = state.pages.render(RESET_SUCCESS, &[])?;
    Ok(Html(page))
}

/// Email a one-time reset code
#[utoipa::path(
    post,
    path = "/api/v1/auth/forgot1",
    request_body = ForgotPasswordRequest,
    responses(
        (status = 202, description = "Accepted, whether or not the account exists"),
        (status = 502, description = "Email could not be sent")
    ),
    tag = "Auth"
)]
pub async fn forgot_otp(
    State(state): State<AppState>,
    Json(payload): Json<ForgotPasswordRequest>,
) -> ApiResult<StatusCode> {
    state
        .auth_service
        .request_password_reset_otp(&payload.email)
        .await?;
    Ok(StatusCode::ACCEPTED)
}

/// Set a new password with the emailed code
#[utoipa::path(
    post,
    path = "/api/v1/auth/reset1",
    request_body = OtpResetRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Code invalid, expired or locked, or password rejected")
    ),
    tag = "Auth"
)]
pub async fn reset_otp(
    State(state): State<AppState>,
    Json(payload): Json<OtpResetRequest>,
) -> ApiResult<StatusCode> {
    state
        .auth_service
        .reset_password_with_otp(
            &payload.email,
            &payload.otp,
            &payload.password,
            &payload.confirm_password,
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Routes open to anonymous callers
pub fn public_router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/auth/register", post(register))
        .route("/api/v1/auth/login", post(login))
        .route("/api/v1/auth/refresh", post(refresh))
        .route("/api/v1/auth/forgot", post(forgot))
        .route("/api/v1/auth/reset", get(reset_page))
        .route("/api/v1/auth/reset/confirm", post(reset_confirm))
        .route("/api/v1/auth/reset/success", get(reset_success))
        .route("/api/v1/auth/forgot1", post(forgot_otp))
        .route("/api/v1/auth/reset1", post(reset_otp))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/auth/logout", post(logout))
}
