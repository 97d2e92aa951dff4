//! Mail Routes - manual sends and on-demand jobs

use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use chrono::Local;

use crate::application::JobReport;
use crate::error::ApiResult;
use crate::models::SendMailRequest;
use crate::AppState;

/// Send an HTML email
#[utoipa::path(
    post,
    path = "/api/v1/mail",
    request_body = SendMailRequest,
    responses(
        (status = 204, description = "Email sent"),
        (status = 400, description = "Recipient or subject missing, or inline image not found"),
        (status = 502, description = "Delivery or PDF download failed")
    ),
    tag = "Mail"
)]
pub async fn send_mail(
    State(state): State<AppState>,
    Json(payload): Json<SendMailRequest>,
) -> ApiResult<StatusCode> {
    state
        .mail_service
        .send(
            &payload.send_to,
            &payload.subject,
            &payload.message,
            payload.pdf_url.as_deref(),
        )
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

/// Run the Formular 230 renewal reminders now
#[utoipa::path(
    post,
    path = "/api/v1/mail/reminder",
    responses((status = 200, description = "Job report", body = JobReport)),
    tag = "Mail"
)]
pub async fn run_reminder(State(state): State<AppState>) -> ApiResult<Json<JobReport>> {
    let report = state
        .mail_service
        .run_renewal(Local::now().date_naive())
        .await?;
    Ok(Json(report))
}

/// Run the birthday greetings now
#[utoipa::path(
    post,
    path = "/api/v1/mail/birthday",
    responses((status = 200, description = "Job report", body = JobReport)),
    tag = "Mail"
)]
pub async fn run_birthday(State(state): State<AppState>) -> ApiResult<Json<JobReport>> {
    let report = state
        .mail_service
        .run_birthday(Local::now().date_naive())
        .await?;
    Ok(Json(report))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/v1/mail", post(send_mail))
        .route("/api/v1/mail/reminder", post(run_reminder))
        .route("/api/v1/mail/birthday", post(run_birthday))
}
