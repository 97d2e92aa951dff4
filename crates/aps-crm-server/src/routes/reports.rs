//! Report Routes - CSV exports

use axum::{
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::application::Dataset;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ExportParams {
    /// voluntari, sponsorizare, iban, f230, d177 or cause
    pub dataset: Option<String>,
}

/// Download a dataset as CSV
#[utoipa::path(
    get,
    path = "/api/v1/reports/export",
    params(ExportParams),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv"),
        (status = 400, description = "Unknown dataset")
    ),
    tag = "Reports"
)]
pub async fn export(
    State(state): State<AppState>,
    Query(params): Query<ExportParams>,
) -> ApiResult<Response> {
    let dataset: Dataset = params
        .dataset
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("Parametrul 'dataset' este obligatoriu."))?
        .parse()?;
    let body = state.report_service.export(dataset).await?;

    let disposition = format!("attachment; filename=\"{}\"", dataset.file_name());
    let headers = [
        (header::CONTENT_TYPE, "text/csv; charset=UTF-8".to_string()),
        (header::CONTENT_DISPOSITION, disposition),
    ];
    Ok((headers, body).into_response())
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/reports/export", get(export))
}
