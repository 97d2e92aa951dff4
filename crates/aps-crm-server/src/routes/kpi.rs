//! KPI Route - dashboard figures

use axum::{extract::State, routing::get, Json, Router};
use chrono::Local;

use crate::error::ApiResult;
use crate::models::KpiResponse;
use crate::AppState;

/// Dashboard figures across every dataset
#[utoipa::path(
    get,
    path = "/api/v1/kpi",
    responses((status = 200, description = "Dashboard figures", body = KpiResponse)),
    tag = "KPI"
)]
pub async fn get_kpi(State(state): State<AppState>) -> ApiResult<Json<KpiResponse>> {
    let kpi = state
        .kpi_service
        .compute(Local::now().naive_local())
        .await?;
    Ok(Json(kpi.into()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/v1/kpi", get(get_kpi))
}
