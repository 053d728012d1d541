use crate::response::ApiResponse;
use crate::routes::common::service_error;
use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use services::bootstrap_service::BootstrapService;
use util::state::AppState;

#[derive(Serialize)]
pub struct InitializeResponse {
    pub language: &'static str,
    pub classes: usize,
    pub totals: usize,
}

/// POST /initialize
///
/// Wipes the aggregate and GPA caches and rebuilds submission counters and
/// running totals from the ledger before returning.
pub async fn initialize(State(app_state): State<AppState>) -> impl IntoResponse {
    match BootstrapService::initialize(&app_state).await {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(
                InitializeResponse {
                    language: "rust",
                    classes: report.classes,
                    totals: report.totals,
                },
                "Initialized",
            )),
        )
            .into_response(),
        Err(err) => service_error(err),
    }
}
