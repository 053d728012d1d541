use crate::routes::common::service_error;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use services::submission_service::SubmissionService;
use util::state::AppState;

/// GET /api/courses/{course_id}/classes/{class_id}/assignments/export
///
/// Closes the class for submissions and downloads every artifact as one zip,
/// with entries named `{user_code}-{file_name}`.
pub async fn export_submissions(
    State(app_state): State<AppState>,
    Path((course_id, class_id)): Path<(String, String)>,
) -> Response {
    let archive = match SubmissionService::export(&app_state, &course_id, &class_id).await {
        Ok(archive) => archive,
        Err(err) => return service_error(err),
    };

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/zip"));
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::from_str(&format!("attachment; filename=\"{class_id}.zip\""))
            .unwrap_or_else(|_| HeaderValue::from_static("attachment")),
    );

    (StatusCode::OK, headers, archive).into_response()
}
