use crate::auth::guards::Empty;
use crate::response::ApiResponse;
use crate::routes::common::{bad_request, service_error};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Deserialize;
use services::submission_service::{ScoreEntry, SubmissionService};
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub user_code: String,
    pub score: i32,
}

/// PUT /api/courses/{course_id}/classes/{class_id}/assignments/scores
///
/// Scores a closed class. Each score is added to the student's running course total.
///
/// ```json
/// [{ "user_code": "S001", "score": 85 }]
/// ```
pub async fn register_scores(
    State(app_state): State<AppState>,
    Path((course_id, class_id)): Path<(String, String)>,
    payload: Result<Json<Vec<ScoreRequest>>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload else {
        return bad_request("Invalid format.");
    };
    let scores: Vec<ScoreEntry> = req
        .into_iter()
        .map(|s| ScoreEntry {
            user_code: s.user_code,
            score: s.score,
        })
        .collect();

    match SubmissionService::register_scores(&app_state, &course_id, &class_id, &scores).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty, "Scores registered")),
        )
            .into_response(),
        Err(err) => service_error(err),
    }
}
