use crate::routes::common::{bad_request, created, service_error, validate_body};
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    response::Response,
};
use serde::{Deserialize, Serialize};
use services::class_service::{ClassService, NewClass};
use util::state::AppState;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct AddClassRequest {
    #[validate(range(min = 1, message = "Part must be positive."))]
    pub part: i32,
    #[validate(length(min = 1, message = "Title is required."))]
    pub title: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Serialize)]
pub struct AddClassResponse {
    pub class_id: String,
}

/// POST /api/courses/{course_id}/classes
///
/// ### Responses
/// - `201 Created` with `{ "class_id": ... }`, also for an identical existing class
/// - `400 Bad Request` if the body is malformed or the course is not in progress
/// - `404 Not Found` for an unknown course
/// - `409 Conflict` if the part already holds a different class
pub async fn add_class(
    State(app_state): State<AppState>,
    Path(course_id): Path<String>,
    payload: Result<Json<AddClassRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload else {
        return bad_request("Invalid format.");
    };
    if let Err(resp) = validate_body(&req) {
        return resp;
    }

    let new_class = NewClass {
        part: req.part,
        title: req.title,
        description: req.description,
    };
    match ClassService::add_class(&app_state, &course_id, new_class).await {
        Ok((class_id, true)) => created(AddClassResponse { class_id }, "Class created"),
        Ok((class_id, false)) => created(AddClassResponse { class_id }, "Class already exists"),
        Err(err) => service_error(err),
    }
}
