use crate::auth::guards::Empty;
use crate::routes::common::{bad_request, created, service_error, validate_body};
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
    response::Response,
};
use serde::Deserialize;
use services::announcement_service::{AnnouncementService, NewAnnouncement};
use util::state::AppState;
use validator::Validate;

#[derive(Debug, Deserialize, Validate)]
pub struct AddAnnouncementRequest {
    #[validate(length(min = 1, message = "Announcement id is required."))]
    pub id: String,
    #[validate(length(min = 1, message = "Course id is required."))]
    pub course_id: String,
    #[validate(length(min = 1, message = "Title is required."))]
    pub title: String,
    #[serde(default)]
    pub message: String,
}

/// POST /api/announcements
///
/// Posts an announcement with a client-chosen id and marks it unread for every
/// student of the course.
///
/// ### Responses
/// - `201 Created`, also when the identical announcement was already posted
/// - `404 Not Found` for an unknown course
/// - `409 Conflict` when the id is taken by different content
pub async fn add_announcement(
    State(app_state): State<AppState>,
    payload: Result<Json<AddAnnouncementRequest>, JsonRejection>,
) -> Response {
    let Ok(Json(req)) = payload else {
        return bad_request("Invalid format.");
    };
    if let Err(resp) = validate_body(&req) {
        return resp;
    }

    let new = NewAnnouncement {
        id: req.id,
        course_id: req.course_id,
        title: req.title,
        message: req.message,
    };
    match AnnouncementService::add_announcement(&app_state, new).await {
        Ok(true) => created(Empty, "Announcement created"),
        Ok(false) => created(Empty, "Announcement already exists"),
        Err(err) => service_error(err),
    }
}
