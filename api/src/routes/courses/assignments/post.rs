use crate::auth::AuthUser;
use crate::auth::guards::Empty;
use crate::response::ApiResponse;
use crate::routes::common::{bad_request, service_error};
use axum::{
    Extension, Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::submission_service::{SubmissionService, Upload};
use util::state::AppState;

/// POST /api/courses/{course_id}/classes/{class_id}/assignments
///
/// Uploads the caller's assignment for a class. Resubmitting replaces the file.
///
/// ### Multipart Body (form-data)
/// - `file`: the artifact; its original file name is kept
///
/// ```bash
/// curl -X POST http://localhost:7000/api/courses/c1/classes/k1/assignments \
///   -H "Authorization: Bearer <token>" \
///   -F "file=@report.pdf"
/// ```
///
/// ### Responses
/// - `200 OK`
/// - `400 Bad Request` (no file, course not in progress, not registered, submission closed)
/// - `404 Not Found` (unknown course or class)
pub async fn submit_assignment(
    State(app_state): State<AppState>,
    Path((course_id, class_id)): Path<(String, String)>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    mut multipart: Multipart,
) -> Response {
    let mut upload = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(_) => return bad_request("Invalid file."),
        };
        if field.name() != Some("file") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_owned();
        match field.bytes().await {
            Ok(bytes) => {
                upload = Some(Upload {
                    file_name,
                    bytes: bytes.to_vec(),
                })
            }
            Err(_) => return bad_request("Invalid file."),
        }
    }
    let Some(upload) = upload else {
        return bad_request("Invalid file.");
    };

    match SubmissionService::submit(&app_state, &claims.sub, &course_id, &class_id, upload).await {
        Ok(()) => (
            StatusCode::OK,
            Json(ApiResponse::success(Empty, "Assignment submitted")),
        )
            .into_response(),
        Err(err) => service_error(err),
    }
}
