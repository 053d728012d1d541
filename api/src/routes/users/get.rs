use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::service_error;
use axum::{
    Extension, Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use services::{grade_service::GradeService, user_service::UserService};
use util::state::AppState;

/// GET /api/users/me
///
/// ```json
/// { "code": "S001", "name": "Ada", "is_admin": false }
/// ```
pub async fn get_me(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Response {
    match UserService::me(&app_state, &claims.sub).await {
        Ok(profile) => (
            StatusCode::OK,
            Json(ApiResponse::success(profile, "Profile retrieved")),
        )
            .into_response(),
        Err(err) => service_error(err),
    }
}

/// GET /api/users/me/courses
///
/// Courses the caller is registered for that have not closed, with the
/// teacher's name.
pub async fn get_registered_courses(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Response {
    match UserService::registered_courses(&app_state, &claims.sub).await {
        Ok(courses) => (
            StatusCode::OK,
            Json(ApiResponse::success(courses, "Registered courses retrieved")),
        )
            .into_response(),
        Err(err) => service_error(err),
    }
}

/// GET /api/users/me/grades
///
/// GPA summary over closed courses plus per-course totals, class scores and
/// submitter counts.
pub async fn get_grades(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
) -> Response {
    match GradeService::summary(&app_state, &claims.sub).await {
        Ok(report) => (
            StatusCode::OK,
            Json(ApiResponse::success(report, "Grades retrieved")),
        )
            .into_response(),
        Err(err) => service_error(err),
    }
}
