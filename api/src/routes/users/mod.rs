//! `/api/users/me` routes: the caller's profile, timetable and grade report.

use axum::{Router, routing::get};
use util::state::AppState;

pub mod get;
pub mod put;

use get::{get_grades, get_me, get_registered_courses};
use put::register_courses;

pub fn users_routes() -> Router<AppState> {
    Router::new()
        .route("/me", get(get_me))
        .route("/me/courses", get(get_registered_courses).put(register_courses))
        .route("/me/grades", get(get_grades))
}
