//! `/api/courses` routes.
//!
//! Reads are open to any authenticated user. Creating courses and classes,
//! changing status, scoring and exporting are teacher-only.

use crate::auth::guards::allow_admin;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post, put},
};
use util::state::AppState;

pub mod assignments;
pub mod classes;
pub mod common;
pub mod get;
pub mod post;
pub mod put;

use assignments::{export_submissions, register_scores, submit_assignment};
use classes::{add_class, get_classes};
use get::{get_course, search_courses};
use post::add_course;
use put::set_course_status;

pub fn course_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(search_courses))
        .route("/", post(add_course).route_layer(from_fn(allow_admin)))
        .route("/{course_id}", get(get_course))
        .route(
            "/{course_id}/status",
            put(set_course_status).route_layer(from_fn(allow_admin)),
        )
        .route("/{course_id}/classes", get(get_classes))
        .route(
            "/{course_id}/classes",
            post(add_class).route_layer(from_fn(allow_admin)),
        )
        .route(
            "/{course_id}/classes/{class_id}/assignments",
            post(submit_assignment),
        )
        .route(
            "/{course_id}/classes/{class_id}/assignments/scores",
            put(register_scores).route_layer(from_fn(allow_admin)),
        )
        .route(
            "/{course_id}/classes/{class_id}/assignments/export",
            get(export_submissions).route_layer(from_fn(allow_admin)),
        )
}
