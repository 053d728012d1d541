//! HTTP route entry point.
//!
//! Route groups under `/api`:
//! - `/health` → health check (public)
//! - `/users` → the caller's profile, timetable and grades (authenticated)
//! - `/courses` → catalogue, classes and assignments (authenticated; writes are teacher-only)
//! - `/announcements` → course notices (authenticated; posting is teacher-only)
//!
//! `POST /initialize` sits outside `/api` and rebuilds the aggregate caches.

use crate::auth::guards::allow_authenticated;
use crate::routes::{
    announcements::announcement_routes, courses::course_routes, health::health_routes,
    initialize::initialize, users::users_routes,
};
use axum::{Router, middleware::from_fn, routing::post};
use util::state::AppState;

pub mod announcements;
pub mod common;
pub mod courses;
pub mod health;
pub mod initialize;
pub mod users;

/// Builds the `/api` router.
pub fn routes(app_state: AppState) -> Router<AppState> {
    Router::new()
        .nest("/health", health_routes())
        .nest("/users", users_routes().route_layer(from_fn(allow_authenticated)))
        .nest("/courses", course_routes().route_layer(from_fn(allow_authenticated)))
        .nest(
            "/announcements",
            announcement_routes().route_layer(from_fn(allow_authenticated)),
        )
        .with_state(app_state)
}

/// The whole application: `/api` plus the bootstrap endpoint.
pub fn app(app_state: AppState) -> Router {
    Router::new()
        .route("/initialize", post(initialize))
        .nest("/api", routes(app_state.clone()))
        .with_state(app_state)
}
