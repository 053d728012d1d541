use crate::auth::guards::allow_admin;
use axum::{
    Router,
    middleware::from_fn,
    routing::{get, post},
};
use util::state::AppState;

pub mod get;
pub mod post;

use get::{get_announcement, get_announcements};
use post::add_announcement;

pub fn announcement_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(get_announcements))
        .route("/", post(add_announcement).route_layer(from_fn(allow_admin)))
        .route("/{announcement_id}", get(get_announcement))
}
