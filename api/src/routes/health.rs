use axum::{Router, routing::get, Json, response::IntoResponse};
use crate::response::ApiResponse;

/// Builds the `/health` route group: a single unauthenticated `GET /health`
/// for uptime checks and load balancers.
pub fn health_routes<S>() -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    Router::new().route("/", get(health_check))
}

/// GET /health
///
/// ```json
/// { "success": true, "data": "OK", "message": "Health check passed" }
/// ```
async fn health_check() -> impl IntoResponse {
    Json(ApiResponse::success("OK", "Health check passed"))
}
