use crate::auth::AuthUser;
use crate::response::ApiResponse;
use crate::routes::common::{page_links, parse_page, service_error};
use axum::{
    Extension, Json,
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use services::announcement_service::{AnnouncementService, AnnouncementSummary};
use util::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AnnouncementQuery {
    pub course_id: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AnnouncementListResponse {
    pub unread_count: u64,
    pub announcements: Vec<AnnouncementSummary>,
}

/// GET /api/announcements
///
/// Announcements of the caller's courses, newest first, optionally limited to
/// one `course_id`. Paged by `page`; neighbouring pages go in the `Link` header.
///
/// ```json
/// {
///   "unread_count": 1,
///   "announcements": [
///     { "id": "a1", "course_id": "c1", "course_name": "Compilers", "title": "Room change", "unread": true }
///   ]
/// }
/// ```
pub async fn get_announcements(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<AnnouncementQuery>,
) -> Response {
    let page = match parse_page(query.page.as_deref()) {
        Ok(page) => page,
        Err(resp) => return resp,
    };
    let course_id = query.course_id.as_deref().filter(|c| !c.is_empty());

    match AnnouncementService::list(&app_state, &claims.sub, course_id, page).await {
        Ok(listing) => {
            let headers = page_links(
                &uri,
                listing.page.page,
                listing.page.has_prev,
                listing.page.has_next,
            );
            let body = AnnouncementListResponse {
                unread_count: listing.unread_count,
                announcements: listing.page.items,
            };
            (
                StatusCode::OK,
                headers,
                Json(ApiResponse::success(body, "Announcements retrieved")),
            )
                .into_response()
        }
        Err(err) => service_error(err),
    }
}

/// GET /api/announcements/{announcement_id}
///
/// Opens an announcement and marks it read for the caller. Callers not
/// registered for its course get `404`.
pub async fn get_announcement(
    State(app_state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(announcement_id): Path<String>,
) -> Response {
    match AnnouncementService::detail(&app_state, &claims.sub, &announcement_id).await {
        Ok(detail) => (
            StatusCode::OK,
            Json(ApiResponse::success(detail, "Announcement retrieved")),
        )
            .into_response(),
        Err(err) => service_error(err),
    }
}
