use crate::response::ApiResponse;
use crate::routes::common::{page_links, parse_page, service_error};
use crate::routes::courses::common::SearchQuery;
use axum::{
    Json,
    extract::{OriginalUri, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use db::models::course::{CourseStatus, CourseType, DayOfWeek};
use services::course_service::{CourseSearch, CourseService};
use std::str::FromStr;
use util::state::AppState;

impl SearchQuery {
    fn filters(&self) -> CourseSearch {
        let text = |v: &Option<String>| v.as_deref().filter(|s| !s.is_empty()).map(str::to_owned);
        CourseSearch {
            course_type: self.course_type.as_deref().and_then(|s| CourseType::from_str(s).ok()),
            credit: self.credit.as_deref().and_then(|s| s.parse().ok()),
            teacher: text(&self.teacher),
            period: self.period.as_deref().and_then(|s| s.parse().ok()),
            day_of_week: self.day_of_week.as_deref().and_then(|s| DayOfWeek::from_str(s).ok()),
            keywords: text(&self.keywords),
            status: self.status.as_deref().and_then(|s| CourseStatus::from_str(s).ok()),
        }
    }
}

/// GET /api/courses
///
/// Searches the catalogue, ordered by course code.
///
/// ### Query Parameters
/// - `type`, `credit`, `teacher`, `period`, `day_of_week`, `status`: exact filters
/// - `keywords`: space separated; all words must appear in the name, or all in the keywords
/// - `page`: 1-based page number (default 1)
///
/// Neighbouring pages are advertised in the `Link` header.
pub async fn search_courses(
    State(app_state): State<AppState>,
    OriginalUri(uri): OriginalUri,
    Query(query): Query<SearchQuery>,
) -> Response {
    let page = match parse_page(query.page.as_deref()) {
        Ok(page) => page,
        Err(resp) => return resp,
    };

    match CourseService::search(&app_state, &query.filters(), page).await {
        Ok(result) => {
            let headers = page_links(&uri, result.page, result.has_prev, result.has_next);
            (
                StatusCode::OK,
                headers,
                Json(ApiResponse::success(result.items, "Courses retrieved")),
            )
                .into_response()
        }
        Err(err) => service_error(err),
    }
}

/// GET /api/courses/{course_id}
pub async fn get_course(
    State(app_state): State<AppState>,
    Path(course_id): Path<String>,
) -> Response {
    match CourseService::get_course(&app_state, &course_id).await {
        Ok(course) => (
            StatusCode::OK,
            Json(ApiResponse::success(course, "Course retrieved")),
        )
            .into_response(),
        Err(err) => service_error(err),
    }
}
