//! Helpers shared by the route handlers.

use crate::auth::guards::Empty;
use crate::response::ApiResponse;
use axum::{
    Json,
    http::{HeaderMap, HeaderValue, StatusCode, Uri, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use services::error::ServiceError;
use validator::Validate;

/// Maps a service failure to its HTTP status and the `ApiResponse` envelope.
///
/// Request problems keep their message. Infrastructure failures are logged and
/// answered with a generic 500.
pub fn service_error(err: ServiceError) -> Response {
    match err {
        ServiceError::Validation(msg) | ServiceError::InvalidState(msg) => (
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::<Empty>::error(msg)),
        )
            .into_response(),
        ServiceError::NotFound(msg) => (
            StatusCode::NOT_FOUND,
            Json(ApiResponse::<Empty>::error(msg)),
        )
            .into_response(),
        ServiceError::Conflict(msg) => (
            StatusCode::CONFLICT,
            Json(ApiResponse::<Empty>::error(msg)),
        )
            .into_response(),
        ServiceError::Registration(errors) => {
            tracing::warn!(?errors, "Course registration rejected");
            (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::failure(errors, "Course registration rejected.")),
            )
                .into_response()
        }
        other => {
            tracing::error!(error = %other, "Request failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::<Empty>::error("Internal server error")),
            )
                .into_response()
        }
    }
}

pub fn bad_request(message: impl Into<String>) -> Response {
    (
        StatusCode::BAD_REQUEST,
        Json(ApiResponse::<Empty>::error(message)),
    )
        .into_response()
}

/// Runs `validator` rules on a request body, answering 400 with the first message.
pub fn validate_body<T: Validate>(body: &T) -> Result<(), Response> {
    body.validate().map_err(|errors| {
        let message = errors
            .field_errors()
            .into_iter()
            .flat_map(|(_, errs)| errs.iter())
            .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
            .next()
            .unwrap_or_else(|| "Invalid format.".into());
        bad_request(message)
    })
}

/// `201 Created` with `data` in the envelope.
pub fn created<T: Serialize>(data: T, message: &str) -> Response {
    (StatusCode::CREATED, Json(ApiResponse::success(data, message))).into_response()
}

/// Builds a `Link` header pointing at the neighbouring pages of `uri`.
///
/// Every query parameter except `page` is carried over.
pub fn page_links(uri: &Uri, page: u64, has_prev: bool, has_next: bool) -> HeaderMap {
    let kept: Vec<&str> = uri
        .query()
        .unwrap_or_default()
        .split('&')
        .filter(|pair| !pair.is_empty() && !pair.starts_with("page="))
        .collect();
    let link_to = |target: u64| {
        let mut query = kept.clone();
        let page_param = format!("page={target}");
        query.push(&page_param);
        format!("<{}?{}>", uri.path(), query.join("&"))
    };

    let mut links = Vec::new();
    if has_prev {
        links.push(format!("{}; rel=\"prev\"", link_to(page - 1)));
    }
    if has_next {
        links.push(format!("{}; rel=\"next\"", link_to(page + 1)));
    }

    let mut headers = HeaderMap::new();
    if !links.is_empty() {
        if let Ok(value) = HeaderValue::from_str(&links.join(",")) {
            headers.insert(header::LINK, value);
        }
    }
    headers
}

/// Parses the `page` query value. Absent means the first page.
pub fn parse_page(raw: Option<&str>) -> Result<u64, Response> {
    match raw {
        None | Some("") => Ok(1),
        Some(raw) => raw
            .parse::<u64>()
            .ok()
            .filter(|p| *p > 0)
            .ok_or_else(|| bad_request("Invalid page.")),
    }
}
