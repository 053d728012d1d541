#[cfg(test)]
mod tests {
    use crate::helpers::app::{get_request, json_request, user_with_token};
    use crate::helpers::make_test_app;
    use axum::{
        body::Body,
        http::{Request, StatusCode},
    };
    use db::models::user::UserType;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn missing_token_is_unauthorized() {
        let (app, _) = make_test_app().await;
        let req = Request::builder()
            .uri("/api/users/me")
            .body(Body::empty())
            .unwrap();

        let response = app.oneshot(req).await.unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn garbage_token_is_unauthorized() {
        let (app, _) = make_test_app().await;
        let response = app
            .oneshot(get_request("/api/courses", "not-a-jwt"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn students_cannot_open_courses() {
        let (app, app_state) = make_test_app().await;
        let (_, token) = user_with_token(&app_state, "S001", UserType::Student).await;

        let body = json!({
            "code": "CS-1", "type": "major-subjects", "name": "Compilers",
            "description": "", "credit": 2, "period": 1, "day_of_week": "monday", "keywords": ""
        });
        let response = app
            .oneshot(json_request("POST", "/api/courses", &token, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
