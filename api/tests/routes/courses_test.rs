#[cfg(test)]
mod tests {
    use crate::helpers::app::{body_json, get_request, json_request, user_with_token};
    use crate::helpers::make_test_app;
    use axum::http::{StatusCode, header};
    use db::models::user::UserType;
    use serde_json::{Value, json};
    use serial_test::serial;
    use tower::ServiceExt;
    use util::config::AppConfig;

    fn course_body(code: &str, period: i32) -> Value {
        json!({
            "code": code,
            "type": "major-subjects",
            "name": format!("Systems {code}"),
            "description": "Kernels",
            "credit": 2,
            "period": period,
            "day_of_week": "tuesday",
            "keywords": "rust kernel"
        })
    }

    #[tokio::test]
    async fn add_course_is_idempotent_and_detects_conflicts() {
        let (app, app_state) = make_test_app().await;
        let (_, token) = user_with_token(&app_state, "T001", UserType::Teacher).await;

        let first = app
            .clone()
            .oneshot(json_request("POST", "/api/courses", &token, course_body("CS-1", 1)))
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::CREATED);
        let id = body_json(first).await["data"]["id"].clone();

        let again = app
            .clone()
            .oneshot(json_request("POST", "/api/courses", &token, course_body("CS-1", 1)))
            .await
            .unwrap();
        assert_eq!(again.status(), StatusCode::CREATED);
        assert_eq!(body_json(again).await["data"]["id"], id);

        let clash = app
            .clone()
            .oneshot(json_request("POST", "/api/courses", &token, course_body("CS-1", 2)))
            .await
            .unwrap();
        assert_eq!(clash.status(), StatusCode::CONFLICT);

        let detail = app
            .oneshot(get_request(&format!("/api/courses/{}", id.as_str().unwrap()), &token))
            .await
            .unwrap();
        assert_eq!(detail.status(), StatusCode::OK);
        let json = body_json(detail).await;
        assert_eq!(json["data"]["type"], "major-subjects");
        assert_eq!(json["data"]["teacher"], "User T001");
        assert_eq!(json["data"]["status"], "registration");
    }

    #[tokio::test]
    async fn invalid_enums_are_rejected() {
        let (app, app_state) = make_test_app().await;
        let (_, token) = user_with_token(&app_state, "T001", UserType::Teacher).await;

        let mut body = course_body("CS-1", 1);
        body["type"] = json!("cooking");
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/courses", &token, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Invalid course type.");

        let mut body = course_body("CS-1", 1);
        body["day_of_week"] = json!("sunday");
        let response = app
            .clone()
            .oneshot(json_request("POST", "/api/courses", &token, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Invalid day of week.");

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/courses/anything/status",
                &token,
                json!({ "status": "archived" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_course_is_not_found() {
        let (app, app_state) = make_test_app().await;
        let (_, token) = user_with_token(&app_state, "T001", UserType::Teacher).await;

        let response = app
            .clone()
            .oneshot(get_request("/api/courses/nope", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/courses/nope/status",
                &token,
                json!({ "status": "closed" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    #[serial]
    async fn search_pages_with_link_header() {
        AppConfig::set_page_size(2);
        let (app, app_state) = make_test_app().await;
        let (_, token) = user_with_token(&app_state, "T001", UserType::Teacher).await;
        for (code, period) in [("CS-1", 1), ("CS-2", 2), ("CS-3", 3)] {
            let response = app
                .clone()
                .oneshot(json_request("POST", "/api/courses", &token, course_body(code, period)))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .clone()
            .oneshot(get_request("/api/courses?keywords=kernel&page=1", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let link = response
            .headers()
            .get(header::LINK)
            .unwrap()
            .to_str()
            .unwrap()
            .to_owned();
        assert_eq!(link, "</api/courses?keywords=kernel&page=2>; rel=\"next\"");
        let json = body_json(response).await;
        let codes: Vec<&str> = json["data"]
            .as_array()
            .unwrap()
            .iter()
            .map(|c| c["code"].as_str().unwrap())
            .collect();
        assert_eq!(codes, vec!["CS-1", "CS-2"]);

        let response = app
            .clone()
            .oneshot(get_request("/api/courses?period=3&credit=zero", &token))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["data"].as_array().unwrap().len(), 1);

        let response = app
            .oneshot(get_request("/api/courses?page=0", &token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["message"], "Invalid page.");

        AppConfig::reset();
    }
}
