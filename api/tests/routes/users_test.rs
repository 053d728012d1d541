#[cfg(test)]
mod tests {
    use crate::helpers::app::{body_json, get_request, json_request, user_with_token};
    use crate::helpers::make_test_app;
    use axum::http::StatusCode;
    use db::models::course::{self, CourseType, DayOfWeek, NewCourse};
    use db::models::user::UserType;
    use serde_json::json;
    use tower::ServiceExt;
    use util::state::AppState;

    async fn seed_course(app_state: &AppState, teacher_id: &str, code: &str, period: i32) -> course::Model {
        let new = NewCourse {
            code: code.into(),
            course_type: CourseType::LiberalArts,
            name: format!("Course {code}"),
            description: "Seminar".into(),
            credit: 1,
            period,
            day_of_week: DayOfWeek::Friday,
            keywords: "reading".into(),
        };
        course::Model::create(app_state.db(), teacher_id, &new).await.unwrap()
    }

    #[tokio::test]
    async fn me_returns_profile() {
        let (app, app_state) = make_test_app().await;
        let (_, token) = user_with_token(&app_state, "T001", UserType::Teacher).await;

        let response = app.oneshot(get_request("/api/users/me", &token)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["code"], "T001");
        assert_eq!(json["data"]["is_admin"], true);
    }

    #[tokio::test]
    async fn registering_lists_the_course() {
        let (app, app_state) = make_test_app().await;
        let (teacher, _) = user_with_token(&app_state, "T001", UserType::Teacher).await;
        let (_, token) = user_with_token(&app_state, "S001", UserType::Student).await;
        let c = seed_course(&app_state, &teacher.id, "LA-1", 2).await;

        let response = app
            .clone()
            .oneshot(json_request("PUT", "/api/users/me/courses", &token, json!([{ "id": c.id }])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(get_request("/api/users/me/courses", &token))
            .await
            .unwrap();
        let json = body_json(response).await;
        let courses = json["data"].as_array().unwrap();
        assert_eq!(courses.len(), 1);
        assert_eq!(courses[0]["id"], c.id.as_str());
        assert_eq!(courses[0]["teacher"], "User T001");
        assert_eq!(courses[0]["day_of_week"], "friday");
    }

    #[tokio::test]
    async fn rejected_batch_reports_every_category() {
        let (app, app_state) = make_test_app().await;
        let (teacher, _) = user_with_token(&app_state, "T001", UserType::Teacher).await;
        let (_, token) = user_with_token(&app_state, "S001", UserType::Student).await;
        let a = seed_course(&app_state, &teacher.id, "LA-1", 3).await;
        let b = seed_course(&app_state, &teacher.id, "LA-2", 3).await;

        let body = json!([{ "id": a.id }, { "id": b.id }, { "id": "missing" }]);
        let response = app
            .clone()
            .oneshot(json_request("PUT", "/api/users/me/courses", &token, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let json = body_json(response).await;
        assert_eq!(json["success"], false);
        assert_eq!(json["data"]["course_not_found"], json!(["missing"]));
        assert_eq!(json["data"]["schedule_conflict"].as_array().unwrap().len(), 1);

        let response = app
            .oneshot(get_request("/api/users/me/courses", &token))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert!(json["data"].as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn malformed_registration_body_is_rejected() {
        let (app, app_state) = make_test_app().await;
        let (_, token) = user_with_token(&app_state, "S001", UserType::Student).await;

        let response = app
            .oneshot(json_request("PUT", "/api/users/me/courses", &token, json!({ "id": 1 })))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
