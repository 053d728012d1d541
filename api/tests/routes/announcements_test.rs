#[cfg(test)]
mod tests {
    use crate::helpers::app::{body_json, get_request, json_request, user_with_token};
    use crate::helpers::make_test_app;
    use axum::http::StatusCode;
    use db::models::course::{self, CourseType, DayOfWeek, NewCourse};
    use db::models::user::UserType;
    use serde_json::json;
    use tower::ServiceExt;

    #[tokio::test]
    async fn posted_announcement_is_unread_until_opened() {
        let (app, app_state) = make_test_app().await;
        let (teacher, teacher_token) = user_with_token(&app_state, "T001", UserType::Teacher).await;
        let (_, student_token) = user_with_token(&app_state, "S001", UserType::Student).await;
        let (_, outsider_token) = user_with_token(&app_state, "S002", UserType::Student).await;

        let c = course::Model::create(
            app_state.db(),
            &teacher.id,
            &NewCourse {
                code: "CS-1".into(),
                course_type: CourseType::MajorSubjects,
                name: "Compilers".into(),
                description: "".into(),
                credit: 2,
                period: 1,
                day_of_week: DayOfWeek::Monday,
                keywords: "".into(),
            },
        )
        .await
        .unwrap();

        let response = app
            .clone()
            .oneshot(json_request("PUT", "/api/users/me/courses", &student_token, json!([{ "id": c.id }])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let notice = json!({ "id": "a1", "course_id": c.id, "title": "Room change", "message": "Hall B" });
        for _ in 0..2 {
            let response = app
                .clone()
                .oneshot(json_request("POST", "/api/announcements", &teacher_token, notice.clone()))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::CREATED);
        }

        let response = app
            .clone()
            .oneshot(get_request("/api/announcements", &student_token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["data"]["unread_count"], 1);
        assert_eq!(json["data"]["announcements"][0]["course_name"], "Compilers");
        assert_eq!(json["data"]["announcements"][0]["unread"], true);

        let response = app
            .clone()
            .oneshot(get_request("/api/announcements/a1", &student_token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["data"]["message"], "Hall B");

        let response = app
            .clone()
            .oneshot(get_request("/api/announcements/a1", &outsider_token))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app
            .oneshot(get_request("/api/announcements", &student_token))
            .await
            .unwrap();
        let json = body_json(response).await;
        assert_eq!(json["data"]["unread_count"], 0);
        assert_eq!(json["data"]["announcements"][0]["unread"], false);
    }

    #[tokio::test]
    async fn announcement_for_unknown_course_is_not_found() {
        let (app, app_state) = make_test_app().await;
        let (_, token) = user_with_token(&app_state, "T001", UserType::Teacher).await;

        let body = json!({ "id": "a1", "course_id": "missing", "title": "Hi", "message": "" });
        let response = app
            .oneshot(json_request("POST", "/api/announcements", &token, body))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
