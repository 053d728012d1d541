#[cfg(test)]
mod tests {
    use crate::helpers::app::{body_json, get_request, json_request, multipart_request, user_with_token};
    use crate::helpers::make_test_app_with_storage;
    use axum::{
        body::to_bytes,
        http::{StatusCode, header},
    };
    use db::models::user::UserType;
    use serde_json::json;
    use serial_test::serial;
    use std::io::{Cursor, Read};
    use tower::ServiceExt;

    /// Register, start the course, add a class, submit, export, score, then read grades.
    #[tokio::test]
    #[serial]
    async fn submission_scoring_and_grades_end_to_end() {
        let (app, app_state, _tmp) = make_test_app_with_storage().await;
        let (_, teacher) = user_with_token(&app_state, "T001", UserType::Teacher).await;
        let (_, student) = user_with_token(&app_state, "S001", UserType::Student).await;

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                "/api/courses",
                &teacher,
                json!({
                    "code": "CS-1", "type": "major-subjects", "name": "Compilers",
                    "description": "Parsing", "credit": 2, "period": 1,
                    "day_of_week": "monday", "keywords": "parser"
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let course_id = body_json(response).await["data"]["id"]
            .as_str()
            .unwrap()
            .to_owned();

        let response = app
            .clone()
            .oneshot(json_request("PUT", "/api/users/me/courses", &student, json!([{ "id": course_id }])))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        // Classes can only be added once the course is running.
        let class_body = json!({ "part": 1, "title": "Lexing", "description": "Tokens" });
        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/courses/{course_id}/classes"),
                &teacher,
                class_body.clone(),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("/api/courses/{course_id}/status"),
                &teacher,
                json!({ "status": "in-progress" }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(json_request(
                "POST",
                &format!("/api/courses/{course_id}/classes"),
                &teacher,
                class_body,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
        let class_id = body_json(response).await["data"]["class_id"]
            .as_str()
            .unwrap()
            .to_owned();

        let assignments = format!("/api/courses/{course_id}/classes/{class_id}/assignments");
        let response = app
            .clone()
            .oneshot(multipart_request(&assignments, &student, "lexer.pdf", b"%PDF-1.4"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .clone()
            .oneshot(get_request(&format!("/api/courses/{course_id}/classes"), &student))
            .await
            .unwrap();
        assert_eq!(body_json(response).await["data"][0]["submitted"], true);

        let response = app
            .clone()
            .oneshot(get_request(&format!("{assignments}/export"), &teacher))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "application/zip");
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let mut zip = zip::ZipArchive::new(Cursor::new(bytes.to_vec())).unwrap();
        let mut entry = zip.by_name("S001-lexer.pdf").unwrap();
        let mut content = Vec::new();
        entry.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"%PDF-1.4");

        // The latch is set now.
        let response = app
            .clone()
            .oneshot(multipart_request(&assignments, &student, "late.pdf", b"%PDF"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = app
            .clone()
            .oneshot(json_request(
                "PUT",
                &format!("{assignments}/scores"),
                &teacher,
                json!([{ "user_code": "S001", "score": 85 }]),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = app
            .oneshot(get_request("/api/users/me/grades", &student))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        let result = &json["data"]["course_results"][0];
        assert_eq!(result["code"], "CS-1");
        assert_eq!(result["total_score"], 85);
        assert_eq!(result["class_scores"][0]["score"], 85);
        assert_eq!(result["class_scores"][0]["submitters"], 1);
        assert_eq!(json["data"]["summary"]["credits"], 0);
    }

    #[tokio::test]
    #[serial]
    async fn students_cannot_score() {
        let (app, app_state, _tmp) = make_test_app_with_storage().await;
        let (_, student) = user_with_token(&app_state, "S001", UserType::Student).await;

        let response = app
            .oneshot(json_request(
                "PUT",
                "/api/courses/c/classes/k/assignments/scores",
                &student,
                json!([{ "user_code": "S001", "score": 100 }]),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }
}
