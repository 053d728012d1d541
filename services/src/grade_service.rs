//! Per-student grade report.
//!
//! Course totals and class submitter counts are read from the aggregate cache;
//! GPA statistics come from the shared GPA population snapshot.

use crate::error::ServiceError;
use crate::statistics;
use db::models::{
    class,
    course::{self, CourseStatus},
    registration, submission,
    user::UserType,
};
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbBackend, DbErr, EntityTrait, FromQueryResult, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Statement, sea_query::JoinType,
};
use serde::Serialize;
use std::collections::HashMap;
use util::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeReport {
    pub summary: GpaSummary,
    pub course_results: Vec<CourseResult>,
}

/// GPA over closed courses, placed against every other student's.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GpaSummary {
    pub credits: i32,
    pub gpa: f64,
    pub gpa_t_score: f64,
    pub gpa_avg: f64,
    pub gpa_max: f64,
    pub gpa_min: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CourseResult {
    pub name: String,
    pub code: String,
    pub total_score: i64,
    pub total_score_t_score: f64,
    pub total_score_avg: f64,
    pub total_score_max: i64,
    pub total_score_min: i64,
    pub class_scores: Vec<ClassScore>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassScore {
    pub class_id: String,
    pub title: String,
    pub part: i32,
    /// `None` until the class has been scored for this student.
    pub score: Option<i32>,
    pub submitters: i64,
}

#[derive(Debug, FromQueryResult)]
struct GpaRow {
    gpa: f64,
}

const GPA_POPULATION_SQL: &str = "\
SELECT COALESCE(SUM(CAST(submissions.score AS REAL) * courses.credit), 0) / 100.0 / credits.credits AS gpa \
FROM users \
JOIN (\
    SELECT users.id AS user_id, SUM(courses.credit) AS credits \
    FROM users \
    JOIN registrations ON users.id = registrations.user_id \
    JOIN courses ON registrations.course_id = courses.id AND courses.status = ? \
    GROUP BY users.id\
) AS credits ON credits.user_id = users.id \
JOIN registrations ON users.id = registrations.user_id \
JOIN courses ON registrations.course_id = courses.id AND courses.status = ? \
LEFT JOIN classes ON courses.id = classes.course_id \
LEFT JOIN submissions ON users.id = submissions.user_id AND submissions.class_id = classes.id \
WHERE users.type = ? \
GROUP BY users.id, credits.credits";

/// GPA of every student holding at least one closed course, straight from the ledger.
pub async fn load_gpa_population(db: &DatabaseConnection) -> Result<Vec<f64>, DbErr> {
    let closed = CourseStatus::Closed.to_string();
    let rows = GpaRow::find_by_statement(Statement::from_sql_and_values(
        DbBackend::Sqlite,
        GPA_POPULATION_SQL,
        [
            closed.clone().into(),
            closed.into(),
            UserType::Student.to_string().into(),
        ],
    ))
    .all(db)
    .await?;
    Ok(rows.into_iter().map(|row| row.gpa).collect())
}

pub struct GradeService;

impl GradeService {
    pub async fn summary(state: &AppState, user_id: &str) -> Result<GradeReport, ServiceError> {
        let courses = course::Entity::find()
            .join(JoinType::InnerJoin, course::Relation::Registrations.def())
            .filter(registration::Column::UserId.eq(user_id))
            .order_by_asc(course::Column::Code)
            .all(state.db())
            .await?;

        let mut course_results = Vec::with_capacity(courses.len());
        let mut credits = 0;
        let mut weighted = 0i64;

        for c in &courses {
            let classes = class::Entity::find()
                .filter(class::Column::CourseId.eq(c.id.as_str()))
                .order_by_desc(class::Column::Part)
                .all(state.db())
                .await?;
            let class_ids: Vec<String> = classes.iter().map(|cl| cl.id.clone()).collect();

            let own: HashMap<String, Option<i32>> = submission::Entity::find()
                .filter(submission::Column::UserId.eq(user_id))
                .filter(submission::Column::ClassId.is_in(class_ids.clone()))
                .all(state.db())
                .await?
                .into_iter()
                .map(|s| (s.class_id, s.score))
                .collect();
            let submitters = state.cache().submission_counts(&class_ids).await?;

            let class_scores: Vec<ClassScore> = classes
                .into_iter()
                .zip(submitters)
                .map(|(cl, submitters)| ClassScore {
                    score: own.get(&cl.id).copied().flatten(),
                    class_id: cl.id,
                    title: cl.title,
                    part: cl.part,
                    submitters,
                })
                .collect();
            let total_score: i64 = class_scores
                .iter()
                .filter_map(|cs| cs.score)
                .map(i64::from)
                .sum();

            let holders: Vec<String> = registration::Entity::find()
                .select_only()
                .column(registration::Column::UserId)
                .filter(registration::Column::CourseId.eq(c.id.as_str()))
                .into_tuple::<String>()
                .all(state.db())
                .await?;
            let totals = state.cache().running_totals(&c.id, &holders).await?;

            if c.status == CourseStatus::Closed {
                credits += c.credit;
                weighted += total_score * i64::from(c.credit);
            }

            course_results.push(CourseResult {
                name: c.name.clone(),
                code: c.code.clone(),
                total_score,
                total_score_t_score: statistics::t_score_int(total_score, &totals),
                total_score_avg: statistics::average_int(&totals),
                total_score_max: statistics::max_int(&totals),
                total_score_min: statistics::min_int(&totals),
                class_scores,
            });
        }

        let gpa = if credits > 0 {
            weighted as f64 / 100.0 / f64::from(credits)
        } else {
            0.0
        };

        let db = state.db_clone();
        let population = state
            .gpa()
            .get_or_refresh(move || async move { load_gpa_population(&db).await })
            .await
            .map_err(|err| DbErr::Custom(err.to_string()))?;

        Ok(GradeReport {
            summary: GpaSummary {
                credits,
                gpa,
                gpa_t_score: statistics::t_score(gpa, &population),
                gpa_avg: statistics::average(&population),
                gpa_max: statistics::max(&population),
                gpa_min: statistics::min(&population),
            },
            course_results,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registration_service::RegistrationService;
    use crate::submission_service::{ScoreEntry, SubmissionService, Upload};
    use crate::test_support::*;
    use serial_test::serial;
    use util::test_helpers::setup_test_storage_root;

    #[tokio::test]
    #[serial]
    async fn end_to_end_submission_to_grade() {
        let _root = setup_test_storage_root();
        let (state, teacher) = test_state().await;
        let student = add_student(&state, "S001").await;
        let course = add_course(&state, &teacher, "CS-1", 1, DayOfWeek::Monday).await;

        RegistrationService::register_courses(&state, &student.id, &[course.id.clone()])
            .await
            .unwrap();
        set_status(&state, &course.id, CourseStatus::InProgress).await;
        let class = add_class(&state, &course.id, 1).await;

        SubmissionService::submit(
            &state,
            &student.id,
            &course.id,
            &class.id,
            Upload {
                file_name: "report.pdf".into(),
                bytes: b"%PDF".to_vec(),
            },
        )
        .await
        .unwrap();
        SubmissionService::export(&state, &course.id, &class.id)
            .await
            .unwrap();
        SubmissionService::register_scores(
            &state,
            &course.id,
            &class.id,
            &[ScoreEntry {
                user_code: "S001".into(),
                score: 85,
            }],
        )
        .await
        .unwrap();

        let report = GradeService::summary(&state, &student.id).await.unwrap();
        assert_eq!(report.course_results.len(), 1);
        let result = &report.course_results[0];
        assert_eq!(result.total_score, 85);
        assert_eq!(result.total_score_max, 85);
        assert_eq!(result.total_score_t_score, 50.0);
        assert_eq!(result.class_scores.len(), 1);
        assert_eq!(result.class_scores[0].score, Some(85));
        assert_eq!(result.class_scores[0].submitters, 1);

        // Not closed yet, so nothing counts toward the GPA.
        assert_eq!(report.summary.credits, 0);
        assert_eq!(report.summary.gpa, 0.0);
    }

    #[tokio::test]
    async fn classes_are_listed_newest_part_first() {
        let (state, teacher) = test_state().await;
        let student = add_student(&state, "S001").await;
        let course = add_course(&state, &teacher, "CS-1", 1, DayOfWeek::Monday).await;
        RegistrationService::register_courses(&state, &student.id, &[course.id.clone()])
            .await
            .unwrap();
        set_status(&state, &course.id, CourseStatus::InProgress).await;
        for part in 1..=3 {
            add_class(&state, &course.id, part).await;
        }

        let report = GradeService::summary(&state, &student.id).await.unwrap();
        let parts: Vec<i32> = report.course_results[0]
            .class_scores
            .iter()
            .map(|cs| cs.part)
            .collect();
        assert_eq!(parts, vec![3, 2, 1]);
        assert!(report.course_results[0].class_scores.iter().all(|cs| cs.score.is_none()));
        assert!(report.course_results[0].class_scores.iter().all(|cs| cs.submitters == 0));
    }

    /// Two students in a closed two-credit course; one scored 90, the other 60.
    async fn closed_course_state() -> (AppState, String, String) {
        let (state, teacher) = test_state().await;
        let a = add_student(&state, "S001").await;
        let b = add_student(&state, "S002").await;
        let course = add_course(&state, &teacher, "CS-1", 1, DayOfWeek::Monday).await;
        for s in [&a, &b] {
            RegistrationService::register_courses(&state, &s.id, &[course.id.clone()])
                .await
                .unwrap();
        }
        set_status(&state, &course.id, CourseStatus::InProgress).await;
        let class = add_class(&state, &course.id, 1).await;
        SubmissionService::export(&state, &course.id, &class.id)
            .await
            .unwrap();
        SubmissionService::register_scores(
            &state,
            &course.id,
            &class.id,
            &[
                ScoreEntry {
                    user_code: "S001".into(),
                    score: 90,
                },
                ScoreEntry {
                    user_code: "S002".into(),
                    score: 60,
                },
            ],
        )
        .await
        .unwrap();
        set_status(&state, &course.id, CourseStatus::Closed).await;
        (state, a.id, b.id)
    }

    #[tokio::test]
    #[serial]
    async fn gpa_is_weighted_over_closed_courses() {
        let _root = setup_test_storage_root();
        let (state, a, b) = closed_course_state().await;

        let population = load_gpa_population(state.db()).await.unwrap();
        let mut sorted = population.clone();
        sorted.sort_by(f64::total_cmp);
        assert_eq!(sorted, vec![0.6, 0.9]);

        let report = GradeService::summary(&state, &a).await.unwrap();
        assert_eq!(report.summary.credits, 2);
        assert!((report.summary.gpa - 0.9).abs() < 1e-9);
        assert!((report.summary.gpa_avg - 0.75).abs() < 1e-9);
        assert_eq!(report.summary.gpa_max, 0.9);
        assert_eq!(report.summary.gpa_min, 0.6);
        assert!((report.summary.gpa_t_score - 60.0).abs() < 1e-9);

        let other = GradeService::summary(&state, &b).await.unwrap();
        assert!((other.summary.gpa_t_score - 40.0).abs() < 1e-9);
        assert_eq!(other.course_results[0].total_score_avg, 75.0);
    }

    #[tokio::test]
    #[serial]
    async fn concurrent_summaries_share_one_population() {
        let _root = setup_test_storage_root();
        let (state, a, _) = closed_course_state().await;
        assert_eq!(state.gpa().loads(), 0);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let state = state.clone();
                let user_id = a.clone();
                tokio::spawn(async move { GradeService::summary(&state, &user_id).await })
            })
            .collect();

        let mut summaries = Vec::new();
        for handle in handles {
            summaries.push(handle.await.unwrap().unwrap().summary);
        }
        assert!(summaries.windows(2).all(|pair| pair[0] == pair[1]));
        assert_eq!(state.gpa().loads(), 1);

        // Inside the window a later summary reuses the snapshot.
        GradeService::summary(&state, &a).await.unwrap();
        assert_eq!(state.gpa().loads(), 1);
    }
}
