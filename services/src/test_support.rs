//! Fixtures shared by the service tests.

pub use db::models::course::{CourseStatus, CourseType, DayOfWeek, NewCourse};
use db::models::{
    class, course,
    user::{self, UserType},
};
use db::test_utils::setup_test_db;
use sea_orm::{ActiveModelTrait, ActiveValue::Set, EntityTrait};
use std::time::Duration;
use util::{cache::Aggregates, gpa_cache::GpaPopulationCache, state::AppState};

/// Fresh state over an in-memory ledger, plus one teacher.
pub async fn test_state() -> (AppState, user::Model) {
    let db = setup_test_db().await;
    let state = AppState::new(
        db,
        Aggregates::in_memory(),
        GpaPopulationCache::new(Duration::from_secs(3)),
    );
    let teacher = user::Model::create(state.db(), "T001", "Prof. Turing", UserType::Teacher)
        .await
        .unwrap();
    (state, teacher)
}

pub async fn add_student(state: &AppState, code: &str) -> user::Model {
    user::Model::create(state.db(), code, &format!("Student {code}"), UserType::Student)
        .await
        .unwrap()
}

pub fn new_course(code: &str, period: i32, day_of_week: DayOfWeek) -> NewCourse {
    NewCourse {
        code: code.to_owned(),
        course_type: CourseType::MajorSubjects,
        name: format!("Course {code}"),
        description: "Lectures and labs".to_owned(),
        credit: 2,
        period,
        day_of_week,
        keywords: "systems rust".to_owned(),
    }
}

pub async fn add_course(
    state: &AppState,
    teacher: &user::Model,
    code: &str,
    period: i32,
    day_of_week: DayOfWeek,
) -> course::Model {
    course::Model::create(state.db(), &teacher.id, &new_course(code, period, day_of_week))
        .await
        .unwrap()
}

/// Moves a course straight to `status` in the ledger, bypassing the service.
pub async fn set_status(state: &AppState, course_id: &str, status: CourseStatus) {
    let found = course::Entity::find_by_id(course_id.to_owned())
        .one(state.db())
        .await
        .unwrap()
        .unwrap();
    let mut active: course::ActiveModel = found.into();
    active.status = Set(status);
    active.update(state.db()).await.unwrap();
}

pub async fn add_class(state: &AppState, course_id: &str, part: i32) -> class::Model {
    class::Model::create(state.db(), course_id, part, &format!("Part {part}"), "Assignment")
        .await
        .unwrap()
}
