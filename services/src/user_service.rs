use crate::error::ServiceError;
use db::models::{
    course::{self, CourseStatus, CourseType, DayOfWeek},
    registration, user,
};
use sea_orm::{
    ColumnTrait, EntityTrait, FromQueryResult, JoinType, QueryFilter, QueryOrder, QuerySelect,
    RelationTrait,
};
use serde::Serialize;
use util::state::AppState;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile {
    pub code: String,
    pub name: String,
    pub is_admin: bool,
}

/// A course on the caller's timetable.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct RegisteredCourse {
    pub id: String,
    pub name: String,
    pub teacher: String,
    pub period: i32,
    pub day_of_week: DayOfWeek,
    #[serde(rename = "type")]
    pub course_type: CourseType,
    pub credit: i32,
    pub status: CourseStatus,
}

pub struct UserService;

impl UserService {
    pub async fn me(state: &AppState, user_id: &str) -> Result<Profile, ServiceError> {
        let found = user::Entity::find_by_id(user_id.to_owned())
            .one(state.db())
            .await?
            .ok_or_else(|| ServiceError::NotFound("No such user.".into()))?;
        Ok(Profile {
            is_admin: found.is_admin(),
            code: found.code,
            name: found.name,
        })
    }

    /// Courses the user holds that have not closed yet, by code.
    pub async fn registered_courses(
        state: &AppState,
        user_id: &str,
    ) -> Result<Vec<RegisteredCourse>, ServiceError> {
        let courses = course::Entity::find()
            .select_only()
            .column(course::Column::Id)
            .column(course::Column::Name)
            .column_as(user::Column::Name, "teacher")
            .column(course::Column::Period)
            .column(course::Column::DayOfWeek)
            .column_as(course::Column::CourseType, "course_type")
            .column(course::Column::Credit)
            .column(course::Column::Status)
            .inner_join(user::Entity)
            .join(JoinType::InnerJoin, course::Relation::Registrations.def())
            .filter(registration::Column::UserId.eq(user_id))
            .filter(course::Column::Status.ne(CourseStatus::Closed))
            .order_by_asc(course::Column::Code)
            .into_model::<RegisteredCourse>()
            .all(state.db())
            .await?;
        Ok(courses)
    }
}
