use crate::error::ServiceError;
use crate::Page;
use db::models::{
    course::{self, CourseStatus, CourseType, DayOfWeek, NewCourse},
    user,
};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, FromQueryResult, QueryFilter, QueryOrder, QuerySelect,
    Select, SqlErr, sea_query::Expr,
};
use serde::Serialize;
use util::{config, state::AppState};

/// A course as shown in the catalogue, with its teacher's name.
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct CourseDetail {
    pub id: String,
    pub code: String,
    #[serde(rename = "type")]
    pub course_type: CourseType,
    pub name: String,
    pub description: String,
    pub credit: i32,
    pub period: i32,
    pub day_of_week: DayOfWeek,
    pub keywords: String,
    pub status: CourseStatus,
    pub teacher: String,
}

/// Catalogue filters. Absent fields do not filter.
#[derive(Debug, Clone, Default)]
pub struct CourseSearch {
    pub course_type: Option<CourseType>,
    pub credit: Option<i32>,
    pub teacher: Option<String>,
    pub period: Option<i32>,
    pub day_of_week: Option<DayOfWeek>,
    /// Space separated; every word must appear in the name, or every word in the keywords.
    pub keywords: Option<String>,
    pub status: Option<CourseStatus>,
}

fn detail_query() -> Select<course::Entity> {
    course::Entity::find()
        .select_only()
        .column(course::Column::Id)
        .column(course::Column::Code)
        .column_as(course::Column::CourseType, "course_type")
        .column(course::Column::Name)
        .column(course::Column::Description)
        .column(course::Column::Credit)
        .column(course::Column::Period)
        .column(course::Column::DayOfWeek)
        .column(course::Column::Keywords)
        .column(course::Column::Status)
        .column_as(user::Column::Name, "teacher")
        .inner_join(user::Entity)
}

fn keyword_condition(keywords: &str) -> Option<Condition> {
    let words: Vec<&str> = keywords.split(' ').filter(|w| !w.is_empty()).collect();
    if words.is_empty() {
        return None;
    }
    let in_name = words
        .iter()
        .fold(Condition::all(), |cond, w| cond.add(course::Column::Name.contains(*w)));
    let in_keywords = words
        .iter()
        .fold(Condition::all(), |cond, w| cond.add(course::Column::Keywords.contains(*w)));
    Some(Condition::any().add(in_name).add(in_keywords))
}

pub struct CourseService;

impl CourseService {
    /// Opens a course taught by `teacher_id`.
    ///
    /// Re-sending an identical course returns the existing id with `false`; a
    /// different course under the same code is a conflict.
    pub async fn add_course(
        state: &AppState,
        teacher_id: &str,
        new: NewCourse,
    ) -> Result<(String, bool), ServiceError> {
        if let Some(existing) = course::Model::find_by_code(state.db(), &new.code).await? {
            return Self::resolve_duplicate(existing, &new);
        }

        match course::Model::create(state.db(), teacher_id, &new).await {
            Ok(created) => {
                tracing::info!(course_id = %created.id, code = %created.code, "Course created");
                Ok((created.id, true))
            }
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                // Lost a race with an identical request.
                let existing = course::Model::find_by_code(state.db(), &new.code)
                    .await?
                    .ok_or(ServiceError::Database(err))?;
                Self::resolve_duplicate(existing, &new)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn resolve_duplicate(existing: course::Model, new: &NewCourse) -> Result<(String, bool), ServiceError> {
        if existing.matches(new) {
            Ok((existing.id, false))
        } else {
            Err(ServiceError::Conflict(
                "A course with the same code already exists.".into(),
            ))
        }
    }

    /// One page of the catalogue, ordered by course code. Pages start at 1.
    pub async fn search(
        state: &AppState,
        filters: &CourseSearch,
        page: u64,
    ) -> Result<Page<CourseDetail>, ServiceError> {
        if page == 0 {
            return Err(ServiceError::Validation("Invalid page.".into()));
        }
        let limit = config::page_size();

        let mut query = detail_query();
        if let Some(course_type) = filters.course_type {
            query = query.filter(course::Column::CourseType.eq(course_type));
        }
        if let Some(credit) = filters.credit.filter(|c| *c > 0) {
            query = query.filter(course::Column::Credit.eq(credit));
        }
        if let Some(teacher) = filters.teacher.as_deref().filter(|t| !t.is_empty()) {
            query = query.filter(user::Column::Name.eq(teacher));
        }
        if let Some(period) = filters.period.filter(|p| *p > 0) {
            query = query.filter(course::Column::Period.eq(period));
        }
        if let Some(day) = filters.day_of_week {
            query = query.filter(course::Column::DayOfWeek.eq(day));
        }
        if let Some(cond) = filters.keywords.as_deref().and_then(keyword_condition) {
            query = query.filter(cond);
        }
        if let Some(status) = filters.status {
            query = query.filter(course::Column::Status.eq(status));
        }

        // One extra row tells us whether a next page exists.
        let rows = query
            .order_by_asc(course::Column::Code)
            .limit(limit + 1)
            .offset(limit * (page - 1))
            .into_model::<CourseDetail>()
            .all(state.db())
            .await?;

        Ok(Page::from_overfetch(rows, page, limit))
    }

    pub async fn get_course(state: &AppState, course_id: &str) -> Result<CourseDetail, ServiceError> {
        detail_query()
            .filter(course::Column::Id.eq(course_id))
            .into_model::<CourseDetail>()
            .one(state.db())
            .await?
            .ok_or_else(|| ServiceError::NotFound("No such course.".into()))
    }

    /// Moves a course to `status` and drops its status snapshot.
    pub async fn set_status(
        state: &AppState,
        course_id: &str,
        status: CourseStatus,
    ) -> Result<(), ServiceError> {
        let result = course::Entity::update_many()
            .col_expr(course::Column::Status, Expr::value(status))
            .filter(course::Column::Id.eq(course_id))
            .exec(state.db())
            .await?;

        state.cache().forget_course_status(course_id).await?;

        if result.rows_affected == 0 {
            return Err(ServiceError::NotFound("No such course.".into()));
        }
        tracing::info!(course_id = %course_id, status = %status, "Course status changed");
        Ok(())
    }
}
