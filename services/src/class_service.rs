use crate::error::ServiceError;
use crate::lookups;
use db::models::{class, course::CourseStatus, submission};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect, SqlErr};
use serde::Serialize;
use std::collections::HashSet;
use util::state::AppState;

/// A class as listed for one user, with whether they have submitted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassListing {
    pub id: String,
    pub part: i32,
    pub title: String,
    pub description: String,
    pub submission_closed: bool,
    pub submitted: bool,
}

#[derive(Debug, Clone)]
pub struct NewClass {
    pub part: i32,
    pub title: String,
    pub description: String,
}

pub struct ClassService;

impl ClassService {
    /// Classes of a course ordered by part, flagged with the user's submissions.
    pub async fn list_classes(
        state: &AppState,
        user_id: &str,
        course_id: &str,
    ) -> Result<Vec<ClassListing>, ServiceError> {
        lookups::ensure_course_exists(state.cache(), state.db(), course_id).await?;

        let classes = class::Entity::find()
            .filter(class::Column::CourseId.eq(course_id))
            .order_by_asc(class::Column::Part)
            .all(state.db())
            .await?;
        if classes.is_empty() {
            return Ok(Vec::new());
        }

        let class_ids: Vec<String> = classes.iter().map(|c| c.id.clone()).collect();
        let submitted: HashSet<String> = submission::Entity::find()
            .select_only()
            .column(submission::Column::ClassId)
            .filter(submission::Column::UserId.eq(user_id))
            .filter(submission::Column::ClassId.is_in(class_ids))
            .into_tuple::<String>()
            .all(state.db())
            .await?
            .into_iter()
            .collect();

        Ok(classes
            .into_iter()
            .map(|c| ClassListing {
                submitted: submitted.contains(&c.id),
                id: c.id,
                part: c.part,
                title: c.title,
                description: c.description,
                submission_closed: c.submission_closed,
            })
            .collect())
    }

    /// Adds a class to an in-progress course.
    ///
    /// An identical class at the same part returns the existing id with `false`;
    /// a different one is a conflict.
    pub async fn add_class(
        state: &AppState,
        course_id: &str,
        new: NewClass,
    ) -> Result<(String, bool), ServiceError> {
        let status = lookups::course_status(state.cache(), state.db(), course_id).await?;
        if status != CourseStatus::InProgress {
            return Err(ServiceError::InvalidState(
                "This course is not in-progress.".into(),
            ));
        }

        if let Some(existing) = class::Model::find_by_part(state.db(), course_id, new.part).await? {
            return Self::resolve_duplicate(existing, &new);
        }

        match class::Model::create(state.db(), course_id, new.part, &new.title, &new.description).await {
            Ok(created) => {
                tracing::info!(course_id = %course_id, class_id = %created.id, part = created.part, "Class created");
                Ok((created.id, true))
            }
            Err(err) if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) => {
                let existing = class::Model::find_by_part(state.db(), course_id, new.part)
                    .await?
                    .ok_or(ServiceError::Database(err))?;
                Self::resolve_duplicate(existing, &new)
            }
            Err(err) => Err(err.into()),
        }
    }

    fn resolve_duplicate(existing: class::Model, new: &NewClass) -> Result<(String, bool), ServiceError> {
        if existing.title == new.title && existing.description == new.description {
            Ok((existing.id, false))
        } else {
            Err(ServiceError::Conflict(
                "A class with the same part already exists.".into(),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    fn part(n: i32) -> NewClass {
        NewClass {
            part: n,
            title: format!("Week {n}"),
            description: "Read and summarise".into(),
        }
    }

    #[tokio::test]
    async fn add_class_requires_in_progress_course() {
        let (state, teacher) = test_state().await;
        let course = add_course(&state, &teacher, "CS-1", 1, DayOfWeek::Monday).await;

        let err = ClassService::add_class(&state, &course.id, part(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::InvalidState(_)));

        let err = ClassService::add_class(&state, "missing", part(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }

    #[tokio::test]
    async fn duplicate_part_is_idempotent_or_conflicts() {
        let (state, teacher) = test_state().await;
        let course = add_course(&state, &teacher, "CS-1", 1, DayOfWeek::Monday).await;
        set_status(&state, &course.id, CourseStatus::InProgress).await;

        let (id, created) = ClassService::add_class(&state, &course.id, part(1)).await.unwrap();
        assert!(created);
        let (same, created) = ClassService::add_class(&state, &course.id, part(1)).await.unwrap();
        assert_eq!(same, id);
        assert!(!created);

        let mut changed = part(1);
        changed.title = "Something else".into();
        let err = ClassService::add_class(&state, &course.id, changed)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn listing_is_ordered_and_flags_own_submissions() {
        let (state, teacher) = test_state().await;
        let student = add_student(&state, "S001").await;
        let course = add_course(&state, &teacher, "CS-1", 1, DayOfWeek::Monday).await;
        let second = add_class(&state, &course.id, 2).await;
        let first = add_class(&state, &course.id, 1).await;

        submission::Entity::insert(submission::ActiveModel {
            user_id: sea_orm::ActiveValue::Set(student.id.clone()),
            class_id: sea_orm::ActiveValue::Set(second.id.clone()),
            file_name: sea_orm::ActiveValue::Set("report.pdf".into()),
            score: sea_orm::ActiveValue::Set(None),
        })
        .exec_without_returning(state.db())
        .await
        .unwrap();

        let listing = ClassService::list_classes(&state, &student.id, &course.id)
            .await
            .unwrap();
        assert_eq!(listing.len(), 2);
        assert_eq!(listing[0].id, first.id);
        assert!(!listing[0].submitted);
        assert_eq!(listing[1].id, second.id);
        assert!(listing[1].submitted);

        assert!(state.cache().course_known(&course.id).await.unwrap());
        let err = ClassService::list_classes(&state, &student.id, "missing")
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
