use crate::error::{RegistrationErrors, ServiceError};
use db::models::{
    course::{self, CourseStatus},
    registration,
};
use sea_orm::{
    ColumnTrait, DbBackend, EntityTrait, FromQueryResult, QueryFilter, QueryOrder, QuerySelect,
    Statement, TransactionTrait, sea_query::{OnConflict, Query},
    ActiveValue::Set,
};
use util::state::AppState;

/// Existence/status row for one requested course id.
#[derive(Debug, FromQueryResult)]
struct RequestedCourse {
    requested_id: String,
    id: Option<String>,
    status: Option<String>,
}

pub struct RegistrationService;

impl RegistrationService {
    /// Registers `user_id` for every course in `course_ids` in one transaction.
    ///
    /// Ids may repeat and come in any order. Courses the user already holds are
    /// skipped. If any id is unknown, not open for registration, or clashes with
    /// the user's timetable, nothing is written and every offender is reported.
    ///
    /// Returns the ids that were newly registered, sorted.
    pub async fn register_courses(
        state: &AppState,
        user_id: &str,
        course_ids: &[String],
    ) -> Result<Vec<String>, ServiceError> {
        let mut requested: Vec<String> = course_ids.to_vec();
        requested.sort();
        requested.dedup();
        if requested.is_empty() {
            return Ok(Vec::new());
        }

        let txn = state.db().begin().await?;
        let mut errors = RegistrationErrors::default();

        let placeholders = vec!["(?)"; requested.len()].join(", ");
        let sql = format!(
            "WITH requested(id) AS (VALUES {placeholders}) \
             SELECT requested.id AS requested_id, courses.id AS id, courses.status AS status \
             FROM requested LEFT JOIN courses ON courses.id = requested.id \
             ORDER BY requested.id"
        );
        let rows = RequestedCourse::find_by_statement(Statement::from_sql_and_values(
            DbBackend::Sqlite,
            sql,
            requested.iter().map(|id| id.clone().into()),
        ))
        .all(&txn)
        .await?;

        let registrable_status = CourseStatus::Registration.to_string();
        let mut registrable = Vec::with_capacity(rows.len());
        for row in rows {
            match (row.id, row.status) {
                (None, _) => errors.course_not_found.push(row.requested_id),
                (Some(id), Some(status)) if status == registrable_status => registrable.push(id),
                (Some(id), _) => errors.not_registrable_status.push(id),
            }
        }

        let held = Query::select()
            .column(registration::Column::CourseId)
            .from(registration::Entity)
            .and_where(registration::Column::UserId.eq(user_id))
            .to_owned();

        let newly_added = if registrable.is_empty() {
            Vec::new()
        } else {
            course::Entity::find()
                .filter(course::Column::Id.is_in(registrable))
                .filter(course::Column::Id.not_in_subquery(held))
                .order_by_asc(course::Column::Id)
                .all(&txn)
                .await?
        };

        let already_registered = course::Entity::find()
            .inner_join(registration::Entity)
            .filter(registration::Column::UserId.eq(user_id))
            .filter(course::Column::Status.ne(CourseStatus::Closed))
            .all(&txn)
            .await?;

        // A new course clashes with any held course, or with a new course that
        // sorts before it, in the same slot.
        for (idx, candidate) in newly_added.iter().enumerate() {
            let clashes = already_registered
                .iter()
                .chain(newly_added[..idx].iter())
                .any(|other| other.id != candidate.id && other.slot() == candidate.slot());
            if clashes {
                errors.schedule_conflict.push(candidate.id.clone());
            }
        }

        if !errors.is_empty() {
            txn.rollback().await?;
            tracing::warn!(
                user_id = %user_id,
                not_found = errors.course_not_found.len(),
                not_registrable = errors.not_registrable_status.len(),
                conflicts = errors.schedule_conflict.len(),
                "Registration rejected"
            );
            return Err(ServiceError::Registration(errors));
        }

        if !newly_added.is_empty() {
            let rows = newly_added.iter().map(|c| registration::ActiveModel {
                course_id: Set(c.id.clone()),
                user_id: Set(user_id.to_owned()),
            });
            registration::Entity::insert_many(rows)
                .on_conflict(
                    OnConflict::columns([registration::Column::CourseId, registration::Column::UserId])
                        .do_nothing()
                        .to_owned(),
                )
                .do_nothing()
                .exec(&txn)
                .await?;

            for c in &newly_added {
                state.cache().seed_running_total(&c.id, user_id).await?;
            }
        }

        txn.commit().await?;

        let added: Vec<String> = newly_added.into_iter().map(|c| c.id).collect();
        tracing::info!(user_id = %user_id, added = added.len(), "Courses registered");
        Ok(added)
    }
}
