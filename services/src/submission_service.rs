use crate::error::ServiceError;
use crate::lookups;
use db::models::{
    class,
    course::{self, CourseStatus},
    submission, user,
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    TransactionTrait, sea_query::{Expr, OnConflict},
};
use std::collections::HashMap;
use std::fs;
use std::io::{Cursor, Write};
use std::path::PathBuf;
use util::{config, state::AppState};
use zip::{CompressionMethod, ZipWriter, write::SimpleFileOptions};

/// An uploaded assignment artifact.
#[derive(Debug, Clone)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

/// One line of a teacher's score batch.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoreEntry {
    pub user_code: String,
    pub score: i32,
}

pub struct SubmissionService;

impl SubmissionService {
    pub fn storage_root() -> PathBuf {
        PathBuf::from(config::assignment_storage_root())
    }

    /// Where the artifact for `(class_id, user_id)` lives on disk.
    pub fn artifact_path(class_id: &str, user_id: &str) -> PathBuf {
        Self::storage_root().join(format!("{class_id}-{user_id}.pdf"))
    }

    async fn class_in_course<C>(conn: &C, course_id: &str, class_id: &str) -> Result<class::Model, ServiceError>
    where
        C: ConnectionTrait,
    {
        class::Entity::find_by_id(class_id.to_owned())
            .one(conn)
            .await?
            .filter(|c| c.course_id == course_id)
            .ok_or_else(|| ServiceError::NotFound("No such class.".into()))
    }

    /// Stores a student's artifact for a class.
    ///
    /// The first submission for `(user, class)` creates the ledger row and bumps
    /// the class submission counter; later ones only replace the file.
    pub async fn submit(
        state: &AppState,
        user_id: &str,
        course_id: &str,
        class_id: &str,
        upload: Upload,
    ) -> Result<(), ServiceError> {
        if upload.file_name.trim().is_empty() {
            return Err(ServiceError::Validation("Invalid file.".into()));
        }

        let txn = state.db().begin().await?;

        let found = course::Entity::find_by_id(course_id.to_owned())
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("No such course.".into()))?;
        if found.status != CourseStatus::InProgress {
            return Err(ServiceError::InvalidState(
                "This course is not in progress.".into(),
            ));
        }

        if !lookups::is_registered(state.cache(), &txn, course_id, user_id).await? {
            return Err(ServiceError::InvalidState(
                "You have not taken this course.".into(),
            ));
        }

        let target = Self::class_in_course(&txn, course_id, class_id).await?;
        if target.submission_closed {
            return Err(ServiceError::InvalidState(
                "Submission has been closed for this class.".into(),
            ));
        }

        let inserted = submission::Entity::insert(submission::ActiveModel {
            user_id: Set(user_id.to_owned()),
            class_id: Set(class_id.to_owned()),
            file_name: Set(upload.file_name.clone()),
            score: Set(None),
        })
        .on_conflict(
            OnConflict::columns([submission::Column::UserId, submission::Column::ClassId])
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(&txn)
        .await?;

        if inserted == 0 {
            submission::Entity::update_many()
                .col_expr(submission::Column::FileName, Expr::value(upload.file_name.clone()))
                .filter(submission::Column::UserId.eq(user_id))
                .filter(submission::Column::ClassId.eq(class_id))
                .exec(&txn)
                .await?;
        }

        let path = Self::artifact_path(class_id, user_id);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, &upload.bytes)?;

        txn.commit().await?;

        if inserted > 0 {
            state.cache().incr_submission_count(class_id).await?;
        }
        tracing::info!(
            user_id = %user_id,
            class_id = %class_id,
            first = inserted > 0,
            "Assignment submitted"
        );
        Ok(())
    }

    /// Records a batch of scores for a closed class.
    ///
    /// Every user code must resolve and every score must lie in 0..=100 before
    /// anything is written. Each entry then adds its score to the user's running
    /// course total.
    pub async fn register_scores(
        state: &AppState,
        course_id: &str,
        class_id: &str,
        scores: &[ScoreEntry],
    ) -> Result<(), ServiceError> {
        let target = Self::class_in_course(state.db(), course_id, class_id).await?;
        if !target.submission_closed {
            return Err(ServiceError::InvalidState(
                "This assignment is not closed yet.".into(),
            ));
        }
        if scores.is_empty() {
            return Ok(());
        }

        if let Some(bad) = scores.iter().find(|s| !(0..=100).contains(&s.score)) {
            return Err(ServiceError::Validation(format!(
                "Score for {} must be between 0 and 100.",
                bad.user_code
            )));
        }

        let codes: Vec<String> = scores.iter().map(|s| s.user_code.clone()).collect();
        let users: HashMap<String, String> = user::Entity::find()
            .filter(user::Column::Code.is_in(codes))
            .all(state.db())
            .await?
            .into_iter()
            .map(|u| (u.code, u.id))
            .collect();
        let mut resolved = Vec::with_capacity(scores.len());
        for entry in scores {
            let user_id = users
                .get(&entry.user_code)
                .ok_or_else(|| ServiceError::Validation(format!("Unknown user code: {}", entry.user_code)))?;
            resolved.push((user_id.clone(), entry.score));
        }

        let txn = state.db().begin().await?;
        let mut created = 0;
        for (user_id, score) in &resolved {
            let inserted = submission::Entity::insert(submission::ActiveModel {
                user_id: Set(user_id.clone()),
                class_id: Set(class_id.to_owned()),
                file_name: Set(String::new()),
                score: Set(Some(*score)),
            })
            .on_conflict(
                OnConflict::columns([submission::Column::UserId, submission::Column::ClassId])
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;

            if inserted > 0 {
                created += 1;
            } else {
                submission::Entity::update_many()
                    .col_expr(submission::Column::Score, Expr::value(*score))
                    .filter(submission::Column::UserId.eq(user_id.as_str()))
                    .filter(submission::Column::ClassId.eq(class_id))
                    .exec(&txn)
                    .await?;
            }
        }
        txn.commit().await?;

        for (user_id, score) in &resolved {
            state
                .cache()
                .add_to_running_total(course_id, user_id, i64::from(*score))
                .await?;
        }
        for _ in 0..created {
            state.cache().incr_submission_count(class_id).await?;
        }
        tracing::info!(class_id = %class_id, scored = resolved.len(), "Scores registered");
        Ok(())
    }

    /// Closes a class for submissions and bundles every uploaded artifact.
    ///
    /// Entries are stored uncompressed as `{user_code}-{file_name}`. Rows that only
    /// carry a score have no artifact and are skipped.
    pub async fn export(state: &AppState, course_id: &str, class_id: &str) -> Result<Vec<u8>, ServiceError> {
        let txn = state.db().begin().await?;
        Self::class_in_course(&txn, course_id, class_id).await?;

        // Latch first so no submission slips in between the read and the close.
        class::Entity::update_many()
            .col_expr(class::Column::SubmissionClosed, Expr::value(true))
            .filter(class::Column::Id.eq(class_id))
            .exec(&txn)
            .await?;

        let rows = submission::Entity::find()
            .filter(submission::Column::ClassId.eq(class_id))
            .find_also_related(user::Entity)
            .order_by_asc(submission::Column::UserId)
            .all(&txn)
            .await?;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);
        let mut bundled = 0usize;
        for (row, owner) in rows {
            if row.file_name.is_empty() {
                continue;
            }
            let Some(owner) = owner else { continue };
            let bytes = fs::read(Self::artifact_path(class_id, &row.user_id))?;
            zip.start_file(format!("{}-{}", owner.code, row.file_name), options)?;
            zip.write_all(&bytes)?;
            bundled += 1;
        }
        let archive = zip.finish()?.into_inner();

        txn.commit().await?;
        tracing::info!(class_id = %class_id, files = bundled, "Submissions exported");
        Ok(archive)
    }
}
