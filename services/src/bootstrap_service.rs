//! Rebuilds derived aggregates from the ledger.
//!
//! Runs before traffic is served. Every key the rebuild does not write stays
//! absent, which readers treat as zero.

use crate::error::ServiceError;
use db::models::submission;
use sea_orm::{
    DbBackend, EntityTrait, FromQueryResult, QuerySelect, Statement,
    sea_query::Expr,
};
use util::state::AppState;

#[derive(Debug, FromQueryResult)]
struct ClassCount {
    class_id: String,
    submitters: i64,
}

#[derive(Debug, FromQueryResult)]
struct CourseTotal {
    course_id: String,
    user_id: String,
    total: i64,
}

const RUNNING_TOTALS_SQL: &str = "\
SELECT registrations.course_id AS course_id, registrations.user_id AS user_id, \
       COALESCE(SUM(submissions.score), 0) AS total \
FROM registrations \
LEFT JOIN classes ON classes.course_id = registrations.course_id \
LEFT JOIN submissions ON submissions.class_id = classes.id AND submissions.user_id = registrations.user_id \
GROUP BY registrations.course_id, registrations.user_id";

/// Counts of what the rebuild wrote, for the startup log.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RebuildReport {
    pub classes: usize,
    pub totals: usize,
}

pub struct BootstrapService;

impl BootstrapService {
    /// Wipes both caches and re-derives submission counters and running totals.
    pub async fn initialize(state: &AppState) -> Result<RebuildReport, ServiceError> {
        state.cache().flush_all().await?;
        state.gpa().clear();

        let counts = submission::Entity::find()
            .select_only()
            .column(submission::Column::ClassId)
            .column_as(Expr::col(submission::Column::UserId).count(), "submitters")
            .group_by(submission::Column::ClassId)
            .into_model::<ClassCount>()
            .all(state.db())
            .await?;
        for row in &counts {
            state
                .cache()
                .set_submission_count(&row.class_id, row.submitters)
                .await?;
        }

        let totals = CourseTotal::find_by_statement(Statement::from_string(
            DbBackend::Sqlite,
            RUNNING_TOTALS_SQL,
        ))
        .all(state.db())
        .await?;
        for row in &totals {
            state
                .cache()
                .set_running_total(&row.course_id, &row.user_id, row.total)
                .await?;
        }

        let report = RebuildReport {
            classes: counts.len(),
            totals: totals.len(),
        };
        tracing::info!(classes = report.classes, totals = report.totals, "Aggregates rebuilt");
        Ok(report)
    }
}
