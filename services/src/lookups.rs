//! Ledger lookups fronted by the aggregate cache's snapshots.
//!
//! Each helper takes the connection to fall back on, so callers inside a
//! transaction pass the transaction and stay on one connection.

use crate::error::ServiceError;
use db::models::{
    course::{self, CourseStatus},
    registration,
};
use sea_orm::{ConnectionTrait, EntityTrait};
use std::str::FromStr;
use util::cache::Aggregates;

/// Fails with `NotFound` unless the course exists.
pub(crate) async fn ensure_course_exists<C>(
    cache: &Aggregates,
    conn: &C,
    course_id: &str,
) -> Result<(), ServiceError>
where
    C: ConnectionTrait,
{
    if cache.course_known(course_id).await? {
        return Ok(());
    }
    if course::Entity::find_by_id(course_id.to_owned())
        .one(conn)
        .await?
        .is_none()
    {
        return Err(ServiceError::NotFound("No such course.".into()));
    }
    cache.remember_course(course_id).await?;
    Ok(())
}

/// Course status, read through the status snapshot.
pub(crate) async fn course_status<C>(
    cache: &Aggregates,
    conn: &C,
    course_id: &str,
) -> Result<CourseStatus, ServiceError>
where
    C: ConnectionTrait,
{
    if let Some(status) = cache
        .course_status(course_id)
        .await?
        .and_then(|raw| CourseStatus::from_str(&raw).ok())
    {
        return Ok(status);
    }

    let found = course::Entity::find_by_id(course_id.to_owned())
        .one(conn)
        .await?
        .ok_or_else(|| ServiceError::NotFound("No such course.".into()))?;
    cache
        .remember_course_status(course_id, &found.status.to_string())
        .await?;
    Ok(found.status)
}

/// Whether the user is registered for the course. Only positive answers are cached.
pub(crate) async fn is_registered<C>(
    cache: &Aggregates,
    conn: &C,
    course_id: &str,
    user_id: &str,
) -> Result<bool, ServiceError>
where
    C: ConnectionTrait,
{
    if cache.registration_known(course_id, user_id).await? {
        return Ok(true);
    }
    if !registration::Model::exists(conn, course_id, user_id).await? {
        return Ok(false);
    }
    cache.remember_registration(course_id, user_id).await?;
    Ok(true)
}
