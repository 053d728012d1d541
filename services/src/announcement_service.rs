use crate::Page;
use crate::error::ServiceError;
use crate::lookups;
use db::models::{announcement, course, registration, unread_announcement};
use sea_orm::{
    ActiveModelTrait, ActiveValue::Set, ColumnTrait, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, Select, TransactionTrait,
    sea_query::{Expr, IntoCondition, OnConflict},
};
use serde::Serialize;
use util::{config, state::AppState};

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct AnnouncementSummary {
    pub id: String,
    pub course_id: String,
    pub course_name: String,
    pub title: String,
    pub unread: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct AnnouncementDetail {
    pub id: String,
    pub course_id: String,
    pub course_name: String,
    pub title: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnnouncementPage {
    #[serde(flatten)]
    pub page: Page<AnnouncementSummary>,
    pub unread_count: u64,
}

#[derive(Debug, Clone)]
pub struct NewAnnouncement {
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub message: String,
}

/// Announcements of courses `user_id` is registered for, with their unread flag.
fn visible_to(user_id: &str) -> Select<announcement::Entity> {
    let reader = user_id.to_owned();
    announcement::Entity::find()
        .select_only()
        .column(announcement::Column::Id)
        .column(announcement::Column::CourseId)
        .column_as(course::Column::Name, "course_name")
        .column(announcement::Column::Title)
        .join(JoinType::InnerJoin, announcement::Relation::Course.def())
        .join(JoinType::InnerJoin, course::Relation::Registrations.def())
        .join(
            JoinType::LeftJoin,
            announcement::Relation::UnreadMarkers
                .def()
                .on_condition(move |_left, right| {
                    Expr::col((right, unread_announcement::Column::UserId))
                        .eq(reader.clone())
                        .into_condition()
                }),
        )
        .expr_as(
            Expr::col((unread_announcement::Entity, unread_announcement::Column::UserId)).is_not_null(),
            "unread",
        )
        .filter(registration::Column::UserId.eq(user_id))
}

pub struct AnnouncementService;

impl AnnouncementService {
    /// Posts an announcement and marks it unread for every registered student.
    ///
    /// The id comes from the caller. Re-posting the same announcement returns
    /// `false`; reusing the id for different content is a conflict.
    pub async fn add_announcement(state: &AppState, new: NewAnnouncement) -> Result<bool, ServiceError> {
        let txn = state.db().begin().await?;
        lookups::ensure_course_exists(state.cache(), &txn, &new.course_id).await?;

        if let Some(existing) = announcement::Entity::find_by_id(new.id.clone()).one(&txn).await? {
            if existing.course_id == new.course_id
                && existing.title == new.title
                && existing.message == new.message
            {
                return Ok(false);
            }
            return Err(ServiceError::Conflict(
                "An announcement with the same id already exists.".into(),
            ));
        }

        announcement::ActiveModel {
            id: Set(new.id.clone()),
            course_id: Set(new.course_id.clone()),
            title: Set(new.title.clone()),
            message: Set(new.message.clone()),
        }
        .insert(&txn)
        .await?;

        let readers: Vec<String> = registration::Entity::find()
            .select_only()
            .column(registration::Column::UserId)
            .filter(registration::Column::CourseId.eq(new.course_id.as_str()))
            .into_tuple::<String>()
            .all(&txn)
            .await?;
        let marked = readers.len();
        if !readers.is_empty() {
            unread_announcement::Entity::insert_many(readers.into_iter().map(|user_id| {
                unread_announcement::ActiveModel {
                    announcement_id: Set(new.id.clone()),
                    user_id: Set(user_id),
                }
            }))
            .on_conflict(
                OnConflict::columns([
                    unread_announcement::Column::AnnouncementId,
                    unread_announcement::Column::UserId,
                ])
                .do_nothing()
                .to_owned(),
            )
            .exec_without_returning(&txn)
            .await?;
        }

        txn.commit().await?;
        tracing::info!(
            announcement_id = %new.id,
            course_id = %new.course_id,
            readers = marked,
            "Announcement posted"
        );
        Ok(true)
    }

    /// Newest first, optionally limited to one course.
    pub async fn list(
        state: &AppState,
        user_id: &str,
        course_id: Option<&str>,
        page: u64,
    ) -> Result<AnnouncementPage, ServiceError> {
        if page == 0 {
            return Err(ServiceError::Validation("Invalid page.".into()));
        }
        let limit = config::page_size();

        let mut query = visible_to(user_id);
        if let Some(course_id) = course_id {
            query = query.filter(announcement::Column::CourseId.eq(course_id));
        }
        let rows = query
            .order_by_desc(announcement::Column::Id)
            .limit(limit + 1)
            .offset(limit * (page - 1))
            .into_model::<AnnouncementSummary>()
            .all(state.db())
            .await?;

        let unread_count = unread_announcement::Entity::find()
            .filter(unread_announcement::Column::UserId.eq(user_id))
            .count(state.db())
            .await?;

        Ok(AnnouncementPage {
            page: Page::from_overfetch(rows, page, limit),
            unread_count,
        })
    }

    /// Opens an announcement, clearing the caller's unread marker.
    pub async fn detail(
        state: &AppState,
        user_id: &str,
        announcement_id: &str,
    ) -> Result<AnnouncementDetail, ServiceError> {
        let found = announcement::Entity::find()
            .select_only()
            .column(announcement::Column::Id)
            .column(announcement::Column::CourseId)
            .column_as(course::Column::Name, "course_name")
            .column(announcement::Column::Title)
            .column(announcement::Column::Message)
            .join(JoinType::InnerJoin, announcement::Relation::Course.def())
            .filter(announcement::Column::Id.eq(announcement_id))
            .into_model::<AnnouncementDetail>()
            .one(state.db())
            .await?
            .ok_or_else(|| ServiceError::NotFound("No such announcement.".into()))?;

        if !lookups::is_registered(state.cache(), state.db(), &found.course_id, user_id).await? {
            return Err(ServiceError::NotFound("No such announcement.".into()));
        }

        unread_announcement::Entity::delete_many()
            .filter(unread_announcement::Column::AnnouncementId.eq(announcement_id))
            .filter(unread_announcement::Column::UserId.eq(user_id))
            .exec(state.db())
            .await?;

        Ok(found)
    }
}
