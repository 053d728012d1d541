use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Course notice. The id is chosen by the client so retries are idempotent.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "announcements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub course_id: String,
    pub title: String,
    pub message: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::course::Entity",
        from = "Column::CourseId",
        to = "super::course::Column::Id",
        on_delete = "Cascade"
    )]
    Course,
    #[sea_orm(has_many = "super::unread_announcement::Entity")]
    UnreadMarkers,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::unread_announcement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UnreadMarkers.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
