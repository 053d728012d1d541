use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// One session of a course with its assignment. `submission_closed` only ever
/// goes from false to true.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "classes")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub course_id: String,
    pub part: i32,
    pub title: String,
    pub description: String,
    pub submission_closed: bool,
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
    #[sea_orm(has_many = "super::submission::Entity")]
    Submissions,
}

impl Related<super::course::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Course.def()
    }
}

impl Related<super::submission::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Submissions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub async fn create<C>(
        db: &C,
        course_id: &str,
        part: i32,
        title: &str,
        description: &str,
    ) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let active = ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            course_id: Set(course_id.to_owned()),
            part: Set(part),
            title: Set(title.to_owned()),
            description: Set(description.to_owned()),
            submission_closed: Set(false),
        };
        active.insert(db).await
    }

    pub async fn find_by_part<C>(db: &C, course_id: &str, part: i32) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find()
            .filter(Column::CourseId.eq(course_id))
            .filter(Column::Part.eq(part))
            .one(db)
            .await
    }
}
