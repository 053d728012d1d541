use sea_orm::ActiveValue::Set;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// A course occupies exactly one weekly (period, day_of_week) slot. Everything but
/// `status` is immutable after creation.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "courses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(unique)]
    pub code: String,
    #[sea_orm(column_name = "type")]
    pub course_type: CourseType,
    pub name: String,
    pub description: String,
    pub credit: i32,
    pub period: i32,
    pub day_of_week: DayOfWeek,
    pub teacher_id: String,
    pub keywords: String,
    pub status: CourseStatus,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "course_type")]
pub enum CourseType {
    #[sea_orm(string_value = "liberal-arts")]
    LiberalArts,
    #[sea_orm(string_value = "major-subjects")]
    MajorSubjects,
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "day_of_week")]
pub enum DayOfWeek {
    #[sea_orm(string_value = "monday")]
    Monday,
    #[sea_orm(string_value = "tuesday")]
    Tuesday,
    #[sea_orm(string_value = "wednesday")]
    Wednesday,
    #[sea_orm(string_value = "thursday")]
    Thursday,
    #[sea_orm(string_value = "friday")]
    Friday,
}

/// Course lifecycle. Only `Registration` accepts registrations, only `InProgress`
/// accepts classes and submissions, and only `Closed` courses count toward GPA.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
#[sea_orm(rs_type = "String", db_type = "Enum", enum_name = "course_status")]
pub enum CourseStatus {
    #[sea_orm(string_value = "registration")]
    Registration,
    #[sea_orm(string_value = "in-progress")]
    InProgress,
    #[sea_orm(string_value = "closed")]
    Closed,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::TeacherId",
        to = "super::user::Column::Id"
    )]
    Teacher,
    #[sea_orm(has_many = "super::class::Entity")]
    Classes,
    #[sea_orm(has_many = "super::registration::Entity")]
    Registrations,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Teacher.def()
    }
}

impl Related<super::class::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Classes.def()
    }
}

impl Related<super::registration::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Registrations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Fields a teacher supplies when opening a course.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub code: String,
    pub course_type: CourseType,
    pub name: String,
    pub description: String,
    pub credit: i32,
    pub period: i32,
    pub day_of_week: DayOfWeek,
    pub keywords: String,
}

impl Model {
    pub async fn create<C>(db: &C, teacher_id: &str, new: &NewCourse) -> Result<Model, DbErr>
    where
        C: ConnectionTrait,
    {
        let active = ActiveModel {
            id: Set(uuid::Uuid::new_v4().to_string()),
            code: Set(new.code.clone()),
            course_type: Set(new.course_type),
            name: Set(new.name.clone()),
            description: Set(new.description.clone()),
            credit: Set(new.credit),
            period: Set(new.period),
            day_of_week: Set(new.day_of_week),
            teacher_id: Set(teacher_id.to_owned()),
            keywords: Set(new.keywords.clone()),
            status: Set(CourseStatus::Registration),
        };
        active.insert(db).await
    }

    pub async fn find_by_code<C>(db: &C, code: &str) -> Result<Option<Model>, DbErr>
    where
        C: ConnectionTrait,
    {
        Entity::find().filter(Column::Code.eq(code)).one(db).await
    }

    /// True when `new` carries exactly this course's catalogue fields.
    pub fn matches(&self, new: &NewCourse) -> bool {
        self.code == new.code
            && self.course_type == new.course_type
            && self.name == new.name
            && self.description == new.description
            && self.credit == new.credit
            && self.period == new.period
            && self.day_of_week == new.day_of_week
            && self.keywords == new.keywords
    }

    pub fn slot(&self) -> (i32, DayOfWeek) {
        (self.period, self.day_of_week)
    }
}
