use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510010002_create_courses"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("courses"))
                    .if_not_exists()
                    .col(ColumnDef::new(Alias::new("id")).string().not_null().primary_key())
                    .col(ColumnDef::new(Alias::new("code")).string().not_null().unique_key())
                    .col(
                        ColumnDef::new(Alias::new("type"))
                            .enumeration(
                                Alias::new("course_type"),
                                vec![Alias::new("liberal-arts"), Alias::new("major-subjects")],
                            )
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("name")).string().not_null())
                    .col(ColumnDef::new(Alias::new("description")).text().not_null())
                    .col(ColumnDef::new(Alias::new("credit")).integer().not_null())
                    .col(ColumnDef::new(Alias::new("period")).integer().not_null())
                    .col(
                        ColumnDef::new(Alias::new("day_of_week"))
                            .enumeration(
                                Alias::new("day_of_week"),
                                vec![
                                    Alias::new("monday"),
                                    Alias::new("tuesday"),
                                    Alias::new("wednesday"),
                                    Alias::new("thursday"),
                                    Alias::new("friday"),
                                ],
                            )
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("teacher_id")).string().not_null())
                    .col(ColumnDef::new(Alias::new("keywords")).text().not_null())
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .enumeration(
                                Alias::new("course_status"),
                                vec![
                                    Alias::new("registration"),
                                    Alias::new("in-progress"),
                                    Alias::new("closed"),
                                ],
                            )
                            .not_null()
                            .default("registration"),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Alias::new("courses"), Alias::new("teacher_id"))
                            .to(Alias::new("users"), Alias::new("id")),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("courses")).to_owned())
            .await
    }
}
