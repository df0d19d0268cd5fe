use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Schedule::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Schedule::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Schedule::ClassName).text().not_null())
                    .col(ColumnDef::new(Schedule::Day).text().not_null())
                    .col(ColumnDef::new(Schedule::LessonNumber).integer().not_null())
                    .col(ColumnDef::new(Schedule::Subject).text().not_null())
                    .col(ColumnDef::new(Schedule::Teacher).text().null())
                    .col(ColumnDef::new(Schedule::Room).text().null())
                    .col(ColumnDef::new(Schedule::Shift).text().null())
                    .col(
                        ColumnDef::new(Schedule::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Schedule::LastUpdated)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Target of the ON CONFLICT clause used by lesson upserts
        manager
            .create_index(
                Index::create()
                    .name("schedule_class_day_lesson_key")
                    .table(Schedule::Table)
                    .col(Schedule::ClassName)
                    .col(Schedule::Day)
                    .col(Schedule::LessonNumber)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BellSchedule::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BellSchedule::LessonNumber)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BellSchedule::StartTime).text().not_null())
                    .col(ColumnDef::new(BellSchedule::EndTime).text().not_null())
                    .col(
                        ColumnDef::new(BellSchedule::LastUpdated)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BellSchedule::Table).if_exists().to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Schedule::Table).if_exists().to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Schedule {
    Table,
    Id,
    ClassName,
    Day,
    LessonNumber,
    Subject,
    Teacher,
    Room,
    Shift,
    CreatedAt,
    LastUpdated,
}

#[derive(DeriveIden)]
pub(crate) enum BellSchedule {
    Table,
    LessonNumber,
    StartTime,
    EndTime,
    LastUpdated,
}
