use sea_orm_migration::prelude::*;

use crate::m20251015_000001_create_timetable_schema::BellSchedule;

#[derive(DeriveMigrationName)]
pub struct Migration;

/// Bell times the school starts the year with; editable afterwards through the API
const DEFAULT_BELLS: [(i32, &str, &str); 7] = [
    (1, "8:00", "8:40"),
    (2, "8:50", "9:30"),
    (3, "9:40", "10:20"),
    (4, "10:30", "11:10"),
    (5, "11:25", "12:05"),
    (6, "12:10", "12:50"),
    (7, "13:00", "13:40"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let mut insert = Query::insert();
        insert.into_table(BellSchedule::Table).columns([
            BellSchedule::LessonNumber,
            BellSchedule::StartTime,
            BellSchedule::EndTime,
        ]);

        for (lesson_number, start_time, end_time) in DEFAULT_BELLS {
            insert
                .values([lesson_number.into(), start_time.into(), end_time.into()])
                .map_err(|e| DbErr::Custom(format!("Invalid bell seed row: {e}")))?;
        }

        // Existing rows are kept so a re-run never overwrites edited times
        insert.on_conflict(
            OnConflict::column(BellSchedule::LessonNumber)
                .do_nothing()
                .to_owned(),
        );

        manager.exec_stmt(insert).await?;
        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let delete = Query::delete()
            .from_table(BellSchedule::Table)
            .cond_where(Expr::col(BellSchedule::LessonNumber).between(1, 7))
            .to_owned();

        manager.exec_stmt(delete).await?;
        Ok(())
    }
}
