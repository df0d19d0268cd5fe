pub use sea_orm_migration::prelude::*;

mod m20251015_000001_create_timetable_schema;
mod m20251015_000002_seed_bell_schedule;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20251015_000001_create_timetable_schema::Migration),
            Box::new(m20251015_000002_seed_bell_schedule::Migration),
        ]
    }
}
