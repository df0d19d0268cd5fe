use crate::config::Config;
use crate::services::processing::{SeaOrmScheduleStore, TimetableProcessor};
use sea_orm::DatabaseConnection;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: DatabaseConnection,
    pub config: Config,
    pub processor: TimetableProcessor,
}

impl AppState {
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let processor = TimetableProcessor::new(Arc::new(SeaOrmScheduleStore::new(db.clone())));
        Self {
            db,
            config,
            processor,
        }
    }
}
