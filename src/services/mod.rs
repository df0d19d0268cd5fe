pub mod models;
pub mod processing;
