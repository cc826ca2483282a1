pub mod models;
pub mod queries;

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");
