pub mod auth_client;
pub mod schedule_source_client;
