use sea_orm_migration::prelude::*;

mod m20250601_000001_create_users;
mod m20250601_000002_create_sessions;
mod m20250601_000003_create_session_participants;
mod m20250601_000004_create_feedback;
mod m20250601_000005_create_notifications;
mod m20250601_000006_add_lookup_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250601_000001_create_users::Migration),
            Box::new(m20250601_000002_create_sessions::Migration),
            Box::new(m20250601_000003_create_session_participants::Migration),
            Box::new(m20250601_000004_create_feedback::Migration),
            Box::new(m20250601_000005_create_notifications::Migration),
            Box::new(m20250601_000006_add_lookup_indexes::Migration),
        ]
    }
}
