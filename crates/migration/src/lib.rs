//! Migrator registering marketplace tables in dependency order.
//! Indexes are applied last.
pub use sea_orm_migration::prelude::*;

mod m20240601_000001_create_user_profile;
mod m20240601_000002_create_service_listing;
mod m20240601_000003_create_booking;
mod m20240601_000004_create_review;
mod m20240601_000005_create_chat_message;
mod m20240601_000006_create_boost_order;
mod m20240601_000007_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240601_000001_create_user_profile::Migration),
            Box::new(m20240601_000002_create_service_listing::Migration),
            Box::new(m20240601_000003_create_booking::Migration),
            Box::new(m20240601_000004_create_review::Migration),
            Box::new(m20240601_000005_create_chat_message::Migration),
            Box::new(m20240601_000006_create_boost_order::Migration),
            // Indexes should always be applied last
            Box::new(m20240601_000007_add_indexes::Migration),
        ]
    }
}
