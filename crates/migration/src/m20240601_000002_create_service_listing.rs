//! Create `service_listing` table with FK to `user_profile`.
//!
//! Carries the denormalised rating aggregate and boost expiry.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ServiceListing::Table)
                    .if_not_exists()
                    .col(uuid(ServiceListing::Id).primary_key())
                    .col(string_len(ServiceListing::ProviderId, 128).not_null())
                    .col(string_len(ServiceListing::ProviderName, 255).not_null())
                    .col(string_len(ServiceListing::Title, 160).not_null())
                    .col(string_len(ServiceListing::Category, 32).not_null())
                    .col(big_integer(ServiceListing::PriceMinor).not_null())
                    .col(text(ServiceListing::Description).not_null())
                    .col(string_len(ServiceListing::Location, 160).not_null())
                    .col(double(ServiceListing::AverageRating).not_null().default(0.0))
                    .col(integer(ServiceListing::ReviewCount).not_null().default(0))
                    .col(
                        ColumnDef::new(ServiceListing::FeaturedUntil)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(timestamp_with_time_zone(ServiceListing::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(ServiceListing::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_service_listing_provider")
                            .from(ServiceListing::Table, ServiceListing::ProviderId)
                            .to(UserProfile::Table, UserProfile::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ServiceListing::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ServiceListing {
    Table,
    Id,
    ProviderId,
    ProviderName,
    Title,
    Category,
    PriceMinor,
    Description,
    Location,
    AverageRating,
    ReviewCount,
    FeaturedUntil,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum UserProfile { Table, Id }
