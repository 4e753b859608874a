//! Create `booking` table with FKs to `service_listing` and both parties.
//!
//! Title and price are copied from the listing at booking time.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Booking::Table)
                    .if_not_exists()
                    .col(uuid(Booking::Id).primary_key())
                    .col(uuid(Booking::ServiceId).not_null())
                    .col(string_len(Booking::ServiceTitle, 160).not_null())
                    .col(string_len(Booking::ProviderId, 128).not_null())
                    .col(string_len(Booking::CustomerId, 128).not_null())
                    .col(string_len(Booking::CustomerEmail, 255).not_null())
                    .col(big_integer(Booking::PriceMinor).not_null())
                    .col(timestamp_with_time_zone(Booking::ScheduledFor).not_null())
                    .col(text(Booking::Notes).not_null())
                    .col(string_len(Booking::Status, 16).not_null())
                    .col(ColumnDef::new(Booking::PaymentReference).string_len(128).null())
                    .col(boolean(Booking::Reviewed).not_null().default(false))
                    .col(timestamp_with_time_zone(Booking::CreatedAt).not_null())
                    .col(timestamp_with_time_zone(Booking::UpdatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_service")
                            .from(Booking::Table, Booking::ServiceId)
                            .to(ServiceListing::Table, ServiceListing::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_booking_customer")
                            .from(Booking::Table, Booking::CustomerId)
                            .to(UserProfile::Table, UserProfile::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Booking::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Booking {
    Table,
    Id,
    ServiceId,
    ServiceTitle,
    ProviderId,
    CustomerId,
    CustomerEmail,
    PriceMinor,
    ScheduledFor,
    Notes,
    Status,
    PaymentReference,
    Reviewed,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ServiceListing { Table, Id }

#[derive(DeriveIden)]
enum UserProfile { Table, Id }
