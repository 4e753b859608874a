//! Create `review` table; one review per booking.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Review::Table)
                    .if_not_exists()
                    .col(uuid(Review::Id).primary_key())
                    .col(uuid(Review::BookingId).unique_key().not_null())
                    .col(uuid(Review::ServiceId).not_null())
                    .col(string_len(Review::CustomerId, 128).not_null())
                    .col(small_integer(Review::Rating).not_null())
                    .col(text(Review::Comment).not_null())
                    .col(timestamp_with_time_zone(Review::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_booking")
                            .from(Review::Table, Review::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_review_service")
                            .from(Review::Table, Review::ServiceId)
                            .to(ServiceListing::Table, ServiceListing::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(Review::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum Review { Table, Id, BookingId, ServiceId, CustomerId, Rating, Comment, CreatedAt }

#[derive(DeriveIden)]
enum Booking { Table, Id }

#[derive(DeriveIden)]
enum ServiceListing { Table, Id }
