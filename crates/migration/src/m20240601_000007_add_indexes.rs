use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Listings: provider page and category filter
        manager
            .create_index(
                Index::create()
                    .name("idx_service_listing_provider")
                    .table(ServiceListing::Table)
                    .col(ServiceListing::ProviderId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_service_listing_category")
                    .table(ServiceListing::Table)
                    .col(ServiceListing::Category)
                    .to_owned(),
            )
            .await?;

        // Bookings: dashboards query by either party
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_customer")
                    .table(Booking::Table)
                    .col(Booking::CustomerId)
                    .to_owned(),
            )
            .await?;
        manager
            .create_index(
                Index::create()
                    .name("idx_booking_provider")
                    .table(Booking::Table)
                    .col(Booking::ProviderId)
                    .to_owned(),
            )
            .await?;

        // Reviews: per-service listing
        manager
            .create_index(
                Index::create()
                    .name("idx_review_service")
                    .table(Review::Table)
                    .col(Review::ServiceId)
                    .to_owned(),
            )
            .await?;

        // Chat: ordered history per booking
        manager
            .create_index(
                Index::create()
                    .name("idx_chat_message_booking_created")
                    .table(ChatMessage::Table)
                    .col(ChatMessage::BookingId)
                    .col(ChatMessage::CreatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(Index::drop().name("idx_chat_message_booking_created").table(ChatMessage::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_review_service").table(Review::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_booking_provider").table(Booking::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_booking_customer").table(Booking::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_listing_category").table(ServiceListing::Table).to_owned())
            .await?;
        manager
            .drop_index(Index::drop().name("idx_service_listing_provider").table(ServiceListing::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum ServiceListing { Table, ProviderId, Category }

#[derive(DeriveIden)]
enum Booking { Table, CustomerId, ProviderId }

#[derive(DeriveIden)]
enum Review { Table, ServiceId }

#[derive(DeriveIden)]
enum ChatMessage { Table, BookingId, CreatedAt }
