//! Create `chat_message` table scoped to a booking.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ChatMessage::Table)
                    .if_not_exists()
                    .col(uuid(ChatMessage::Id).primary_key())
                    .col(uuid(ChatMessage::BookingId).not_null())
                    .col(string_len(ChatMessage::SenderId, 128).not_null())
                    .col(string_len(ChatMessage::SenderEmail, 255).not_null())
                    .col(text(ChatMessage::Text).not_null())
                    .col(timestamp_with_time_zone(ChatMessage::CreatedAt).not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_chat_message_booking")
                            .from(ChatMessage::Table, ChatMessage::BookingId)
                            .to(Booking::Table, Booking::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(ChatMessage::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum ChatMessage { Table, Id, BookingId, SenderId, SenderEmail, Text, CreatedAt }

#[derive(DeriveIden)]
enum Booking { Table, Id }
