//! Create `boost_order` table.
//!
//! One row per checkout attempt; `paid` orders extend the listing's feature window.
use sea_orm_migration::{prelude::*, schema::*};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(BoostOrder::Table)
                    .if_not_exists()
                    .col(uuid(BoostOrder::Id).primary_key())
                    .col(uuid(BoostOrder::ServiceId).not_null())
                    .col(string_len(BoostOrder::ProviderId, 128).not_null())
                    .col(big_integer(BoostOrder::AmountMinor).not_null())
                    .col(string_len(BoostOrder::Currency, 3).not_null())
                    .col(string_len(BoostOrder::Status, 16).not_null())
                    .col(ColumnDef::new(BoostOrder::PaymentReference).string_len(128).null())
                    .col(timestamp_with_time_zone(BoostOrder::CreatedAt).not_null())
                    .col(
                        ColumnDef::new(BoostOrder::PaidAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_boost_order_service")
                            .from(BoostOrder::Table, BoostOrder::ServiceId)
                            .to(ServiceListing::Table, ServiceListing::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager.drop_table(Table::drop().table(BoostOrder::Table).to_owned()).await
    }
}

#[derive(DeriveIden)]
enum BoostOrder {
    Table,
    Id,
    ServiceId,
    ProviderId,
    AmountMinor,
    Currency,
    Status,
    PaymentReference,
    CreatedAt,
    PaidAt,
}

#[derive(DeriveIden)]
enum ServiceListing { Table, Id }
