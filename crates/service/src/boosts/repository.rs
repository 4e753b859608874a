use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::domain::BoostOrder;
use crate::errors::ServiceError;
use crate::listings::domain::ServiceListing;

/// Persistence for boost orders.
#[async_trait]
pub trait BoostRepository: Send + Sync {
    async fn insert_order(&self, order: BoostOrder) -> Result<BoostOrder, ServiceError>;
    async fn find_order(&self, id: Uuid) -> Result<Option<BoostOrder>, ServiceError>;
    /// Atomically mark a `created` order paid and extend its listing's
    /// featured window by `days`. `None` when the order was already paid.
    async fn mark_paid(
        &self,
        order_id: Uuid,
        payment_reference: &str,
        now: DateTime<Utc>,
        days: i64,
    ) -> Result<Option<(BoostOrder, ServiceListing)>, ServiceError>;
}
