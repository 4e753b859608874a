use async_trait::async_trait;
use uuid::Uuid;

use super::domain::Review;
use crate::errors::ServiceError;
use crate::listings::domain::ServiceListing;

/// Persistence for reviews.
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Atomically store `review`, fold its rating into the listing aggregate
    /// and mark the booking reviewed. `Conflict` when the booking already
    /// carries a review. Returns the updated listing.
    async fn record_review(&self, review: Review) -> Result<ServiceListing, ServiceError>;
    /// Newest first.
    async fn reviews_for_service(&self, service_id: Uuid) -> Result<Vec<Review>, ServiceError>;
}
