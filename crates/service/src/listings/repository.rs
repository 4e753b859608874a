use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::domain::{ListingFilter, ServiceListing};
use crate::errors::ServiceError;
use crate::pagination::Pagination;

/// Persistence for service listings.
#[async_trait]
pub trait ListingRepository: Send + Sync {
    async fn insert_listing(&self, listing: ServiceListing) -> Result<ServiceListing, ServiceError>;
    async fn find_listing(&self, id: Uuid) -> Result<Option<ServiceListing>, ServiceError>;
    /// Filtered page, listings featured at `now` first, then newest first.
    async fn search_listings(
        &self,
        filter: &ListingFilter,
        now: DateTime<Utc>,
        page: Pagination,
    ) -> Result<Vec<ServiceListing>, ServiceError>;
    /// All listings of one provider, newest first.
    async fn listings_by_provider(&self, provider_id: &str) -> Result<Vec<ServiceListing>, ServiceError>;
}
