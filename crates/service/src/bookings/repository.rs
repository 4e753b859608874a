use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::booking::BookingStatus;
use uuid::Uuid;

use super::domain::Booking;
use crate::errors::ServiceError;

/// Persistence for bookings.
#[async_trait]
pub trait BookingRepository: Send + Sync {
    async fn insert_booking(&self, booking: Booking) -> Result<Booking, ServiceError>;
    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, ServiceError>;
    /// Newest first.
    async fn bookings_for_customer(&self, customer_id: &str) -> Result<Vec<Booking>, ServiceError>;
    /// Newest first.
    async fn bookings_for_provider(&self, provider_id: &str) -> Result<Vec<Booking>, ServiceError>;
    /// Compare-and-set on the stored status. `None` when the booking is no
    /// longer in `from`.
    async fn transition_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, ServiceError>;
}
