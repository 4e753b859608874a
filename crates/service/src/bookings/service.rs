use std::sync::Arc;

use chrono::Utc;
use common::metrics::{BOOKINGS_CREATED_TOTAL, BOOKING_TRANSITIONS_TOTAL};
use models::booking::{self, BookingStatus};
use models::boost_order;
use models::user_profile::{self, Role};
use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::domain::{may_transition, Booking, NewBooking, Party};
use super::repository::BookingRepository;
use crate::auth::Identity;
use crate::errors::ServiceError;
use crate::listings::repository::ListingRepository;
use crate::realtime::{Notification, RealtimeHub};
use crate::users::repository::UserRepository;

pub struct BookingService {
    bookings: Arc<dyn BookingRepository>,
    listings: Arc<dyn ListingRepository>,
    users: Arc<dyn UserRepository>,
    hub: Arc<RealtimeHub>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<dyn BookingRepository>,
        listings: Arc<dyn ListingRepository>,
        users: Arc<dyn UserRepository>,
        hub: Arc<RealtimeHub>,
    ) -> Self {
        Self { bookings, listings, users, hub }
    }

    async fn role_of(&self, uid: &str) -> Result<Role, ServiceError> {
        let profile = self.users.find_profile(uid).await?.ok_or_else(|| ServiceError::not_found("profile"))?;
        Ok(profile.role)
    }

    /// Fetch a booking the caller takes part in.
    pub async fn participant_booking(&self, identity: &Identity, booking_id: Uuid) -> Result<Booking, ServiceError> {
        let booking = self
            .bookings
            .find_booking(booking_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("booking"))?;
        if !booking.is_participant(&identity.uid) {
            return Err(ServiceError::forbidden("not a participant of this booking"));
        }
        Ok(booking)
    }

    #[instrument(skip(self, customer, input), fields(uid = %customer.uid, service_id = %input.service_id))]
    pub async fn create_booking(&self, customer: &Identity, input: NewBooking) -> Result<Booking, ServiceError> {
        if self.role_of(&customer.uid).await? != Role::Customer {
            return Err(ServiceError::forbidden("only customers can book services"));
        }
        let listing = self
            .listings
            .find_listing(input.service_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("No such service".into()))?;
        if listing.provider_id == customer.uid {
            return Err(ServiceError::forbidden("cannot book your own service"));
        }
        let scheduled_for = booking::parse_schedule(&input.scheduled_for)?;
        let notes = input.notes.trim().to_string();
        booking::validate_notes(&notes)?;
        let payment_reference = user_profile::normalize_optional(input.payment_reference.as_deref());
        if let Some(reference) = &payment_reference {
            boost_order::validate_payment_reference(reference)?;
        }

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4(),
            service_id: listing.id,
            service_title: listing.title,
            provider_id: listing.provider_id,
            customer_id: customer.uid.clone(),
            customer_email: customer.email.clone(),
            price_minor: listing.price_minor,
            scheduled_for,
            notes,
            status: BookingStatus::Pending,
            payment_reference,
            reviewed: false,
            created_at: now,
            updated_at: now,
        };
        let booking = self.bookings.insert_booking(booking).await?;
        BOOKINGS_CREATED_TOTAL.inc();
        info!(booking_id = %booking.id, provider_id = %booking.provider_id, "booking_created");
        self.hub.notify(&booking.provider_id, Notification::BookingCreated { booking: booking.clone() });
        Ok(booking)
    }

    /// Bookings visible to the caller: as customer or as provider, by role.
    pub async fn list_bookings(&self, identity: &Identity) -> Result<Vec<Booking>, ServiceError> {
        match self.role_of(&identity.uid).await? {
            Role::Customer => self.bookings.bookings_for_customer(&identity.uid).await,
            Role::Provider => self.bookings.bookings_for_provider(&identity.uid).await,
        }
    }

    #[instrument(skip(self, actor), fields(uid = %actor.uid))]
    pub async fn update_status(&self, actor: &Identity, booking_id: Uuid, to: BookingStatus) -> Result<Booking, ServiceError> {
        let current = self.participant_booking(actor, booking_id).await?;
        let party = if current.provider_id == actor.uid { Party::Provider } else { Party::Customer };
        if !current.status.can_transition_to(to) {
            return Err(ServiceError::conflict(format!("invalid transition {} -> {}", current.status, to)));
        }
        if !may_transition(party, current.status, to) {
            return Err(ServiceError::forbidden(format!("not allowed to mark booking {to}")));
        }
        let updated = match self.bookings.transition_status(booking_id, current.status, to, Utc::now()).await? {
            Some(b) => b,
            None => {
                warn!(booking_id = %booking_id, "booking status changed concurrently");
                return Err(ServiceError::conflict("booking status changed concurrently"));
            }
        };
        BOOKING_TRANSITIONS_TOTAL.with_label_values(&[to.as_str()]).inc();
        info!(booking_id = %updated.id, from = %current.status, to = %updated.status, "booking_status_changed");
        self.hub.notify(
            updated.counterpart(&actor.uid),
            Notification::BookingStatusChanged { booking_id: updated.id, status: updated.status, changed_by: actor.uid.clone() },
        );
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use chrono::DateTime;

    use super::*;
    use crate::repo::InMemoryRepository;
    use crate::test_support::{booking_input, TestMarket};

    #[tokio::test]
    async fn customer_books_and_provider_is_notified() {
        let m = TestMarket::new();
        let (provider, listing) = m.provider_with_listing("p1").await;
        let customer = m.customer("c1").await;
        let mut inbox = m.market.hub.subscribe_notifications(&provider.uid);

        let booking = m.market.bookings.create_booking(&customer, booking_input(listing.id)).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);
        assert_eq!(booking.service_title, listing.title);
        assert_eq!(booking.price_minor, listing.price_minor);
        assert_eq!(booking.customer_email, "c1@test.com");

        match inbox.recv().await.unwrap() {
            Notification::BookingCreated { booking: b } => assert_eq!(b.id, booking.id),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn providers_cannot_book() {
        let m = TestMarket::new();
        let (provider, listing) = m.provider_with_listing("p1").await;
        let err = m.market.bookings.create_booking(&provider, booking_input(listing.id)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    #[tokio::test]
    async fn booking_validates_schedule_and_service() {
        let m = TestMarket::new();
        let (_, listing) = m.provider_with_listing("p1").await;
        let customer = m.customer("c1").await;

        let mut bad = booking_input(listing.id);
        bad.scheduled_for = "someday".into();
        assert!(matches!(m.market.bookings.create_booking(&customer, bad).await, Err(ServiceError::Validation(_))));

        let missing = booking_input(Uuid::new_v4());
        assert!(matches!(m.market.bookings.create_booking(&customer, missing).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn each_side_lists_its_own_bookings() {
        let m = TestMarket::new();
        let (provider, listing) = m.provider_with_listing("p1").await;
        let c1 = m.customer("c1").await;
        let c2 = m.customer("c2").await;
        m.market.bookings.create_booking(&c1, booking_input(listing.id)).await.unwrap();
        m.market.bookings.create_booking(&c2, booking_input(listing.id)).await.unwrap();

        assert_eq!(m.market.bookings.list_bookings(&provider).await.unwrap().len(), 2);
        let mine = m.market.bookings.list_bookings(&c1).await.unwrap();
        assert_eq!(mine.len(), 1);
        assert_eq!(mine[0].customer_id, "c1");
    }

    #[tokio::test]
    async fn lifecycle_and_rejected_transitions() {
        let m = TestMarket::new();
        let (provider, listing) = m.provider_with_listing("p1").await;
        let customer = m.customer("c1").await;
        let booking = m.market.bookings.create_booking(&customer, booking_input(listing.id)).await.unwrap();
        let mut customer_inbox = m.market.hub.subscribe_notifications(&customer.uid);

        let err = m.market.bookings.update_status(&provider, booking.id, BookingStatus::Completed).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        let err = m.market.bookings.update_status(&customer, booking.id, BookingStatus::Confirmed).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));

        let confirmed = m.market.bookings.update_status(&provider, booking.id, BookingStatus::Confirmed).await.unwrap();
        assert_eq!(confirmed.status, BookingStatus::Confirmed);
        match customer_inbox.recv().await.unwrap() {
            Notification::BookingStatusChanged { status, changed_by, .. } => {
                assert_eq!(status, BookingStatus::Confirmed);
                assert_eq!(changed_by, "p1");
            }
            other => panic!("unexpected {other:?}"),
        }

        let done = m.market.bookings.update_status(&provider, booking.id, BookingStatus::Completed).await.unwrap();
        assert_eq!(done.status, BookingStatus::Completed);
        let err = m.market.bookings.update_status(&provider, booking.id, BookingStatus::Cancelled).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
    }

    #[tokio::test]
    async fn customer_can_cancel_pending() {
        let m = TestMarket::new();
        let (_, listing) = m.provider_with_listing("p1").await;
        let customer = m.customer("c1").await;
        let booking = m.market.bookings.create_booking(&customer, booking_input(listing.id)).await.unwrap();
        let cancelled = m.market.bookings.update_status(&customer, booking.id, BookingStatus::Cancelled).await.unwrap();
        assert_eq!(cancelled.status, BookingStatus::Cancelled);
    }

    #[tokio::test]
    async fn outsiders_cannot_touch_bookings() {
        let m = TestMarket::new();
        let (_, listing) = m.provider_with_listing("p1").await;
        let customer = m.customer("c1").await;
        let stranger = m.customer("c2").await;
        let booking = m.market.bookings.create_booking(&customer, booking_input(listing.id)).await.unwrap();
        let err = m.market.bookings.update_status(&stranger, booking.id, BookingStatus::Cancelled).await.unwrap_err();
        assert!(matches!(err, ServiceError::Forbidden(_)));
    }

    /// Lets the other party cancel between the service's read and its write.
    struct CancelledMeanwhile {
        inner: Arc<InMemoryRepository>,
    }

    #[async_trait::async_trait]
    impl BookingRepository for CancelledMeanwhile {
        async fn insert_booking(&self, booking: Booking) -> Result<Booking, ServiceError> {
            self.inner.insert_booking(booking).await
        }

        async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, ServiceError> {
            self.inner.find_booking(id).await
        }

        async fn bookings_for_customer(&self, customer_id: &str) -> Result<Vec<Booking>, ServiceError> {
            self.inner.bookings_for_customer(customer_id).await
        }

        async fn bookings_for_provider(&self, provider_id: &str) -> Result<Vec<Booking>, ServiceError> {
            self.inner.bookings_for_provider(provider_id).await
        }

        async fn transition_status(
            &self,
            id: Uuid,
            from: BookingStatus,
            to: BookingStatus,
            now: DateTime<Utc>,
        ) -> Result<Option<Booking>, ServiceError> {
            self.inner.transition_status(id, from, BookingStatus::Cancelled, now).await?;
            self.inner.transition_status(id, from, to, now).await
        }
    }

    #[tokio::test]
    async fn lost_compare_and_set_is_a_conflict() {
        let m = TestMarket::new();
        let (provider, listing) = m.provider_with_listing("p1").await;
        let customer = m.customer("c1").await;
        let booking = m.market.bookings.create_booking(&customer, booking_input(listing.id)).await.unwrap();
        let racing = BookingService::new(
            Arc::new(CancelledMeanwhile { inner: m.repos_memory.clone() }),
            m.repos_memory.clone(),
            m.repos_memory.clone(),
            m.market.hub.clone(),
        );
        let mut inbox = m.market.hub.subscribe_notifications(&customer.uid);

        let err = racing.update_status(&provider, booking.id, BookingStatus::Confirmed).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(msg) if msg.contains("concurrently")));
        let stored = m.market.bookings.participant_booking(&customer, booking.id).await.unwrap();
        assert_eq!(stored.status, BookingStatus::Cancelled);
        assert!(inbox.try_recv().is_err());
    }
}
