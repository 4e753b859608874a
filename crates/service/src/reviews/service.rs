use std::sync::Arc;

use chrono::Utc;
use common::metrics::REVIEWS_SUBMITTED_TOTAL;
use models::booking::BookingStatus;
use models::review;
use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{NewReview, Review, ReviewOutcome};
use super::repository::ReviewRepository;
use crate::auth::Identity;
use crate::bookings::repository::BookingRepository;
use crate::errors::ServiceError;
use crate::realtime::{Notification, RealtimeHub};

pub struct ReviewService {
    reviews: Arc<dyn ReviewRepository>,
    bookings: Arc<dyn BookingRepository>,
    hub: Arc<RealtimeHub>,
}

impl ReviewService {
    pub fn new(reviews: Arc<dyn ReviewRepository>, bookings: Arc<dyn BookingRepository>, hub: Arc<RealtimeHub>) -> Self {
        Self { reviews, bookings, hub }
    }

    /// Review a completed booking and update the listing's running average.
    #[instrument(skip(self, customer, input), fields(uid = %customer.uid, rating = input.rating))]
    pub async fn submit_review(&self, customer: &Identity, booking_id: Uuid, input: NewReview) -> Result<ReviewOutcome, ServiceError> {
        review::validate_rating(input.rating)?;
        let comment = input.comment.trim().to_string();
        review::validate_comment(&comment)?;

        let booking = self
            .bookings
            .find_booking(booking_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("booking"))?;
        if booking.customer_id != customer.uid {
            return Err(ServiceError::forbidden("only the booking's customer can review it"));
        }
        if booking.status != BookingStatus::Completed {
            return Err(ServiceError::conflict("booking is not completed"));
        }
        if booking.reviewed {
            return Err(ServiceError::conflict("booking already reviewed"));
        }

        let review = Review {
            id: Uuid::new_v4(),
            booking_id,
            service_id: booking.service_id,
            customer_id: customer.uid.clone(),
            rating: input.rating,
            comment,
            created_at: Utc::now(),
        };
        let service = self.reviews.record_review(review.clone()).await?;
        REVIEWS_SUBMITTED_TOTAL.inc();
        info!(
            booking_id = %booking_id,
            service_id = %service.id,
            average_rating = service.average_rating,
            review_count = service.review_count,
            "review_submitted"
        );
        self.hub.notify(
            &booking.provider_id,
            Notification::ReviewPosted {
                booking_id,
                service_id: service.id,
                rating: review.rating,
                average_rating: service.average_rating,
                review_count: service.review_count,
            },
        );
        Ok(ReviewOutcome { review, service })
    }

    pub async fn list_reviews(&self, service_id: Uuid) -> Result<Vec<Review>, ServiceError> {
        self.reviews.reviews_for_service(service_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{booking_input, TestMarket};

    fn stars(rating: i16) -> NewReview { NewReview { rating, comment: "Great work".into() } }

    #[tokio::test]
    async fn reviews_fold_into_running_average() {
        let m = TestMarket::new();
        let (provider, listing) = m.provider_with_listing("p1").await;
        let c = m.customer("c1").await;
        let mut inbox = m.market.hub.subscribe_notifications(&provider.uid);

        let b1 = m.completed_booking(&provider, &c, listing.id).await;
        let first = m.market.reviews.submit_review(&c, b1.id, stars(5)).await.unwrap();
        assert_eq!((first.service.average_rating, first.service.review_count), (5.0, 1));

        let b2 = m.completed_booking(&provider, &c, listing.id).await;
        let b3 = m.completed_booking(&provider, &c, listing.id).await;
        m.market.reviews.submit_review(&c, b2.id, stars(5)).await.unwrap();
        let third = m.market.reviews.submit_review(&c, b3.id, stars(4)).await.unwrap();
        // (5 + 5 + 4) / 3 = 4.67 -> 4.7
        assert_eq!((third.service.average_rating, third.service.review_count), (4.7, 3));

        let stored = m.market.listings.get_listing(listing.id).await.unwrap();
        assert_eq!((stored.average_rating, stored.review_count), (4.7, 3));
        assert_eq!(m.market.reviews.list_reviews(listing.id).await.unwrap().len(), 3);

        let mut saw_review = false;
        while let Ok(n) = inbox.try_recv() {
            saw_review |= matches!(n, Notification::ReviewPosted { .. });
        }
        assert!(saw_review);
    }

    #[tokio::test]
    async fn only_one_review_per_booking() {
        let m = TestMarket::new();
        let (provider, listing) = m.provider_with_listing("p1").await;
        let c = m.customer("c1").await;
        let b = m.completed_booking(&provider, &c, listing.id).await;
        m.market.reviews.submit_review(&c, b.id, stars(3)).await.unwrap();
        let err = m.market.reviews.submit_review(&c, b.id, stars(5)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(_)));
        let stored = m.market.listings.get_listing(listing.id).await.unwrap();
        assert_eq!((stored.average_rating, stored.review_count), (3.0, 1));
    }

    #[tokio::test]
    async fn review_requires_completed_booking_by_its_customer() {
        let m = TestMarket::new();
        let (provider, listing) = m.provider_with_listing("p1").await;
        let c = m.customer("c1").await;
        let other = m.customer("c2").await;
        let pending = m.market.bookings.create_booking(&c, booking_input(listing.id)).await.unwrap();
        assert!(matches!(m.market.reviews.submit_review(&c, pending.id, stars(4)).await, Err(ServiceError::Conflict(_))));

        let done = m.completed_booking(&provider, &c, listing.id).await;
        assert!(matches!(m.market.reviews.submit_review(&other, done.id, stars(4)).await, Err(ServiceError::Forbidden(_))));
        assert!(matches!(m.market.reviews.submit_review(&provider, done.id, stars(4)).await, Err(ServiceError::Forbidden(_))));
        assert!(matches!(m.market.reviews.submit_review(&c, done.id, stars(0)).await, Err(ServiceError::Validation(_))));
        assert!(matches!(m.market.reviews.submit_review(&c, done.id, stars(6)).await, Err(ServiceError::Validation(_))));
        assert!(matches!(m.market.reviews.submit_review(&c, Uuid::new_v4(), stars(4)).await, Err(ServiceError::NotFound(_))));
    }
}
