//! Process-local backend for development and tests. A single lock guards all
//! tables, so multi-record updates are atomic.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use models::booking::BookingStatus;
use models::boost_order::BoostStatus;
use models::rating::fold_rating;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::bookings::domain::Booking;
use crate::bookings::repository::BookingRepository;
use crate::boosts::domain::{extend_featured, BoostOrder};
use crate::boosts::repository::BoostRepository;
use crate::chat::domain::ChatMessage;
use crate::chat::repository::ChatRepository;
use crate::errors::ServiceError;
use crate::listings::domain::{ListingFilter, ServiceListing};
use crate::listings::repository::ListingRepository;
use crate::pagination::Pagination;
use crate::reviews::domain::Review;
use crate::reviews::repository::ReviewRepository;
use crate::users::domain::UserProfile;
use crate::users::repository::UserRepository;

#[derive(Default)]
struct Tables {
    profiles: HashMap<String, UserProfile>,
    listings: HashMap<Uuid, ServiceListing>,
    bookings: HashMap<Uuid, Booking>,
    reviews: Vec<Review>,
    messages: Vec<ChatMessage>,
    boosts: HashMap<Uuid, BoostOrder>,
}

#[derive(Default)]
pub struct InMemoryRepository {
    tables: Mutex<Tables>,
}

fn newest_first<T>(mut rows: Vec<T>, created: impl Fn(&T) -> DateTime<Utc>) -> Vec<T> {
    rows.sort_by(|a, b| created(b).cmp(&created(a)));
    rows
}

#[async_trait]
impl UserRepository for InMemoryRepository {
    async fn find_profile(&self, uid: &str) -> Result<Option<UserProfile>, ServiceError> {
        Ok(self.tables.lock().await.profiles.get(uid).cloned())
    }

    async fn insert_profile(&self, profile: UserProfile) -> Result<UserProfile, ServiceError> {
        let mut t = self.tables.lock().await;
        if t.profiles.contains_key(&profile.id) {
            return Err(ServiceError::conflict("profile already registered"));
        }
        t.profiles.insert(profile.id.clone(), profile.clone());
        Ok(profile)
    }

    async fn update_profile(
        &self,
        uid: &str,
        display_name: Option<String>,
        bio: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Option<UserProfile>, ServiceError> {
        let mut t = self.tables.lock().await;
        Ok(t.profiles.get_mut(uid).map(|p| {
            p.display_name = display_name;
            p.bio = bio;
            p.updated_at = now;
            p.clone()
        }))
    }
}

#[async_trait]
impl ListingRepository for InMemoryRepository {
    async fn insert_listing(&self, listing: ServiceListing) -> Result<ServiceListing, ServiceError> {
        self.tables.lock().await.listings.insert(listing.id, listing.clone());
        Ok(listing)
    }

    async fn find_listing(&self, id: Uuid) -> Result<Option<ServiceListing>, ServiceError> {
        Ok(self.tables.lock().await.listings.get(&id).cloned())
    }

    async fn search_listings(
        &self,
        filter: &ListingFilter,
        now: DateTime<Utc>,
        page: Pagination,
    ) -> Result<Vec<ServiceListing>, ServiceError> {
        let t = self.tables.lock().await;
        let mut hits: Vec<ServiceListing> = t.listings.values().filter(|l| filter.matches(l)).cloned().collect();
        hits.sort_by(|a, b| {
            b.is_featured(now)
                .cmp(&a.is_featured(now))
                .then_with(|| b.created_at.cmp(&a.created_at))
        });
        Ok(hits.into_iter().skip(page.offset()).take(page.limit()).collect())
    }

    async fn listings_by_provider(&self, provider_id: &str) -> Result<Vec<ServiceListing>, ServiceError> {
        let t = self.tables.lock().await;
        let rows = t.listings.values().filter(|l| l.provider_id == provider_id).cloned().collect();
        Ok(newest_first(rows, |l| l.created_at))
    }
}

#[async_trait]
impl BookingRepository for InMemoryRepository {
    async fn insert_booking(&self, booking: Booking) -> Result<Booking, ServiceError> {
        self.tables.lock().await.bookings.insert(booking.id, booking.clone());
        Ok(booking)
    }

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, ServiceError> {
        Ok(self.tables.lock().await.bookings.get(&id).cloned())
    }

    async fn bookings_for_customer(&self, customer_id: &str) -> Result<Vec<Booking>, ServiceError> {
        let t = self.tables.lock().await;
        let rows = t.bookings.values().filter(|b| b.customer_id == customer_id).cloned().collect();
        Ok(newest_first(rows, |b| b.created_at))
    }

    async fn bookings_for_provider(&self, provider_id: &str) -> Result<Vec<Booking>, ServiceError> {
        let t = self.tables.lock().await;
        let rows = t.bookings.values().filter(|b| b.provider_id == provider_id).cloned().collect();
        Ok(newest_first(rows, |b| b.created_at))
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, ServiceError> {
        let mut t = self.tables.lock().await;
        Ok(t.bookings.get_mut(&id).filter(|b| b.status == from).map(|b| {
            b.status = to;
            b.updated_at = now;
            b.clone()
        }))
    }
}

#[async_trait]
impl ReviewRepository for InMemoryRepository {
    async fn record_review(&self, review: Review) -> Result<ServiceListing, ServiceError> {
        let mut t = self.tables.lock().await;
        match t.bookings.get(&review.booking_id) {
            None => return Err(ServiceError::not_found("booking")),
            Some(b) if b.reviewed => return Err(ServiceError::conflict("booking already reviewed")),
            Some(_) => {}
        }
        let listing = t
            .listings
            .get_mut(&review.service_id)
            .ok_or_else(|| ServiceError::NotFound("No such service".into()))?;
        let (average, count) = fold_rating(listing.average_rating, listing.review_count, review.rating);
        listing.average_rating = average;
        listing.review_count = count;
        listing.updated_at = review.created_at;
        let listing = listing.clone();
        if let Some(b) = t.bookings.get_mut(&review.booking_id) {
            b.reviewed = true;
            b.updated_at = review.created_at;
        }
        t.reviews.push(review);
        Ok(listing)
    }

    async fn reviews_for_service(&self, service_id: Uuid) -> Result<Vec<Review>, ServiceError> {
        let t = self.tables.lock().await;
        let rows = t.reviews.iter().filter(|r| r.service_id == service_id).cloned().collect();
        Ok(newest_first(rows, |r| r.created_at))
    }
}

#[async_trait]
impl ChatRepository for InMemoryRepository {
    async fn insert_message(&self, message: ChatMessage) -> Result<ChatMessage, ServiceError> {
        self.tables.lock().await.messages.push(message.clone());
        Ok(message)
    }

    async fn messages_for_booking(&self, booking_id: Uuid) -> Result<Vec<ChatMessage>, ServiceError> {
        let t = self.tables.lock().await;
        let mut rows: Vec<ChatMessage> = t.messages.iter().filter(|m| m.booking_id == booking_id).cloned().collect();
        rows.sort_by_key(|m| m.created_at);
        Ok(rows)
    }
}

#[async_trait]
impl BoostRepository for InMemoryRepository {
    async fn insert_order(&self, order: BoostOrder) -> Result<BoostOrder, ServiceError> {
        self.tables.lock().await.boosts.insert(order.id, order.clone());
        Ok(order)
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<BoostOrder>, ServiceError> {
        Ok(self.tables.lock().await.boosts.get(&id).cloned())
    }

    async fn mark_paid(
        &self,
        order_id: Uuid,
        payment_reference: &str,
        now: DateTime<Utc>,
        days: i64,
    ) -> Result<Option<(BoostOrder, ServiceListing)>, ServiceError> {
        let mut t = self.tables.lock().await;
        let service_id = match t.boosts.get(&order_id) {
            None => return Err(ServiceError::not_found("boost order")),
            Some(o) if o.status == BoostStatus::Paid => return Ok(None),
            Some(o) => o.service_id,
        };
        let listing = t
            .listings
            .get_mut(&service_id)
            .ok_or_else(|| ServiceError::NotFound("No such service".into()))?;
        listing.featured_until = Some(extend_featured(listing.featured_until, now, days));
        listing.updated_at = now;
        let listing = listing.clone();
        let order = match t.boosts.get_mut(&order_id) {
            Some(o) => {
                o.status = BoostStatus::Paid;
                o.payment_reference = Some(payment_reference.to_string());
                o.paid_at = Some(now);
                o.clone()
            }
            None => return Err(ServiceError::not_found("boost order")),
        };
        Ok(Some((order, listing)))
    }
}

#[cfg(test)]
impl InMemoryRepository {
    pub async fn set_aggregate(&self, id: Uuid, average_rating: f64, review_count: i32) {
        if let Some(l) = self.tables.lock().await.listings.get_mut(&id) {
            l.average_rating = average_rating;
            l.review_count = review_count;
        }
    }

    pub async fn set_created_at(&self, id: Uuid, at: DateTime<Utc>) {
        if let Some(l) = self.tables.lock().await.listings.get_mut(&id) {
            l.created_at = at;
        }
    }

    pub async fn set_featured_until(&self, id: Uuid, until: Option<DateTime<Utc>>) {
        if let Some(l) = self.tables.lock().await.listings.get_mut(&id) {
            l.featured_until = until;
        }
    }
}
