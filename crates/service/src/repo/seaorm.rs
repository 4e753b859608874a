//! PostgreSQL backend over the `models` entities.

use async_trait::async_trait;
use chrono::{DateTime, FixedOffset, Utc};
use models::booking::BookingStatus;
use models::boost_order::BoostStatus;
use models::rating::fold_rating;
use models::{booking, boost_order, chat_message, review, service_listing, user_profile};
use sea_orm::sea_query::{Expr, Func, NullOrdering};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait, Order, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, SqlErr, TransactionTrait,
};
use tracing::debug;
use uuid::Uuid;

use crate::bookings::domain::Booking;
use crate::bookings::repository::BookingRepository;
use crate::boosts::domain::{extend_featured, BoostOrder};
use crate::boosts::repository::BoostRepository;
use crate::chat::domain::ChatMessage;
use crate::chat::repository::ChatRepository;
use crate::errors::ServiceError;
use crate::listings::domain::{like_pattern, ListingFilter, ServiceListing};
use crate::listings::repository::ListingRepository;
use crate::pagination::Pagination;
use crate::reviews::domain::Review;
use crate::reviews::repository::ReviewRepository;
use crate::users::domain::UserProfile;
use crate::users::repository::UserRepository;

pub struct SeaOrmRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmRepository {
    pub fn new(db: DatabaseConnection) -> Self { Self { db } }
}

fn utc(at: DateTime<FixedOffset>) -> DateTime<Utc> { at.with_timezone(&Utc) }

fn fixed(at: DateTime<Utc>) -> DateTime<FixedOffset> { at.into() }

/// Unique violations become `Conflict`, everything else `Db`.
fn map_insert_err(e: DbErr, what: &str) -> ServiceError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => ServiceError::conflict(format!("{what} already exists")),
        _ => ServiceError::Db(e.to_string()),
    }
}

fn lower_like(col: service_listing::Column, needle: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::expr(Func::lower(Expr::col(col))).like(like_pattern(needle))
}

impl TryFrom<user_profile::Model> for UserProfile {
    type Error = ServiceError;

    fn try_from(m: user_profile::Model) -> Result<Self, Self::Error> {
        Ok(UserProfile {
            role: m.role.parse()?,
            id: m.id,
            email: m.email,
            display_name: m.display_name,
            bio: m.bio,
            created_at: utc(m.created_at),
            updated_at: utc(m.updated_at),
        })
    }
}

impl TryFrom<service_listing::Model> for ServiceListing {
    type Error = ServiceError;

    fn try_from(m: service_listing::Model) -> Result<Self, Self::Error> {
        Ok(ServiceListing {
            category: m.category.parse()?,
            id: m.id,
            provider_id: m.provider_id,
            provider_name: m.provider_name,
            title: m.title,
            price_minor: m.price_minor,
            description: m.description,
            location: m.location,
            average_rating: m.average_rating,
            review_count: m.review_count,
            featured_until: m.featured_until.map(utc),
            created_at: utc(m.created_at),
            updated_at: utc(m.updated_at),
        })
    }
}

impl TryFrom<booking::Model> for Booking {
    type Error = ServiceError;

    fn try_from(m: booking::Model) -> Result<Self, Self::Error> {
        Ok(Booking {
            status: m.status.parse()?,
            id: m.id,
            service_id: m.service_id,
            service_title: m.service_title,
            provider_id: m.provider_id,
            customer_id: m.customer_id,
            customer_email: m.customer_email,
            price_minor: m.price_minor,
            scheduled_for: utc(m.scheduled_for),
            notes: m.notes,
            payment_reference: m.payment_reference,
            reviewed: m.reviewed,
            created_at: utc(m.created_at),
            updated_at: utc(m.updated_at),
        })
    }
}

impl From<review::Model> for Review {
    fn from(m: review::Model) -> Self {
        Review {
            id: m.id,
            booking_id: m.booking_id,
            service_id: m.service_id,
            customer_id: m.customer_id,
            rating: m.rating,
            comment: m.comment,
            created_at: utc(m.created_at),
        }
    }
}

impl From<chat_message::Model> for ChatMessage {
    fn from(m: chat_message::Model) -> Self {
        ChatMessage {
            id: m.id,
            booking_id: m.booking_id,
            sender_id: m.sender_id,
            sender_email: m.sender_email,
            text: m.text,
            created_at: utc(m.created_at),
        }
    }
}

impl TryFrom<boost_order::Model> for BoostOrder {
    type Error = ServiceError;

    fn try_from(m: boost_order::Model) -> Result<Self, Self::Error> {
        Ok(BoostOrder {
            status: m.status.parse()?,
            id: m.id,
            service_id: m.service_id,
            provider_id: m.provider_id,
            amount_minor: m.amount_minor,
            currency: m.currency,
            payment_reference: m.payment_reference,
            created_at: utc(m.created_at),
            paid_at: m.paid_at.map(utc),
        })
    }
}

fn convert_all<M, T>(rows: Vec<M>) -> Result<Vec<T>, ServiceError>
where
    T: TryFrom<M, Error = ServiceError>,
{
    rows.into_iter().map(T::try_from).collect()
}

#[async_trait]
impl UserRepository for SeaOrmRepository {
    async fn find_profile(&self, uid: &str) -> Result<Option<UserProfile>, ServiceError> {
        let row = user_profile::Entity::find_by_id(uid.to_string()).one(&self.db).await?;
        row.map(UserProfile::try_from).transpose()
    }

    async fn insert_profile(&self, p: UserProfile) -> Result<UserProfile, ServiceError> {
        let am = user_profile::ActiveModel {
            id: Set(p.id.clone()),
            email: Set(p.email.clone()),
            role: Set(p.role.as_str().to_string()),
            display_name: Set(p.display_name.clone()),
            bio: Set(p.bio.clone()),
            created_at: Set(fixed(p.created_at)),
            updated_at: Set(fixed(p.updated_at)),
        };
        let saved = am.insert(&self.db).await.map_err(|e| map_insert_err(e, "profile"))?;
        saved.try_into()
    }

    async fn update_profile(
        &self,
        uid: &str,
        display_name: Option<String>,
        bio: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Option<UserProfile>, ServiceError> {
        let Some(row) = user_profile::Entity::find_by_id(uid.to_string()).one(&self.db).await? else {
            return Ok(None);
        };
        let mut am: user_profile::ActiveModel = row.into();
        am.display_name = Set(display_name);
        am.bio = Set(bio);
        am.updated_at = Set(fixed(now));
        let saved = am.update(&self.db).await?;
        UserProfile::try_from(saved).map(Some)
    }
}

#[async_trait]
impl ListingRepository for SeaOrmRepository {
    async fn insert_listing(&self, l: ServiceListing) -> Result<ServiceListing, ServiceError> {
        let am = service_listing::ActiveModel {
            id: Set(l.id),
            provider_id: Set(l.provider_id.clone()),
            provider_name: Set(l.provider_name.clone()),
            title: Set(l.title.clone()),
            category: Set(l.category.as_str().to_string()),
            price_minor: Set(l.price_minor),
            description: Set(l.description.clone()),
            location: Set(l.location.clone()),
            average_rating: Set(l.average_rating),
            review_count: Set(l.review_count),
            featured_until: Set(l.featured_until.map(fixed)),
            created_at: Set(fixed(l.created_at)),
            updated_at: Set(fixed(l.updated_at)),
        };
        am.insert(&self.db).await?.try_into()
    }

    async fn find_listing(&self, id: Uuid) -> Result<Option<ServiceListing>, ServiceError> {
        let row = service_listing::Entity::find_by_id(id).one(&self.db).await?;
        row.map(ServiceListing::try_from).transpose()
    }

    async fn search_listings(
        &self,
        filter: &ListingFilter,
        now: DateTime<Utc>,
        page: Pagination,
    ) -> Result<Vec<ServiceListing>, ServiceError> {
        use service_listing::Column;

        let mut q = service_listing::Entity::find();
        if let Some(category) = filter.category {
            q = q.filter(Column::Category.eq(category.as_str()));
        }
        if let Some(kw) = &filter.keyword {
            q = q.filter(
                Condition::any()
                    .add(lower_like(Column::Title, kw))
                    .add(lower_like(Column::Description, kw))
                    .add(lower_like(Column::Category, kw)),
            );
        }
        if let Some(loc) = &filter.location {
            q = q.filter(lower_like(Column::Location, loc));
        }
        let (page_idx, per_page) = page.normalize();
        let rows = q
            .order_by_with_nulls(Expr::col(Column::FeaturedUntil).gt(fixed(now)), Order::Desc, NullOrdering::Last)
            .order_by_desc(Column::CreatedAt)
            .paginate(&self.db, per_page)
            .fetch_page(page_idx)
            .await?;
        debug!(rows = rows.len(), page_idx, "listing page fetched");
        convert_all(rows)
    }

    async fn listings_by_provider(&self, provider_id: &str) -> Result<Vec<ServiceListing>, ServiceError> {
        let rows = service_listing::Entity::find()
            .filter(service_listing::Column::ProviderId.eq(provider_id))
            .order_by_desc(service_listing::Column::CreatedAt)
            .all(&self.db)
            .await?;
        convert_all(rows)
    }
}

#[async_trait]
impl BookingRepository for SeaOrmRepository {
    async fn insert_booking(&self, b: Booking) -> Result<Booking, ServiceError> {
        let am = booking::ActiveModel {
            id: Set(b.id),
            service_id: Set(b.service_id),
            service_title: Set(b.service_title.clone()),
            provider_id: Set(b.provider_id.clone()),
            customer_id: Set(b.customer_id.clone()),
            customer_email: Set(b.customer_email.clone()),
            price_minor: Set(b.price_minor),
            scheduled_for: Set(fixed(b.scheduled_for)),
            notes: Set(b.notes.clone()),
            status: Set(b.status.as_str().to_string()),
            payment_reference: Set(b.payment_reference.clone()),
            reviewed: Set(b.reviewed),
            created_at: Set(fixed(b.created_at)),
            updated_at: Set(fixed(b.updated_at)),
        };
        am.insert(&self.db).await?.try_into()
    }

    async fn find_booking(&self, id: Uuid) -> Result<Option<Booking>, ServiceError> {
        let row = booking::Entity::find_by_id(id).one(&self.db).await?;
        row.map(Booking::try_from).transpose()
    }

    async fn bookings_for_customer(&self, customer_id: &str) -> Result<Vec<Booking>, ServiceError> {
        let rows = booking::Entity::find()
            .filter(booking::Column::CustomerId.eq(customer_id))
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await?;
        convert_all(rows)
    }

    async fn bookings_for_provider(&self, provider_id: &str) -> Result<Vec<Booking>, ServiceError> {
        let rows = booking::Entity::find()
            .filter(booking::Column::ProviderId.eq(provider_id))
            .order_by_desc(booking::Column::CreatedAt)
            .all(&self.db)
            .await?;
        convert_all(rows)
    }

    async fn transition_status(
        &self,
        id: Uuid,
        from: BookingStatus,
        to: BookingStatus,
        now: DateTime<Utc>,
    ) -> Result<Option<Booking>, ServiceError> {
        let res = booking::Entity::update_many()
            .col_expr(booking::Column::Status, Expr::value(to.as_str()))
            .col_expr(booking::Column::UpdatedAt, Expr::value(fixed(now)))
            .filter(booking::Column::Id.eq(id))
            .filter(booking::Column::Status.eq(from.as_str()))
            .exec(&self.db)
            .await?;
        if res.rows_affected == 0 {
            return Ok(None);
        }
        self.find_booking(id).await
    }
}

#[async_trait]
impl ReviewRepository for SeaOrmRepository {
    async fn record_review(&self, r: Review) -> Result<ServiceListing, ServiceError> {
        let txn = self.db.begin().await?;

        let booking_row = booking::Entity::find_by_id(r.booking_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("booking"))?;
        if booking_row.reviewed {
            return Err(ServiceError::conflict("booking already reviewed"));
        }
        let listing_row = service_listing::Entity::find_by_id(r.service_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("No such service".into()))?;

        review::ActiveModel {
            id: Set(r.id),
            booking_id: Set(r.booking_id),
            service_id: Set(r.service_id),
            customer_id: Set(r.customer_id.clone()),
            rating: Set(r.rating),
            comment: Set(r.comment.clone()),
            created_at: Set(fixed(r.created_at)),
        }
        .insert(&txn)
        .await
        .map_err(|e| map_insert_err(e, "review for this booking"))?;

        let (average, count) = fold_rating(listing_row.average_rating, listing_row.review_count, r.rating);
        let mut listing: service_listing::ActiveModel = listing_row.into();
        listing.average_rating = Set(average);
        listing.review_count = Set(count);
        listing.updated_at = Set(fixed(r.created_at));
        let listing = listing.update(&txn).await?;

        let mut booking_am: booking::ActiveModel = booking_row.into();
        booking_am.reviewed = Set(true);
        booking_am.updated_at = Set(fixed(r.created_at));
        booking_am.update(&txn).await?;

        txn.commit().await?;
        listing.try_into()
    }

    async fn reviews_for_service(&self, service_id: Uuid) -> Result<Vec<Review>, ServiceError> {
        let rows = review::Entity::find()
            .filter(review::Column::ServiceId.eq(service_id))
            .order_by_desc(review::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(Review::from).collect())
    }
}

#[async_trait]
impl ChatRepository for SeaOrmRepository {
    async fn insert_message(&self, m: ChatMessage) -> Result<ChatMessage, ServiceError> {
        let saved = chat_message::ActiveModel {
            id: Set(m.id),
            booking_id: Set(m.booking_id),
            sender_id: Set(m.sender_id.clone()),
            sender_email: Set(m.sender_email.clone()),
            text: Set(m.text.clone()),
            created_at: Set(fixed(m.created_at)),
        }
        .insert(&self.db)
        .await?;
        Ok(saved.into())
    }

    async fn messages_for_booking(&self, booking_id: Uuid) -> Result<Vec<ChatMessage>, ServiceError> {
        let rows = chat_message::Entity::find()
            .filter(chat_message::Column::BookingId.eq(booking_id))
            .order_by_asc(chat_message::Column::CreatedAt)
            .all(&self.db)
            .await?;
        Ok(rows.into_iter().map(ChatMessage::from).collect())
    }
}

#[async_trait]
impl BoostRepository for SeaOrmRepository {
    async fn insert_order(&self, o: BoostOrder) -> Result<BoostOrder, ServiceError> {
        boost_order::ActiveModel {
            id: Set(o.id),
            service_id: Set(o.service_id),
            provider_id: Set(o.provider_id.clone()),
            amount_minor: Set(o.amount_minor),
            currency: Set(o.currency.clone()),
            status: Set(o.status.as_str().to_string()),
            payment_reference: Set(o.payment_reference.clone()),
            created_at: Set(fixed(o.created_at)),
            paid_at: Set(o.paid_at.map(fixed)),
        }
        .insert(&self.db)
        .await?
        .try_into()
    }

    async fn find_order(&self, id: Uuid) -> Result<Option<BoostOrder>, ServiceError> {
        let row = boost_order::Entity::find_by_id(id).one(&self.db).await?;
        row.map(BoostOrder::try_from).transpose()
    }

    async fn mark_paid(
        &self,
        order_id: Uuid,
        payment_reference: &str,
        now: DateTime<Utc>,
        days: i64,
    ) -> Result<Option<(BoostOrder, ServiceListing)>, ServiceError> {
        let txn = self.db.begin().await?;

        let res = boost_order::Entity::update_many()
            .col_expr(boost_order::Column::Status, Expr::value(BoostStatus::Paid.as_str()))
            .col_expr(boost_order::Column::PaymentReference, Expr::value(Some(payment_reference.to_string())))
            .col_expr(boost_order::Column::PaidAt, Expr::value(Some(fixed(now))))
            .filter(boost_order::Column::Id.eq(order_id))
            .filter(boost_order::Column::Status.eq(BoostStatus::Created.as_str()))
            .exec(&txn)
            .await?;
        if res.rows_affected == 0 {
            txn.rollback().await?;
            return Ok(None);
        }

        let order = boost_order::Entity::find_by_id(order_id)
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::not_found("boost order"))?;
        let listing_row = service_listing::Entity::find_by_id(order.service_id)
            .lock_exclusive()
            .one(&txn)
            .await?
            .ok_or_else(|| ServiceError::NotFound("No such service".into()))?;

        let until = extend_featured(listing_row.featured_until.map(utc), now, days);
        let mut listing: service_listing::ActiveModel = listing_row.into();
        listing.featured_until = Set(Some(fixed(until)));
        listing.updated_at = Set(fixed(now));
        let listing = listing.update(&txn).await?;

        txn.commit().await?;
        Ok(Some((BoostOrder::try_from(order)?, ServiceListing::try_from(listing)?)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{booking_input, get_db, listing_input, should_skip_db_tests, unique};
    use crate::{Marketplace, MarketplaceSettings};
    use crate::auth::Identity;
    use crate::repo::Repositories;
    use models::user_profile::Role;

    #[tokio::test]
    async fn postgres_review_and_boost_flow() -> anyhow::Result<()> {
        if should_skip_db_tests() {
            return Ok(());
        }
        let db = get_db().await?;
        let market = Marketplace::new(Repositories::seaorm(db), MarketplaceSettings::default());

        let provider = Identity::new(unique("prov"), "work@test.com");
        let customer = Identity::new(unique("cust"), "hire@test.com");
        market.users.register_profile(&provider, Role::Provider).await?;
        market.users.register_profile(&customer, Role::Customer).await?;
        assert!(matches!(
            market.users.register_profile(&customer, Role::Customer).await,
            Err(ServiceError::Conflict(_))
        ));

        let listing = market.listings.create_listing(&provider, listing_input("Postgres wiring")).await?;
        let booking = market.bookings.create_booking(&customer, booking_input(listing.id)).await?;
        market.bookings.update_status(&provider, booking.id, BookingStatus::Confirmed).await?;
        market.bookings.update_status(&provider, booking.id, BookingStatus::Completed).await?;

        let review = crate::reviews::domain::NewReview { rating: 4, comment: "tidy".into() };
        let outcome = market.reviews.submit_review(&customer, booking.id, review.clone()).await?;
        assert_eq!((outcome.service.average_rating, outcome.service.review_count), (4.0, 1));
        assert!(matches!(
            market.reviews.submit_review(&customer, booking.id, review).await,
            Err(ServiceError::Conflict(_))
        ));

        let order = market.boosts.create_order(&provider, listing.id).await?;
        let paid = market.boosts.confirm(&provider, order.id, "pay_pg").await?;
        assert!(paid.activated);
        assert!(!market.boosts.confirm(&provider, order.id, "pay_pg").await?.activated);

        let filter = ListingFilter::new(None, Some("POSTGRES WIRING"), None);
        let found = market.listings.search_listings(&filter, Pagination::default()).await?;
        assert_eq!(found.first().map(|l| l.id), Some(listing.id));
        Ok(())
    }

    #[tokio::test]
    async fn postgres_store_rejects_duplicate_reviews_and_stale_transitions() -> anyhow::Result<()> {
        if should_skip_db_tests() {
            return Ok(());
        }
        let db = get_db().await?;
        let repo = SeaOrmRepository::new(db.clone());
        let market = Marketplace::new(Repositories::seaorm(db.clone()), MarketplaceSettings::default());

        let provider = Identity::new(unique("prov"), "work@test.com");
        let customer = Identity::new(unique("cust"), "hire@test.com");
        market.users.register_profile(&provider, Role::Provider).await?;
        market.users.register_profile(&customer, Role::Customer).await?;
        let listing = market.listings.create_listing(&provider, listing_input("Repo conflicts")).await?;
        let booking = market.bookings.create_booking(&customer, booking_input(listing.id)).await?;

        let lost = repo
            .transition_status(booking.id, BookingStatus::Confirmed, BookingStatus::Completed, Utc::now())
            .await?;
        assert!(lost.is_none());
        assert_eq!(repo.find_booking(booking.id).await?.map(|b| b.status), Some(BookingStatus::Pending));

        market.bookings.update_status(&provider, booking.id, BookingStatus::Confirmed).await?;
        market.bookings.update_status(&provider, booking.id, BookingStatus::Completed).await?;

        let review = |rating: i16| Review {
            id: Uuid::new_v4(),
            booking_id: booking.id,
            service_id: listing.id,
            customer_id: customer.uid.clone(),
            rating,
            comment: String::new(),
            created_at: Utc::now(),
        };
        repo.record_review(review(5)).await?;
        assert!(matches!(repo.record_review(review(1)).await, Err(ServiceError::Conflict(_))));

        // With the flag cleared only the unique index on booking_id stands in the way.
        booking::Entity::update_many()
            .col_expr(booking::Column::Reviewed, Expr::value(false))
            .filter(booking::Column::Id.eq(booking.id))
            .exec(&db)
            .await?;
        let err = repo.record_review(review(1)).await.unwrap_err();
        assert!(matches!(err, ServiceError::Conflict(msg) if msg.contains("already exists")));

        let stored = repo.find_listing(listing.id).await?.ok_or_else(|| anyhow::anyhow!("listing vanished"))?;
        assert_eq!((stored.average_rating, stored.review_count), (5.0, 1));
        Ok(())
    }
}
