use std::sync::Arc;

use chrono::Utc;
use common::metrics::BOOSTS_PAID_TOTAL;
use models::boost_order::{self, BoostStatus};
use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::{BoostConfirmation, BoostOrder, BoostSettings};
use super::repository::BoostRepository;
use crate::auth::Identity;
use crate::errors::ServiceError;
use crate::listings::repository::ListingRepository;
use crate::realtime::{Notification, RealtimeHub};

pub struct BoostService {
    boosts: Arc<dyn BoostRepository>,
    listings: Arc<dyn ListingRepository>,
    hub: Arc<RealtimeHub>,
    settings: BoostSettings,
}

impl BoostService {
    pub fn new(
        boosts: Arc<dyn BoostRepository>,
        listings: Arc<dyn ListingRepository>,
        hub: Arc<RealtimeHub>,
        settings: BoostSettings,
    ) -> Self {
        Self { boosts, listings, hub, settings }
    }

    /// Open an order for the checkout widget.
    #[instrument(skip(self, provider), fields(uid = %provider.uid))]
    pub async fn create_order(&self, provider: &Identity, service_id: Uuid) -> Result<BoostOrder, ServiceError> {
        let listing = self
            .listings
            .find_listing(service_id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("No such service".into()))?;
        if listing.provider_id != provider.uid {
            return Err(ServiceError::forbidden("only the listing owner can boost it"));
        }
        let order = BoostOrder {
            id: Uuid::new_v4(),
            service_id,
            provider_id: provider.uid.clone(),
            amount_minor: self.settings.price_minor,
            currency: self.settings.currency.clone(),
            status: BoostStatus::Created,
            payment_reference: None,
            created_at: Utc::now(),
            paid_at: None,
        };
        let order = self.boosts.insert_order(order).await?;
        info!(order_id = %order.id, service_id = %service_id, amount_minor = order.amount_minor, "boost_order_created");
        Ok(order)
    }

    /// Record the checkout confirmation and feature the listing.
    #[instrument(skip(self, provider, payment_reference), fields(uid = %provider.uid))]
    pub async fn confirm(&self, provider: &Identity, order_id: Uuid, payment_reference: &str) -> Result<BoostConfirmation, ServiceError> {
        boost_order::validate_payment_reference(payment_reference)?;
        let order = self
            .boosts
            .find_order(order_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("boost order"))?;
        if order.provider_id != provider.uid {
            return Err(ServiceError::forbidden("only the listing owner can confirm this order"));
        }

        let days = self.settings.duration_days;
        match self.boosts.mark_paid(order_id, payment_reference.trim(), Utc::now(), days).await? {
            Some((order, service)) => {
                BOOSTS_PAID_TOTAL.inc();
                info!(order_id = %order.id, service_id = %service.id, featured_until = ?service.featured_until, "boost_paid");
                if let Some(until) = service.featured_until {
                    self.hub.notify(&provider.uid, Notification::BoostActivated { service_id: service.id, featured_until: until });
                }
                Ok(BoostConfirmation { order, service, activated: true })
            }
            None => {
                let order = self
                    .boosts
                    .find_order(order_id)
                    .await?
                    .ok_or_else(|| ServiceError::not_found("boost order"))?;
                let service = self
                    .listings
                    .find_listing(order.service_id)
                    .await?
                    .ok_or_else(|| ServiceError::NotFound("No such service".into()))?;
                Ok(BoostConfirmation { order, service, activated: false })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::TestMarket;
    use chrono::Duration;

    #[tokio::test]
    async fn order_uses_configured_price() {
        let m = TestMarket::new();
        let (provider, listing) = m.provider_with_listing("p1").await;
        let order = m.market.boosts.create_order(&provider, listing.id).await.unwrap();
        assert_eq!(order.amount_minor, 9_900);
        assert_eq!(order.currency, "INR");
        assert_eq!(order.status, BoostStatus::Created);
    }

    #[tokio::test]
    async fn confirm_features_listing_once() {
        let m = TestMarket::new();
        let (provider, listing) = m.provider_with_listing("p1").await;
        let order = m.market.boosts.create_order(&provider, listing.id).await.unwrap();

        let before = Utc::now();
        let done = m.market.boosts.confirm(&provider, order.id, "pay_123").await.unwrap();
        assert!(done.activated);
        assert_eq!(done.order.status, BoostStatus::Paid);
        assert_eq!(done.order.payment_reference.as_deref(), Some("pay_123"));
        let until = done.service.featured_until.unwrap();
        assert!(until >= before + Duration::days(30));
        assert!(done.service.is_featured(Utc::now()));

        let again = m.market.boosts.confirm(&provider, order.id, "pay_123").await.unwrap();
        assert!(!again.activated);
        assert_eq!(again.service.featured_until, Some(until));
    }

    #[tokio::test]
    async fn second_boost_stacks() {
        let m = TestMarket::new();
        let (provider, listing) = m.provider_with_listing("p1").await;
        let first = m.market.boosts.create_order(&provider, listing.id).await.unwrap();
        let until = m.market.boosts.confirm(&provider, first.id, "pay_1").await.unwrap().service.featured_until.unwrap();
        let second = m.market.boosts.create_order(&provider, listing.id).await.unwrap();
        let stacked = m.market.boosts.confirm(&provider, second.id, "pay_2").await.unwrap();
        assert_eq!(stacked.service.featured_until, Some(until + Duration::days(30)));
    }

    #[tokio::test]
    async fn only_owner_may_boost() {
        let m = TestMarket::new();
        let (provider, listing) = m.provider_with_listing("p1").await;
        let (rival, _) = m.provider_with_listing("p2").await;
        assert!(matches!(m.market.boosts.create_order(&rival, listing.id).await, Err(ServiceError::Forbidden(_))));

        let order = m.market.boosts.create_order(&provider, listing.id).await.unwrap();
        assert!(matches!(m.market.boosts.confirm(&rival, order.id, "pay").await, Err(ServiceError::Forbidden(_))));
        assert!(matches!(m.market.boosts.confirm(&provider, order.id, "  ").await, Err(ServiceError::Validation(_))));
        assert!(matches!(m.market.boosts.confirm(&provider, Uuid::new_v4(), "pay").await, Err(ServiceError::NotFound(_))));
    }
}
