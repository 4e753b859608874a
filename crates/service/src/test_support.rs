#![cfg(test)]
use std::sync::Arc;

use migration::MigratorTrait;
use models::booking::BookingStatus;
use models::db::connect_with_config;
use models::user_profile::Role;
use sea_orm::DatabaseConnection;
use tokio::sync::OnceCell;
use uuid::Uuid;

use crate::auth::Identity;
use crate::bookings::domain::{Booking, NewBooking};
use crate::listings::domain::{NewListing, ServiceListing};
use crate::repo::{InMemoryRepository, Repositories};
use crate::{Marketplace, MarketplaceSettings};

/// Marketplace over the in-memory backend, with direct access to the store.
pub struct TestMarket {
    pub market: Marketplace,
    pub repos_memory: Arc<InMemoryRepository>,
}

impl TestMarket {
    pub fn new() -> Self {
        let repos_memory = Arc::new(InMemoryRepository::default());
        let market = Marketplace::new(Repositories::from_backend(repos_memory.clone()), MarketplaceSettings::default());
        Self { market, repos_memory }
    }

    async fn register(&self, uid: &str, role: Role) -> Identity {
        let identity = Identity::new(uid, format!("{uid}@test.com"));
        self.market.users.register_profile(&identity, role).await.expect("register profile");
        identity
    }

    pub async fn provider(&self, uid: &str) -> Identity { self.register(uid, Role::Provider).await }

    pub async fn customer(&self, uid: &str) -> Identity { self.register(uid, Role::Customer).await }

    pub async fn provider_with_listing(&self, uid: &str) -> (Identity, ServiceListing) {
        let provider = self.provider(uid).await;
        let listing = self
            .market
            .listings
            .create_listing(&provider, listing_input("Professional House Wiring"))
            .await
            .expect("create listing");
        (provider, listing)
    }

    pub async fn completed_booking(&self, provider: &Identity, customer: &Identity, service_id: Uuid) -> Booking {
        let b = self.market.bookings.create_booking(customer, booking_input(service_id)).await.expect("book");
        self.market.bookings.update_status(provider, b.id, BookingStatus::Confirmed).await.expect("confirm");
        self.market.bookings.update_status(provider, b.id, BookingStatus::Completed).await.expect("complete")
    }
}

pub fn listing_input(title: &str) -> NewListing {
    NewListing {
        title: title.into(),
        category: "Electrician".into(),
        price_minor: 50_000,
        description: "Licensed electrician for residential wiring".into(),
        location: "New York, NY".into(),
    }
}

pub fn booking_input(service_id: Uuid) -> NewBooking {
    NewBooking {
        service_id,
        scheduled_for: "2026-03-14T09:30".into(),
        notes: "Two rooms".into(),
        payment_reference: None,
    }
}

pub fn unique(prefix: &str) -> String { format!("{prefix}-{}", Uuid::new_v4().simple()) }

pub fn should_skip_db_tests() -> bool {
    std::env::var("SKIP_DB_TESTS").is_ok() || std::env::var("DATABASE_URL").is_err()
}

// Ensure migrations run only once across the entire test process
static MIGRATED: OnceCell<()> = OnceCell::const_new();

fn db_config() -> configs::DatabaseConfig {
    let mut cfg = configs::load_default().map(|c| c.database).unwrap_or_default();
    if let Ok(url) = std::env::var("DATABASE_URL") {
        cfg.url = url;
    }
    cfg.min_connections = cfg.min_connections.min(1);
    cfg
}

pub async fn get_db() -> Result<DatabaseConnection, anyhow::Error> {
    MIGRATED
        .get_or_init(|| async {
            let db = connect_with_config(&db_config()).await.expect("connect db for migration");
            migration::Migrator::up(&db, None).await.expect("migrate up");
        })
        .await;
    connect_with_config(&db_config()).await
}
