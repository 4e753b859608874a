//! Wiring of every marketplace service over one set of repositories.

use std::sync::Arc;

use crate::boosts::{domain::BoostSettings, BoostService};
use crate::bookings::BookingService;
use crate::chat::ChatService;
use crate::listings::ListingService;
use crate::realtime::RealtimeHub;
use crate::repo::Repositories;
use crate::reviews::ReviewService;
use crate::users::UserService;

/// Runtime knobs for the services.
#[derive(Debug, Clone, Default)]
pub struct MarketplaceSettings {
    pub boost: BoostSettings,
    pub channel_capacity: Option<usize>,
}

pub struct Marketplace {
    pub users: UserService,
    pub listings: ListingService,
    pub bookings: BookingService,
    pub reviews: ReviewService,
    pub chat: ChatService,
    pub boosts: BoostService,
    pub hub: Arc<RealtimeHub>,
}

impl Marketplace {
    /// # Examples
    /// ```
    /// use service::{Marketplace, MarketplaceSettings};
    /// use service::repo::Repositories;
    /// let market = Marketplace::new(Repositories::in_memory(), MarketplaceSettings::default());
    /// assert!(tokio_test::block_on(market.users.get_profile("nobody")).is_err());
    /// ```
    pub fn new(repos: Repositories, settings: MarketplaceSettings) -> Self {
        let hub = Arc::new(match settings.channel_capacity {
            Some(capacity) => RealtimeHub::new(capacity),
            None => RealtimeHub::default(),
        });
        Self {
            users: UserService::new(repos.users.clone(), repos.listings.clone()),
            listings: ListingService::new(repos.listings.clone(), repos.users.clone()),
            bookings: BookingService::new(repos.bookings.clone(), repos.listings.clone(), repos.users.clone(), hub.clone()),
            reviews: ReviewService::new(repos.reviews.clone(), repos.bookings.clone(), hub.clone()),
            chat: ChatService::new(repos.chat.clone(), repos.bookings.clone(), hub.clone()),
            boosts: BoostService::new(repos.boosts.clone(), repos.listings.clone(), hub.clone(), settings.boost),
            hub,
        }
    }
}
