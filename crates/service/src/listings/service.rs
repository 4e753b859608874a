use std::sync::Arc;

use chrono::Utc;
use models::service_listing::{self, Category};
use models::user_profile::Role;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::domain::{ListingFilter, NewListing, ServiceListing};
use super::repository::ListingRepository;
use crate::auth::Identity;
use crate::errors::ServiceError;
use crate::pagination::Pagination;
use crate::users::repository::UserRepository;

pub struct ListingService {
    listings: Arc<dyn ListingRepository>,
    users: Arc<dyn UserRepository>,
}

impl ListingService {
    pub fn new(listings: Arc<dyn ListingRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { listings, users }
    }

    #[instrument(skip(self, provider, input), fields(uid = %provider.uid, title = %input.title))]
    pub async fn create_listing(&self, provider: &Identity, input: NewListing) -> Result<ServiceListing, ServiceError> {
        let profile = self
            .users
            .find_profile(&provider.uid)
            .await?
            .ok_or_else(|| ServiceError::not_found("profile"))?;
        if profile.role != Role::Provider {
            return Err(ServiceError::forbidden("only providers can list services"));
        }
        service_listing::validate_title(&input.title)?;
        service_listing::validate_description(&input.description)?;
        service_listing::validate_location(&input.location)?;
        service_listing::validate_price(input.price_minor)?;
        let category: Category = input.category.parse()?;

        let now = Utc::now();
        let listing = ServiceListing {
            id: Uuid::new_v4(),
            provider_id: profile.id.clone(),
            provider_name: profile.public_name().to_string(),
            title: input.title.trim().to_string(),
            category,
            price_minor: input.price_minor,
            description: input.description.trim().to_string(),
            location: input.location.trim().to_string(),
            average_rating: 0.0,
            review_count: 0,
            featured_until: None,
            created_at: now,
            updated_at: now,
        };
        let listing = self.listings.insert_listing(listing).await?;
        info!(service_id = %listing.id, provider_id = %listing.provider_id, category = %listing.category, "listing_created");
        Ok(listing)
    }

    pub async fn get_listing(&self, id: Uuid) -> Result<ServiceListing, ServiceError> {
        self.listings
            .find_listing(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound("No such service".into()))
    }

    /// Browse the catalogue.
    ///
    /// # Examples
    /// ```
    /// use service::listings::{domain::ListingFilter, ListingService};
    /// use service::pagination::Pagination;
    /// use service::repo::Repositories;
    /// let repos = Repositories::in_memory();
    /// let svc = ListingService::new(repos.listings.clone(), repos.users.clone());
    /// let found = tokio_test::block_on(svc.search_listings(&ListingFilter::default(), Pagination::default())).unwrap();
    /// assert!(found.is_empty());
    /// ```
    pub async fn search_listings(&self, filter: &ListingFilter, page: Pagination) -> Result<Vec<ServiceListing>, ServiceError> {
        let found = self.listings.search_listings(filter, Utc::now(), page).await?;
        debug!(results = found.len(), ?filter, "listing_search");
        Ok(found)
    }

    pub async fn listings_by_provider(&self, provider_id: &str) -> Result<Vec<ServiceListing>, ServiceError> {
        self.listings.listings_by_provider(provider_id).await
    }
}
