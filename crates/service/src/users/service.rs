use std::sync::Arc;

use chrono::Utc;
use models::rating;
use models::user_profile::{self, Role};
use tracing::{info, instrument};

use super::domain::{ProfileUpdate, ProviderProfile, UserProfile};
use super::repository::UserRepository;
use crate::auth::Identity;
use crate::errors::ServiceError;
use crate::listings::repository::ListingRepository;

pub struct UserService {
    users: Arc<dyn UserRepository>,
    listings: Arc<dyn ListingRepository>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserRepository>, listings: Arc<dyn ListingRepository>) -> Self {
        Self { users, listings }
    }

    /// Create the profile for a freshly signed-up identity.
    ///
    /// # Examples
    /// ```
    /// use service::auth::Identity;
    /// use service::repo::Repositories;
    /// use service::users::UserService;
    /// use models::user_profile::Role;
    /// let repos = Repositories::in_memory();
    /// let svc = UserService::new(repos.users.clone(), repos.listings.clone());
    /// let me = Identity::new("uid-7", "hire@test.com");
    /// let profile = tokio_test::block_on(svc.register_profile(&me, Role::Customer)).unwrap();
    /// assert_eq!(profile.role, Role::Customer);
    /// assert!(tokio_test::block_on(svc.register_profile(&me, Role::Provider)).is_err());
    /// ```
    #[instrument(skip(self, identity), fields(uid = %identity.uid, role = %role))]
    pub async fn register_profile(&self, identity: &Identity, role: Role) -> Result<UserProfile, ServiceError> {
        user_profile::validate_uid(&identity.uid)?;
        user_profile::validate_email(&identity.email)?;
        let now = Utc::now();
        let profile = UserProfile {
            id: identity.uid.clone(),
            email: identity.email.trim().to_string(),
            role,
            display_name: None,
            bio: None,
            created_at: now,
            updated_at: now,
        };
        let profile = self.users.insert_profile(profile).await?;
        info!(uid = %profile.id, role = %profile.role, "user_registered");
        Ok(profile)
    }

    pub async fn get_profile(&self, uid: &str) -> Result<UserProfile, ServiceError> {
        self.users.find_profile(uid).await?.ok_or_else(|| ServiceError::not_found("profile"))
    }

    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, uid: &str, update: ProfileUpdate) -> Result<UserProfile, ServiceError> {
        let display_name = user_profile::normalize_optional(update.display_name.as_deref());
        let bio = user_profile::normalize_optional(update.bio.as_deref());
        user_profile::validate_display_name(display_name.as_deref())?;
        user_profile::validate_bio(bio.as_deref())?;
        let profile = self
            .users
            .update_profile(uid, display_name, bio, Utc::now())
            .await?
            .ok_or_else(|| ServiceError::not_found("profile"))?;
        info!(uid = %profile.id, "profile_updated");
        Ok(profile)
    }

    /// Public page for a provider with their listings and combined rating.
    pub async fn provider_profile(&self, uid: &str) -> Result<ProviderProfile, ServiceError> {
        let profile = self
            .users
            .find_profile(uid)
            .await?
            .filter(|p| p.role == Role::Provider)
            .ok_or_else(|| ServiceError::not_found("provider"))?;
        let listings = self.listings.listings_by_provider(uid).await?;
        let (average_rating, total_reviews) =
            rating::combine(listings.iter().map(|l| (l.average_rating, l.review_count)));
        Ok(ProviderProfile { profile, listings, average_rating, total_reviews })
    }
}
