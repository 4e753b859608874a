use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::domain::UserProfile;
use crate::errors::ServiceError;

/// Persistence for user profiles.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_profile(&self, uid: &str) -> Result<Option<UserProfile>, ServiceError>;
    /// Insert a new profile; `Conflict` when the uid is already registered.
    async fn insert_profile(&self, profile: UserProfile) -> Result<UserProfile, ServiceError>;
    async fn update_profile(
        &self,
        uid: &str,
        display_name: Option<String>,
        bio: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<Option<UserProfile>, ServiceError>;
}
