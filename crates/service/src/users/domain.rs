use chrono::{DateTime, Utc};
use models::user_profile::Role;
use serde::{Deserialize, Serialize};

use crate::listings::domain::ServiceListing;

/// Stored profile keyed by the identity-provider uid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub role: Role,
    pub display_name: Option<String>,
    pub bio: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl UserProfile {
    /// Name shown on listings: display name, falling back to the email.
    pub fn public_name(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.email)
    }
}

/// Editable profile fields; blanks clear the stored value.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProfileUpdate {
    pub display_name: Option<String>,
    pub bio: Option<String>,
}

/// Public provider page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderProfile {
    pub profile: UserProfile,
    pub listings: Vec<ServiceListing>,
    pub average_rating: f64,
    pub total_reviews: i64,
}
