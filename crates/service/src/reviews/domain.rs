use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::listings::domain::ServiceListing;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub service_id: Uuid,
    pub customer_id: String,
    pub rating: i16,
    pub comment: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReview {
    pub rating: i16,
    #[serde(default)]
    pub comment: String,
}

/// Result of a submission: the stored review and the re-aggregated listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewOutcome {
    pub review: Review,
    pub service: ServiceListing,
}
