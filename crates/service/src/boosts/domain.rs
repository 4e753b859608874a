use chrono::{DateTime, Utc};
use models::boost_order::BoostStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::listings::domain::ServiceListing;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoostOrder {
    pub id: Uuid,
    pub service_id: Uuid,
    pub provider_id: String,
    pub amount_minor: i64,
    pub currency: String,
    pub status: BoostStatus,
    pub payment_reference: Option<String>,
    pub created_at: DateTime<Utc>,
    pub paid_at: Option<DateTime<Utc>>,
}

/// Price and duration of one boost.
#[derive(Debug, Clone)]
pub struct BoostSettings {
    pub price_minor: i64,
    pub currency: String,
    pub duration_days: i64,
}

impl Default for BoostSettings {
    fn default() -> Self {
        Self { price_minor: 9_900, currency: "INR".into(), duration_days: 30 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoostConfirmation {
    pub order: BoostOrder,
    pub service: ServiceListing,
    /// False when the order had already been confirmed earlier.
    pub activated: bool,
}

/// New featured-until after paying for `days` more: extends from whichever is
/// later, now or the current expiry.
pub fn extend_featured(current: Option<DateTime<Utc>>, now: DateTime<Utc>, days: i64) -> DateTime<Utc> {
    let base = current.filter(|until| *until > now).unwrap_or(now);
    base + chrono::Duration::days(days)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn extends_from_now_when_not_featured() {
        let now = Utc::now();
        assert_eq!(extend_featured(None, now, 30), now + Duration::days(30));
        assert_eq!(extend_featured(Some(now - Duration::days(5)), now, 30), now + Duration::days(30));
    }

    #[test]
    fn stacks_on_an_active_boost() {
        let now = Utc::now();
        let until = now + Duration::days(10);
        assert_eq!(extend_featured(Some(until), now, 30), now + Duration::days(40));
    }
}
