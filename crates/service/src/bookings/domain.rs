use chrono::{DateTime, Utc};
use models::booking::BookingStatus;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    pub id: Uuid,
    pub service_id: Uuid,
    pub service_title: String,
    pub provider_id: String,
    pub customer_id: String,
    pub customer_email: String,
    pub price_minor: i64,
    pub scheduled_for: DateTime<Utc>,
    pub notes: String,
    pub status: BookingStatus,
    pub payment_reference: Option<String>,
    pub reviewed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    pub fn is_participant(&self, uid: &str) -> bool {
        self.customer_id == uid || self.provider_id == uid
    }

    /// The other side of the booking from `uid`'s point of view.
    pub fn counterpart(&self, uid: &str) -> &str {
        if self.provider_id == uid { &self.customer_id } else { &self.provider_id }
    }
}

/// Booking request as submitted by a customer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBooking {
    pub service_id: Uuid,
    pub scheduled_for: String,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub payment_reference: Option<String>,
}

/// Which side of a booking the actor is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Party {
    Customer,
    Provider,
}

/// Whether `party` may move a booking from `from` to `to`.
pub fn may_transition(party: Party, from: BookingStatus, to: BookingStatus) -> bool {
    if !from.can_transition_to(to) {
        return false;
    }
    match (party, to) {
        (Party::Provider, _) => true,
        (Party::Customer, BookingStatus::Cancelled) => true,
        (Party::Customer, _) => false,
    }
}
