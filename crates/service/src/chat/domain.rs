use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub sender_id: String,
    pub sender_email: String,
    pub text: String,
    pub created_at: DateTime<Utc>,
}
