use async_trait::async_trait;
use uuid::Uuid;

use super::domain::ChatMessage;
use crate::errors::ServiceError;

/// Persistence for chat messages.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    async fn insert_message(&self, message: ChatMessage) -> Result<ChatMessage, ServiceError>;
    /// Oldest first.
    async fn messages_for_booking(&self, booking_id: Uuid) -> Result<Vec<ChatMessage>, ServiceError>;
}
