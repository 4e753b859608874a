use std::sync::Arc;

use chrono::Utc;
use common::metrics::MESSAGES_SENT_TOTAL;
use models::chat_message;
use tracing::{info, instrument};
use uuid::Uuid;

use super::domain::ChatMessage;
use super::repository::ChatRepository;
use crate::auth::Identity;
use crate::bookings::domain::Booking;
use crate::bookings::repository::BookingRepository;
use crate::errors::ServiceError;
use crate::realtime::{Notification, RealtimeHub, Subscription};

pub struct ChatService {
    chat: Arc<dyn ChatRepository>,
    bookings: Arc<dyn BookingRepository>,
    hub: Arc<RealtimeHub>,
}

impl ChatService {
    pub fn new(chat: Arc<dyn ChatRepository>, bookings: Arc<dyn BookingRepository>, hub: Arc<RealtimeHub>) -> Self {
        Self { chat, bookings, hub }
    }

    async fn booking_for(&self, identity: &Identity, booking_id: Uuid) -> Result<Booking, ServiceError> {
        let booking = self
            .bookings
            .find_booking(booking_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("booking"))?;
        if !booking.is_participant(&identity.uid) {
            return Err(ServiceError::forbidden("not a participant of this booking"));
        }
        Ok(booking)
    }

    #[instrument(skip(self, sender, text), fields(uid = %sender.uid))]
    pub async fn send_message(&self, sender: &Identity, booking_id: Uuid, text: &str) -> Result<ChatMessage, ServiceError> {
        let booking = self.booking_for(sender, booking_id).await?;
        let text = chat_message::normalize_text(text)?;
        let message = ChatMessage {
            id: Uuid::new_v4(),
            booking_id,
            sender_id: sender.uid.clone(),
            sender_email: sender.email.clone(),
            text,
            created_at: Utc::now(),
        };
        let message = self.chat.insert_message(message).await?;
        MESSAGES_SENT_TOTAL.inc();
        let live = self.hub.publish_chat(message.clone());
        self.hub.notify(
            booking.counterpart(&sender.uid),
            Notification::MessageReceived { booking_id, message: message.clone() },
        );
        info!(booking_id = %booking_id, message_id = %message.id, live, "message_sent");
        Ok(message)
    }

    pub async fn list_messages(&self, identity: &Identity, booking_id: Uuid) -> Result<Vec<ChatMessage>, ServiceError> {
        self.booking_for(identity, booking_id).await?;
        self.chat.messages_for_booking(booking_id).await
    }

    /// Live feed of new messages on a booking, for participants only.
    pub async fn subscribe(&self, identity: &Identity, booking_id: Uuid) -> Result<Subscription<ChatMessage>, ServiceError> {
        self.booking_for(identity, booking_id).await?;
        Ok(self.hub.subscribe_chat(booking_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{booking_input, TestMarket};

    #[tokio::test]
    async fn participants_chat_and_history_is_oldest_first() {
        let m = TestMarket::new();
        let (provider, listing) = m.provider_with_listing("p1").await;
        let customer = m.customer("c1").await;
        let booking = m.market.bookings.create_booking(&customer, booking_input(listing.id)).await.unwrap();

        m.market.chat.send_message(&customer, booking.id, " Is 9am ok? ").await.unwrap();
        m.market.chat.send_message(&provider, booking.id, "Yes").await.unwrap();

        let history = m.market.chat.list_messages(&provider, booking.id).await.unwrap();
        let texts: Vec<_> = history.iter().map(|msg| msg.text.as_str()).collect();
        assert_eq!(texts, vec!["Is 9am ok?", "Yes"]);
        assert_eq!(history[0].sender_email, "c1@test.com");
    }

    #[tokio::test]
    async fn live_subscribers_and_counterpart_get_the_message() {
        let m = TestMarket::new();
        let (provider, listing) = m.provider_with_listing("p1").await;
        let customer = m.customer("c1").await;
        let booking = m.market.bookings.create_booking(&customer, booking_input(listing.id)).await.unwrap();

        let mut room = m.market.chat.subscribe(&provider, booking.id).await.unwrap();
        let mut inbox = m.market.hub.subscribe_notifications(&provider.uid);
        let sent = m.market.chat.send_message(&customer, booking.id, "hello").await.unwrap();

        assert_eq!(room.recv().await.unwrap(), sent);
        match inbox.recv().await.unwrap() {
            Notification::MessageReceived { message, .. } => assert_eq!(message.id, sent.id),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[tokio::test]
    async fn outsiders_and_blank_messages_are_rejected() {
        let m = TestMarket::new();
        let (_, listing) = m.provider_with_listing("p1").await;
        let customer = m.customer("c1").await;
        let stranger = m.customer("c2").await;
        let booking = m.market.bookings.create_booking(&customer, booking_input(listing.id)).await.unwrap();

        assert!(matches!(m.market.chat.send_message(&stranger, booking.id, "hi").await, Err(ServiceError::Forbidden(_))));
        assert!(matches!(m.market.chat.list_messages(&stranger, booking.id).await, Err(ServiceError::Forbidden(_))));
        assert!(matches!(m.market.chat.subscribe(&stranger, booking.id).await, Err(ServiceError::Forbidden(_))));
        assert!(matches!(m.market.chat.send_message(&customer, booking.id, "   ").await, Err(ServiceError::Validation(_))));
        assert!(matches!(m.market.chat.send_message(&customer, Uuid::new_v4(), "hi").await, Err(ServiceError::NotFound(_))));
    }
}
