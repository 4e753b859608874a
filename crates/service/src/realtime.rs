//! In-process pub/sub for live notifications and booking chat.
//!
//! Each topic owns a `tokio::sync::broadcast` channel created on first
//! subscription. A topic is removed when its last [`Subscription`] is dropped
//! or when a publish finds nobody listening. Slow subscribers see
//! `RecvError::Lagged` and skip ahead.

use std::ops::{Deref, DerefMut};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use models::booking::BookingStatus;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::trace;
use uuid::Uuid;

use crate::bookings::domain::Booking;
use crate::chat::domain::ChatMessage;

/// Event delivered on a user's notification stream.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notification {
    BookingCreated { booking: Booking },
    BookingStatusChanged { booking_id: Uuid, status: BookingStatus, changed_by: String },
    MessageReceived { booking_id: Uuid, message: ChatMessage },
    ReviewPosted { booking_id: Uuid, service_id: Uuid, rating: i16, average_rating: f64, review_count: i32 },
    BoostActivated { service_id: Uuid, featured_until: DateTime<Utc> },
}

type Channels<T> = Arc<DashMap<String, broadcast::Sender<T>>>;

/// Receiver for one topic. Dereferences to the underlying
/// `broadcast::Receiver`; dropping the last one removes the topic.
pub struct Subscription<T> {
    receiver: broadcast::Receiver<T>,
    topic: String,
    channels: Channels<T>,
}

impl<T> Deref for Subscription<T> {
    type Target = broadcast::Receiver<T>;

    fn deref(&self) -> &Self::Target { &self.receiver }
}

impl<T> DerefMut for Subscription<T> {
    fn deref_mut(&mut self) -> &mut Self::Target { &mut self.receiver }
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        // Our own receiver is still alive here, hence `<= 1`.
        if self.channels.remove_if(&self.topic, |_, tx| tx.receiver_count() <= 1).is_some() {
            trace!(topic = %self.topic, "topic closed");
        }
    }
}

/// Keyed broadcast channels.
pub struct Topics<T> {
    channels: Channels<T>,
    capacity: usize,
}

impl<T: Clone + Send + 'static> Topics<T> {
    pub fn new(capacity: usize) -> Self {
        Self { channels: Arc::new(DashMap::new()), capacity: capacity.max(1) }
    }

    pub fn subscribe(&self, topic: &str) -> Subscription<T> {
        let receiver = self
            .channels
            .entry(topic.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe();
        Subscription { receiver, topic: topic.to_string(), channels: self.channels.clone() }
    }

    /// Send to every current subscriber; returns how many received it.
    pub fn publish(&self, topic: &str, event: T) -> usize {
        let delivered = match self.channels.get(topic) {
            Some(tx) => tx.send(event).unwrap_or(0),
            None => 0,
        };
        if delivered == 0 {
            self.channels.remove_if(topic, |_, tx| tx.receiver_count() == 0);
        }
        trace!(topic, delivered, "publish");
        delivered
    }

    pub fn topic_count(&self) -> usize { self.channels.len() }
}

pub fn user_topic(uid: &str) -> String { format!("user:{uid}") }

pub fn booking_topic(booking_id: Uuid) -> String { format!("booking:{booking_id}") }

/// Notification and chat fan-out shared by the services.
pub struct RealtimeHub {
    notifications: Topics<Notification>,
    chat: Topics<ChatMessage>,
}

impl RealtimeHub {
    pub fn new(capacity: usize) -> Self {
        Self { notifications: Topics::new(capacity), chat: Topics::new(capacity) }
    }

    pub fn notify(&self, uid: &str, notification: Notification) -> usize {
        self.notifications.publish(&user_topic(uid), notification)
    }

    pub fn subscribe_notifications(&self, uid: &str) -> Subscription<Notification> {
        self.notifications.subscribe(&user_topic(uid))
    }

    pub fn publish_chat(&self, message: ChatMessage) -> usize {
        let topic = booking_topic(message.booking_id);
        self.chat.publish(&topic, message)
    }

    pub fn subscribe_chat(&self, booking_id: Uuid) -> Subscription<ChatMessage> {
        self.chat.subscribe(&booking_topic(booking_id))
    }
}

impl RealtimeHub {
    /// Open notification and chat topics.
    pub fn topic_count(&self) -> usize { self.notifications.topic_count() + self.chat.topic_count() }
}

impl Default for RealtimeHub {
    fn default() -> Self { Self::new(64) }
}
