//! Realtime notification channel.
//!
//! Publishes structured events on a tokio broadcast channel. A websocket
//! transport (outside this crate) subscribes and forwards events to
//! connected clients; with no subscribers the publish is a no-op.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::super::{Error, Notice, Result};
use super::NotificationChannel;

/// A published realtime event.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RealtimeEvent {
    /// Event name, e.g. `hr_review_required`
    pub event: String,
    /// Structured payload
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

/// Channel that broadcasts notices as realtime events.
pub struct RealtimeChannel {
    name: String,
    enabled: bool,
    sender: broadcast::Sender<RealtimeEvent>,
}

impl RealtimeChannel {
    pub fn new(name: String, capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            name,
            enabled: true,
            sender,
        }
    }

    /// Subscribe to published events.
    pub fn subscribe(&self) -> broadcast::Receiver<RealtimeEvent> {
        self.sender.subscribe()
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

#[async_trait]
impl NotificationChannel for RealtimeChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_type(&self) -> &str {
        "realtime"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, notice: &Notice) -> Result<()> {
        if !self.enabled {
            return Err(Error::ChannelDisabled(self.name.clone()));
        }

        let event = RealtimeEvent {
            event: notice.kind.as_str().to_string(),
            payload: notice.payload.clone(),
            timestamp: notice.timestamp,
        };

        // A send error only means nobody is subscribed right now
        let _ = self.sender.send(event);
        Ok(())
    }
}
