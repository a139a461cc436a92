//! Notification channels.

pub mod console;
pub mod memory;
pub mod realtime;

#[cfg(feature = "email")]
pub mod email;

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::{Error, Notice, Result};

pub use console::ConsoleChannel;
pub use memory::MemoryChannel;
pub use realtime::{RealtimeChannel, RealtimeEvent};

#[cfg(feature = "email")]
pub use email::EmailChannel;

/// Trait for notification channels.
#[async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Get the channel name.
    fn name(&self) -> &str;

    /// Get the channel type.
    fn channel_type(&self) -> &str;

    /// Check if the channel is enabled.
    fn is_enabled(&self) -> bool;

    /// Send a notice through this channel.
    async fn send(&self, notice: &Notice) -> Result<()>;
}

/// Registry of notification channels.
pub struct ChannelRegistry {
    channels: RwLock<HashMap<String, Arc<dyn NotificationChannel>>>,
}

impl ChannelRegistry {
    pub fn new() -> Self {
        Self {
            channels: RwLock::new(HashMap::new()),
        }
    }

    /// Register a channel instance.
    pub async fn register(&self, channel: Arc<dyn NotificationChannel>) {
        let name = channel.name().to_string();
        self.channels.write().await.insert(name, channel);
    }

    /// Unregister a channel by name.
    pub async fn unregister(&self, name: &str) -> bool {
        self.channels.write().await.remove(name).is_some()
    }

    /// Get a channel by name.
    pub async fn get(&self, name: &str) -> Option<Arc<dyn NotificationChannel>> {
        self.channels.read().await.get(name).cloned()
    }

    /// List all channel names.
    pub async fn list_names(&self) -> Vec<String> {
        self.channels.read().await.keys().cloned().collect()
    }

    /// Snapshot of all registered channels.
    pub async fn all(&self) -> Vec<Arc<dyn NotificationChannel>> {
        self.channels.read().await.values().cloned().collect()
    }

    /// Get the number of channels.
    pub async fn len(&self) -> usize {
        self.channels.read().await.len()
    }

    /// Check if empty.
    pub async fn is_empty(&self) -> bool {
        self.channels.read().await.is_empty()
    }

    /// Test a channel by sending a probe notice.
    pub async fn test(&self, name: &str) -> Result<()> {
        let channel = self
            .get(name)
            .await
            .ok_or_else(|| Error::NotFound(format!("Channel not found: {}", name)))?;

        let probe = Notice::event(
            crate::NoticeKind::EmployeeNotification,
            serde_json::json!({"probe": true}),
        );
        channel.send(&probe).await
    }
}

impl Default for ChannelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_registry_creation() {
        let registry = ChannelRegistry::new();
        assert!(registry.is_empty().await);
        assert_eq!(registry.len().await, 0);
    }

    #[tokio::test]
    async fn test_register_and_unregister() {
        let registry = ChannelRegistry::new();
        registry
            .register(Arc::new(ConsoleChannel::new("console".to_string())))
            .await;

        assert_eq!(registry.len().await, 1);
        assert!(registry.get("console").await.is_some());

        assert!(registry.unregister("console").await);
        assert!(registry.is_empty().await);
    }

    #[tokio::test]
    async fn test_list_names() {
        let registry = ChannelRegistry::new();
        registry
            .register(Arc::new(MemoryChannel::new("ch1".to_string())))
            .await;
        registry
            .register(Arc::new(MemoryChannel::new("ch2".to_string())))
            .await;

        let names = registry.list_names().await;
        assert_eq!(names.len(), 2);
        assert!(names.contains(&"ch1".to_string()));
    }

    #[tokio::test]
    async fn test_probe_unknown_channel() {
        let registry = ChannelRegistry::new();
        let result = registry.test("missing").await;
        assert!(matches!(result, Err(Error::NotFound(_))));
    }
}
