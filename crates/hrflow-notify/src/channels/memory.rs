//! Memory notification channel (for testing).

use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::super::{Error, Notice, Result};
use super::NotificationChannel;

/// In-memory channel that captures notices for assertions.
#[derive(Debug, Clone)]
pub struct MemoryChannel {
    name: String,
    enabled: bool,
    notices: Arc<Mutex<Vec<Notice>>>,
}

impl MemoryChannel {
    pub fn new(name: String) -> Self {
        Self {
            name,
            enabled: true,
            notices: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn disabled(name: String) -> Self {
        Self {
            name,
            enabled: false,
            notices: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub async fn notices(&self) -> Vec<Notice> {
        self.notices.lock().await.clone()
    }

    pub async fn count(&self) -> usize {
        self.notices.lock().await.len()
    }

    pub async fn clear(&self) {
        self.notices.lock().await.clear();
    }
}

#[async_trait]
impl NotificationChannel for MemoryChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_type(&self) -> &str {
        "memory"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, notice: &Notice) -> Result<()> {
        if !self.enabled {
            return Err(Error::ChannelDisabled(self.name.clone()));
        }
        self.notices.lock().await.push(notice.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NoticeKind;

    #[tokio::test]
    async fn test_memory_channel_captures() {
        let channel = MemoryChannel::new("test".to_string());

        channel
            .send(&Notice::email("a@example.com", "One", "Body"))
            .await
            .unwrap();
        channel
            .send(&Notice::event(NoticeKind::AccessChange, serde_json::json!({})))
            .await
            .unwrap();

        assert_eq!(channel.count().await, 2);
        let notices = channel.notices().await;
        assert_eq!(notices[0].subject, "One");
    }

    #[tokio::test]
    async fn test_memory_channel_disabled() {
        let channel = MemoryChannel::disabled("test".to_string());
        let result = channel.send(&Notice::email("a@example.com", "X", "Y")).await;
        assert!(result.is_err());
        assert_eq!(channel.count().await, 0);
    }

    #[tokio::test]
    async fn test_memory_channel_clear() {
        let channel = MemoryChannel::new("test".to_string());
        channel
            .send(&Notice::email("a@example.com", "X", "Y"))
            .await
            .unwrap();
        channel.clear().await;
        assert_eq!(channel.count().await, 0);
    }
}
