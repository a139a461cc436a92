//! Console notification channel.

use async_trait::async_trait;

use super::super::{Error, Notice, Result};
use super::NotificationChannel;

/// Channel that prints notices to stdout.
#[derive(Debug, Clone)]
pub struct ConsoleChannel {
    name: String,
    enabled: bool,
}

impl ConsoleChannel {
    pub fn new(name: String) -> Self {
        Self {
            name,
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[async_trait]
impl NotificationChannel for ConsoleChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_type(&self) -> &str {
        "console"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, notice: &Notice) -> Result<()> {
        if !self.enabled {
            return Err(Error::ChannelDisabled(self.name.clone()));
        }

        println!(
            "[{}] {} | {} -> {}",
            notice.timestamp.format("%Y-%m-%d %H:%M:%S"),
            notice.kind,
            notice.subject,
            notice.recipients.join(", ")
        );
        if !notice.body.is_empty() {
            println!("{}", notice.body);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_console_channel_send() {
        let channel = ConsoleChannel::new("console".to_string());
        let notice = Notice::email("a@example.com", "Subject", "Body");
        assert!(channel.send(&notice).await.is_ok());
    }

    #[tokio::test]
    async fn test_console_channel_disabled() {
        let channel = ConsoleChannel::new("console".to_string()).disabled();
        let notice = Notice::email("a@example.com", "Subject", "Body");
        assert!(matches!(
            channel.send(&notice).await,
            Err(Error::ChannelDisabled(_))
        ));
    }
}
