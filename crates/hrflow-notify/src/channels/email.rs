//! Email notification channel.

use async_trait::async_trait;

use hrflow_core::SmtpConfig;

use super::super::{Error, Notice, Result};
use super::NotificationChannel;

/// Email channel for sending notices via SMTP.
#[derive(Debug, Clone)]
pub struct EmailChannel {
    name: String,
    enabled: bool,
    smtp_server: String,
    smtp_port: u16,
    username: String,
    password: String,
    from_address: String,
    use_tls: bool,
}

impl EmailChannel {
    pub fn new(
        name: String,
        smtp_server: String,
        smtp_port: u16,
        username: String,
        password: String,
        from_address: String,
    ) -> Self {
        Self {
            name,
            enabled: true,
            smtp_server,
            smtp_port,
            username,
            password,
            from_address,
            use_tls: true,
        }
    }

    /// Build a channel from loaded SMTP settings.
    pub fn from_config(config: &SmtpConfig) -> Self {
        let mut channel = Self::new(
            "email".to_string(),
            config.server.clone(),
            config.port,
            config.username.clone(),
            config.password.clone(),
            config.from_address.clone(),
        );
        channel.use_tls = config.use_tls;
        channel
    }

    pub fn without_tls(mut self) -> Self {
        self.use_tls = false;
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

#[async_trait]
impl NotificationChannel for EmailChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn channel_type(&self) -> &str {
        "email"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    async fn send(&self, notice: &Notice) -> Result<()> {
        if !self.enabled {
            return Err(Error::ChannelDisabled(self.name.clone()));
        }

        // Realtime-only notices carry no recipients; nothing to deliver
        if notice.recipients.is_empty() {
            return Ok(());
        }

        let from_mailbox: lettre::message::Mailbox = self
            .from_address
            .parse()
            .map_err(|e| Error::InvalidConfiguration(format!("Invalid from address: {}", e)))?;

        let mut email_builder = lettre::Message::builder()
            .from(from_mailbox)
            .subject(notice.subject.clone());

        for to_addr in &notice.recipients {
            let mailbox: lettre::message::Mailbox = to_addr
                .parse()
                .map_err(|e| Error::InvalidConfiguration(format!("Invalid to address: {}", e)))?;
            email_builder = email_builder.to(mailbox);
        }

        let email = email_builder
            .header(lettre::message::header::ContentType::TEXT_PLAIN)
            .body(notice.body.clone())
            .map_err(|e| Error::SendFailed(format!("Failed to build email: {}", e)))?;

        let smtp_server = self.smtp_server.clone();
        let smtp_port = self.smtp_port;
        let username = self.username.clone();
        let password = self.password.clone();
        let use_tls = self.use_tls;

        tokio::task::spawn_blocking(move || {
            let creds =
                lettre::transport::smtp::authentication::Credentials::new(username, password);
            let builder = if use_tls {
                lettre::SmtpTransport::starttls_relay(&smtp_server)
                    .map_err(|e| Error::SendFailed(format!("Invalid SMTP server: {}", e)))?
            } else {
                lettre::SmtpTransport::builder_dangerous(&smtp_server)
            };
            let mailer = builder.port(smtp_port).credentials(creds).build();

            lettre::Transport::send(&mailer, &email)
                .map_err(|e| Error::SendFailed(format!("Failed to send email: {}", e)))?;

            Ok::<(), Error>(())
        })
        .await
        .map_err(|e| Error::SendFailed(format!("Task join error: {}", e)))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = SmtpConfig {
            server: "smtp.example.com".to_string(),
            port: 2525,
            username: "mailer".to_string(),
            password: "secret".to_string(),
            from_address: "hr@example.com".to_string(),
            use_tls: false,
        };

        let channel = EmailChannel::from_config(&config);
        assert_eq!(channel.channel_type(), "email");
        assert!(channel.is_enabled());
        assert!(!channel.use_tls);
    }

    #[tokio::test]
    async fn test_disabled_channel_rejects() {
        let channel = EmailChannel::new(
            "email".to_string(),
            "smtp.example.com".to_string(),
            587,
            "u".to_string(),
            "p".to_string(),
            "hr@example.com".to_string(),
        )
        .disabled();

        let result = channel.send(&Notice::email("a@example.com", "S", "B")).await;
        assert!(matches!(result, Err(Error::ChannelDisabled(_))));
    }

    #[tokio::test]
    async fn test_notice_without_recipients_is_skipped() {
        let channel = EmailChannel::new(
            "email".to_string(),
            "smtp.example.com".to_string(),
            587,
            "u".to_string(),
            "p".to_string(),
            "hr@example.com".to_string(),
        );

        let notice = Notice::event(crate::NoticeKind::DecisionMade, serde_json::json!({}));
        assert!(channel.send(&notice).await.is_ok());
    }
}
