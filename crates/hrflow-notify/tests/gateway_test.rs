//! Gateway dispatch behavior across channels.

use std::sync::Arc;

use async_trait::async_trait;
use hrflow_core::{AccessType, NotifyConfig};
use hrflow_notify::{
    ChannelRegistry, MemoryChannel, Notice, NotificationChannel, NotificationGateway, NoticeKind,
    RealtimeChannel,
};

/// Channel that always fails, for exercising the swallow-and-log path.
struct FailingChannel;

#[async_trait]
impl NotificationChannel for FailingChannel {
    fn name(&self) -> &str {
        "failing"
    }

    fn channel_type(&self) -> &str {
        "failing"
    }

    fn is_enabled(&self) -> bool {
        true
    }

    async fn send(&self, _notice: &Notice) -> hrflow_notify::Result<()> {
        Err(hrflow_notify::Error::SendFailed("transport down".to_string()))
    }
}

fn gateway() -> NotificationGateway {
    NotificationGateway::new(NotifyConfig::new(vec![
        "hr-lead@example.com".to_string(),
        "hr-ops@example.com".to_string(),
    ]))
}

#[tokio::test]
async fn failing_channel_never_blocks_others() {
    let gateway = gateway();
    let memory = Arc::new(MemoryChannel::new("memory".to_string()));
    gateway.register_channel(Arc::new(FailingChannel)).await;
    gateway.register_channel(memory.clone()).await;

    // Reported as unsuccessful, but the healthy channel still got the notice
    let ok = gateway.send_email("emp@example.com", "Subject", "Body").await;
    assert!(!ok);
    assert_eq!(memory.count().await, 1);
}

#[tokio::test]
async fn disabled_channels_are_skipped_not_failed() {
    let gateway = gateway();
    gateway
        .register_channel(Arc::new(MemoryChannel::disabled("off".to_string())))
        .await;

    assert!(gateway.send_email("emp@example.com", "Subject", "Body").await);
}

#[tokio::test]
async fn decision_notification_reaches_email_and_realtime() {
    let gateway = gateway();
    let memory = Arc::new(MemoryChannel::new("memory".to_string()));
    let realtime = Arc::new(RealtimeChannel::new("realtime".to_string(), 16));
    let mut rx = realtime.subscribe();

    gateway.register_channel(memory.clone()).await;
    gateway.register_channel(realtime).await;

    gateway
        .send_decision_notification(
            "emp@example.com",
            "promotion_recommended",
            "approved",
            serde_json::json!({"score": 4.3}),
        )
        .await;

    let notices = memory.notices().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind, NoticeKind::DecisionMade);
    assert!(notices[0].subject.contains("promotion_recommended"));

    let event = rx.recv().await.unwrap();
    assert_eq!(event.event, "decision_made");
    assert_eq!(event.payload["decision"], "approved");
}

#[tokio::test]
async fn hr_notice_goes_to_all_hr_recipients() {
    let gateway = gateway();
    let memory = Arc::new(MemoryChannel::new("memory".to_string()));
    gateway.register_channel(memory.clone()).await;

    gateway
        .notify_hr_personnel("termination", serde_json::json!({"employee_id": 7}))
        .await;

    let notices = memory.notices().await;
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].recipients.len(), 2);
}

#[tokio::test]
async fn access_change_alert_carries_reason() {
    let gateway = gateway();
    let memory = Arc::new(MemoryChannel::new("memory".to_string()));
    gateway.register_channel(memory.clone()).await;

    gateway
        .send_access_change_alert(
            "emp@example.com",
            AccessType::System,
            "revoked",
            Some("policy violation"),
        )
        .await;

    let notices = memory.notices().await;
    // Employee alert plus the HR fan-out
    assert_eq!(notices.len(), 2);
    assert!(notices[0].body.contains("policy violation"));
    assert_eq!(notices[0].payload["status"], "revoked");
}

#[tokio::test]
async fn registry_probe_uses_registered_channel() {
    let registry = ChannelRegistry::new();
    let memory = Arc::new(MemoryChannel::new("memory".to_string()));
    registry.register(memory.clone()).await;

    registry.test("memory").await.unwrap();
    assert_eq!(memory.count().await, 1);
}
