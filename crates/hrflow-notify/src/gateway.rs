//! Notification gateway.
//!
//! Composes workflow events into rendered notices and fans them out to
//! every registered channel. Dispatch is fire-and-forget: failures are
//! logged with their channel name and swallowed, so a broken transport can
//! never roll back or fail the business operation that triggered it.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use hrflow_core::{AccessType, NotifyConfig};

use super::channels::{ChannelRegistry, NotificationChannel};
use super::notice::{Notice, NoticeKind};

/// Gateway over the registered notification channels.
pub struct NotificationGateway {
    registry: ChannelRegistry,
    hr_emails: Vec<String>,
}

impl NotificationGateway {
    pub fn new(config: NotifyConfig) -> Self {
        Self {
            registry: ChannelRegistry::new(),
            hr_emails: config.hr_emails,
        }
    }

    /// Register a channel with the gateway.
    pub async fn register_channel(&self, channel: Arc<dyn NotificationChannel>) {
        self.registry.register(channel).await;
    }

    pub fn registry(&self) -> &ChannelRegistry {
        &self.registry
    }

    /// Fan a notice out to every enabled channel. Returns false when any
    /// enabled channel failed; the failure itself is only logged.
    async fn dispatch(&self, notice: Notice) -> bool {
        let mut ok = true;
        for channel in self.registry.all().await {
            if !channel.is_enabled() {
                continue;
            }
            if let Err(e) = channel.send(&notice).await {
                warn!(
                    channel = channel.name(),
                    kind = notice.kind.as_str(),
                    error = %e,
                    "notification channel failed"
                );
                ok = false;
            }
        }
        debug!(kind = notice.kind.as_str(), ok, "notice dispatched");
        ok
    }

    /// Send a plain email notification.
    pub async fn send_email(&self, recipient: &str, subject: &str, body: &str) -> bool {
        self.dispatch(Notice::email(recipient, subject, body)).await
    }

    /// Publish a realtime event with no email delivery.
    pub async fn publish_event(&self, kind: NoticeKind, payload: serde_json::Value) {
        self.dispatch(Notice::event(kind, payload)).await;
    }

    /// Notify HR personnel that an action needs review or approval.
    pub async fn notify_hr_personnel(&self, action_type: &str, details: serde_json::Value) {
        let subject = format!("HR Action Required: {}", action_type);
        let body = format!(
            "Action Type: {}\nDetails: {}\nTime: {}\n\nPlease review this action in the HR dashboard.",
            action_type,
            serde_json::to_string_pretty(&details).unwrap_or_else(|_| details.to_string()),
            Utc::now(),
        );
        let payload = serde_json::json!({
            "action_type": action_type,
            "details": details,
            "timestamp": Utc::now(),
        });

        self.dispatch(Notice::new(
            NoticeKind::HrReviewRequired,
            subject,
            body,
            self.hr_emails.clone(),
            payload,
        ))
        .await;
    }

    /// Notify the affected employee about an HR action.
    pub async fn notify_employee(&self, employee_email: &str, action_type: &str, details: &str) {
        let subject = format!("Important HR Update: {}", action_type);
        let body = format!(
            "Dear Employee,\n\nThis is to inform you about the following HR action:\n\n{}\n\nIf you have any questions, please contact HR immediately.\n\nTime: {}",
            details,
            Utc::now(),
        );
        let payload = serde_json::json!({
            "employee_email": employee_email,
            "action_type": action_type,
            "details": details,
            "timestamp": Utc::now(),
        });

        self.dispatch(Notice::new(
            NoticeKind::EmployeeNotification,
            subject,
            body,
            vec![employee_email.to_string()],
            payload,
        ))
        .await;
    }

    /// Alert the employee (and HR) about an access-control change.
    pub async fn send_access_change_alert(
        &self,
        employee_email: &str,
        access_type: AccessType,
        status: &str,
        reason: Option<&str>,
    ) {
        let subject = format!("Access Control Update: {}", access_type);
        let body = format!(
            "Access Update Information:\n\nType: {}\nStatus: {}\nReason: {}\nTime: {}\n\nIf this change was not expected, please contact HR immediately.",
            access_type,
            status,
            reason.unwrap_or("Not specified"),
            Utc::now(),
        );
        let payload = serde_json::json!({
            "employee_email": employee_email,
            "access_type": access_type,
            "status": status,
            "reason": reason,
        });

        self.dispatch(Notice::new(
            NoticeKind::AccessChange,
            subject,
            body,
            vec![employee_email.to_string()],
            payload.clone(),
        ))
        .await;

        self.notify_hr_personnel("access_change", payload).await;
    }

    /// Notify the employee about a recorded decision.
    pub async fn send_decision_notification(
        &self,
        employee_email: &str,
        decision_type: &str,
        decision: &str,
        details: serde_json::Value,
    ) {
        let subject = format!("HR Decision Notification: {}", decision_type);
        let body = format!(
            "Dear Employee,\n\nA decision has been made regarding: {}\n\nDecision: {}\nDetails: {}\n\nIf you have any questions, please contact HR.",
            decision_type,
            decision,
            serde_json::to_string_pretty(&details).unwrap_or_else(|_| details.to_string()),
        );
        let payload = serde_json::json!({
            "employee_email": employee_email,
            "decision_type": decision_type,
            "decision": decision,
            "details": details,
        });

        self.dispatch(Notice::new(
            NoticeKind::DecisionMade,
            subject,
            body,
            vec![employee_email.to_string()],
            payload,
        ))
        .await;
    }

    /// Notify the employee of an upcoming performance review.
    pub async fn send_review_scheduled(
        &self,
        employee_email: &str,
        review_date: DateTime<Utc>,
        reviewer: &str,
    ) {
        let subject = "Upcoming Performance Review".to_string();
        let body = format!(
            "Dear Employee,\n\nYour performance review has been scheduled:\n\nDate: {}\nReviewer: {}\n\nPlease prepare necessary documentation and self-assessment.",
            review_date.format("%Y-%m-%d %H:%M"),
            reviewer,
        );
        let payload = serde_json::json!({
            "employee_email": employee_email,
            "review_date": review_date,
            "reviewer": reviewer,
        });

        self.dispatch(Notice::new(
            NoticeKind::ReviewScheduled,
            subject,
            body,
            vec![employee_email.to_string()],
            payload,
        ))
        .await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::MemoryChannel;

    fn gateway_with_hr() -> NotificationGateway {
        NotificationGateway::new(NotifyConfig::new(vec!["hr@example.com".to_string()]))
    }

    #[tokio::test]
    async fn test_send_email_reaches_channel() {
        let gateway = gateway_with_hr();
        let memory = Arc::new(MemoryChannel::new("memory".to_string()));
        gateway.register_channel(memory.clone()).await;

        assert!(gateway.send_email("a@example.com", "Hello", "Body").await);
        assert_eq!(memory.count().await, 1);
    }

    #[tokio::test]
    async fn test_access_alert_also_notifies_hr() {
        let gateway = gateway_with_hr();
        let memory = Arc::new(MemoryChannel::new("memory".to_string()));
        gateway.register_channel(memory.clone()).await;

        gateway
            .send_access_change_alert("a@example.com", AccessType::Building, "granted", Some("onboarding"))
            .await;

        let notices = memory.notices().await;
        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].kind, NoticeKind::AccessChange);
        assert_eq!(notices[1].kind, NoticeKind::HrReviewRequired);
        assert_eq!(notices[1].recipients, vec!["hr@example.com".to_string()]);
    }

    #[tokio::test]
    async fn test_dispatch_with_no_channels_is_ok() {
        let gateway = gateway_with_hr();
        // Nothing registered; nothing fails
        assert!(gateway.send_email("a@example.com", "S", "B").await);
    }
}
