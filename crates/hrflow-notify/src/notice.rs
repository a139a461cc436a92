//! Notice types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique notice identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NoticeId(pub Uuid);

impl NoticeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NoticeId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for NoticeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What triggered the notice. Doubles as the realtime event name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoticeKind {
    HrReviewRequired,
    EmployeeNotification,
    AccessChange,
    DecisionMade,
    ReviewScheduled,
}

impl NoticeKind {
    pub fn as_str(&self) -> &str {
        match self {
            Self::HrReviewRequired => "hr_review_required",
            Self::EmployeeNotification => "employee_notification",
            Self::AccessChange => "access_change",
            Self::DecisionMade => "decision_made",
            Self::ReviewScheduled => "review_scheduled",
        }
    }
}

impl std::fmt::Display for NoticeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A rendered notification, ready for any channel.
///
/// Email channels use the subject/body/recipients; the realtime channel
/// publishes the kind and payload. One notice fans out to every registered
/// channel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    /// Unique notice identifier
    pub id: NoticeId,
    /// What triggered the notice
    pub kind: NoticeKind,
    /// Email subject line
    pub subject: String,
    /// Rendered plain-text body
    pub body: String,
    /// Email recipients
    pub recipients: Vec<String>,
    /// Structured payload for realtime subscribers
    pub payload: serde_json::Value,
    /// When the notice was created
    pub timestamp: DateTime<Utc>,
}

impl Notice {
    pub fn new(
        kind: NoticeKind,
        subject: impl Into<String>,
        body: impl Into<String>,
        recipients: Vec<String>,
        payload: serde_json::Value,
    ) -> Self {
        Self {
            id: NoticeId::new(),
            kind,
            subject: subject.into(),
            body: body.into(),
            recipients,
            payload,
            timestamp: Utc::now(),
        }
    }

    /// A plain email notice with no structured payload beyond the basics.
    pub fn email(recipient: impl Into<String>, subject: impl Into<String>, body: impl Into<String>) -> Self {
        let recipient = recipient.into();
        let payload = serde_json::json!({ "recipient": recipient });
        Self::new(
            NoticeKind::EmployeeNotification,
            subject,
            body,
            vec![recipient],
            payload,
        )
    }

    /// A realtime-only notice with no email recipients.
    pub fn event(kind: NoticeKind, payload: serde_json::Value) -> Self {
        Self::new(kind, kind.as_str().to_string(), String::new(), Vec::new(), payload)
    }
}
