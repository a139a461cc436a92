//! Decision log entries - the append-only audit trail.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

use super::access::{AccessAction, AccessType};
use super::employee::EmployeeId;

/// Unique decision log identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DecisionId(pub Uuid);

impl DecisionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for DecisionId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for DecisionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kind of decision being recorded.
///
/// Access changes serialize as `<action>_<access_type>_access` (for example
/// `grant_building_access`), the naming convention access-history queries
/// filter on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionType {
    PromotionRecommended,
    PerformanceImprovementNeeded,
    Satisfactory,
    Termination,
    Promotion,
    AccessChange(AccessAction, AccessType),
}

impl DecisionType {
    /// String form used for storage and log filtering.
    pub fn name(&self) -> String {
        match self {
            Self::PromotionRecommended => "promotion_recommended".to_string(),
            Self::PerformanceImprovementNeeded => "performance_improvement_needed".to_string(),
            Self::Satisfactory => "satisfactory".to_string(),
            Self::Termination => "termination".to_string(),
            Self::Promotion => "promotion".to_string(),
            Self::AccessChange(action, ty) => format!("{}_{}_access", action.as_str(), ty.as_str()),
        }
    }

    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "promotion_recommended" => return Some(Self::PromotionRecommended),
            "performance_improvement_needed" => return Some(Self::PerformanceImprovementNeeded),
            "satisfactory" => return Some(Self::Satisfactory),
            "termination" => return Some(Self::Termination),
            "promotion" => return Some(Self::Promotion),
            _ => {}
        }
        let rest = s.strip_suffix("_access")?;
        let (action, ty) = rest.split_once('_')?;
        Some(Self::AccessChange(
            AccessAction::from_string(action)?,
            AccessType::from_string(ty)?,
        ))
    }

    /// Whether this entry records an access modification.
    pub fn is_access_change(&self) -> bool {
        matches!(self, Self::AccessChange(_, _))
    }

    /// The access type an access-change entry concerns, if any.
    pub fn access_type(&self) -> Option<AccessType> {
        match self {
            Self::AccessChange(_, ty) => Some(*ty),
            _ => None,
        }
    }
}

impl std::fmt::Display for DecisionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl Serialize for DecisionType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.name())
    }
}

impl<'de> Deserialize<'de> for DecisionType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::from_name(&s)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid decision type: {}", s)))
    }
}

/// Human-review status of a decision log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HrReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl HrReviewStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// An immutable audit trail entry.
///
/// Never updated after creation except to set the hr-review fields when a
/// human closes the loop. Every state-changing action in the system produces
/// exactly one entry, committed in the same transaction as the mutation it
/// documents.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionLog {
    /// Unique entry identifier
    pub id: DecisionId,
    /// Employee the decision concerns
    pub employee_id: EmployeeId,
    /// Kind of decision
    pub decision_type: DecisionType,
    /// Structured decision payload
    pub decision_data: serde_json::Value,
    /// Whether the decision was computed without human input
    pub automated_decision: bool,
    /// Human-review status
    pub hr_review_status: HrReviewStatus,
    /// Reviewer who closed the loop, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hr_reviewer_id: Option<EmployeeId>,
    /// Review notes, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub review_notes: Option<String>,
    /// Creation timestamp
    pub created_at: DateTime<Utc>,
}

impl DecisionLog {
    /// Create a new pending entry.
    pub fn new(
        employee_id: EmployeeId,
        decision_type: DecisionType,
        decision_data: serde_json::Value,
        automated_decision: bool,
    ) -> Self {
        Self {
            id: DecisionId::new(),
            employee_id,
            decision_type,
            decision_data,
            automated_decision,
            hr_review_status: HrReviewStatus::Pending,
            hr_reviewer_id: None,
            review_notes: None,
            created_at: Utc::now(),
        }
    }

    /// Create an entry already closed by a human action.
    pub fn reviewed(
        employee_id: EmployeeId,
        decision_type: DecisionType,
        decision_data: serde_json::Value,
        reviewer_id: Option<EmployeeId>,
    ) -> Self {
        Self {
            hr_review_status: HrReviewStatus::Approved,
            hr_reviewer_id: reviewer_id,
            ..Self::new(employee_id, decision_type, decision_data, false)
        }
    }

    /// Mark the entry as reviewed by a human. The only permitted mutation.
    pub fn close(&mut self, status: HrReviewStatus, reviewer_id: EmployeeId, notes: Option<String>) {
        self.hr_review_status = status;
        self.hr_reviewer_id = Some(reviewer_id);
        self.review_notes = notes;
    }

    pub fn is_pending_review(&self) -> bool {
        self.hr_review_status == HrReviewStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_type_names() {
        assert_eq!(DecisionType::Termination.name(), "termination");
        assert_eq!(
            DecisionType::AccessChange(AccessAction::Grant, AccessType::Building).name(),
            "grant_building_access"
        );
        assert_eq!(
            DecisionType::AccessChange(AccessAction::Revoke, AccessType::System).name(),
            "revoke_system_access"
        );
    }

    #[test]
    fn test_decision_type_round_trip() {
        let types = [
            DecisionType::PromotionRecommended,
            DecisionType::PerformanceImprovementNeeded,
            DecisionType::Satisfactory,
            DecisionType::Termination,
            DecisionType::Promotion,
            DecisionType::AccessChange(AccessAction::Grant, AccessType::System),
        ];
        for ty in types {
            assert_eq!(DecisionType::from_name(&ty.name()), Some(ty));
        }
        assert_eq!(DecisionType::from_name("grant_parking_access"), None);
        assert_eq!(DecisionType::from_name("nonsense"), None);
    }

    #[test]
    fn test_log_close_sets_review_fields() {
        let mut log = DecisionLog::new(
            EmployeeId(3),
            DecisionType::PromotionRecommended,
            serde_json::json!({"score": 4.2}),
            true,
        );
        assert!(log.is_pending_review());

        log.close(
            HrReviewStatus::Approved,
            EmployeeId(9),
            Some("verified".to_string()),
        );
        assert!(!log.is_pending_review());
        assert_eq!(log.hr_reviewer_id, Some(EmployeeId(9)));
    }

    #[test]
    fn test_serde_string_form() {
        let log = DecisionLog::new(
            EmployeeId(1),
            DecisionType::AccessChange(AccessAction::Grant, AccessType::Building),
            serde_json::json!({"reason": "onboarding"}),
            false,
        );
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["decision_type"], "grant_building_access");

        let back: DecisionLog = serde_json::from_value(json).unwrap();
        assert!(back.decision_type.is_access_change());
    }
}
