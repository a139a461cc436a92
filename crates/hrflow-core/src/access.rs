//! Access control records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::employee::EmployeeId;

/// Category of access being controlled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessType {
    Building,
    System,
}

impl AccessType {
    /// The fixed set of managed access types.
    pub const ALL: [AccessType; 2] = [AccessType::Building, AccessType::System];

    pub fn as_str(&self) -> &str {
        match self {
            Self::Building => "building",
            Self::System => "system",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "building" => Some(Self::Building),
            "system" => Some(Self::System),
            _ => None,
        }
    }
}

impl std::fmt::Display for AccessType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Grant or revoke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessAction {
    Grant,
    Revoke,
}

impl AccessAction {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Grant => "grant",
            Self::Revoke => "revoke",
        }
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "grant" => Some(Self::Grant),
            "revoke" => Some(Self::Revoke),
            _ => None,
        }
    }

    /// Past-tense form for human-readable messages.
    pub fn past_tense(&self) -> &str {
        match self {
            Self::Grant => "granted",
            Self::Revoke => "revoked",
        }
    }

    /// The resulting active flag.
    pub fn is_grant(&self) -> bool {
        matches!(self, Self::Grant)
    }
}

impl std::fmt::Display for AccessAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Optional access level extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccessLevel {
    Full,
    Restricted,
    None,
}

/// Per-employee, per-access-type record.
///
/// At most one record exists per `(employee_id, access_type)` pair;
/// `last_modified` is stamped on every mutation, never on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessRecord {
    pub employee_id: EmployeeId,
    pub access_type: AccessType,
    /// Canonical boolean status
    pub is_active: bool,
    /// Optional level extension, never consulted by access checks
    #[serde(skip_serializing_if = "Option::is_none")]
    pub level: Option<AccessLevel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_date: Option<DateTime<Utc>>,
    /// Stamped on every mutation
    pub last_modified: DateTime<Utc>,
    /// Who performed the last mutation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub modified_by: Option<EmployeeId>,
}

impl AccessRecord {
    /// Create an inactive record for the given pair.
    pub fn inactive(employee_id: EmployeeId, access_type: AccessType) -> Self {
        Self {
            employee_id,
            access_type,
            is_active: false,
            level: None,
            start_date: None,
            end_date: None,
            last_modified: Utc::now(),
            modified_by: None,
        }
    }

    /// Apply a grant/revoke action, stamping `last_modified`.
    pub fn apply(&mut self, action: AccessAction, modified_by: Option<EmployeeId>) {
        self.is_active = action.is_grant();
        self.last_modified = Utc::now();
        self.modified_by = modified_by;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_access_type_round_trip() {
        for ty in AccessType::ALL {
            assert_eq!(AccessType::from_string(ty.as_str()), Some(ty));
        }
        assert_eq!(AccessType::from_string("parking"), None);
    }

    #[test]
    fn test_apply_grant_then_revoke() {
        let mut record = AccessRecord::inactive(EmployeeId(7), AccessType::Building);
        assert!(!record.is_active);

        record.apply(AccessAction::Grant, Some(EmployeeId(1)));
        assert!(record.is_active);
        assert_eq!(record.modified_by, Some(EmployeeId(1)));

        let modified = record.last_modified;
        record.apply(AccessAction::Revoke, None);
        assert!(!record.is_active);
        assert!(record.last_modified >= modified);
    }

    #[test]
    fn test_action_past_tense() {
        assert_eq!(AccessAction::Grant.past_tense(), "granted");
        assert_eq!(AccessAction::Revoke.past_tense(), "revoked");
    }
}
