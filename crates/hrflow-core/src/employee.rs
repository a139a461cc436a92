//! Employee records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Unique employee identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EmployeeId(pub u64);

impl std::fmt::Display for EmployeeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EmployeeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Employment status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeStatus {
    #[default]
    Active,
    Suspended,
    Terminated,
}

impl EmployeeStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Active => "active",
            Self::Suspended => "suspended",
            Self::Terminated => "terminated",
        }
    }
}

/// An employee record.
///
/// Immutable once created except for status/role transitions driven by
/// decisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// Unique employee identifier
    pub id: EmployeeId,
    /// Contact email
    pub email: String,
    /// First name
    pub first_name: String,
    /// Last name
    pub last_name: String,
    /// Department name
    pub department: String,
    /// Current role
    pub role: String,
    /// Hire date
    pub hire_date: DateTime<Utc>,
    /// Employment status
    pub status: EmployeeStatus,
}

impl Employee {
    pub fn new(
        id: EmployeeId,
        email: impl Into<String>,
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        department: impl Into<String>,
        role: impl Into<String>,
        hire_date: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            email: email.into(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            department: department.into(),
            role: role.into(),
            hire_date,
            status: EmployeeStatus::Active,
        }
    }

    /// Tenure in years, derived from the hire date.
    pub fn tenure_years(&self, now: DateTime<Utc>) -> f64 {
        (now - self.hire_date).num_days() as f64 / 365.25
    }

    pub fn is_active(&self) -> bool {
        self.status == EmployeeStatus::Active
    }

    /// Full display name.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn employee(hire_date: DateTime<Utc>) -> Employee {
        Employee::new(
            EmployeeId(1),
            "jo@example.com",
            "Jo",
            "Smith",
            "Engineering",
            "Developer",
            hire_date,
        )
    }

    #[test]
    fn test_tenure_years() {
        let now = Utc::now();
        let emp = employee(now - Duration::days(730));
        assert!(emp.tenure_years(now) > 1.9);
        assert!(emp.tenure_years(now) < 2.1);
    }

    #[test]
    fn test_new_employee_is_active() {
        let emp = employee(Utc::now());
        assert!(emp.is_active());
        assert_eq!(emp.full_name(), "Jo Smith");
    }
}
