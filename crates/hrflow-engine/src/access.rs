//! Access manager.
//!
//! Toggles per-employee access flags. Every mutation commits together with
//! its audit entry; notification follows the commit and is best-effort.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use hrflow_core::{
    AccessAction, AccessRecord, AccessType, DecisionLog, DecisionType, EmployeeId, Result,
};
use hrflow_notify::NotificationGateway;
use hrflow_storage::HrStore;

/// One access-modification entry from the audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessHistoryEntry {
    pub decision_type: DecisionType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    pub timestamp: DateTime<Utc>,
}

/// The access manager.
pub struct AccessManager {
    store: Arc<HrStore>,
    gateway: Arc<NotificationGateway>,
}

impl AccessManager {
    pub fn new(store: Arc<HrStore>, gateway: Arc<NotificationGateway>) -> Self {
        Self { store, gateway }
    }

    /// Grant or revoke one access type for an employee.
    ///
    /// Creates the record when missing, flips `is_active`, stamps
    /// `last_modified`, and appends the `<action>_<access_type>_access`
    /// audit entry in the same transaction. Repeating an action leaves the
    /// flag unchanged but still appends an entry; the trail is not
    /// deduplicated.
    pub async fn modify_access(
        &self,
        employee_id: EmployeeId,
        access_type: AccessType,
        action: AccessAction,
        reason: &str,
        modified_by: Option<EmployeeId>,
    ) -> Result<String> {
        let employee = self.store.require_employee(employee_id)?;

        let mut record = self
            .store
            .access(employee_id, access_type)?
            .unwrap_or_else(|| AccessRecord::inactive(employee_id, access_type));
        let previously_active = record.is_active;
        record.apply(action, modified_by);

        let log = DecisionLog::reviewed(
            employee_id,
            DecisionType::AccessChange(action, access_type),
            serde_json::json!({
                "reason": reason,
                "previously_active": previously_active,
                "active": record.is_active,
            }),
            modified_by,
        );
        self.store.upsert_access_with_log(&record, &log)?;

        info!(
            employee_id = %employee_id,
            access_type = %access_type,
            action = %action,
            reason,
            "access modified"
        );

        // Best-effort: an undelivered alert never rolls back the mutation
        self.gateway
            .send_access_change_alert(&employee.email, access_type, action.past_tense(), Some(reason))
            .await;

        Ok(format!(
            "Successfully {} {} access",
            action.past_tense(),
            access_type
        ))
    }

    /// Whether the employee currently holds the given access. Default-deny:
    /// a missing record reads as no access.
    pub fn check_access(&self, employee_id: EmployeeId, access_type: AccessType) -> Result<bool> {
        Ok(self
            .store
            .access(employee_id, access_type)?
            .map(|r| r.is_active)
            .unwrap_or(false))
    }

    /// Snapshot of every access type for an employee; absent records read
    /// as inactive.
    pub fn get_employee_access_status(
        &self,
        employee_id: EmployeeId,
    ) -> Result<HashMap<AccessType, bool>> {
        let records = self.store.access_for(employee_id)?;
        let mut status: HashMap<AccessType, bool> =
            AccessType::ALL.iter().map(|ty| (*ty, false)).collect();
        for record in records {
            status.insert(record.access_type, record.is_active);
        }
        Ok(status)
    }

    /// Apply the same modification to several employees independently. One
    /// failure never aborts the siblings; each employee's outcome is
    /// tracked in the returned map.
    pub async fn bulk_modify_access(
        &self,
        employee_ids: &[EmployeeId],
        access_type: AccessType,
        action: AccessAction,
        reason: &str,
    ) -> HashMap<EmployeeId, bool> {
        let mut results = HashMap::new();
        for &employee_id in employee_ids {
            let outcome = self
                .modify_access(employee_id, access_type, action, reason, None)
                .await;
            if let Err(e) = &outcome {
                warn!(employee_id = %employee_id, error = %e, "bulk access modification failed");
            }
            results.insert(employee_id, outcome.is_ok());
        }
        results
    }

    /// Revoke every managed access type for an employee.
    pub async fn revoke_all_access(
        &self,
        employee_id: EmployeeId,
        reason: &str,
    ) -> HashMap<AccessType, bool> {
        let mut results = HashMap::new();
        for access_type in AccessType::ALL {
            let outcome = self
                .modify_access(employee_id, access_type, AccessAction::Revoke, reason, None)
                .await;
            if let Err(e) = &outcome {
                warn!(
                    employee_id = %employee_id,
                    access_type = %access_type,
                    error = %e,
                    "access revocation failed"
                );
            }
            results.insert(access_type, outcome.is_ok());
        }
        results
    }

    /// Access-modification history for an employee, optionally narrowed to
    /// one access type, newest first.
    pub fn get_access_history(
        &self,
        employee_id: EmployeeId,
        access_type: Option<AccessType>,
    ) -> Result<Vec<AccessHistoryEntry>> {
        Ok(self
            .store
            .access_logs(employee_id, access_type)?
            .into_iter()
            .map(|log| AccessHistoryEntry {
                decision_type: log.decision_type,
                reason: log.decision_data["reason"].as_str().map(String::from),
                timestamp: log.created_at,
            })
            .collect())
    }
}
