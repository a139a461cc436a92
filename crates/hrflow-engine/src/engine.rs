//! Decision engine.
//!
//! Scores performance metrics into a recommendation, gates high-impact
//! automated decisions behind a policy check, and records every decision
//! in the audit trail.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use hrflow_core::{
    DecisionId, DecisionLog, DecisionType, EmployeeId, EmployeeStatus, Error, PerformanceReview,
    Recommendation, Result, ReviewId, ReviewStatus,
};
use hrflow_notify::NotificationGateway;
use hrflow_storage::HrStore;

use super::access::AccessManager;
use super::policy;

/// Compute the weighted overall score and recommendation for a set of
/// performance metrics.
///
/// Score >= 4.0 recommends promotion, <= 2.0 flags improvement, anything
/// between is satisfactory. A missing metric key is a validation error.
pub fn evaluate_performance(metrics: &HashMap<String, f64>) -> Result<(Recommendation, f64)> {
    let mut total = 0.0;
    for (metric, weight) in policy::METRIC_WEIGHTS {
        let score = metrics
            .get(metric)
            .ok_or_else(|| Error::Validation(format!("Missing metric: {}", metric)))?;
        total += score * weight;
    }

    let recommendation = if total >= policy::PROMOTION_THRESHOLD {
        Recommendation::PromotionRecommended
    } else if total <= policy::IMPROVEMENT_THRESHOLD {
        Recommendation::PerformanceImprovementNeeded
    } else {
        Recommendation::Satisfactory
    };
    Ok((recommendation, total))
}

/// Outcome of the policy gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyDecision {
    pub allowed: bool,
    pub reason: String,
}

impl PolicyDecision {
    fn allowed() -> Self {
        Self {
            allowed: true,
            reason: "Decision criteria met".to_string(),
        }
    }

    fn denied(reason: &str) -> Self {
        Self {
            allowed: false,
            reason: reason.to_string(),
        }
    }

    /// Turn a denial into the error callers surface verbatim.
    pub fn into_result(self) -> Result<()> {
        if self.allowed {
            Ok(())
        } else {
            Err(Error::PolicyDenied(self.reason))
        }
    }
}

/// Summary of an audit entry awaiting human review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionSummary {
    pub id: DecisionId,
    pub employee_id: EmployeeId,
    pub decision_type: DecisionType,
    pub decision_data: serde_json::Value,
    pub automated_decision: bool,
    pub created_at: DateTime<Utc>,
}

impl From<DecisionLog> for DecisionSummary {
    fn from(log: DecisionLog) -> Self {
        Self {
            id: log.id,
            employee_id: log.employee_id,
            decision_type: log.decision_type,
            decision_data: log.decision_data,
            automated_decision: log.automated_decision,
            created_at: log.created_at,
        }
    }
}

/// Human verdict on a pending review.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewDecision {
    Approve,
    Reject,
    /// Approve, enacting the termination the review recommends.
    Terminate,
}

/// The decision engine.
pub struct DecisionEngine {
    store: Arc<HrStore>,
    gateway: Arc<NotificationGateway>,
    access: Arc<AccessManager>,
}

impl DecisionEngine {
    pub fn new(
        store: Arc<HrStore>,
        gateway: Arc<NotificationGateway>,
        access: Arc<AccessManager>,
    ) -> Self {
        Self {
            store,
            gateway,
            access,
        }
    }

    /// Check an automated decision against the policy rules before it is
    /// acted on. Read-only.
    pub fn validate_decision(
        &self,
        decision_type: DecisionType,
        employee_id: EmployeeId,
    ) -> Result<PolicyDecision> {
        let employee = self.store.require_employee(employee_id)?;

        match decision_type {
            DecisionType::Termination => {
                let issues = self
                    .store
                    .count_decisions(employee_id, "performance_improvement_needed")?;
                if issues < policy::TERMINATION_MIN_DOCUMENTED_ISSUES {
                    return Ok(PolicyDecision::denied(
                        "Insufficient documentation for termination",
                    ));
                }

                let recent = self
                    .store
                    .latest_review(employee_id)?
                    .map(|r| {
                        (Utc::now() - r.review_date).num_days()
                            <= policy::TERMINATION_REVIEW_WINDOW_DAYS
                    })
                    .unwrap_or(false);
                if !recent {
                    return Ok(PolicyDecision::denied("Recent performance review required"));
                }
            }
            DecisionType::Promotion => {
                if employee.tenure_years(Utc::now()) < policy::PROMOTION_MIN_TENURE_YEARS {
                    return Ok(PolicyDecision::denied("Minimum tenure not met"));
                }

                let recommendations = self
                    .store
                    .count_decisions(employee_id, "promotion_recommended")?;
                if recommendations < policy::PROMOTION_MIN_RECOMMENDATIONS {
                    return Ok(PolicyDecision::denied(
                        "Insufficient high performance records",
                    ));
                }
            }
            // The policy table is intentionally small; other decision
            // kinds are allowed by default
            _ => {}
        }

        Ok(PolicyDecision::allowed())
    }

    /// Append a decision to the audit trail and notify the employee.
    ///
    /// The append either commits or the error propagates to the caller; a
    /// mutation without its audit entry would break the compliance
    /// invariant. Notification is best-effort after the commit.
    pub async fn log_decision(
        &self,
        employee_id: EmployeeId,
        decision_type: DecisionType,
        outcome: &str,
        criteria_met: bool,
        reviewer_id: Option<EmployeeId>,
    ) -> Result<DecisionLog> {
        let employee = self.store.require_employee(employee_id)?;

        let mut log = DecisionLog::new(
            employee_id,
            decision_type,
            serde_json::json!({
                "outcome": outcome,
                "criteria_met": criteria_met,
            }),
            true,
        );
        log.hr_reviewer_id = reviewer_id;
        self.store.append_log(&log)?;

        info!(
            employee_id = %employee_id,
            decision_type = %decision_type,
            outcome,
            "decision logged"
        );

        self.gateway
            .send_decision_notification(
                &employee.email,
                &decision_type.name(),
                outcome,
                log.decision_data.clone(),
            )
            .await;

        Ok(log)
    }

    /// Audit entries still awaiting human review, newest first. Read-only.
    pub fn get_pending_decisions(&self) -> Result<Vec<DecisionSummary>> {
        Ok(self
            .store
            .unreviewed_logs()?
            .into_iter()
            .map(DecisionSummary::from)
            .collect())
    }

    /// Reviews awaiting a human verdict, newest first.
    pub fn get_pending_reviews(&self) -> Result<Vec<PerformanceReview>> {
        self.store.pending_reviews()
    }

    /// Submit a performance review: score it synchronously, persist the
    /// review and its audit entry in one transaction, then notify.
    pub async fn submit_review(
        &self,
        employee_id: EmployeeId,
        reviewer_id: EmployeeId,
        metrics: HashMap<String, f64>,
        comments: Option<String>,
    ) -> Result<PerformanceReview> {
        let employee = self.store.require_employee(employee_id)?;

        let (recommendation, score) = evaluate_performance(&metrics)?;
        let mut review = PerformanceReview::new(employee_id, reviewer_id, metrics, comments);
        review.score(recommendation, score);

        let log = DecisionLog::new(
            employee_id,
            recommendation.decision_type(),
            serde_json::json!({
                "review_id": review.id,
                "overall_score": score,
                "metrics": review.metrics,
            }),
            true,
        );
        review.decision_log_id = Some(log.id);

        self.store.insert_review_with_log(&review, &log)?;

        info!(
            employee_id = %employee_id,
            review_id = %review.id,
            recommendation = recommendation.as_str(),
            score,
            "performance review submitted"
        );

        self.gateway
            .send_decision_notification(
                &employee.email,
                &recommendation.decision_type().name(),
                recommendation.as_str(),
                serde_json::json!({ "overall_score": score }),
            )
            .await;
        self.gateway
            .notify_hr_personnel(
                "performance_review",
                serde_json::json!({
                    "employee_id": employee_id,
                    "review_id": review.id,
                    "recommendation": recommendation,
                    "overall_score": score,
                }),
            )
            .await;

        Ok(review)
    }

    /// Close a pending review with a human verdict.
    ///
    /// Terminate is an approval that also enacts the termination: it must
    /// pass the policy gate, then the employee record is closed (with its
    /// audit entry, atomically), all access is revoked, and a critical
    /// notification goes out.
    pub async fn resolve_review(
        &self,
        review_id: ReviewId,
        hr_reviewer_id: EmployeeId,
        decision: ReviewDecision,
        notes: Option<String>,
    ) -> Result<PerformanceReview> {
        let mut review = self
            .store
            .review(review_id)?
            .ok_or_else(|| Error::NotFound(format!("Review {} not found", review_id)))?;
        if review.status.is_terminal() {
            return Err(Error::Validation(format!(
                "Review {} already resolved",
                review_id
            )));
        }
        let employee = self.store.require_employee(review.employee_id)?;

        if decision == ReviewDecision::Terminate {
            self.validate_decision(DecisionType::Termination, review.employee_id)?
                .into_result()?;
        }

        let status = match decision {
            ReviewDecision::Reject => ReviewStatus::Rejected,
            ReviewDecision::Approve | ReviewDecision::Terminate => ReviewStatus::Approved,
        };
        review.resolve(status, notes.clone());
        self.store.update_review(&review)?;

        // Close the loop on the audit entry made at submission
        if let Some(log_id) = review.decision_log_id {
            if let Some(mut log) = self.store.log(log_id)? {
                let log_status = match status {
                    ReviewStatus::Rejected => hrflow_core::HrReviewStatus::Rejected,
                    _ => hrflow_core::HrReviewStatus::Approved,
                };
                log.close(log_status, hr_reviewer_id, notes.clone());
                self.store.update_log(&log)?;
            }
        }

        if decision == ReviewDecision::Terminate {
            let mut terminated = employee.clone();
            terminated.status = EmployeeStatus::Terminated;
            let term_log = DecisionLog::reviewed(
                review.employee_id,
                DecisionType::Termination,
                serde_json::json!({
                    "review_id": review.id,
                    "notes": notes,
                }),
                Some(hr_reviewer_id),
            );
            self.store.update_employee_with_log(&terminated, &term_log)?;

            self.access
                .revoke_all_access(review.employee_id, "termination approved")
                .await;

            self.gateway
                .notify_employee(
                    &employee.email,
                    "termination",
                    notes
                        .as_deref()
                        .unwrap_or("Termination approved following performance review"),
                )
                .await;
        } else {
            self.gateway
                .send_decision_notification(
                    &employee.email,
                    "performance_review",
                    status.as_str(),
                    serde_json::json!({ "review_id": review.id }),
                )
                .await;
        }

        info!(
            review_id = %review_id,
            employee_id = %review.employee_id,
            status = status.as_str(),
            "review resolved"
        );

        Ok(review)
    }
}
