//! Performance reviews.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::decision::{DecisionId, DecisionType};
use super::employee::EmployeeId;

/// Unique review identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReviewId(pub Uuid);

impl ReviewId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_string(s: &str) -> Result<Self, uuid::Error> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for ReviewId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ReviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Review lifecycle status.
///
/// submitted -> scored (automated decision set) -> pending HR review ->
/// approved | rejected. Approved and rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReviewStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl ReviewStatus {
    pub fn as_str(&self) -> &str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// Recommendation computed from performance metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recommendation {
    PromotionRecommended,
    PerformanceImprovementNeeded,
    Satisfactory,
}

impl Recommendation {
    pub fn as_str(&self) -> &str {
        match self {
            Self::PromotionRecommended => "promotion_recommended",
            Self::PerformanceImprovementNeeded => "performance_improvement_needed",
            Self::Satisfactory => "satisfactory",
        }
    }

    /// The audit entry type recorded for this recommendation.
    pub fn decision_type(&self) -> DecisionType {
        match self {
            Self::PromotionRecommended => DecisionType::PromotionRecommended,
            Self::PerformanceImprovementNeeded => DecisionType::PerformanceImprovementNeeded,
            Self::Satisfactory => DecisionType::Satisfactory,
        }
    }
}

impl std::fmt::Display for Recommendation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A submitted performance review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PerformanceReview {
    /// Unique review identifier
    pub id: ReviewId,
    /// Employee under review
    pub employee_id: EmployeeId,
    /// Reviewer who submitted the metrics
    pub reviewer_id: EmployeeId,
    /// When the review took place
    pub review_date: DateTime<Utc>,
    /// Per-category numeric scores
    pub metrics: HashMap<String, f64>,
    /// Weighted overall score
    pub overall_score: f64,
    /// Free-form comments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    /// Lifecycle status
    pub status: ReviewStatus,
    /// Recommendation computed at submission
    #[serde(skip_serializing_if = "Option::is_none")]
    pub automated_decision: Option<Recommendation>,
    /// Whether a human must close the loop
    pub requires_hr_review: bool,
    /// Notes recorded by the closing reviewer
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hr_notes: Option<String>,
    /// Audit entry appended when this review was submitted
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision_log_id: Option<DecisionId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl PerformanceReview {
    pub fn new(
        employee_id: EmployeeId,
        reviewer_id: EmployeeId,
        metrics: HashMap<String, f64>,
        comments: Option<String>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: ReviewId::new(),
            employee_id,
            reviewer_id,
            review_date: now,
            metrics,
            overall_score: 0.0,
            comments,
            status: ReviewStatus::Pending,
            automated_decision: None,
            requires_hr_review: true,
            hr_notes: None,
            decision_log_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Record the synchronous scoring outcome.
    pub fn score(&mut self, recommendation: Recommendation, overall_score: f64) {
        self.automated_decision = Some(recommendation);
        self.overall_score = overall_score;
        self.updated_at = Utc::now();
    }

    /// Move the review to a terminal status.
    pub fn resolve(&mut self, status: ReviewStatus, hr_notes: Option<String>) {
        self.status = status;
        self.hr_notes = hr_notes;
        self.updated_at = Utc::now();
    }

    pub fn is_pending(&self) -> bool {
        self.status == ReviewStatus::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_review_lifecycle() {
        let mut review = PerformanceReview::new(
            EmployeeId(1),
            EmployeeId(2),
            HashMap::from([("goals_achieved".to_string(), 4.5)]),
            None,
        );
        assert!(review.is_pending());
        assert!(review.requires_hr_review);

        review.score(Recommendation::PromotionRecommended, 4.5);
        assert_eq!(
            review.automated_decision,
            Some(Recommendation::PromotionRecommended)
        );

        review.resolve(ReviewStatus::Approved, Some("agreed".to_string()));
        assert!(review.status.is_terminal());
        assert!(!review.is_pending());
    }

    #[test]
    fn test_recommendation_decision_type() {
        assert_eq!(
            Recommendation::Satisfactory.decision_type().name(),
            "satisfactory"
        );
        assert_eq!(
            Recommendation::PerformanceImprovementNeeded.as_str(),
            "performance_improvement_needed"
        );
    }
}
