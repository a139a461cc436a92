//! Policy constants for automated decisions.
//!
//! Weights and thresholds are fixed, not tenant-configurable.

/// Metric weights used for the overall score. Must sum to 1.0.
pub const METRIC_WEIGHTS: [(&str, f64); 4] = [
    ("goals_achieved", 0.3),
    ("quality_of_work", 0.3),
    ("attendance", 0.2),
    ("teamwork", 0.2),
];

/// Scores at or above this recommend promotion.
pub const PROMOTION_THRESHOLD: f64 = 4.0;

/// Scores at or below this flag performance improvement.
pub const IMPROVEMENT_THRESHOLD: f64 = 2.0;

/// Documented improvement-needed entries required before termination.
pub const TERMINATION_MIN_DOCUMENTED_ISSUES: usize = 2;

/// A termination needs a performance review within this many days.
pub const TERMINATION_REVIEW_WINDOW_DAYS: i64 = 90;

/// Minimum tenure in years before a promotion can be enacted.
pub const PROMOTION_MIN_TENURE_YEARS: f64 = 1.0;

/// Prior promotion recommendations required before a promotion.
pub const PROMOTION_MIN_RECOMMENDATIONS: usize = 2;
