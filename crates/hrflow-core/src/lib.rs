//! Core domain model for the HRFlow workflow backend.
//!
//! HRFlow tracks employee records, scores performance reviews against a
//! fixed rule set, toggles per-employee access flags, and keeps an
//! append-only audit trail of every decision. This crate holds the entity
//! types, the canonical error kinds, and configuration loading; the
//! storage, notification, and workflow layers build on top of it.

pub mod access;
pub mod config;
pub mod decision;
pub mod employee;
pub mod error;
pub mod review;

pub use access::{AccessAction, AccessLevel, AccessRecord, AccessType};
pub use config::{NotifyConfig, SmtpConfig};
pub use decision::{DecisionId, DecisionLog, DecisionType, HrReviewStatus};
pub use employee::{Employee, EmployeeId, EmployeeStatus};
pub use error::{Error, Result};
pub use review::{PerformanceReview, Recommendation, ReviewId, ReviewStatus};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
