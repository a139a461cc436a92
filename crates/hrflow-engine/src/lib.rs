//! Decision/access workflow for HRFlow.
//!
//! The workflow runs from performance-review submission through automated
//! scoring, the human-review gate, access-control mutation, and
//! notification dispatch. Every state-changing step commits its audit
//! entry in the same store transaction as the mutation it documents;
//! notifications fire after commit and are best-effort.
//!
//! Components are constructed with explicit references to the store and
//! gateway they need. There is no ambient global state.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::collections::HashMap;
//! use std::sync::Arc;
//!
//! use hrflow_core::NotifyConfig;
//! use hrflow_engine::{AccessManager, DecisionEngine};
//! use hrflow_notify::NotificationGateway;
//! use hrflow_storage::HrStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = Arc::new(HrStore::open("data")?);
//!     let gateway = Arc::new(NotificationGateway::new(NotifyConfig::from_env()));
//!     let access = Arc::new(AccessManager::new(store.clone(), gateway.clone()));
//!     let engine = DecisionEngine::new(store, gateway, access);
//!
//!     let metrics = HashMap::from([
//!         ("goals_achieved".to_string(), 4.5),
//!         ("quality_of_work".to_string(), 4.0),
//!         ("attendance".to_string(), 5.0),
//!         ("teamwork".to_string(), 4.0),
//!     ]);
//!     let review = engine
//!         .submit_review(1.into(), 2.into(), metrics, None)
//!         .await?;
//!     println!("recommendation: {:?}", review.automated_decision);
//!     Ok(())
//! }
//! ```

pub mod access;
pub mod engine;
pub mod policy;

pub use access::{AccessHistoryEntry, AccessManager};
pub use engine::{
    evaluate_performance, DecisionEngine, DecisionSummary, PolicyDecision, ReviewDecision,
};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
