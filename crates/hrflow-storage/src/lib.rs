//! Persistent storage for the HRFlow entities using redb.
//!
//! One database file holds the four entity tables. Mutations that must stay
//! consistent with their audit entry (access changes, review submissions,
//! employee status transitions) go through combined methods that write both
//! rows in a single transaction: either both commit or neither does.

mod store;

pub use store::HrStore;
