//! Notification gateway for HRFlow.
//!
//! Notifications are observability, not a correctness dependency: every
//! channel failure is caught and logged, and never fails the business
//! operation that triggered it.
//!
//! ## Features
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `email` | ✅ | Email notification channel via SMTP |
//!
//! ## Channels
//!
//! - **Console**: print notices to stdout
//! - **Memory**: capture notices for tests
//! - **Email**: SMTP delivery via lettre (feature `email`)
//! - **Realtime**: in-process broadcast of structured events, the seam a
//!   websocket transport subscribes to

pub mod channels;
pub mod error;
pub mod gateway;
pub mod notice;

pub use channels::{ChannelRegistry, ConsoleChannel, MemoryChannel, NotificationChannel};
pub use channels::{RealtimeChannel, RealtimeEvent};
pub use error::{Error, Result};
pub use gateway::NotificationGateway;
pub use notice::{Notice, NoticeId, NoticeKind};

#[cfg(feature = "email")]
pub use channels::EmailChannel;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
