//! Security subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request:
//!     → limits.rs (body size)
//!     → rate_limit.rs (per-IP token bucket, optional)
//!     → handler: access_control.rs (admin key for note creation)
//!                limits.rs (markdown length)
//! Outgoing response:
//!     → headers.rs (nosniff, frame and referrer policy)
//! ```
//!
//! # Design Decisions
//! - Fail closed: reject on any security check failure
//! - Client address comes from the socket unless a trusted proxy is configured

pub mod access_control;
pub mod headers;
pub mod limits;
pub mod rate_limit;

pub use rate_limit::RateLimiter;
