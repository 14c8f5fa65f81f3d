//! Network layer subsystem.
//!
//! # Data Flow
//! ```text
//! listener.rs (parse address, bind, report port conflicts)
//!     → plain HTTP via axum::serve
//! tls.rs (load PEM cert/key when listener.tls is set)
//!     → HTTPS via axum-server + rustls
//! ```
//!
//! In the compose deployment TLS is normally terminated by the reverse proxy
//! in the production overlay; in-process TLS is for running standalone.

pub mod listener;
pub mod tls;

pub use listener::{bind, ListenerError};
