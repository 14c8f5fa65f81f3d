//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! notes.toml (optional)
//!     → loader.rs (parse & deserialize)
//!     → NOTES_* environment overrides (.env in the container)
//!     → validation.rs (semantic checks)
//!     → NotesConfig (validated, immutable)
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; changes require a restart
//! - All fields have defaults to allow running with no file at all
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load, load_config, ConfigError};
pub use schema::AdminConfig;
pub use schema::ListenerConfig;
pub use schema::LogFormat;
pub use schema::NotesConfig;
pub use schema::ObservabilityConfig;
pub use schema::RateLimitConfig;
pub use schema::SecurityConfig;
pub use schema::StorageConfig;
pub use schema::TlsConfig;
