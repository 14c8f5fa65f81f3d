//! Tiny Notes Library
//!
//! A self-hosted markdown notes service: one JSON file per note, an
//! admin key to create notes, public read and edit by URL, and
//! optimistic versioning so concurrent saves never overwrite each other.

pub mod config;
pub mod deploy;
pub mod http;
pub mod lifecycle;
pub mod net;
pub mod notes;
pub mod observability;
pub mod security;

pub use config::NotesConfig;
pub use http::NotesServer;
pub use lifecycle::Shutdown;
pub use notes::NoteStore;
