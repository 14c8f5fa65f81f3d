//! HTTP client for a Tiny Markdown Notes server.

pub mod client;

pub use client::{HealthResponse, NotesClient};
