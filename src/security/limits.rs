//! Request and content limits.
//!
//! The transport-level body limit is a `tower-http` layer and answers 413 on
//! its own. The markdown limit is counted in characters and checked by the
//! update handler. The body limit is raised far enough that any note within
//! the character limit gets through the layer whatever its encoding.

use tower_http::limit::RequestBodyLimitLayer;

use crate::config::SecurityConfig;

/// Worst-case form-encoded size of one character: four UTF-8 bytes, each
/// written as `%XX`.
pub const MAX_ENCODED_CHAR_BYTES: usize = 12;

/// Room for the field names, the version and the separators.
const FORM_OVERHEAD_BYTES: usize = 1024;

/// Body size the server accepts: the configured limit, or more when a
/// full-length note could need it.
pub fn effective_body_limit(config: &SecurityConfig, max_markdown_chars: usize) -> usize {
    let note_form = max_markdown_chars
        .saturating_mul(MAX_ENCODED_CHAR_BYTES)
        .saturating_add(FORM_OVERHEAD_BYTES);
    config.max_body_size.max(note_form)
}

pub fn body_limit_layer(config: &SecurityConfig, max_markdown_chars: usize) -> RequestBodyLimitLayer {
    RequestBodyLimitLayer::new(effective_body_limit(config, max_markdown_chars))
}

/// Whether `markdown` fits within `max_chars` characters.
pub fn markdown_within_limit(markdown: &str, max_chars: usize) -> bool {
    // Cheap upper bound first: a string never has more chars than bytes.
    markdown.len() <= max_chars || markdown.chars().count() <= max_chars
}
