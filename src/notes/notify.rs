//! Change notification for saved notes.

use crate::notes::slug::Slug;

/// Who changed which note, as seen by the HTTP layer.
#[derive(Debug, Clone)]
pub struct ChangeEvent {
    pub slug: Slug,
    pub version: u64,
    pub ip: String,
    pub user_agent: String,
    pub url: String,
}

impl ChangeEvent {
    pub fn new(
        slug: Slug,
        version: u64,
        ip: Option<String>,
        user_agent: Option<String>,
        url: Option<String>,
    ) -> Self {
        let or_unknown = |v: Option<String>| v.unwrap_or_else(|| "unknown".to_string());
        Self {
            slug,
            version,
            ip: or_unknown(ip),
            user_agent: or_unknown(user_agent),
            url: or_unknown(url),
        }
    }
}

/// Receives an event after every successful note update.
///
/// Implementations must not block; anything slow (mail, webhooks) should be
/// spawned onto the runtime.
pub trait ChangeNotifier: Send + Sync {
    fn notify(&self, event: &ChangeEvent);
}

/// Writes change events to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl ChangeNotifier for LogNotifier {
    fn notify(&self, event: &ChangeEvent) {
        tracing::info!(
            slug = %event.slug,
            version = event.version,
            ip = %event.ip,
            user_agent = %event.user_agent,
            url = %event.url,
            "Note updated"
        );
    }
}
