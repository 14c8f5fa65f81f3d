//! On-disk note record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::notes::slug::Slug;

/// A stored note.
///
/// Serialized as one pretty-printed JSON object per file:
/// `{"markdown": ..., "version": ..., "created_at": ...}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    /// Raw markdown source.
    pub markdown: String,

    /// Optimistic-concurrency version, starting at 1.
    pub version: u64,

    /// Creation timestamp (RFC 3339). Older files may carry `null`.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl Note {
    /// The note handed out when an admin opens a slug that does not exist yet.
    pub fn starter(slug: &Slug, now: DateTime<Utc>) -> Self {
        Self {
            markdown: format!("# {}\n\n- [ ] First item\n", slug),
            version: 1,
            created_at: Some(now),
        }
    }

    /// Next revision carrying `markdown`, keeping the creation time.
    ///
    /// `None` once the version counter is exhausted.
    pub fn revise(&self, markdown: String) -> Option<Self> {
        Some(Self {
            markdown,
            version: self.version.checked_add(1)?,
            created_at: self.created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_note() {
        let slug = Slug::parse("groceries").unwrap();
        let now = Utc::now();
        let note = Note::starter(&slug, now);
        assert_eq!(note.markdown, "# groceries\n\n- [ ] First item\n");
        assert_eq!(note.version, 1);
        assert_eq!(note.created_at, Some(now));
    }

    #[test]
    fn test_revise_bumps_version_and_keeps_created_at() {
        let slug = Slug::parse("todo").unwrap();
        let note = Note::starter(&slug, Utc::now());
        let next = note.revise("# Updated".into()).unwrap();
        assert_eq!(next.version, 2);
        assert_eq!(next.created_at, note.created_at);
        assert_eq!(next.markdown, "# Updated");
    }

    #[test]
    fn test_revise_stops_at_max_version() {
        let note = Note {
            markdown: "# full".into(),
            version: u64::MAX,
            created_at: None,
        };
        assert!(note.revise("# more".into()).is_none());
    }

    #[test]
    fn test_reads_offset_timestamps_and_null() {
        let json = r##"{"markdown": "# a", "version": 3, "created_at": "2024-05-01T10:20:30.123456+00:00"}"##;
        let note: Note = serde_json::from_str(json).unwrap();
        assert_eq!(note.version, 3);
        assert!(note.created_at.is_some());

        let json = r##"{"markdown": "# b", "version": 1, "created_at": null}"##;
        let note: Note = serde_json::from_str(json).unwrap();
        assert!(note.created_at.is_none());
    }
}
