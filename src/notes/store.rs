//! File-backed note storage.
//!
//! One JSON file per note under the notes directory. Writes go through a
//! temporary file followed by a rename, so readers never observe a partially
//! written note. Read-compare-write sequences on the same slug are serialized
//! with a per-slug async mutex.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::notes::model::Note;
use crate::notes::slug::Slug;
use crate::observability::metrics;

/// Errors produced by [`NoteStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("note '{0}' not found")]
    NotFound(Slug),

    #[error("note '{slug}' is at version {current}, update was based on {expected}")]
    Conflict {
        slug: Slug,
        expected: u64,
        current: u64,
    },

    #[error("note '{0}' has reached the highest version number")]
    VersionExhausted(Slug),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("corrupt note file {}: {source}", .path.display())]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl StoreError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

/// Note storage rooted at a directory.
pub struct NoteStore {
    dir: PathBuf,
    locks: DashMap<Slug, Arc<Mutex<()>>>,
}

impl NoteStore {
    /// Open the store, creating the directory if needed.
    pub async fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(|e| StoreError::io(&dir, e))?;

        tracing::debug!(dir = %dir.display(), "Note store opened");

        Ok(Self {
            dir,
            locks: DashMap::new(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn note_path(&self, slug: &Slug) -> PathBuf {
        self.dir.join(slug.file_name())
    }

    /// Load a note. Returns `None` when it does not exist.
    pub async fn load(&self, slug: &Slug) -> Result<Option<Note>, StoreError> {
        let path = self.note_path(slug);
        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StoreError::io(&path, e)),
        };

        serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|source| StoreError::Corrupt { path, source })
    }

    /// Create the starter note for `slug`.
    ///
    /// If another request created it first, the existing note is returned
    /// untouched.
    pub async fn create_default(&self, slug: &Slug) -> Result<Note, StoreError> {
        let _guard = self.lock(slug).await;

        if let Some(existing) = self.load(slug).await? {
            return Ok(existing);
        }

        let note = Note::starter(slug, Utc::now());
        self.write(slug, &note).await?;
        metrics::record_note_created();
        tracing::info!(slug = %slug, "Note created");
        Ok(note)
    }

    /// Replace the markdown of an existing note.
    ///
    /// Succeeds only when `expected_version` matches the stored version; the
    /// stored version is then bumped by one.
    pub async fn update(
        &self,
        slug: &Slug,
        markdown: String,
        expected_version: u64,
    ) -> Result<Note, StoreError> {
        // Unknown slugs never get a lock entry.
        if !self.exists(slug).await? {
            return Err(StoreError::NotFound(slug.clone()));
        }

        let _guard = self.lock(slug).await;

        let current = self
            .load(slug)
            .await?
            .ok_or_else(|| StoreError::NotFound(slug.clone()))?;

        if current.version != expected_version {
            return Err(StoreError::Conflict {
                slug: slug.clone(),
                expected: expected_version,
                current: current.version,
            });
        }

        let next = current
            .revise(markdown)
            .ok_or_else(|| StoreError::VersionExhausted(slug.clone()))?;
        self.write(slug, &next).await?;
        Ok(next)
    }

    /// Slugs of all stored notes, sorted.
    pub async fn list(&self) -> Result<Vec<Slug>, StoreError> {
        let mut entries = tokio::fs::read_dir(&self.dir)
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?;

        let mut slugs = Vec::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| StoreError::io(&self.dir, e))?
        {
            let name = entry.file_name();
            let Some(stem) = name.to_str().and_then(|n| n.strip_suffix(".json")) else {
                continue;
            };
            if let Ok(slug) = Slug::parse(stem) {
                slugs.push(slug);
            }
        }

        slugs.sort();
        Ok(slugs)
    }

    async fn exists(&self, slug: &Slug) -> Result<bool, StoreError> {
        let path = self.note_path(slug);
        tokio::fs::try_exists(&path)
            .await
            .map_err(|e| StoreError::io(&path, e))
    }

    async fn lock(&self, slug: &Slug) -> OwnedMutexGuard<()> {
        let mutex = self
            .locks
            .entry(slug.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone();
        mutex.lock_owned().await
    }

    async fn write(&self, slug: &Slug, note: &Note) -> Result<(), StoreError> {
        let path = self.note_path(slug);
        // Leading dot keeps the temp file out of `list`.
        let tmp = self.dir.join(format!(".{}.tmp", slug.file_name()));

        let json = serde_json::to_vec_pretty(note).map_err(|source| StoreError::Corrupt {
            path: path.clone(),
            source,
        })?;

        tokio::fs::write(&tmp, &json)
            .await
            .map_err(|e| StoreError::io(&tmp, e))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .map_err(|e| StoreError::io(&path, e))?;

        Ok(())
    }
}
