//! Startup checks.
//!
//! The notes directory is usually a bind mount, so its ownership is whatever
//! the host left behind. Before serving, make sure it exists, try to hand it
//! to the configured owner, and prove it is writable. Failing here is fatal:
//! better to exit at boot than to 500 on the first save.

use std::fs;
use std::path::{Path, PathBuf};

use crate::config::StorageConfig;

const PROBE_FILE: &str = ".write-probe";

#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("cannot create notes directory {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{} is not a directory", .path.display())]
    NotADirectory { path: PathBuf },

    #[error("notes directory {} is not writable: {source}", .path.display())]
    NotWritable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// What [`prepare_notes_dir`] did to the directory owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ownership {
    /// No owner configured.
    Unmanaged,
    /// Already owned by the configured uid/gid.
    AlreadyOwned,
    /// Ownership changed.
    Changed,
    /// chown was refused; the writability probe decides whether that matters.
    Skipped,
}

/// Ensure the notes directory exists, has the configured owner and is writable.
pub fn prepare_notes_dir(
    path: &Path,
    owner: Option<(u32, u32)>,
) -> Result<Ownership, StartupError> {
    fs::create_dir_all(path).map_err(|source| StartupError::Create {
        path: path.to_path_buf(),
        source,
    })?;

    if !path.is_dir() {
        return Err(StartupError::NotADirectory {
            path: path.to_path_buf(),
        });
    }

    let ownership = match owner {
        Some((uid, gid)) => apply_owner(path, uid, gid),
        None => Ownership::Unmanaged,
    };

    probe_writable(path)?;

    tracing::info!(path = %path.display(), ownership = ?ownership, "Notes directory ready");
    Ok(ownership)
}

/// [`prepare_notes_dir`] driven by the storage section of the config.
pub fn prepare_storage(config: &StorageConfig) -> Result<Ownership, StartupError> {
    let owner = config.owner_uid.zip(config.owner_gid);
    prepare_notes_dir(Path::new(&config.notes_dir), owner)
}

#[cfg(unix)]
fn apply_owner(path: &Path, uid: u32, gid: u32) -> Ownership {
    use std::os::unix::fs::MetadataExt;

    if let Ok(meta) = fs::metadata(path) {
        if meta.uid() == uid && meta.gid() == gid {
            return Ownership::AlreadyOwned;
        }
    }

    match std::os::unix::fs::chown(path, Some(uid), Some(gid)) {
        Ok(()) => Ownership::Changed,
        Err(e) => {
            tracing::warn!(
                path = %path.display(),
                uid,
                gid,
                error = %e,
                "Could not change notes directory owner"
            );
            Ownership::Skipped
        }
    }
}

#[cfg(not(unix))]
fn apply_owner(_path: &Path, _uid: u32, _gid: u32) -> Ownership {
    Ownership::Skipped
}

fn probe_writable(path: &Path) -> Result<(), StartupError> {
    let probe = path.join(PROBE_FILE);
    let not_writable = |source| StartupError::NotWritable {
        path: path.to_path_buf(),
        source,
    };
    fs::write(&probe, b"ok").map_err(not_writable)?;
    fs::remove_file(&probe).map_err(not_writable)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creates_nested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let notes = dir.path().join("data").join("notes");
        let ownership = prepare_notes_dir(&notes, None).unwrap();
        assert_eq!(ownership, Ownership::Unmanaged);
        assert!(notes.is_dir());
        assert!(!notes.join(PROBE_FILE).exists());
    }

    #[test]
    fn test_rejects_regular_file() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("notes");
        fs::write(&file, "not a dir").unwrap();
        let err = prepare_notes_dir(&file, None).unwrap_err();
        assert!(matches!(err, StartupError::Create { .. } | StartupError::NotADirectory { .. }));
    }

    #[cfg(unix)]
    #[test]
    fn test_current_owner_is_left_alone() {
        use std::os::unix::fs::MetadataExt;

        let dir = tempfile::tempdir().unwrap();
        let meta = fs::metadata(dir.path()).unwrap();
        let ownership = prepare_notes_dir(dir.path(), Some((meta.uid(), meta.gid()))).unwrap();
        assert_eq!(ownership, Ownership::AlreadyOwned);
    }

    #[test]
    fn test_prepare_storage_uses_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = StorageConfig {
            notes_dir: dir.path().join("n").to_string_lossy().into_owned(),
            ..StorageConfig::default()
        };
        prepare_storage(&config).unwrap();
        assert!(dir.path().join("n").is_dir());
    }
}
