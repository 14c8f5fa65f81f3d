//! One-time host preparation before the first `up`.

use std::path::Path;

use crate::deploy::DeployError;
use crate::lifecycle::startup::{prepare_notes_dir, Ownership};

pub const ENV_TEMPLATE: &str = ".env.example";
pub const ENV_FILE: &str = ".env";
pub const NOTES_DIR: &str = "notes";

/// uid/gid the container runs as.
pub const CONTAINER_OWNER: (u32, u32) = (1000, 1000);

/// Outcome of [`init_project`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InitReport {
    /// `.env` was copied from the template (false: it already existed).
    pub env_created: bool,
    pub notes_ownership: Ownership,
}

/// Copy `.env.example` to `.env` unless `.env` exists. Returns whether a
/// copy was made.
pub fn init_env_file(project_dir: &Path) -> Result<bool, DeployError> {
    let target = project_dir.join(ENV_FILE);
    if target.exists() {
        return Ok(false);
    }

    let template = project_dir.join(ENV_TEMPLATE);
    if !template.is_file() {
        return Err(DeployError::MissingFile(template));
    }

    std::fs::copy(&template, &target).map_err(|source| DeployError::Io {
        path: target.clone(),
        source,
    })?;
    tracing::info!(path = %target.display(), "Created env file from template");
    Ok(true)
}

/// Prepare the env file and the notes directory mounted into the container.
pub fn init_project(project_dir: &Path, owner: Option<(u32, u32)>) -> Result<InitReport, DeployError> {
    let env_created = init_env_file(project_dir)?;
    let notes_ownership = prepare_notes_dir(&project_dir.join(NOTES_DIR), owner)?;
    Ok(InitReport {
        env_created,
        notes_ownership,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_copied_once() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(ENV_TEMPLATE), "NOTES_ADMIN_KEY=changeme\n").unwrap();

        assert!(init_env_file(dir.path()).unwrap());
        std::fs::write(dir.path().join(ENV_FILE), "NOTES_ADMIN_KEY=edited\n").unwrap();
        assert!(!init_env_file(dir.path()).unwrap());

        let env = std::fs::read_to_string(dir.path().join(ENV_FILE)).unwrap();
        assert_eq!(env, "NOTES_ADMIN_KEY=edited\n");
    }

    #[test]
    fn test_missing_template() {
        let dir = tempfile::tempdir().unwrap();
        let err = init_env_file(dir.path()).unwrap_err();
        assert!(matches!(err, DeployError::MissingFile(_)));
    }

    #[test]
    fn test_init_project_creates_notes_dir() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(ENV_TEMPLATE), "").unwrap();

        let report = init_project(dir.path(), None).unwrap();
        assert!(report.env_created);
        assert_eq!(report.notes_ownership, Ownership::Unmanaged);
        assert!(dir.path().join(NOTES_DIR).is_dir());
    }
}
