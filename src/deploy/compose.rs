//! Docker Compose lifecycle commands.
//!
//! Every action is a fixed `docker compose` invocation over the same file
//! list (base file plus production overlay), run from the project directory.

use std::path::{Path, PathBuf};
use std::process::ExitStatus;

use tokio::process::Command;

use crate::deploy::DeployError;

pub const BASE_FILE: &str = "docker-compose.yml";
pub const PRODUCTION_OVERLAY: &str = "docker-compose.prod.yml";

/// One lifecycle action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    /// Build images and start detached.
    Up,
    /// Stop and remove containers.
    Down,
    Restart,
    /// Stream container logs.
    Logs { follow: bool, tail: Option<usize> },
}

impl Action {
    fn args(&self) -> Vec<String> {
        match self {
            Action::Up => vec!["up".into(), "-d".into(), "--build".into()],
            Action::Down => vec!["down".into()],
            Action::Restart => vec!["restart".into()],
            Action::Logs { follow, tail } => {
                let mut args = vec!["logs".to_string()];
                if *follow {
                    args.push("-f".into());
                }
                if let Some(n) = tail {
                    args.push("--tail".into());
                    args.push(n.to_string());
                }
                args
            }
        }
    }
}

/// A compose project: program, files and working directory.
#[derive(Debug, Clone)]
pub struct Compose {
    program: String,
    files: Vec<PathBuf>,
    project_dir: PathBuf,
}

impl Compose {
    /// The production setup: base file plus overlay.
    pub fn production(project_dir: impl Into<PathBuf>) -> Self {
        Self::with_files(
            project_dir,
            vec![PathBuf::from(BASE_FILE), PathBuf::from(PRODUCTION_OVERLAY)],
        )
    }

    pub fn with_files(project_dir: impl Into<PathBuf>, files: Vec<PathBuf>) -> Self {
        Self {
            program: "docker".to_string(),
            files,
            project_dir: project_dir.into(),
        }
    }

    /// Use a different executable (e.g. `podman`).
    pub fn program(mut self, program: impl Into<String>) -> Self {
        self.program = program.into();
        self
    }

    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// Arguments passed to the program for `action`.
    pub fn args(&self, action: &Action) -> Vec<String> {
        let mut args = vec!["compose".to_string()];
        for file in &self.files {
            args.push("-f".into());
            args.push(file.display().to_string());
        }
        args.extend(action.args());
        args
    }

    /// Shell-style rendering for logs and `--dry-run`.
    pub fn command_line(&self, action: &Action) -> String {
        std::iter::once(self.program.clone())
            .chain(self.args(action))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Compose files that do not exist in the project directory.
    pub fn missing_files(&self) -> Vec<PathBuf> {
        self.files
            .iter()
            .map(|f| self.project_dir.join(f))
            .filter(|p| !p.is_file())
            .collect()
    }

    /// Run `action`, inheriting stdio, and fail on a non-zero exit.
    pub async fn run(&self, action: &Action) -> Result<(), DeployError> {
        if let Some(missing) = self.missing_files().into_iter().next() {
            return Err(DeployError::MissingFile(missing));
        }

        let command_line = self.command_line(action);
        tracing::info!(command = %command_line, dir = %self.project_dir.display(), "Running");

        let status = Command::new(&self.program)
            .args(self.args(action))
            .current_dir(&self.project_dir)
            .status()
            .await
            .map_err(|source| DeployError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        check_status(command_line, status)
    }
}

fn check_status(command: String, status: ExitStatus) -> Result<(), DeployError> {
    if status.success() {
        Ok(())
    } else {
        Err(DeployError::CommandFailed {
            command,
            code: status.code(),
        })
    }
}
