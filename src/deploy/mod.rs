//! Deployment lifecycle subsystem, driven by the `notes-ctl` binary.
//!
//! # Data Flow
//! ```text
//! notes-ctl init    → init.rs (.env from template, notes/ dir + owner)
//! notes-ctl up      ┐
//! notes-ctl down    │→ compose.rs (docker compose -f base -f overlay <action>)
//! notes-ctl restart │
//! notes-ctl logs    ┘
//! ```

pub mod compose;
pub mod init;

use std::path::PathBuf;

use crate::lifecycle::StartupError;

pub use compose::{Action, Compose};
pub use init::{init_project, InitReport};

#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("required file {} is missing", .0.display())]
    MissingFile(PathBuf),

    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{command}` exited with {}", .code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}")))]
    CommandFailed { command: String, code: Option<i32> },

    #[error(transparent)]
    NotesDir(#[from] StartupError),
}
