//! Configuration loading from disk and environment.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::config::schema::{LogFormat, NotesConfig};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {var}: '{value}'")]
    Env { var: &'static str, value: String },

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<NotesConfig, ConfigError> {
    let config = read_file(path)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Build the effective configuration: optional file, then `NOTES_*`
/// environment overrides, then validation.
pub fn load(path: Option<&Path>) -> Result<NotesConfig, ConfigError> {
    load_with_env(path, |name| std::env::var(name).ok())
}

/// Same as [`load`], with an injectable environment lookup.
pub fn load_with_env<F>(path: Option<&Path>, env: F) -> Result<NotesConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = match path {
        Some(path) => read_file(path)?,
        None => NotesConfig::default(),
    };
    apply_env_overrides(&mut config, env)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

fn read_file(path: &Path) -> Result<NotesConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(toml::from_str(&content)?)
}

/// Apply `NOTES_*` variables on top of `config`.
pub fn apply_env_overrides<F>(config: &mut NotesConfig, env: F) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(v) = env("NOTES_ADMIN_KEY") {
        config.admin.admin_key = v;
    }
    if let Some(v) = env("NOTES_DIR") {
        config.storage.notes_dir = v;
    }
    if let Some(v) = env("NOTES_BIND_ADDRESS") {
        config.listener.bind_address = v;
    }
    if let Some(v) = env("NOTES_LOG_LEVEL") {
        config.observability.log_level = v;
    }
    if let Some(v) = env("NOTES_LOG_FORMAT") {
        config.observability.log_format = match v.to_ascii_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            "json" => LogFormat::Json,
            _ => return Err(ConfigError::Env { var: "NOTES_LOG_FORMAT", value: v }),
        };
    }

    parse_var(&env, "NOTES_WORKERS", &mut config.runtime.workers)?;
    parse_var(&env, "NOTES_REQUEST_TIMEOUT_SECS", &mut config.timeouts.request_secs)?;
    parse_var(&env, "NOTES_MAX_MARKDOWN_CHARS", &mut config.storage.max_markdown_chars)?;
    parse_var(&env, "NOTES_RATE_LIMIT_ENABLED", &mut config.rate_limit.enabled)?;
    parse_var(&env, "NOTES_TRUST_FORWARDED_FOR", &mut config.security.trust_forwarded_for)?;
    parse_var(&env, "NOTES_METRICS_ENABLED", &mut config.observability.metrics_enabled)?;

    let mut uid = None;
    let mut gid = None;
    parse_var(&env, "NOTES_OWNER_UID", &mut uid)?;
    parse_var(&env, "NOTES_OWNER_GID", &mut gid)?;
    if uid.is_some() {
        config.storage.owner_uid = uid;
    }
    if gid.is_some() {
        config.storage.owner_gid = gid;
    }

    Ok(())
}

trait EnvValue: Sized {
    fn parse_env(raw: &str) -> Option<Self>;
}

macro_rules! env_value_via_from_str {
    ($($t:ty),*) => {
        $(impl EnvValue for $t {
            fn parse_env(raw: &str) -> Option<Self> {
                <$t>::from_str(raw.trim()).ok()
            }
        })*
    };
}

env_value_via_from_str!(u32, u64, usize);

impl EnvValue for bool {
    fn parse_env(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" | "on" => Some(true),
            "0" | "false" | "no" | "off" => Some(false),
            _ => None,
        }
    }
}

impl<T: EnvValue> EnvValue for Option<T> {
    fn parse_env(raw: &str) -> Option<Self> {
        T::parse_env(raw).map(Some)
    }
}

fn parse_var<F, T>(env: &F, var: &'static str, slot: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: EnvValue,
{
    if let Some(raw) = env(var) {
        *slot = T::parse_env(&raw).ok_or(ConfigError::Env { var, value: raw })?;
    }
    Ok(())
}
