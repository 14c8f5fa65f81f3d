//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges and cross-field
//! constraints. All problems are reported together, not just the first.

use std::net::SocketAddr;

use crate::config::schema::NotesConfig;

/// A single semantic problem in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a configuration, returning every violation found.
pub fn validate_config(config: &NotesConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    if let Some(tls) = &config.listener.tls {
        if tls.cert_path.trim().is_empty() {
            errors.push(ValidationError::new("listener.tls.cert_path", "must not be empty"));
        }
        if tls.key_path.trim().is_empty() {
            errors.push(ValidationError::new("listener.tls.key_path", "must not be empty"));
        }
    }

    if config.storage.notes_dir.trim().is_empty() {
        errors.push(ValidationError::new("storage.notes_dir", "must not be empty"));
    }

    if config.storage.max_markdown_chars == 0 {
        errors.push(ValidationError::new("storage.max_markdown_chars", "must be greater than 0"));
    }

    if config.storage.owner_uid.is_some() != config.storage.owner_gid.is_some() {
        errors.push(ValidationError::new(
            "storage.owner_uid",
            "owner_uid and owner_gid must be set together",
        ));
    }

    if config.admin.admin_key.is_empty() {
        errors.push(ValidationError::new("admin.admin_key", "must not be empty"));
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.runtime.workers == 0 {
        errors.push(ValidationError::new("runtime.workers", "must be at least 1"));
    }

    if config.rate_limit.enabled {
        if config.rate_limit.requests_per_second == 0 {
            errors.push(ValidationError::new(
                "rate_limit.requests_per_second",
                "must be greater than 0 when rate limiting is enabled",
            ));
        }
        if config.rate_limit.burst_size == 0 {
            errors.push(ValidationError::new(
                "rate_limit.burst_size",
                "must be greater than 0 when rate limiting is enabled",
            ));
        }
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!("'{}' is not a socket address", config.observability.metrics_address),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::TlsConfig;

    #[test]
    fn test_default_config_is_valid() {
        assert!(validate_config(&NotesConfig::default()).is_ok());
    }

    #[test]
    fn test_collects_all_errors() {
        let mut config = NotesConfig::default();
        config.listener.bind_address = "not-an-address".into();
        config.runtime.workers = 0;
        config.timeouts.request_secs = 0;
        config.admin.admin_key.clear();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "listener.bind_address",
                "admin.admin_key",
                "timeouts.request_secs",
                "runtime.workers",
            ]
        );
    }

    #[test]
    fn test_small_body_limit_is_raised_not_rejected() {
        let mut config = NotesConfig::default();
        config.security.max_body_size = 1024;
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_rate_limit_checked_only_when_enabled() {
        let mut config = NotesConfig::default();
        config.rate_limit.requests_per_second = 0;
        assert!(validate_config(&config).is_ok());

        config.rate_limit.enabled = true;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_tls_paths_required() {
        let mut config = NotesConfig::default();
        config.listener.tls = Some(TlsConfig {
            cert_path: "".into(),
            key_path: "key.pem".into(),
        });
        let errors = validate_config(&config).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "listener.tls.cert_path");
    }

    #[test]
    fn test_owner_ids_come_in_pairs() {
        let mut config = NotesConfig::default();
        config.storage.owner_uid = Some(1000);
        assert!(validate_config(&config).is_err());
        config.storage.owner_gid = Some(1000);
        assert!(validate_config(&config).is_ok());
    }
}
