//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Base URL must be absolute http(s) with no trailing slash
//! - Timeouts must be non-zero
//! - Transport must be able to speak the base URL's scheme
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ProbeConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::{ProbeConfig, TransportKind};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a config value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Dotted path of the offending field (e.g., "client.base_url").
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

/// Validate a parsed config, collecting every error.
pub fn validate_config(config: &ProbeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    validate_base_url(config, &mut errors);

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError::new("timeouts.connect_secs", "must be greater than 0"));
    }
    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::new(
            "observability.log_level",
            format!(
                "unknown level '{}', expected one of {}",
                config.observability.log_level,
                LOG_LEVELS.join(", ")
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn validate_base_url(config: &ProbeConfig, errors: &mut Vec<ValidationError>) {
    let base_url = &config.client.base_url;

    let url = match Url::parse(base_url) {
        Ok(url) => url,
        Err(e) => {
            errors.push(ValidationError::new(
                "client.base_url",
                format!("'{}' is not an absolute URL: {}", base_url, e),
            ));
            return;
        }
    };

    match url.scheme() {
        "http" => {}
        "https" if config.client.transport == TransportKind::Hyper => {
            errors.push(ValidationError::new(
                "client.base_url",
                "the hyper transport only supports http:// base URLs",
            ));
        }
        "https" => {}
        other => {
            errors.push(ValidationError::new(
                "client.base_url",
                format!("unsupported scheme '{}', expected http or https", other),
            ));
        }
    }

    if base_url.ends_with('/') {
        errors.push(ValidationError::new(
            "client.base_url",
            "must not end with '/'; probe paths already start with one",
        ));
    }
    if url.query().is_some() || url.fragment().is_some() {
        errors.push(ValidationError::new(
            "client.base_url",
            "must not carry a query string or fragment",
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_with_base(base_url: &str) -> ProbeConfig {
        let mut config = ProbeConfig::default();
        config.client.base_url = base_url.to_string();
        config
    }

    #[test]
    fn default_config_is_valid() {
        assert!(validate_config(&ProbeConfig::default()).is_ok());
    }

    #[test]
    fn accepts_base_with_path_prefix() {
        assert!(validate_config(&config_with_base("http://127.0.0.1:8080/status")).is_ok());
    }

    #[test]
    fn rejects_trailing_slash() {
        let errors = validate_config(&config_with_base("https://httpstat.example/")).unwrap_err();
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].field, "client.base_url");
    }

    #[test]
    fn rejects_relative_url() {
        let errors = validate_config(&config_with_base("/200")).unwrap_err();
        assert_eq!(errors[0].field, "client.base_url");
    }

    #[test]
    fn rejects_non_http_scheme() {
        let errors = validate_config(&config_with_base("ftp://httpstat.example")).unwrap_err();
        assert!(errors[0].message.contains("ftp"));
    }

    #[test]
    fn hyper_transport_requires_plain_http() {
        let mut config = config_with_base("https://httpstat.example");
        config.client.transport = TransportKind::Hyper;
        assert!(validate_config(&config).is_err());

        config.client.base_url = "http://httpstat.example".to_string();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn collects_all_errors() {
        let mut config = config_with_base("https://httpstat.example/");
        config.timeouts.connect_secs = 0;
        config.timeouts.request_secs = 0;
        config.observability.log_level = "loud".to_string();

        let errors = validate_config(&config).unwrap_err();
        let fields: Vec<_> = errors.iter().map(|e| e.field).collect();
        assert_eq!(
            fields,
            vec![
                "client.base_url",
                "timeouts.connect_secs",
                "timeouts.request_secs",
                "observability.log_level",
            ]
        );
    }
}
