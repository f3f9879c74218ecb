// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Post-deserialization validation for configuration values.
//!
//! Validates semantic constraints that cannot be expressed via serde
//! attributes, such as a well-formed base URL and a non-zero poll period.

use thiserror::Error;

use crate::model::ChatConfig;

/// A semantic configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A value failed post-deserialization validation.
    #[error("invalid configuration: {message}")]
    Validation { message: String },

    /// Figment failed to parse or merge the configuration sources.
    #[error("failed to load configuration: {message}")]
    Load { message: String },
}

/// Validate a deserialized configuration for semantic correctness.
///
/// Returns `Ok(())` if all validations pass, or `Err(Vec<ConfigError>)` with
/// all collected validation errors (does not fail fast).
pub fn validate_config(config: &ChatConfig) -> Result<(), Vec<ConfigError>> {
    let mut errors = Vec::new();

    let base_url = config.api.base_url.trim();
    if base_url.is_empty() {
        errors.push(ConfigError::Validation {
            message: "api.base_url must not be empty".to_string(),
        });
    } else if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        errors.push(ConfigError::Validation {
            message: format!("api.base_url `{base_url}` must start with http:// or https://"),
        });
    }

    if config.sync.poll_period_ms == 0 {
        errors.push(ConfigError::Validation {
            message: "sync.poll_period_ms must be greater than zero".to_string(),
        });
    }

    if let Some(timeout) = config.sync.fetch_timeout_ms {
        if timeout == 0 {
            errors.push(ConfigError::Validation {
                message: "sync.fetch_timeout_ms must be greater than zero".to_string(),
            });
        } else if timeout > config.sync.poll_period_ms {
            // A fetch outliving the poll period would allow overlapping
            // requests; the cap keeps at most one in flight per poller.
            errors.push(ConfigError::Validation {
                message: format!(
                    "sync.fetch_timeout_ms ({timeout}) must not exceed sync.poll_period_ms ({})",
                    config.sync.poll_period_ms
                ),
            });
        }
    }

    if errors.is_empty() { Ok(()) } else { Err(errors) }
}
