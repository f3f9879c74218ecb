// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration system for the Tutorchat messaging engine.
//!
//! Provides TOML configuration parsing with strict validation
//! (`deny_unknown_fields`), XDG file hierarchy lookup, and environment
//! variable overrides.
//!
//! # Usage
//!
//! ```no_run
//! use tutorchat_config::load_and_validate;
//!
//! let config = load_and_validate().expect("config errors");
//! println!("API base: {}", config.api.base_url);
//! ```

pub mod loader;
pub mod model;
pub mod validation;

pub use loader::{load_config, load_config_from_path, load_config_from_str};
pub use model::{ApiConfig, ChatConfig, SyncConfig};
pub use validation::{ConfigError, validate_config};

/// Load configuration from the XDG hierarchy and validate it.
///
/// Loads config from TOML files + env vars via Figment, then runs
/// post-deserialization validation. Returns either a valid [`ChatConfig`]
/// or the list of collected errors.
pub fn load_and_validate() -> Result<ChatConfig, Vec<ConfigError>> {
    match loader::load_config() {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Load {
            message: err.to_string(),
        }]),
    }
}

/// Load configuration from a TOML string and validate it.
///
/// Useful for testing and explicit configuration.
pub fn load_and_validate_str(toml_content: &str) -> Result<ChatConfig, Vec<ConfigError>> {
    match loader::load_config_from_str(toml_content) {
        Ok(config) => {
            validation::validate_config(&config)?;
            Ok(config)
        }
        Err(err) => Err(vec![ConfigError::Load {
            message: err.to_string(),
        }]),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_toml_passes_validation() {
        let config = load_and_validate_str(
            "[api]\nbase_url = \"https://chat.example.com\"\n",
        )
        .unwrap();
        assert_eq!(config.api.base_url, "https://chat.example.com");
    }

    #[test]
    fn invalid_value_surfaces_validation_error() {
        let errors = load_and_validate_str("[sync]\npoll_period_ms = 0\n").unwrap_err();
        assert!(matches!(errors[0], ConfigError::Validation { .. }));
    }

    #[test]
    fn malformed_toml_surfaces_load_error() {
        let errors = load_and_validate_str("[api\nbase_url = 1\n").unwrap_err();
        assert!(matches!(errors[0], ConfigError::Load { .. }));
    }
}
