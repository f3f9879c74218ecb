// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration loader using Figment for layered config merging.
//!
//! Supports XDG hierarchy: `./tutorchat.toml` > `~/.config/tutorchat/tutorchat.toml`
//! > `/etc/tutorchat/tutorchat.toml` with environment variable overrides via
//! `TUTORCHAT_` prefix.

#![allow(clippy::result_large_err)] // figment::Error is external and cannot be boxed without wrapper

use std::path::Path;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};

use crate::model::ChatConfig;

/// Load configuration from the standard XDG hierarchy with env var overrides.
///
/// Merge order (later overrides earlier):
/// 1. Compiled defaults
/// 2. `/etc/tutorchat/tutorchat.toml` (system-wide)
/// 3. `~/.config/tutorchat/tutorchat.toml` (user XDG config)
/// 4. `./tutorchat.toml` (local directory)
/// 5. `TUTORCHAT_*` environment variables
pub fn load_config() -> Result<ChatConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ChatConfig::default()))
        .merge(Toml::file("/etc/tutorchat/tutorchat.toml"))
        .merge(Toml::file(
            dirs::config_dir()
                .map(|d| d.join("tutorchat/tutorchat.toml"))
                .unwrap_or_default(),
        ))
        .merge(Toml::file("tutorchat.toml"))
        .merge(env_provider())
        .extract()
}

/// Load configuration from a TOML string only (no XDG lookup, no env).
///
/// Used for testing and explicit config specification.
pub fn load_config_from_str(toml_content: &str) -> Result<ChatConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ChatConfig::default()))
        .merge(Toml::string(toml_content))
        .extract()
}

/// Load configuration from a specific file path with env var overrides.
pub fn load_config_from_path(path: &Path) -> Result<ChatConfig, figment::Error> {
    Figment::new()
        .merge(Serialized::defaults(ChatConfig::default()))
        .merge(Toml::file(path))
        .merge(env_provider())
        .extract()
}

/// Create the environment variable provider using explicit `map()` for
/// section-to-dot mapping.
///
/// Uses `Env::map()` NOT `Env::split("_")` to avoid ambiguity with
/// underscore-containing key names: `TUTORCHAT_SYNC_POLL_PERIOD_MS` must map
/// to `sync.poll_period_ms`, not `sync.poll.period.ms`.
fn env_provider() -> Env {
    Env::prefixed("TUTORCHAT_").map(|key| {
        let key_str = key.as_str();
        let mapped = key_str
            .replacen("api_", "api.", 1)
            .replacen("sync_", "sync.", 1);
        mapped.into()
    })
}
