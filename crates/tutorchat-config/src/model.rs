// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration model structs for the Tutorchat messaging engine.
//!
//! All structs use `#[serde(deny_unknown_fields)]` to reject unrecognized
//! config keys at startup.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Top-level Tutorchat configuration.
///
/// Loaded from TOML files following XDG hierarchy, with environment variable
/// overrides. All sections are optional and default to sensible values.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ChatConfig {
    /// Backend messaging API settings.
    #[serde(default)]
    pub api: ApiConfig,

    /// Polling and timeout settings for the sync engine.
    #[serde(default)]
    pub sync: SyncConfig,
}

/// Backend messaging API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ApiConfig {
    /// Base URL of the messaging API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Bearer token attached to every request, if set.
    #[serde(default)]
    pub auth_token: Option<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            auth_token: None,
        }
    }
}

fn default_base_url() -> String {
    "http://localhost:8080/api".to_string()
}

/// Sync engine configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct SyncConfig {
    /// Period of both polling loops, in milliseconds.
    #[serde(default = "default_poll_period_ms")]
    pub poll_period_ms: u64,

    /// Per-fetch timeout, in milliseconds. Defaults to the poll period so at
    /// most one fetch is ever logically in flight per poller.
    #[serde(default)]
    pub fetch_timeout_ms: Option<u64>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_period_ms: default_poll_period_ms(),
            fetch_timeout_ms: None,
        }
    }
}

fn default_poll_period_ms() -> u64 {
    3000
}

impl SyncConfig {
    /// The fixed period of both polling loops.
    pub fn poll_period(&self) -> Duration {
        Duration::from_millis(self.poll_period_ms)
    }

    /// The per-fetch deadline; capped at the poll period unless overridden.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_millis(self.fetch_timeout_ms.unwrap_or(self.poll_period_ms))
    }
}
