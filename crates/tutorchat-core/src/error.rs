// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Tutorchat messaging engine.

use thiserror::Error;

/// The primary error type used across the messaging gateway and sync engine.
#[derive(Debug, Error)]
pub enum ChatError {
    /// Configuration errors (invalid TOML, missing required fields, bad values).
    #[error("configuration error: {0}")]
    Config(String),

    /// Backend API errors (connection failure, bad status, malformed body).
    #[error("api error: {message}")]
    Api {
        message: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A fetch exceeded its deadline.
    #[error("operation timed out after {duration:?}")]
    Timeout { duration: std::time::Duration },

    /// Bootstrap failed: the counterpart's profile could not be fetched, so
    /// no conversation can be synthesized or selected.
    #[error("conversation unavailable for counterpart {counterpart_id}")]
    ConversationUnavailable {
        counterpart_id: String,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// A send was attempted with no conversation selected.
    #[error("no conversation selected")]
    NoSelection,

    /// A send was attempted with an empty (or whitespace-only) body.
    #[error("message body is empty")]
    EmptyMessage,

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}
