// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Common types shared between the gateway, the sync engine, and the UI layer.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identity of the other party in a conversation.
///
/// Unique key within the conversation store: at most one summary per
/// counterpart exists at any time.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CounterpartId(pub String);

impl std::fmt::Display for CounterpartId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One row in the conversation list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationSummary {
    pub counterpart_id: CounterpartId,
    pub display_name: String,
    pub avatar_url: Option<String>,
    /// Best-effort presence reported by the server.
    pub online: bool,
    /// Preview of the most recent message, possibly empty.
    pub last_message_preview: String,
    /// `None` marks a bootstrapped conversation with no messages yet.
    pub last_message_at: Option<DateTime<Utc>>,
}

/// Author of a message within a thread.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum SenderId {
    /// The counterpart of the open conversation.
    Counterpart(CounterpartId),
    /// The local user. Also the reserved sentinel for optimistic entries
    /// that the server has not confirmed yet.
    LocalUser,
}

/// A single message in the open thread.
///
/// Ordering within a thread is by `sent_at` ascending; optimistic entries
/// sit at the tail until an authoritative fetch supersedes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub sender: SenderId,
    pub body: String,
    /// Client-assigned at creation time for optimistic entries.
    pub sent_at: DateTime<Utc>,
    /// False only while an optimistic send is in flight.
    pub confirmed: bool,
    /// Client-generated correlation marker. `Some` only for optimistic
    /// entries, so a failed send rolls back exactly its own entry.
    pub local_id: Option<Uuid>,
}

impl Message {
    /// A server-confirmed message materialized from a thread fetch.
    pub fn authoritative(sender: SenderId, body: String, sent_at: DateTime<Utc>) -> Self {
        Self {
            sender,
            body,
            sent_at,
            confirmed: true,
            local_id: None,
        }
    }

    /// A locally-originated message awaiting server confirmation.
    ///
    /// `sent_at` is client-assigned at creation time; `local_id` is the
    /// caller-generated correlation marker used for rollback.
    pub fn optimistic(body: String, local_id: Uuid) -> Self {
        Self {
            sender: SenderId::LocalUser,
            body,
            sent_at: Utc::now(),
            confirmed: false,
            local_id: Some(local_id),
        }
    }
}

/// Minimal profile used to bootstrap a zero-history conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Profile {
    pub display_name: String,
    pub avatar_url: Option<String>,
}

/// Navigation inputs observed when the messaging screen mounts.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RouteState {
    /// Path-style counterpart id, the entry point from "message this person"
    /// links elsewhere in the app.
    pub route_param: Option<CounterpartId>,
    /// `chatId` query parameter used for deep links and back/forward support.
    pub query_param: Option<CounterpartId>,
}
