// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Messaging gateway trait for the backend API boundary.

use async_trait::async_trait;

use crate::error::ChatError;
use crate::types::{ConversationSummary, CounterpartId, Message, Profile};

/// Adapter for the backend messaging API.
///
/// The sync engine is written against this trait; production code uses the
/// REST client, tests use a scripted mock.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Fetches all conversation summaries for the authenticated user.
    ///
    /// Order is not significant; the store keys entries by counterpart id.
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, ChatError>;

    /// Fetches the full message thread with one counterpart, ordered by
    /// `sent_at` ascending.
    async fn fetch_thread(&self, counterpart: &CounterpartId)
    -> Result<Vec<Message>, ChatError>;

    /// Sends a message to the counterpart.
    async fn send_message(&self, counterpart: &CounterpartId, body: &str)
    -> Result<(), ChatError>;

    /// Fetches the minimal profile used to bootstrap a zero-history
    /// conversation.
    async fn fetch_profile(&self, counterpart: &CounterpartId) -> Result<Profile, ChatError>;
}
