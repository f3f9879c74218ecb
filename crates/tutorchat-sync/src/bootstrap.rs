// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bootstrap of conversations that have no message history yet.

use std::sync::Arc;

use tracing::debug;
use tutorchat_core::error::ChatError;
use tutorchat_core::traits::MessagingGateway;
use tutorchat_core::types::{ConversationSummary, CounterpartId, Profile};

/// Resolves a counterpart that is absent from the server's conversation
/// list into a synthetic summary, by fetching their profile.
///
/// This covers "message this person" entry points: the target has never
/// exchanged a message with the local user, so only the profile service
/// knows about them.
pub struct BootstrapResolver {
    gateway: Arc<dyn MessagingGateway>,
}

impl BootstrapResolver {
    pub fn new(gateway: Arc<dyn MessagingGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch `counterpart`'s profile and synthesize a zero-history summary.
    ///
    /// A failed profile fetch means the target cannot be conversed with at
    /// all, so it surfaces as [`ChatError::ConversationUnavailable`] rather
    /// than being swallowed like a transient poll failure.
    pub async fn resolve(
        &self,
        counterpart: &CounterpartId,
    ) -> Result<ConversationSummary, ChatError> {
        let profile = self.gateway.fetch_profile(counterpart).await.map_err(|e| {
            ChatError::ConversationUnavailable {
                counterpart_id: counterpart.0.clone(),
                source: Some(Box::new(e)),
            }
        })?;
        debug!(counterpart = %counterpart, "bootstrapped zero-history conversation");
        Ok(synthesize(counterpart.clone(), profile))
    }
}

fn synthesize(counterpart_id: CounterpartId, profile: Profile) -> ConversationSummary {
    ConversationSummary {
        counterpart_id,
        display_name: profile.display_name,
        avatar_url: profile.avatar_url,
        online: false,
        last_message_preview: String::new(),
        last_message_at: None,
    }
}
