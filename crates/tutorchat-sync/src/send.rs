// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Optimistic message sending.
//!
//! The message appears in the thread before the server acknowledges it.
//! On success, both pollers are kicked so the authoritative copies replace
//! the optimistic entry and the list preview catches up. On failure, the
//! entry is removed by correlation id, which keeps concurrent sends of
//! identical text independent.

use std::sync::Arc;

use tokio::sync::{Notify, watch};
use tracing::{debug, warn};
use tutorchat_core::error::ChatError;
use tutorchat_core::traits::MessagingGateway;
use tutorchat_core::types::{CounterpartId, Message};
use uuid::Uuid;

use crate::store::MessageStore;

pub struct SendCoordinator {
    gateway: Arc<dyn MessagingGateway>,
    messages: MessageStore,
    selection: watch::Receiver<Option<CounterpartId>>,
    thread_kick: Arc<Notify>,
    list_kick: Arc<Notify>,
}

impl SendCoordinator {
    pub fn new(
        gateway: Arc<dyn MessagingGateway>,
        messages: MessageStore,
        selection: watch::Receiver<Option<CounterpartId>>,
        thread_kick: Arc<Notify>,
        list_kick: Arc<Notify>,
    ) -> Self {
        Self {
            gateway,
            messages,
            selection,
            thread_kick,
            list_kick,
        }
    }

    /// Send `body` to the selected counterpart.
    ///
    /// The body is trimmed first; a whitespace-only body is rejected before
    /// anything is appended. On failure the optimistic entry is rolled back
    /// and the error is returned for the UI to surface.
    pub async fn send(&self, body: &str) -> Result<(), ChatError> {
        let body = body.trim();
        if body.is_empty() {
            return Err(ChatError::EmptyMessage);
        }
        let Some(counterpart) = self.selection.borrow().clone() else {
            return Err(ChatError::NoSelection);
        };

        let local_id = Uuid::new_v4();
        self.messages
            .append_local(Message::optimistic(body.to_string(), local_id));

        match self.gateway.send_message(&counterpart, body).await {
            Ok(()) => {
                debug!(counterpart = %counterpart, "message accepted, requesting refetch");
                self.thread_kick.notify_one();
                self.list_kick.notify_one();
                Ok(())
            }
            Err(e) => {
                // The entry may already have been superseded by an
                // authoritative refetch; rolling back is then a no-op.
                if !self.messages.remove_local(local_id) {
                    debug!(%local_id, "optimistic entry already superseded");
                }
                warn!(error = %e, counterpart = %counterpart, "send failed, rolled back");
                Err(e)
            }
        }
    }
}
