// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Selection state and its two-way binding to the URL.
//!
//! The URL mirrors the selection but never drives it after mount: route
//! and query parameters are read exactly once, when the screen resolves
//! its initial state, and every later URL write goes through
//! `replace_query` so browser history stays clean.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tracing::{debug, warn};
use tutorchat_core::error::ChatError;
use tutorchat_core::traits::NavigationAdapter;
use tutorchat_core::types::CounterpartId;

use crate::bootstrap::BootstrapResolver;
use crate::store::ConversationStore;

/// Owner of the current selection, published through a watch channel.
pub struct SelectionBinder {
    navigation: Arc<dyn NavigationAdapter>,
    tx: watch::Sender<Option<CounterpartId>>,
    /// The deep-link query parameter is consumed at most once per mount.
    deep_link_consumed: AtomicBool,
}

impl SelectionBinder {
    pub fn new(navigation: Arc<dyn NavigationAdapter>) -> Self {
        let (tx, _) = watch::channel(None);
        Self {
            navigation,
            tx,
            deep_link_consumed: AtomicBool::new(false),
        }
    }

    pub fn subscribe(&self) -> watch::Receiver<Option<CounterpartId>> {
        self.tx.subscribe()
    }

    pub fn current(&self) -> Option<CounterpartId> {
        self.tx.borrow().clone()
    }

    /// Change the selection and mirror it into the URL.
    ///
    /// No-op when the selection is unchanged, so repeated clicks on the
    /// already-open conversation neither re-notify the pollers nor touch
    /// the URL.
    pub fn select(&self, selection: Option<CounterpartId>) {
        let changed = self.tx.send_if_modified(|current| {
            if *current == selection {
                return false;
            }
            *current = selection.clone();
            true
        });
        if changed {
            self.navigation.replace_query(selection.as_ref());
        }
    }

    /// Resolve the initial selection from the mount-time URL.
    ///
    /// Precedence: a `chatId` query parameter naming a known conversation
    /// wins; otherwise a route-style counterpart segment is honored,
    /// bootstrapping the conversation when the list does not carry it.
    /// Selecting mirrors the target back into the query form of the URL,
    /// which also drops the route segment.
    ///
    /// Bootstrap failure is the one fatal path here: the link targeted a
    /// counterpart nobody can resolve.
    pub async fn resolve_initial(
        &self,
        conversations: &ConversationStore,
        bootstrap: &BootstrapResolver,
    ) -> Result<(), ChatError> {
        let route = self.navigation.route();

        if !self.deep_link_consumed.swap(true, Ordering::SeqCst) {
            if let Some(target) = route.query_param.clone() {
                if conversations.contains(&target) {
                    debug!(counterpart = %target, "selection restored from deep link");
                    self.select(Some(target));
                    return Ok(());
                }
                warn!(counterpart = %target, "deep link targets an unknown conversation");
            }
        }

        if let Some(target) = route.route_param.clone() {
            if !conversations.contains(&target) {
                let summary = bootstrap.resolve(&target).await?;
                conversations.upsert_front(summary);
            }
            self.select(Some(target));
        }
        Ok(())
    }
}
