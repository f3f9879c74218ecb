// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! The messaging screen facade.
//!
//! `ChatScreen::open` performs the mount sequence (initial list fetch,
//! URL resolution, poller startup) and hands the UI layer a set of watch
//! receivers plus the send and select entry points. Dropping or closing
//! the screen cancels both pollers.

use std::sync::Arc;

use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tutorchat_config::ChatConfig;
use tutorchat_core::error::ChatError;
use tutorchat_core::traits::{MessagingGateway, NavigationAdapter};
use tutorchat_core::types::{ConversationSummary, CounterpartId, Message};

use crate::bootstrap::BootstrapResolver;
use crate::list_poller::ConversationListPoller;
use crate::selection::SelectionBinder;
use crate::send::SendCoordinator;
use crate::store::{ConversationStore, MessageStore};
use crate::thread_poller::MessageThreadPoller;

pub struct ChatScreen {
    conversations: ConversationStore,
    messages: MessageStore,
    binder: SelectionBinder,
    coordinator: SendCoordinator,
    list_loading: watch::Receiver<bool>,
    thread_loading: watch::Receiver<bool>,
    cancel: CancellationToken,
    tasks: Vec<JoinHandle<()>>,
}

impl std::fmt::Debug for ChatScreen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatScreen").finish_non_exhaustive()
    }
}

impl ChatScreen {
    /// Mount the messaging screen.
    ///
    /// Fetches the conversation list once (a transient failure opens the
    /// screen with an empty list; polling recovers it), resolves the
    /// mount-time URL into an initial selection, then starts both pollers.
    ///
    /// The one fatal path is a route target whose bootstrap fails: the
    /// screen cannot honor the link, so `open` returns the error before
    /// any background work starts.
    pub async fn open(
        gateway: Arc<dyn MessagingGateway>,
        navigation: Arc<dyn NavigationAdapter>,
        config: &ChatConfig,
    ) -> Result<Self, ChatError> {
        let period = config.sync.poll_period();
        let fetch_timeout = config.sync.fetch_timeout();

        let conversations = ConversationStore::new();
        let messages = MessageStore::new();
        let binder = SelectionBinder::new(navigation);
        let bootstrap = BootstrapResolver::new(Arc::clone(&gateway));

        let (list_loading_tx, list_loading) = watch::channel(true);
        match tokio::time::timeout(fetch_timeout, gateway.list_conversations()).await {
            Ok(Ok(list)) => {
                conversations.apply_if_changed(list);
            }
            Ok(Err(e)) => {
                warn!(error = %e, "initial conversation list fetch failed, starting empty");
            }
            Err(_) => {
                warn!("initial conversation list fetch timed out, starting empty");
            }
        }
        list_loading_tx.send_replace(false);

        binder.resolve_initial(&conversations, &bootstrap).await?;

        let (thread_loading_tx, thread_loading) = watch::channel(false);
        let thread_kick = Arc::new(Notify::new());
        let list_kick = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        let tasks = vec![
            ConversationListPoller::new(
                Arc::clone(&gateway),
                conversations.clone(),
                binder.subscribe(),
                period,
                fetch_timeout,
                Arc::clone(&list_kick),
            )
            .spawn(cancel.child_token()),
            MessageThreadPoller::new(
                Arc::clone(&gateway),
                messages.clone(),
                binder.subscribe(),
                thread_loading_tx,
                period,
                fetch_timeout,
                Arc::clone(&thread_kick),
            )
            .spawn(cancel.child_token()),
        ];

        let coordinator = SendCoordinator::new(
            gateway,
            messages.clone(),
            binder.subscribe(),
            thread_kick,
            list_kick,
        );

        info!(
            poll_period_ms = period.as_millis() as u64,
            "messaging screen opened"
        );
        Ok(Self {
            conversations,
            messages,
            binder,
            coordinator,
            list_loading,
            thread_loading,
            cancel,
            tasks,
        })
    }

    /// Conversation list snapshots. Unchanged ticks keep the previous
    /// `Arc`, so subscribers can dedupe by pointer identity.
    pub fn conversations(&self) -> watch::Receiver<Arc<Vec<ConversationSummary>>> {
        self.conversations.subscribe()
    }

    /// Open-thread snapshots, including optimistic entries.
    pub fn messages(&self) -> watch::Receiver<Arc<Vec<Message>>> {
        self.messages.subscribe()
    }

    pub fn selection(&self) -> watch::Receiver<Option<CounterpartId>> {
        self.binder.subscribe()
    }

    pub fn current_selection(&self) -> Option<CounterpartId> {
        self.binder.current()
    }

    /// True only during the mount-time list fetch.
    pub fn list_loading(&self) -> watch::Receiver<bool> {
        self.list_loading.clone()
    }

    /// True between a selection change and its first completed thread fetch.
    pub fn thread_loading(&self) -> watch::Receiver<bool> {
        self.thread_loading.clone()
    }

    /// Open a conversation. The URL is updated in place; re-selecting the
    /// open conversation is a no-op.
    pub fn select_conversation(&self, counterpart: CounterpartId) {
        self.binder.select(Some(counterpart));
    }

    /// Return to the empty state, clearing the thread and the URL parameter.
    pub fn clear_selection(&self) {
        self.binder.select(None);
    }

    /// Send `body` to the selected counterpart, optimistically.
    pub async fn send_message(&self, body: &str) -> Result<(), ChatError> {
        self.coordinator.send(body).await
    }

    /// Stop both pollers. Idempotent; in-flight fetches are abandoned.
    pub fn close(&self) {
        self.cancel.cancel();
    }

    /// Await poller shutdown after [`close`](Self::close), for tests and
    /// orderly teardown.
    pub async fn join(&mut self) {
        for task in self.tasks.drain(..) {
            if let Err(e) = task.await {
                warn!(error = %e, "poller task panicked");
            }
        }
    }
}

impl Drop for ChatScreen {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
