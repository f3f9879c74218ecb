// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background refresh of the conversation list.
//!
//! One fetch per tick, awaited before the next tick is considered, so
//! overlapping fetches cannot happen. Failures keep the previous snapshot;
//! the poller itself never dies short of cancellation.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tutorchat_core::traits::MessagingGateway;
use tutorchat_core::types::{ConversationSummary, CounterpartId};

use crate::store::ConversationStore;

pub struct ConversationListPoller {
    gateway: Arc<dyn MessagingGateway>,
    store: ConversationStore,
    selection: watch::Receiver<Option<CounterpartId>>,
    period: Duration,
    fetch_timeout: Duration,
    /// Out-of-band refresh requests, e.g. right after a successful send.
    kick: Arc<Notify>,
}

impl ConversationListPoller {
    pub fn new(
        gateway: Arc<dyn MessagingGateway>,
        store: ConversationStore,
        selection: watch::Receiver<Option<CounterpartId>>,
        period: Duration,
        fetch_timeout: Duration,
        kick: Arc<Notify>,
    ) -> Self {
        Self {
            gateway,
            store,
            selection,
            period,
            fetch_timeout,
            kick,
        }
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    async fn run(self, cancel: CancellationToken) {
        // First tick fires one full period after start; the mount-time
        // fetch already populated the store.
        let mut ticker =
            tokio::time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => {
                    debug!("conversation list poller stopped");
                    return;
                }
                _ = ticker.tick() => {}
                _ = self.kick.notified() => {}
            }
            self.poll_once().await;
        }
    }

    async fn poll_once(&self) {
        let fetch = self.gateway.list_conversations();
        match tokio::time::timeout(self.fetch_timeout, fetch).await {
            Ok(Ok(list)) => self.apply(list),
            Ok(Err(e)) => {
                warn!(error = %e, "conversation list fetch failed, keeping previous snapshot");
            }
            Err(_) => {
                warn!(
                    timeout_ms = self.fetch_timeout.as_millis() as u64,
                    "conversation list fetch timed out, keeping previous snapshot"
                );
            }
        }
    }

    fn apply(&self, mut candidate: Vec<ConversationSummary>) {
        // A bootstrapped conversation has no history, so the server list
        // omits it until the first message lands. Carry the held summary
        // over while it is selected, or it would vanish mid-conversation.
        if let Some(selected) = self.selection.borrow().clone() {
            if !candidate.iter().any(|c| c.counterpart_id == selected) {
                if let Some(held) = self.store.get(&selected) {
                    candidate.insert(0, held);
                }
            }
        }
        if self.store.apply_if_changed(candidate) {
            debug!("conversation list snapshot updated");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorchat_test_utils::{fixtures, MockGateway};

    fn poller(
        gateway: Arc<MockGateway>,
        store: ConversationStore,
        selection: watch::Receiver<Option<CounterpartId>>,
    ) -> (ConversationListPoller, Arc<Notify>) {
        let kick = Arc::new(Notify::new());
        let poller = ConversationListPoller::new(
            gateway,
            store,
            selection,
            Duration::from_secs(3),
            Duration::from_secs(3),
            kick.clone(),
        );
        (poller, kick)
    }

    #[tokio::test(start_paused = true)]
    async fn first_fetch_happens_one_period_after_start() {
        let gateway = Arc::new(MockGateway::new());
        let store = ConversationStore::new();
        let (_tx, selection) = watch::channel(None);
        let (poller, _kick) = poller(gateway.clone(), store, selection);

        let cancel = CancellationToken::new();
        poller.spawn(cancel.clone());

        tokio::time::sleep(Duration::from_millis(2900)).await;
        assert_eq!(gateway.list_call_count(), 0);

        tokio::time::sleep(Duration::from_millis(200)).await;
        assert_eq!(gateway.list_call_count(), 1);
        cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn kick_triggers_an_off_schedule_fetch() {
        let gateway = Arc::new(MockGateway::new());
        let store = ConversationStore::new();
        let (_tx, selection) = watch::channel(None);
        let (poller, kick) = poller(gateway.clone(), store, selection);

        let cancel = CancellationToken::new();
        poller.spawn(cancel.clone());

        tokio::time::sleep(Duration::from_millis(10)).await;
        kick.notify_one();
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(gateway.list_call_count(), 1);
        cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_keeps_previous_snapshot_and_polling_continues() {
        let gateway = Arc::new(MockGateway::new());
        gateway
            .set_conversations(vec![fixtures::summary("U1", "Ada", None)])
            .await;

        let store = ConversationStore::new();
        store.apply_if_changed(vec![fixtures::summary("U1", "Ada", None)]);
        let held = store.snapshot();

        gateway.fail_next_lists(1).await;
        let (_tx, selection) = watch::channel(None);
        let (poller, _kick) = poller(gateway.clone(), store.clone(), selection);

        let cancel = CancellationToken::new();
        poller.spawn(cancel.clone());

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert_eq!(gateway.list_call_count(), 1);
        assert!(Arc::ptr_eq(&held, &store.snapshot()));

        // Next tick succeeds and picks up a changed list.
        gateway
            .set_conversations(vec![
                fixtures::summary("U1", "Ada", None),
                fixtures::summary("U2", "Grace", None),
            ])
            .await;
        tokio::time::sleep(Duration::from_secs(3)).await;
        assert_eq!(store.snapshot().len(), 2);
        cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn selected_bootstrapped_conversation_survives_server_omission() {
        let gateway = Arc::new(MockGateway::new());
        gateway
            .set_conversations(vec![fixtures::summary("U1", "Ada", Some("2026-03-01T10:00:00Z"))])
            .await;

        let store = ConversationStore::new();
        store.upsert_front(fixtures::summary("U999", "Grace", None));
        store.upsert_front(fixtures::summary("U1", "Ada", Some("2026-03-01T10:00:00Z")));

        let (tx, selection) = watch::channel(Some(CounterpartId("U999".into())));
        let (poller, _kick) = poller(gateway.clone(), store.clone(), selection);

        let cancel = CancellationToken::new();
        poller.spawn(cancel.clone());

        tokio::time::sleep(Duration::from_secs(4)).await;
        assert!(store.contains(&CounterpartId("U999".into())));
        drop(tx);
        cancel.cancel();
    }
}
