// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Background refresh of the open message thread.
//!
//! The poller is a small state machine over the selection: each selection
//! value gets its own binding (clear, immediate fetch, then timed polling)
//! and a selection change tears the binding down and starts the next one.
//! A fetch that completes after the selection moved on is stale and must
//! be discarded, so every apply re-checks the live selection first.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{Notify, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use tutorchat_core::traits::MessagingGateway;
use tutorchat_core::types::{CounterpartId, Message};

use crate::store::MessageStore;

enum FetchOutcome {
    Applied,
    /// The selection moved while the fetch was in flight; the result was
    /// discarded and the binding must restart.
    Stale,
}

pub struct MessageThreadPoller {
    gateway: Arc<dyn MessagingGateway>,
    store: MessageStore,
    selection: watch::Receiver<Option<CounterpartId>>,
    /// True only between a selection change and its first completed fetch.
    thread_loading: watch::Sender<bool>,
    period: Duration,
    fetch_timeout: Duration,
    /// Out-of-band refresh requests, e.g. right after a successful send.
    kick: Arc<Notify>,
}

impl MessageThreadPoller {
    pub fn new(
        gateway: Arc<dyn MessagingGateway>,
        store: MessageStore,
        selection: watch::Receiver<Option<CounterpartId>>,
        thread_loading: watch::Sender<bool>,
        period: Duration,
        fetch_timeout: Duration,
        kick: Arc<Notify>,
    ) -> Self {
        Self {
            gateway,
            store,
            selection,
            thread_loading,
            period,
            fetch_timeout,
            kick,
        }
    }

    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    async fn run(mut self, cancel: CancellationToken) {
        loop {
            let selected = self.selection.borrow_and_update().clone();
            let flow = match selected {
                Some(counterpart) => self.poll_binding(&cancel, counterpart).await,
                None => {
                    self.store.clear();
                    self.await_selection(&cancel).await
                }
            };
            if flow.is_break() {
                debug!("message thread poller stopped");
                return;
            }
        }
    }

    async fn await_selection(&mut self, cancel: &CancellationToken) -> ControlFlow<()> {
        tokio::select! {
            _ = cancel.cancelled() => ControlFlow::Break(()),
            changed = self.selection.changed() => match changed {
                Ok(()) => ControlFlow::Continue(()),
                Err(_) => ControlFlow::Break(()),
            },
        }
    }

    /// One selection binding: clear, immediate fetch, then timed polling
    /// until the selection changes or the poller is cancelled.
    async fn poll_binding(
        &mut self,
        cancel: &CancellationToken,
        counterpart: CounterpartId,
    ) -> ControlFlow<()> {
        self.store.clear();
        self.thread_loading.send_replace(true);
        let first = tokio::select! {
            _ = cancel.cancelled() => {
                self.thread_loading.send_replace(false);
                return ControlFlow::Break(());
            }
            outcome = self.fetch_and_apply(&counterpart) => outcome,
        };
        self.thread_loading.send_replace(false);
        if matches!(first, FetchOutcome::Stale) {
            return ControlFlow::Continue(());
        }

        let mut ticker =
            tokio::time::interval_at(Instant::now() + self.period, self.period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            tokio::select! {
                _ = cancel.cancelled() => return ControlFlow::Break(()),
                changed = self.selection.changed() => {
                    return match changed {
                        Ok(()) => ControlFlow::Continue(()),
                        Err(_) => ControlFlow::Break(()),
                    };
                }
                _ = ticker.tick() => {}
                _ = self.kick.notified() => {}
            }
            let outcome = tokio::select! {
                _ = cancel.cancelled() => return ControlFlow::Break(()),
                outcome = self.fetch_and_apply(&counterpart) => outcome,
            };
            if matches!(outcome, FetchOutcome::Stale) {
                return ControlFlow::Continue(());
            }
        }
    }

    async fn fetch_and_apply(&self, counterpart: &CounterpartId) -> FetchOutcome {
        let fetch = self.gateway.fetch_thread(counterpart);
        let result = tokio::time::timeout(self.fetch_timeout, fetch).await;

        // Stale-fetch guard: the selection at completion time must still be
        // the one this fetch was issued for, or the result belongs to a
        // conversation that is no longer open.
        if self.selection.borrow().as_ref() != Some(counterpart) {
            debug!(counterpart = %counterpart, "discarding stale thread fetch");
            return FetchOutcome::Stale;
        }

        match result {
            Ok(Ok(thread)) => self.apply(thread),
            Ok(Err(e)) => {
                warn!(
                    error = %e,
                    counterpart = %counterpart,
                    "thread fetch failed, keeping previous messages"
                );
            }
            Err(_) => {
                warn!(
                    counterpart = %counterpart,
                    timeout_ms = self.fetch_timeout.as_millis() as u64,
                    "thread fetch timed out, keeping previous messages"
                );
            }
        }
        FetchOutcome::Applied
    }

    fn apply(&self, thread: Vec<Message>) {
        // The count comparison alone misses a persisted optimistic send
        // (one extra entry on both sides), so an unconfirmed entry in the
        // held snapshot always forces reconciliation.
        let changed = thread.len() != self.store.len() || self.store.has_unconfirmed();
        if changed {
            self.store.replace(thread);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorchat_test_utils::{fixtures, MockGateway};
    use uuid::Uuid;

    fn id(raw: &str) -> CounterpartId {
        CounterpartId(raw.into())
    }

    struct Fixture {
        gateway: Arc<MockGateway>,
        store: MessageStore,
        selection: watch::Sender<Option<CounterpartId>>,
        kick: Arc<Notify>,
        cancel: CancellationToken,
    }

    fn start(selected: Option<&str>) -> Fixture {
        let gateway = Arc::new(MockGateway::new());
        let store = MessageStore::new();
        let (selection_tx, selection_rx) =
            watch::channel(selected.map(|s| CounterpartId(s.into())));
        let (loading_tx, _loading_rx) = watch::channel(false);
        let kick = Arc::new(Notify::new());
        let cancel = CancellationToken::new();

        MessageThreadPoller::new(
            gateway.clone(),
            store.clone(),
            selection_rx,
            loading_tx,
            Duration::from_secs(3),
            Duration::from_secs(3),
            kick.clone(),
        )
        .spawn(cancel.clone());

        Fixture {
            gateway,
            store,
            selection: selection_tx,
            kick,
            cancel,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn selection_triggers_exactly_one_immediate_fetch() {
        let fx = start(Some("U1"));
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fx.gateway.thread_call_count(&id("U1")).await, 1);

        // No further fetch until a full period has elapsed.
        tokio::time::sleep(Duration::from_millis(2000)).await;
        assert_eq!(fx.gateway.thread_call_count(&id("U1")).await, 1);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(fx.gateway.thread_call_count(&id("U1")).await, 2);
        fx.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn count_change_applies_and_equal_count_does_not() {
        let fx = start(Some("U1"));
        fx.gateway
            .set_thread(&id("U1"), vec![fixtures::their_message("U1", "hi", "2026-03-01T10:00:00Z")])
            .await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fx.store.len(), 1);

        let held = fx.store.snapshot();

        // Same count, edited body: not applied, identity preserved.
        fx.gateway
            .set_thread(&id("U1"), vec![fixtures::their_message("U1", "hi!", "2026-03-01T10:00:00Z")])
            .await;
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert!(Arc::ptr_eq(&held, &fx.store.snapshot()));

        fx.gateway
            .set_thread(
                &id("U1"),
                vec![
                    fixtures::their_message("U1", "hi", "2026-03-01T10:00:00Z"),
                    fixtures::their_message("U1", "there", "2026-03-01T10:01:00Z"),
                ],
            )
            .await;
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(fx.store.len(), 2);
        fx.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn unconfirmed_entry_forces_reconciliation_at_equal_count() {
        let fx = start(Some("U1"));
        fx.gateway
            .set_thread(&id("U1"), vec![fixtures::their_message("U1", "hi", "2026-03-01T10:00:00Z")])
            .await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        // Optimistic entry plus the server persisting it: counts match at
        // two, but the optimistic copy must be superseded.
        fx.store
            .append_local(Message::optimistic("reply".into(), Uuid::new_v4()));
        fx.gateway
            .set_thread(
                &id("U1"),
                vec![
                    fixtures::their_message("U1", "hi", "2026-03-01T10:00:00Z"),
                    fixtures::my_message("reply", "2026-03-01T10:02:00Z"),
                ],
            )
            .await;
        fx.kick.notify_one();
        tokio::time::sleep(Duration::from_millis(10)).await;

        let snapshot = fx.store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.iter().all(|m| m.confirmed));
        assert_eq!(
            snapshot.iter().filter(|m| m.body == "reply").count(),
            1
        );
        fx.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn stale_fetch_for_previous_selection_is_discarded() {
        let fx = start(Some("U1"));
        // Delay shorter than the fetch timeout: the U1 fetch completes
        // normally, after the selection has already moved to U2.
        fx.gateway
            .set_thread_delay(&id("U1"), Duration::from_secs(2))
            .await;
        fx.gateway
            .set_thread(&id("U1"), vec![fixtures::their_message("U1", "old", "2026-03-01T10:00:00Z")])
            .await;
        fx.gateway
            .set_thread(&id("U2"), vec![fixtures::their_message("U2", "new", "2026-03-01T11:00:00Z")])
            .await;

        // Let the U1 fetch get in flight, then switch away.
        tokio::time::sleep(Duration::from_millis(10)).await;
        fx.selection.send(Some(id("U2"))).unwrap();

        tokio::time::sleep(Duration::from_secs(3)).await;
        let snapshot = fx.store.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].body, "new");
        fx.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_selection_empties_the_store_and_stops_fetching() {
        let fx = start(Some("U1"));
        fx.gateway
            .set_thread(&id("U1"), vec![fixtures::their_message("U1", "hi", "2026-03-01T10:00:00Z")])
            .await;
        tokio::time::sleep(Duration::from_millis(10)).await;
        assert_eq!(fx.store.len(), 1);

        fx.selection.send(None).unwrap();
        tokio::time::sleep(Duration::from_secs(7)).await;
        assert!(fx.store.is_empty());
        assert_eq!(fx.gateway.thread_call_count(&id("U1")).await, 1);
        fx.cancel.cancel();
    }

    #[tokio::test(start_paused = true)]
    async fn failed_fetch_keeps_previous_thread() {
        let fx = start(Some("U1"));
        fx.gateway
            .set_thread(&id("U1"), vec![fixtures::their_message("U1", "hi", "2026-03-01T10:00:00Z")])
            .await;
        tokio::time::sleep(Duration::from_millis(10)).await;

        fx.gateway.fail_next_threads(1).await;
        tokio::time::sleep(Duration::from_millis(3500)).await;
        assert_eq!(fx.store.len(), 1);
        assert_eq!(fx.gateway.thread_call_count(&id("U1")).await, 2);
        fx.cancel.cancel();
    }
}
