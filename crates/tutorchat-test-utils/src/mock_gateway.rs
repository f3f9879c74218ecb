// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Mock messaging gateway for deterministic testing.
//!
//! `MockGateway` implements `MessagingGateway` with canned responses,
//! scripted failures, per-counterpart fetch delays (for stale-fetch race
//! tests under paused time), and captured send calls for assertions.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::Mutex;

use tutorchat_core::error::ChatError;
use tutorchat_core::traits::MessagingGateway;
use tutorchat_core::types::{ConversationSummary, CounterpartId, Message, Profile};

/// A scripted messaging gateway for testing.
///
/// Responses are canned per method; failures and delays are injectable.
/// All mutators take `&self` so the mock can be shared behind an `Arc`.
#[derive(Default)]
pub struct MockGateway {
    conversations: Mutex<Vec<ConversationSummary>>,
    threads: Mutex<HashMap<String, Vec<Message>>>,
    profiles: Mutex<HashMap<String, Profile>>,
    /// Remaining scripted list-fetch failures.
    list_failures: Mutex<u32>,
    /// Remaining scripted thread-fetch failures.
    thread_failures: Mutex<u32>,
    /// Scripted outcomes for `send_message`, consumed in order. An empty
    /// queue means success.
    send_results: Mutex<VecDeque<Result<(), String>>>,
    /// Per-counterpart delay applied to `fetch_thread` (deterministic under
    /// paused tokio time).
    thread_delays: Mutex<HashMap<String, Duration>>,
    /// Delay applied to every `send_message` call.
    send_delay: Mutex<Option<Duration>>,
    sent: Mutex<Vec<(CounterpartId, String)>>,
    list_calls: AtomicUsize,
    thread_calls: Mutex<HashMap<String, usize>>,
}

impl MockGateway {
    /// Create a new mock gateway with empty canned responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the canned conversation list.
    pub async fn set_conversations(&self, conversations: Vec<ConversationSummary>) {
        *self.conversations.lock().await = conversations;
    }

    /// Replace the canned thread for one counterpart.
    pub async fn set_thread(&self, counterpart: &CounterpartId, thread: Vec<Message>) {
        self.threads.lock().await.insert(counterpart.0.clone(), thread);
    }

    /// Register a profile for bootstrap lookups. Counterparts without a
    /// registered profile fail the fetch.
    pub async fn set_profile(&self, counterpart: &CounterpartId, profile: Profile) {
        self.profiles.lock().await.insert(counterpart.0.clone(), profile);
    }

    /// Make the next `n` list fetches fail.
    pub async fn fail_next_lists(&self, n: u32) {
        *self.list_failures.lock().await = n;
    }

    /// Make the next `n` thread fetches fail.
    pub async fn fail_next_threads(&self, n: u32) {
        *self.thread_failures.lock().await = n;
    }

    /// Script the outcome of the next send; queued calls are consumed in
    /// order, and an exhausted queue means success.
    pub async fn push_send_result(&self, result: Result<(), String>) {
        self.send_results.lock().await.push_back(result);
    }

    /// Delay every thread fetch for `counterpart` by `delay`.
    pub async fn set_thread_delay(&self, counterpart: &CounterpartId, delay: Duration) {
        self.thread_delays
            .lock()
            .await
            .insert(counterpart.0.clone(), delay);
    }

    /// Delay every send by `delay`.
    pub async fn set_send_delay(&self, delay: Duration) {
        *self.send_delay.lock().await = Some(delay);
    }

    /// All `(counterpart, body)` pairs passed to `send_message`, in call order.
    pub async fn sent_messages(&self) -> Vec<(CounterpartId, String)> {
        self.sent.lock().await.clone()
    }

    /// Number of list fetches issued so far.
    pub fn list_call_count(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    /// Number of thread fetches issued for one counterpart.
    pub async fn thread_call_count(&self, counterpart: &CounterpartId) -> usize {
        self.thread_calls
            .lock()
            .await
            .get(&counterpart.0)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl MessagingGateway for MockGateway {
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, ChatError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);

        let mut failures = self.list_failures.lock().await;
        if *failures > 0 {
            *failures -= 1;
            return Err(ChatError::Api {
                message: "scripted list failure".into(),
                source: None,
            });
        }
        drop(failures);

        Ok(self.conversations.lock().await.clone())
    }

    async fn fetch_thread(
        &self,
        counterpart: &CounterpartId,
    ) -> Result<Vec<Message>, ChatError> {
        *self
            .thread_calls
            .lock()
            .await
            .entry(counterpart.0.clone())
            .or_insert(0) += 1;

        let delay = self.thread_delays.lock().await.get(&counterpart.0).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut failures = self.thread_failures.lock().await;
        if *failures > 0 {
            *failures -= 1;
            return Err(ChatError::Api {
                message: "scripted thread failure".into(),
                source: None,
            });
        }
        drop(failures);

        Ok(self
            .threads
            .lock()
            .await
            .get(&counterpart.0)
            .cloned()
            .unwrap_or_default())
    }

    async fn send_message(
        &self,
        counterpart: &CounterpartId,
        body: &str,
    ) -> Result<(), ChatError> {
        self.sent
            .lock()
            .await
            .push((counterpart.clone(), body.to_string()));

        let delay = *self.send_delay.lock().await;
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.send_results.lock().await.pop_front() {
            Some(Ok(())) | None => Ok(()),
            Some(Err(message)) => Err(ChatError::Api {
                message,
                source: None,
            }),
        }
    }

    async fn fetch_profile(&self, counterpart: &CounterpartId) -> Result<Profile, ChatError> {
        self.profiles
            .lock()
            .await
            .get(&counterpart.0)
            .cloned()
            .ok_or_else(|| ChatError::Api {
                message: format!("no profile for {}", counterpart.0),
                source: None,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[tokio::test]
    async fn canned_conversations_are_returned() {
        let gateway = MockGateway::new();
        gateway
            .set_conversations(vec![fixtures::summary("U1", "Ada", Some("2026-03-01T10:00:00Z"))])
            .await;

        let list = gateway.list_conversations().await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(gateway.list_call_count(), 1);
    }

    #[tokio::test]
    async fn scripted_failures_are_consumed_in_order() {
        let gateway = MockGateway::new();
        gateway.fail_next_lists(1).await;

        assert!(gateway.list_conversations().await.is_err());
        assert!(gateway.list_conversations().await.is_ok());
    }

    #[tokio::test]
    async fn unknown_thread_is_empty() {
        let gateway = MockGateway::new();
        let thread = gateway
            .fetch_thread(&CounterpartId("U404".into()))
            .await
            .unwrap();
        assert!(thread.is_empty());
    }

    #[tokio::test]
    async fn sends_are_captured_with_scripted_outcomes() {
        let gateway = MockGateway::new();
        gateway.push_send_result(Err("down".into())).await;

        let counterpart = CounterpartId("U1".into());
        assert!(gateway.send_message(&counterpart, "hi").await.is_err());
        assert!(gateway.send_message(&counterpart, "there").await.is_ok());

        let sent = gateway.sent_messages().await;
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].1, "hi");
        assert_eq!(sent[1].1, "there");
    }

    #[tokio::test]
    async fn missing_profile_fails() {
        let gateway = MockGateway::new();
        assert!(
            gateway
                .fetch_profile(&CounterpartId("U999".into()))
                .await
                .is_err()
        );
    }
}
