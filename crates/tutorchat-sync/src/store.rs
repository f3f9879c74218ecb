// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Snapshot stores for the conversation list and the open thread.
//!
//! Both stores publish immutable `Arc<Vec<_>>` snapshots through a
//! [`watch`] channel. Subscribers compare snapshots by pointer identity:
//! a snapshot that did not change materially is the same allocation, so
//! downstream layers can skip work on unchanged ticks.

use std::sync::Arc;

use tokio::sync::watch;
use tutorchat_core::types::{ConversationSummary, CounterpartId, Message};
use uuid::Uuid;

/// Holder of the current conversation list snapshot.
///
/// Clones share the underlying channel, so a store handed to the poller
/// and a store held by the screen observe the same state.
#[derive(Clone)]
pub struct ConversationStore {
    tx: watch::Sender<Arc<Vec<ConversationSummary>>>,
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Arc::new(Vec::new()));
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<ConversationSummary>>> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> Arc<Vec<ConversationSummary>> {
        self.tx.borrow().clone()
    }

    pub fn get(&self, counterpart: &CounterpartId) -> Option<ConversationSummary> {
        self.tx
            .borrow()
            .iter()
            .find(|s| &s.counterpart_id == counterpart)
            .cloned()
    }

    pub fn contains(&self, counterpart: &CounterpartId) -> bool {
        self.get(counterpart).is_some()
    }

    /// Publish `candidate` only if it differs materially from the held
    /// snapshot. Returns whether a new snapshot was published.
    ///
    /// Material means the entry count changed, a counterpart appeared or
    /// disappeared, or any counterpart's `last_message_at` moved. Cosmetic
    /// reordering and presence or preview changes alone do not count, so
    /// they never invalidate the snapshot identity.
    pub fn apply_if_changed(&self, candidate: Vec<ConversationSummary>) -> bool {
        let current = self.snapshot();
        if !is_material_change(&current, &candidate) {
            return false;
        }
        self.tx.send_replace(Arc::new(candidate));
        true
    }

    /// Insert `summary` at the front of the list, displacing any existing
    /// entry for the same counterpart. Used when bootstrapping a
    /// conversation that the server list does not carry yet.
    pub fn upsert_front(&self, summary: ConversationSummary) {
        let mut next: Vec<ConversationSummary> = self.snapshot().as_ref().clone();
        next.retain(|s| s.counterpart_id != summary.counterpart_id);
        next.insert(0, summary);
        self.tx.send_replace(Arc::new(next));
    }
}

fn is_material_change(
    current: &[ConversationSummary],
    candidate: &[ConversationSummary],
) -> bool {
    if current.len() != candidate.len() {
        return true;
    }
    candidate.iter().any(|c| {
        match current
            .iter()
            .find(|s| s.counterpart_id == c.counterpart_id)
        {
            Some(held) => held.last_message_at != c.last_message_at,
            None => true,
        }
    })
}

/// Holder of the open thread snapshot.
///
/// Authoritative fetches replace the whole vector; optimistic entries are
/// appended at the tail and removed by correlation id on failed sends.
#[derive(Clone)]
pub struct MessageStore {
    tx: watch::Sender<Arc<Vec<Message>>>,
}

impl Default for MessageStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageStore {
    pub fn new() -> Self {
        let (tx, _) = watch::channel(Arc::new(Vec::new()));
        Self { tx }
    }

    pub fn subscribe(&self) -> watch::Receiver<Arc<Vec<Message>>> {
        self.tx.subscribe()
    }

    pub fn snapshot(&self) -> Arc<Vec<Message>> {
        self.tx.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.tx.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tx.borrow().is_empty()
    }

    pub fn has_unconfirmed(&self) -> bool {
        self.tx.borrow().iter().any(|m| !m.confirmed)
    }

    /// Replace the thread wholesale with an authoritative fetch result.
    pub fn replace(&self, thread: Vec<Message>) {
        self.tx.send_replace(Arc::new(thread));
    }

    pub fn clear(&self) {
        self.tx.send_replace(Arc::new(Vec::new()));
    }

    /// Append an optimistic entry at the tail.
    pub fn append_local(&self, message: Message) {
        let mut next: Vec<Message> = self.snapshot().as_ref().clone();
        next.push(message);
        self.tx.send_replace(Arc::new(next));
    }

    /// Remove the optimistic entry carrying `local_id`. Matching is by
    /// correlation id, never by body, so concurrent sends of identical text
    /// roll back independently. Returns whether an entry was removed.
    pub fn remove_local(&self, local_id: Uuid) -> bool {
        let current = self.snapshot();
        let Some(index) = current.iter().position(|m| m.local_id == Some(local_id)) else {
            return false;
        };
        let mut next = current.as_ref().clone();
        next.remove(index);
        self.tx.send_replace(Arc::new(next));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tutorchat_test_utils::fixtures;

    fn id(raw: &str) -> CounterpartId {
        CounterpartId(raw.into())
    }

    #[test]
    fn apply_publishes_on_count_change() {
        let store = ConversationStore::new();
        assert!(store.apply_if_changed(vec![fixtures::summary("U1", "Ada", None)]));
        assert_eq!(store.snapshot().len(), 1);
    }

    #[test]
    fn unchanged_list_keeps_snapshot_identity() {
        let store = ConversationStore::new();
        let list = vec![
            fixtures::summary("U1", "Ada", Some("2026-03-01T10:00:00Z")),
            fixtures::summary("U2", "Grace", None),
        ];
        store.apply_if_changed(list.clone());

        let before = store.snapshot();
        assert!(!store.apply_if_changed(list));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn presence_and_preview_changes_are_not_material() {
        let store = ConversationStore::new();
        store.apply_if_changed(vec![fixtures::summary(
            "U1",
            "Ada",
            Some("2026-03-01T10:00:00Z"),
        )]);
        let before = store.snapshot();

        let mut cosmetic = fixtures::summary("U1", "Ada", Some("2026-03-01T10:00:00Z"));
        cosmetic.online = true;
        cosmetic.last_message_preview = "new preview".into();
        assert!(!store.apply_if_changed(vec![cosmetic]));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn reorder_alone_is_not_material() {
        let store = ConversationStore::new();
        let a = fixtures::summary("U1", "Ada", Some("2026-03-01T10:00:00Z"));
        let b = fixtures::summary("U2", "Grace", Some("2026-03-01T11:00:00Z"));
        store.apply_if_changed(vec![a.clone(), b.clone()]);

        let before = store.snapshot();
        assert!(!store.apply_if_changed(vec![b, a]));
        assert!(Arc::ptr_eq(&before, &store.snapshot()));
    }

    #[test]
    fn moved_last_message_at_is_material() {
        let store = ConversationStore::new();
        store.apply_if_changed(vec![fixtures::summary(
            "U1",
            "Ada",
            Some("2026-03-01T10:00:00Z"),
        )]);
        assert!(store.apply_if_changed(vec![fixtures::summary(
            "U1",
            "Ada",
            Some("2026-03-01T10:05:00Z"),
        )]));
    }

    #[test]
    fn swapped_counterpart_at_same_count_is_material() {
        let store = ConversationStore::new();
        store.apply_if_changed(vec![fixtures::summary("U1", "Ada", None)]);
        assert!(store.apply_if_changed(vec![fixtures::summary("U2", "Grace", None)]));
    }

    #[test]
    fn upsert_front_prepends_and_deduplicates() {
        let store = ConversationStore::new();
        store.apply_if_changed(vec![
            fixtures::summary("U1", "Ada", None),
            fixtures::summary("U2", "Grace", None),
        ]);

        store.upsert_front(fixtures::summary("U2", "Grace", Some("2026-03-01T10:00:00Z")));
        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot[0].counterpart_id, id("U2"));
        assert!(snapshot[0].last_message_at.is_some());
    }

    #[test]
    fn remove_local_matches_identity_not_content() {
        let store = MessageStore::new();
        let a = Message::optimistic("same text".into(), Uuid::new_v4());
        let b = Message::optimistic("same text".into(), Uuid::new_v4());
        let a_id = a.local_id.unwrap();
        store.append_local(a);
        store.append_local(b.clone());

        assert!(store.remove_local(a_id));
        let snapshot = store.snapshot();
        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot[0].local_id, b.local_id);
        assert!(!store.remove_local(a_id));
    }

    #[test]
    fn replace_supersedes_optimistic_entries() {
        let store = MessageStore::new();
        store.append_local(Message::optimistic("hello".into(), Uuid::new_v4()));
        assert!(store.has_unconfirmed());

        store.replace(vec![fixtures::my_message("hello", "2026-03-01T10:00:00Z")]);
        assert!(!store.has_unconfirmed());
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn clear_empties_the_thread() {
        let store = MessageStore::new();
        store.append_local(Message::optimistic("hi".into(), Uuid::new_v4()));
        store.clear();
        assert!(store.is_empty());
    }
}
