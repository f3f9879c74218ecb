// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Polling synchronization engine for the messaging screen.
//!
//! The engine keeps two client-side snapshots fresh against a REST
//! backend with no push channel: the conversation list and the open
//! message thread. Snapshots are immutable `Arc<Vec<_>>` values published
//! through watch channels; a tick that changes nothing re-publishes
//! nothing, so the UI layer can skip re-rendering by pointer identity.
//!
//! [`ChatScreen`] is the entry point; the other modules are exported for
//! direct use in tests and embedders that need finer control.

pub mod bootstrap;
pub mod list_poller;
pub mod screen;
pub mod selection;
pub mod send;
pub mod store;
pub mod thread_poller;

pub use bootstrap::BootstrapResolver;
pub use list_poller::ConversationListPoller;
pub use screen::ChatScreen;
pub use selection::SelectionBinder;
pub use send::SendCoordinator;
pub use store::{ConversationStore, MessageStore};
pub use thread_poller::MessageThreadPoller;
