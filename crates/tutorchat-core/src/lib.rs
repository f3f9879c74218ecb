// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Tutorchat messaging engine.
//!
//! Provides the shared domain types, the error type, and the adapter traits
//! at the engine's two external seams: the backend messaging API and the
//! host's routing layer.

pub mod error;
pub mod traits;
pub mod types;

// Re-export key items at crate root for ergonomic imports.
pub use error::ChatError;
pub use traits::{MessagingGateway, NavigationAdapter};
pub use types::{
    ConversationSummary, CounterpartId, Message, Profile, RouteState, SenderId,
};
