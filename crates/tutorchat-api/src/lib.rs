// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST client for the Tutorchat backend messaging API.
//!
//! Implements [`tutorchat_core::MessagingGateway`] over the four endpoints
//! the sync engine consumes: conversation list, message thread, send, and
//! profile lookup.

pub mod client;
pub mod types;

pub use client::MessagingClient;
