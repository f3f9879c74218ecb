// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Small builders for domain values used across test suites.

use chrono::{DateTime, Utc};
use tutorchat_core::types::{
    ConversationSummary, CounterpartId, Message, Profile, SenderId,
};

/// A conversation summary with the given id, name, and optional RFC 3339
/// last-message timestamp.
pub fn summary(id: &str, name: &str, last_message_at: Option<&str>) -> ConversationSummary {
    ConversationSummary {
        counterpart_id: CounterpartId(id.into()),
        display_name: name.into(),
        avatar_url: None,
        online: false,
        last_message_preview: String::new(),
        last_message_at: last_message_at.map(timestamp),
    }
}

/// A confirmed message from the given counterpart.
pub fn their_message(counterpart: &str, body: &str, sent_at: &str) -> Message {
    Message::authoritative(
        SenderId::Counterpart(CounterpartId(counterpart.into())),
        body.into(),
        timestamp(sent_at),
    )
}

/// A confirmed message from the local user.
pub fn my_message(body: &str, sent_at: &str) -> Message {
    Message::authoritative(SenderId::LocalUser, body.into(), timestamp(sent_at))
}

/// A minimal profile.
pub fn profile(name: &str) -> Profile {
    Profile {
        display_name: name.into(),
        avatar_url: None,
    }
}

/// Parse an RFC 3339 timestamp, panicking on bad test input.
pub fn timestamp(value: &str) -> DateTime<Utc> {
    value
        .parse()
        .unwrap_or_else(|e| panic!("bad test timestamp {value}: {e}"))
}
