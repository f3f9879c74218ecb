// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Wire types for the backend messaging API.
//!
//! The REST layer speaks camelCase JSON; these DTOs are kept separate from
//! the domain types in `tutorchat-core` and converted at the client boundary.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tutorchat_core::types::{
    ConversationSummary, CounterpartId, Message, Profile, SenderId,
};

/// One conversation row as returned by `GET /conversations`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationDto {
    pub counterpart_id: String,
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub online: bool,
    #[serde(default)]
    pub last_message_preview: String,
    #[serde(default)]
    pub last_message_at: Option<DateTime<Utc>>,
}

impl From<ConversationDto> for ConversationSummary {
    fn from(dto: ConversationDto) -> Self {
        Self {
            counterpart_id: CounterpartId(dto.counterpart_id),
            display_name: dto.display_name,
            avatar_url: dto.avatar_url,
            online: dto.online,
            last_message_preview: dto.last_message_preview,
            last_message_at: dto.last_message_at,
        }
    }
}

/// One message as returned by `GET /conversations/{id}/messages`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageDto {
    pub sender_id: String,
    pub body: String,
    pub sent_at: DateTime<Utc>,
}

impl MessageDto {
    /// Converts into a domain message for the thread with `counterpart`.
    ///
    /// A sender id matching the counterpart maps to
    /// [`SenderId::Counterpart`]; anything else is the local user. Fetched
    /// messages are always confirmed.
    pub fn into_message(self, counterpart: &CounterpartId) -> Message {
        let sender = if self.sender_id == counterpart.0 {
            SenderId::Counterpart(counterpart.clone())
        } else {
            SenderId::LocalUser
        };
        Message::authoritative(sender, self.body, self.sent_at)
    }
}

/// Request body for `POST /conversations/{id}/messages`.
#[derive(Debug, Serialize)]
pub struct SendRequest<'a> {
    pub body: &'a str,
}

/// Response body for `POST /conversations/{id}/messages`.
#[derive(Debug, Deserialize)]
pub struct SendResponse {
    pub success: bool,
}

/// Response body for `GET /profiles/{id}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileDto {
    pub display_name: String,
    #[serde(default)]
    pub avatar_url: Option<String>,
}

impl From<ProfileDto> for Profile {
    fn from(dto: ProfileDto) -> Self {
        Self {
            display_name: dto.display_name,
            avatar_url: dto.avatar_url,
        }
    }
}
