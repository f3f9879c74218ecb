// SPDX-FileCopyrightText: 2026 Tutorchat Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP client for the backend messaging API.
//!
//! Implements [`MessagingGateway`] over the four REST endpoints: conversation
//! list, message thread, send, and profile. No retry logic lives here: the
//! polling loops are the retry mechanism, so a failed fetch is reported and
//! retried on the next tick.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use tracing::debug;
use tutorchat_config::ApiConfig;
use tutorchat_core::error::ChatError;
use tutorchat_core::traits::MessagingGateway;
use tutorchat_core::types::{ConversationSummary, CounterpartId, Message, Profile};

use crate::types::{ConversationDto, MessageDto, ProfileDto, SendRequest, SendResponse};

/// HTTP client for the messaging API.
///
/// Carries the bearer token (if configured) in default headers and applies
/// the per-fetch timeout from config to every request.
#[derive(Debug, Clone)]
pub struct MessagingClient {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl MessagingClient {
    /// Creates a new messaging API client.
    ///
    /// `fetch_timeout` should be capped at the poll period so a hung request
    /// cannot stall the next tick.
    pub fn new(api: &ApiConfig, fetch_timeout: Duration) -> Result<Self, ChatError> {
        let mut headers = HeaderMap::new();
        headers.insert("accept", HeaderValue::from_static("application/json"));
        if let Some(token) = api.auth_token.as_deref() {
            let value = HeaderValue::from_str(&format!("Bearer {token}"))
                .map_err(|e| ChatError::Config(format!("invalid auth token header: {e}")))?;
            headers.insert("authorization", value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(fetch_timeout)
            .build()
            .map_err(|e| ChatError::Api {
                message: format!("failed to build HTTP client: {e}"),
                source: Some(Box::new(e)),
            })?;

        Ok(Self {
            client,
            base_url: api.base_url.trim_end_matches('/').to_string(),
            timeout: fetch_timeout,
        })
    }

    /// Overrides the base URL (for testing with wiremock).
    pub fn with_base_url(mut self, url: String) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base_url)
    }

    fn map_request_error(&self, e: reqwest::Error) -> ChatError {
        if e.is_timeout() {
            ChatError::Timeout {
                duration: self.timeout,
            }
        } else {
            ChatError::Api {
                message: format!("HTTP request failed: {e}"),
                source: Some(Box::new(e)),
            }
        }
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, ChatError> {
        let response = self
            .client
            .get(self.url(path))
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        debug!(status = %status, path, "response received");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                message: format!("API returned {status}: {body}"),
                source: None,
            });
        }

        response.json::<T>().await.map_err(|e| ChatError::Api {
            message: format!("failed to parse API response: {e}"),
            source: Some(Box::new(e)),
        })
    }
}

#[async_trait]
impl MessagingGateway for MessagingClient {
    async fn list_conversations(&self) -> Result<Vec<ConversationSummary>, ChatError> {
        let dtos: Vec<ConversationDto> = self.get_json("conversations").await?;
        Ok(dtos.into_iter().map(ConversationSummary::from).collect())
    }

    async fn fetch_thread(
        &self,
        counterpart: &CounterpartId,
    ) -> Result<Vec<Message>, ChatError> {
        let path = format!("conversations/{}/messages", counterpart.0);
        let dtos: Vec<MessageDto> = self.get_json(&path).await?;
        Ok(dtos
            .into_iter()
            .map(|dto| dto.into_message(counterpart))
            .collect())
    }

    async fn send_message(
        &self,
        counterpart: &CounterpartId,
        body: &str,
    ) -> Result<(), ChatError> {
        let path = format!("conversations/{}/messages", counterpart.0);
        let response = self
            .client
            .post(self.url(&path))
            .json(&SendRequest { body })
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(ChatError::Api {
                message: format!("API returned {status}: {text}"),
                source: None,
            });
        }

        let result: SendResponse = response.json().await.map_err(|e| ChatError::Api {
            message: format!("failed to parse send response: {e}"),
            source: Some(Box::new(e)),
        })?;

        if !result.success {
            return Err(ChatError::Api {
                message: "server rejected the message".into(),
                source: None,
            });
        }
        Ok(())
    }

    async fn fetch_profile(&self, counterpart: &CounterpartId) -> Result<Profile, ChatError> {
        let path = format!("profiles/{}", counterpart.0);
        let dto: ProfileDto = self.get_json(&path).await?;
        Ok(Profile::from(dto))
    }
}
