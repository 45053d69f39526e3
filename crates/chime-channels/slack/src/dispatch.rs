// dispatch.rs — Webhook transport behind a trait.
//
// The Notifier owns rendering and filtering; the dispatcher owns moving
// bytes. Splitting them keeps the send path testable without a network
// (RecordingDispatcher) and keeps retryability classification in one
// place.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use chime_engine::DeliveryError;

use crate::message::WebhookMessage;

/// Posts a rendered message to a Slack webhook URL.
#[async_trait]
pub trait WebhookDispatcher: Send + Sync {
    async fn post(
        &self,
        token: &CancellationToken,
        webhook_url: &str,
        message: &WebhookMessage,
    ) -> Result<(), DeliveryError>;
}

/// Production dispatcher over reqwest.
#[derive(Debug, Clone, Default)]
pub struct HttpDispatcher {
    client: reqwest::Client,
}

impl HttpDispatcher {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Classify a reqwest error as retryable or not.
///
/// Connect, timeout, request and body errors are transient; builder and
/// redirect errors mean the request itself is wrong.
fn is_retryable(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout() || err.is_request() || err.is_body() || err.is_decode()
}

#[async_trait]
impl WebhookDispatcher for HttpDispatcher {
    async fn post(
        &self,
        token: &CancellationToken,
        webhook_url: &str,
        message: &WebhookMessage,
    ) -> Result<(), DeliveryError> {
        let request = self.client.post(webhook_url).json(message).send();
        let response = tokio::select! {
            _ = token.cancelled() => return Err(DeliveryError::Cancelled),
            result = request => result.map_err(|err| DeliveryError::Transport {
                reason: err.to_string(),
                retryable: is_retryable(&err),
            })?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(DeliveryError::Status {
                status: status.as_u16(),
            });
        }
        Ok(())
    }
}

/// Test collaborator: records every post instead of sending it.
#[derive(Debug, Clone, Default)]
pub struct RecordingDispatcher {
    posts: Arc<Mutex<Vec<(String, WebhookMessage)>>>,
}

impl RecordingDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything posted so far, in order.
    pub fn recorded(&self) -> Vec<(String, WebhookMessage)> {
        self.posts.lock().expect("dispatcher lock poisoned").clone()
    }
}

#[async_trait]
impl WebhookDispatcher for RecordingDispatcher {
    async fn post(
        &self,
        token: &CancellationToken,
        webhook_url: &str,
        message: &WebhookMessage,
    ) -> Result<(), DeliveryError> {
        if token.is_cancelled() {
            return Err(DeliveryError::Cancelled);
        }
        self.posts
            .lock()
            .expect("dispatcher lock poisoned")
            .push((webhook_url.to_string(), message.clone()));
        Ok(())
    }
}
