// error.rs — Error taxonomy for the notification engine.
//
// The split mirrors the failure domains:
//
//   SetUpError      — fatal at startup; Config/Filter/Secret variants are
//                     misconfiguration, SecretStore is store trouble. Kept
//                     apart so alerting can tell them apart.
//   RenderError     — per-event fatal; deterministic, so never retried.
//   DeliveryError   — transport trouble; retryable per the backoff policy.
//   SourceError     — the upstream subscription failed.
//
// Filtered-out is NOT an error; it is NotifyOutcome::Filtered.

use thiserror::Error;

use chime_config::ConfigError;
use chime_filter::FilterError;
use chime_secrets::{SecretError, SecretStoreError};

/// Errors from a notifier's one-time `set_up`.
#[derive(Debug, Error)]
pub enum SetUpError {
    /// The config document itself is invalid.
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// The filter expression failed to compile.
    #[error("invalid filter: {0}")]
    Filter(#[from] FilterError),

    /// A secret reference could not be resolved structurally.
    #[error("secret resolution failed: {0}")]
    Secret(#[from] SecretError),

    /// The secret store could not produce a credential.
    #[error("secret fetch failed: {0}")]
    SecretStore(#[from] SecretStoreError),
}

impl SetUpError {
    /// True for misconfiguration (not retryable, fix the config); false for
    /// secret-store trouble (retryable if the startup policy allows).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            SetUpError::Config(_) | SetUpError::Filter(_) | SetUpError::Secret(_)
        )
    }
}

/// Errors while rendering a channel message from a build.
///
/// Rendering is deterministic, so these are never retried: the event is
/// reported as undeliverable instead.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The build's log URL could not be parsed for annotation.
    #[error("invalid log URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Channel-specific template rendering failed.
    #[error("message rendering failed: {reason}")]
    Template { reason: String },
}

/// Errors while dispatching a rendered message to the delivery channel.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// The transport failed before a response was received.
    #[error("transport error posting to delivery channel: {reason}")]
    Transport { reason: String, retryable: bool },

    /// The channel answered with a non-success status code.
    #[error("delivery channel returned HTTP status {status}")]
    Status { status: u16 },

    /// The caller's cancellation token fired during dispatch.
    #[error("dispatch cancelled")]
    Cancelled,
}

impl DeliveryError {
    /// Whether the engine's backoff policy should retry this failure.
    ///
    /// 5xx and 429 responses are transient server-side conditions; other
    /// statuses mean the request itself is wrong and a retry cannot help.
    pub fn is_retryable(&self) -> bool {
        match self {
            DeliveryError::Transport { retryable, .. } => *retryable,
            DeliveryError::Status { status } => *status >= 500 || *status == 429,
            DeliveryError::Cancelled => false,
        }
    }
}

/// Errors from one `send_notification` call.
#[derive(Debug, Error)]
pub enum NotifyError {
    /// The message could not be rendered; per-event fatal.
    #[error(transparent)]
    Render(#[from] RenderError),

    /// The message could not be delivered; retryable per policy.
    #[error(transparent)]
    Delivery(#[from] DeliveryError),

    /// `send_notification` was called before a successful `set_up`. The
    /// engine's construction rules make this unreachable; it exists so
    /// direct trait users get an error instead of a panic.
    #[error("notifier is not set up")]
    NotSetUp,
}

/// Errors from resolving structured template bindings.
#[derive(Debug, Error)]
#[error("failed to resolve binding '{name}': {reason}")]
pub struct BindingError {
    pub name: String,
    pub reason: String,
}

/// Errors from the upstream event source.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Receiving the next event failed.
    #[error("event source failed: {reason}")]
    Receive { reason: String },

    /// The caller's cancellation token fired while waiting.
    #[error("event source cancelled")]
    Cancelled,
}

/// Errors from the engine's receive loop.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Source(#[from] SourceError),
}
