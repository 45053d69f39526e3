//! # chime-channel-slack
//!
//! The Slack webhook delivery channel: a thin renderer and dispatcher
//! plugged into the generic notification engine.
//!
//! This crate is deliberately small — it exists to satisfy the
//! [`chime_engine::Notifier`] contract for one concrete channel. SetUp
//! compiles the configured filter and fetches the webhook URL secret;
//! each send applies the predicate, renders a status-colored attachment
//! message, and posts it to the webhook.

pub mod dispatch;
pub mod message;
pub mod notifier;

pub use dispatch::{HttpDispatcher, RecordingDispatcher, WebhookDispatcher};
pub use message::{write_message, Attachment, AttachmentAction, WebhookMessage};
pub use notifier::{SlackNotifier, WEBHOOK_URL_SECRET_NAME};
