// notifier.rs — The Slack channel's Notifier implementation.
//
// SetUp stores only derived, ready-to-use state: the compiled predicate
// and the fetched webhook URL. Both are read-only after SetUp, so
// concurrent sends share the instance freely.

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tracing::info;

use chime_config::Config;
use chime_engine::{BindingResolver, Notifier, NotifyError, NotifyOutcome, SetUpError};
use chime_event::Build;
use chime_filter::Predicate;
use chime_secrets::{find_secret_ref, resolve_resource_name, SecretStore, SecretValue};

use crate::dispatch::{HttpDispatcher, WebhookDispatcher};
use crate::message::write_message;

/// The delivery-config field holding the webhook URL secret reference.
pub const WEBHOOK_URL_SECRET_NAME: &str = "webhookUrl";

struct ReadyState {
    predicate: Predicate,
    webhook_url: SecretValue,
}

/// Slack webhook notifier.
///
/// Generic over the dispatcher so tests can swap the HTTP transport for a
/// recording one without touching the send path.
pub struct SlackNotifier<D: WebhookDispatcher = HttpDispatcher> {
    dispatcher: D,
    state: Option<ReadyState>,
}

impl SlackNotifier<HttpDispatcher> {
    pub fn new() -> Self {
        Self::with_dispatcher(HttpDispatcher::new())
    }
}

impl Default for SlackNotifier<HttpDispatcher> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: WebhookDispatcher> SlackNotifier<D> {
    pub fn with_dispatcher(dispatcher: D) -> Self {
        Self {
            dispatcher,
            state: None,
        }
    }
}

#[async_trait]
impl<D: WebhookDispatcher> Notifier for SlackNotifier<D> {
    async fn set_up(
        &mut self,
        token: &CancellationToken,
        config: &Config,
        secrets: &dyn SecretStore,
        _bindings: &dyn BindingResolver,
    ) -> Result<(), SetUpError> {
        let predicate = chime_filter::compile(&config.spec.notification.filter)?;

        // Structural resolution first: both lookups fail without any
        // network access if the config is broken.
        let secret_ref =
            find_secret_ref(&config.spec.notification.delivery, WEBHOOK_URL_SECRET_NAME)?;
        let resource = resolve_resource_name(&config.spec.secrets, &secret_ref)?;
        let webhook_url = secrets.get(token, &resource).await?;

        self.state = Some(ReadyState {
            predicate,
            webhook_url,
        });
        Ok(())
    }

    async fn send_notification(
        &self,
        token: &CancellationToken,
        build: &Build,
    ) -> Result<NotifyOutcome, NotifyError> {
        let state = self.state.as_ref().ok_or(NotifyError::NotSetUp)?;

        if !state.predicate.apply(build) {
            return Ok(NotifyOutcome::Filtered);
        }

        info!(build_id = %build.id, status = %build.status, "sending Slack webhook");
        let message = write_message(build)?;
        self.dispatcher
            .post(token, state.webhook_url.expose(), &message)
            .await?;
        Ok(NotifyOutcome::Delivered)
    }
}
