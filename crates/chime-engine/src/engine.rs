// engine.rs — The host loop driving one notifier instance.
//
// Startup is explicit Result-based initialization: Engine::start validates
// the config, runs the notifier's single set_up, and only hands back an
// Engine if both succeeded. A failed start yields no Engine at all, so
// send paths on a half-initialized notifier are unrepresentable; the
// process entry point decides whether a startup error is fatal.
//
// Per-event processing is isolated: one undeliverable build is reported
// and the loop moves on. Only transient delivery errors are retried.

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use chime_config::Config;
use chime_event::Build;
use chime_secrets::SecretStore;

use crate::error::{DeliveryError, EngineError, NotifyError, SetUpError, SourceError};
use crate::notifier::{BindingResolver, Notifier, NotifyOutcome};
use crate::retry::RetryPolicy;
use crate::source::EventSource;

/// The notification engine host.
///
/// Holds exactly one ready notifier. Constructing one via [`Engine::start`]
/// is the only way to get an instance, which is what guarantees the
/// single-call set_up semantics of the plugin contract.
pub struct Engine<N: Notifier> {
    notifier: N,
    retry: RetryPolicy,
    run_id: Uuid,
}

impl<N: Notifier> Engine<N> {
    /// Validate the config and run the notifier's one-time set_up.
    ///
    /// Configuration errors (invalid filter, missing secret declaration,
    /// missing delivery field) and secret-store errors both abort startup;
    /// [`SetUpError::is_configuration`] tells them apart for alerting.
    pub async fn start(
        mut notifier: N,
        config: &Config,
        secrets: &dyn SecretStore,
        bindings: &dyn BindingResolver,
        retry: RetryPolicy,
        token: &CancellationToken,
    ) -> Result<Self, SetUpError> {
        config.validate()?;
        notifier.set_up(token, config, secrets, bindings).await?;

        let run_id = Uuid::new_v4();
        info!(
            %run_id,
            filter = %config.spec.notification.filter,
            "notifier set up, engine ready"
        );
        Ok(Self {
            notifier,
            retry,
            run_id,
        })
    }

    /// Process one build: a single send_notification wrapped in the retry
    /// policy. Render errors are per-event fatal and returned immediately;
    /// only retryable delivery errors go through backoff.
    pub async fn process(
        &self,
        token: &CancellationToken,
        build: &Build,
    ) -> Result<NotifyOutcome, NotifyError> {
        let mut attempt: u32 = 0;
        loop {
            match self.notifier.send_notification(token, build).await {
                Ok(outcome) => {
                    debug!(
                        run_id = %self.run_id,
                        build_id = %build.id,
                        status = %build.status,
                        ?outcome,
                        "notification processed"
                    );
                    return Ok(outcome);
                }
                Err(NotifyError::Delivery(err))
                    if err.is_retryable() && attempt < self.retry.max_retries =>
                {
                    let delay = self.retry.delay_for_attempt(attempt);
                    warn!(
                        run_id = %self.run_id,
                        build_id = %build.id,
                        attempt = attempt + 1,
                        max = self.retry.max_retries,
                        delay_ms = delay.as_millis() as u64,
                        error = %err,
                        "delivery failed, retrying after backoff"
                    );
                    tokio::select! {
                        _ = token.cancelled() => {
                            return Err(NotifyError::Delivery(DeliveryError::Cancelled));
                        }
                        _ = tokio::time::sleep(delay) => {}
                    }
                    attempt += 1;
                }
                Err(err) => {
                    error!(
                        run_id = %self.run_id,
                        build_id = %build.id,
                        attempts = attempt + 1,
                        error = %err,
                        "notification failed"
                    );
                    return Err(err);
                }
            }
        }
    }

    /// Drive the receive loop until the source closes or the token fires.
    ///
    /// Failure isolation: an event that exhausts its retries (or fails to
    /// render) is reported and the loop continues with the next event.
    pub async fn run<S: EventSource>(
        &self,
        mut source: S,
        token: &CancellationToken,
    ) -> Result<(), EngineError> {
        loop {
            let build = match source.next(token).await {
                Ok(Some(build)) => build,
                Ok(None) => {
                    info!(run_id = %self.run_id, "event source closed, stopping");
                    return Ok(());
                }
                Err(SourceError::Cancelled) => {
                    info!(run_id = %self.run_id, "cancelled, stopping");
                    return Ok(());
                }
                Err(err) => return Err(err.into()),
            };

            match self.process(token, &build).await {
                Ok(NotifyOutcome::Delivered) => {
                    info!(run_id = %self.run_id, build_id = %build.id, "notification delivered");
                }
                Ok(NotifyOutcome::Filtered) => {
                    debug!(run_id = %self.run_id, build_id = %build.id, "build filtered out");
                }
                Err(err) => {
                    // Reported, never silently dropped; the next event is
                    // unaffected.
                    error!(
                        run_id = %self.run_id,
                        build_id = %build.id,
                        error = %err,
                        "giving up on notification"
                    );
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RenderError;
    use crate::source::ChannelSource;
    use async_trait::async_trait;
    use chime_config::{Notification, SecretDeclaration, Spec};
    use chime_event::BuildStatus;
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    #[derive(Clone, Copy)]
    enum SendScript {
        Deliver,
        Filter,
        RenderFail,
        RejectedByChannel,
        /// Retryable delivery failure for the first N calls, then deliver.
        FlakyDelivery(u32),
    }

    struct ScriptedNotifier {
        script: SendScript,
        set_up_calls: Arc<AtomicU32>,
        send_calls: Arc<AtomicU32>,
    }

    impl ScriptedNotifier {
        fn new(script: SendScript) -> (Self, Arc<AtomicU32>, Arc<AtomicU32>) {
            let set_up_calls = Arc::new(AtomicU32::new(0));
            let send_calls = Arc::new(AtomicU32::new(0));
            (
                Self {
                    script,
                    set_up_calls: set_up_calls.clone(),
                    send_calls: send_calls.clone(),
                },
                set_up_calls,
                send_calls,
            )
        }
    }

    #[async_trait]
    impl Notifier for ScriptedNotifier {
        async fn set_up(
            &mut self,
            _token: &CancellationToken,
            _config: &Config,
            _secrets: &dyn SecretStore,
            _bindings: &dyn BindingResolver,
        ) -> Result<(), SetUpError> {
            self.set_up_calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn send_notification(
            &self,
            _token: &CancellationToken,
            _build: &Build,
        ) -> Result<NotifyOutcome, NotifyError> {
            let call = self.send_calls.fetch_add(1, Ordering::SeqCst);
            match self.script {
                SendScript::Deliver => Ok(NotifyOutcome::Delivered),
                SendScript::Filter => Ok(NotifyOutcome::Filtered),
                SendScript::RenderFail => Err(NotifyError::Render(RenderError::InvalidUrl {
                    url: "not a url".to_string(),
                    reason: "relative URL without a base".to_string(),
                })),
                SendScript::RejectedByChannel => {
                    Err(NotifyError::Delivery(DeliveryError::Status { status: 404 }))
                }
                SendScript::FlakyDelivery(failures) => {
                    if call < failures {
                        Err(NotifyError::Delivery(DeliveryError::Status { status: 503 }))
                    } else {
                        Ok(NotifyOutcome::Delivered)
                    }
                }
            }
        }
    }

    fn valid_config() -> Config {
        let mut delivery = HashMap::new();
        delivery.insert(
            "webhookUrl".to_string(),
            serde_json::json!({"secretRef": "webhook-url"}),
        );
        Config {
            api_version: "chime/v1".to_string(),
            kind: "TestNotifier".to_string(),
            metadata: None,
            spec: Spec {
                notification: Notification {
                    filter: "build.status == SUCCESS".to_string(),
                    delivery,
                },
                secrets: vec![SecretDeclaration {
                    name: "webhook-url".to_string(),
                    resource: "memory/hook".to_string(),
                }],
            },
        }
    }

    fn build(id: &str) -> Build {
        Build {
            id: id.to_string(),
            project_id: "proj".to_string(),
            status: BuildStatus::Success,
            trigger_id: None,
            substitutions: HashMap::new(),
            log_url: "https://ci.example.com/b".to_string(),
            create_time: None,
            finish_time: None,
        }
    }

    fn fast_retry(max_retries: u32) -> RetryPolicy {
        RetryPolicy {
            max_retries,
            base_delay: Duration::from_millis(1),
            max_delay: Duration::from_millis(10),
            jitter: false,
        }
    }

    async fn started_engine(
        script: SendScript,
        retry: RetryPolicy,
    ) -> (Engine<ScriptedNotifier>, Arc<AtomicU32>) {
        let (notifier, _, send_calls) = ScriptedNotifier::new(script);
        let store = chime_secrets::MemorySecretStore::new().with_secret("memory/hook", "value");
        let engine = Engine::start(
            notifier,
            &valid_config(),
            &store,
            &crate::notifier::SubstitutionBindings,
            retry,
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        (engine, send_calls)
    }

    #[tokio::test]
    async fn start_validates_config_before_set_up() {
        let mut config = valid_config();
        config.spec.secrets.clear(); // delivery now references an undeclared secret

        let (notifier, set_up_calls, _) = ScriptedNotifier::new(SendScript::Deliver);
        let store = chime_secrets::MemorySecretStore::new();
        let result = Engine::start(
            notifier,
            &config,
            &store,
            &crate::notifier::SubstitutionBindings,
            fast_retry(0),
            &CancellationToken::new(),
        )
        .await;

        assert!(matches!(result, Err(SetUpError::Config(_))));
        assert_eq!(set_up_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn start_calls_set_up_exactly_once() {
        let (notifier, set_up_calls, _) = ScriptedNotifier::new(SendScript::Deliver);
        let store = chime_secrets::MemorySecretStore::new();
        Engine::start(
            notifier,
            &valid_config(),
            &store,
            &crate::notifier::SubstitutionBindings,
            fast_retry(0),
            &CancellationToken::new(),
        )
        .await
        .unwrap();
        assert_eq!(set_up_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn process_retries_transient_delivery_failures() {
        let (engine, send_calls) =
            started_engine(SendScript::FlakyDelivery(2), fast_retry(3)).await;
        let outcome = engine
            .process(&CancellationToken::new(), &build("b-1"))
            .await
            .unwrap();
        assert_eq!(outcome, NotifyOutcome::Delivered);
        // 2 failures + 1 success
        assert_eq!(send_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn process_exhausts_retries_and_reports() {
        let (engine, send_calls) =
            started_engine(SendScript::FlakyDelivery(u32::MAX), fast_retry(2)).await;
        let result = engine.process(&CancellationToken::new(), &build("b-1")).await;
        assert!(matches!(result, Err(NotifyError::Delivery(_))));
        // initial attempt + 2 retries
        assert_eq!(send_calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn render_errors_are_not_retried() {
        let (engine, send_calls) = started_engine(SendScript::RenderFail, fast_retry(5)).await;
        let result = engine.process(&CancellationToken::new(), &build("b-1")).await;
        assert!(matches!(result, Err(NotifyError::Render(_))));
        assert_eq!(send_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn non_retryable_delivery_errors_are_not_retried() {
        let (engine, send_calls) =
            started_engine(SendScript::RejectedByChannel, fast_retry(5)).await;
        let result = engine.process(&CancellationToken::new(), &build("b-1")).await;
        assert!(matches!(
            result,
            Err(NotifyError::Delivery(DeliveryError::Status { status: 404 }))
        ));
        assert_eq!(send_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn filtered_outcome_is_success_without_retry() {
        let (engine, send_calls) = started_engine(SendScript::Filter, fast_retry(5)).await;
        let outcome = engine
            .process(&CancellationToken::new(), &build("b-1"))
            .await
            .unwrap();
        assert_eq!(outcome, NotifyOutcome::Filtered);
        assert_eq!(send_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn cancellation_interrupts_backoff() {
        let (notifier, _, send_calls) = ScriptedNotifier::new(SendScript::FlakyDelivery(u32::MAX));
        let store = chime_secrets::MemorySecretStore::new().with_secret("memory/hook", "value");
        let engine = Engine::start(
            notifier,
            &valid_config(),
            &store,
            &crate::notifier::SubstitutionBindings,
            RetryPolicy {
                max_retries: 5,
                base_delay: Duration::from_secs(60),
                max_delay: Duration::from_secs(60),
                jitter: false,
            },
            &CancellationToken::new(),
        )
        .await
        .unwrap();

        let token = CancellationToken::new();
        token.cancel();
        let result = engine.process(&token, &build("b-1")).await;
        assert!(matches!(
            result,
            Err(NotifyError::Delivery(DeliveryError::Cancelled))
        ));
        assert_eq!(send_calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn run_processes_all_events_until_source_closes() {
        let (engine, send_calls) = started_engine(SendScript::Deliver, fast_retry(0)).await;
        let (tx, source) = ChannelSource::channel(4);
        let token = CancellationToken::new();

        tx.send(build("b-1")).await.unwrap();
        tx.send(build("b-2")).await.unwrap();
        drop(tx);

        engine.run(source, &token).await.unwrap();
        assert_eq!(send_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn run_isolates_per_event_failures() {
        // Every send fails to render, but the loop still drains the source.
        let (engine, send_calls) = started_engine(SendScript::RenderFail, fast_retry(0)).await;
        let (tx, source) = ChannelSource::channel(4);

        tx.send(build("b-1")).await.unwrap();
        tx.send(build("b-2")).await.unwrap();
        drop(tx);

        engine.run(source, &CancellationToken::new()).await.unwrap();
        assert_eq!(send_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn run_stops_cleanly_on_cancellation() {
        let (engine, _) = started_engine(SendScript::Deliver, fast_retry(0)).await;
        let (_tx, source) = ChannelSource::channel(1);
        let token = CancellationToken::new();
        token.cancel();

        engine.run(source, &token).await.unwrap();
    }

    #[tokio::test]
    async fn redelivery_of_same_build_is_two_independent_attempts() {
        let (engine, send_calls) = started_engine(SendScript::Deliver, fast_retry(0)).await;
        let token = CancellationToken::new();
        let event = build("b-1");

        let first = engine.process(&token, &event).await.unwrap();
        let second = engine.process(&token, &event).await.unwrap();
        assert_eq!(first, NotifyOutcome::Delivered);
        assert_eq!(second, NotifyOutcome::Delivered);
        assert_eq!(send_calls.load(Ordering::SeqCst), 2);
    }
}
