// notifier.rs — The plugin contract every delivery channel implements.
//
// Lifecycle: exactly one set_up call (the engine guarantees this), then
// any number of send_notification calls. State written during set_up —
// the compiled predicate, fetched credentials — is read-only afterwards,
// which is why send_notification takes &self: concurrent sends share the
// instance without locking.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use chime_config::Config;
use chime_event::Build;
use chime_secrets::SecretStore;

use crate::error::{BindingError, NotifyError, SetUpError};

/// The result of a successful `send_notification`.
///
/// A build the predicate rejects is a success with no side effect — it is
/// distinguished from delivery here, at the API level, not by an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// The message was rendered and dispatched to the channel.
    Delivered,
    /// The predicate rejected the build; nothing was dispatched.
    Filtered,
}

/// A delivery-channel plugin.
#[async_trait]
pub trait Notifier: Send + Sync {
    /// One-time initialization: compile the filter, resolve and fetch every
    /// secret the channel needs, and store only derived, ready-to-use state.
    ///
    /// The engine calls this exactly once, before any event is dispatched.
    /// Any error here is fatal for the notifier instance.
    async fn set_up(
        &mut self,
        token: &CancellationToken,
        config: &Config,
        secrets: &dyn SecretStore,
        bindings: &dyn BindingResolver,
    ) -> Result<(), SetUpError>;

    /// Handle one build event: apply the stored predicate, and if it
    /// passes, render and dispatch a channel message.
    ///
    /// Must be safe to call more than once for the same build (the source
    /// is at-least-once); the worst acceptable effect of a redelivery is a
    /// duplicate outward notification.
    async fn send_notification(
        &self,
        token: &CancellationToken,
        build: &Build,
    ) -> Result<NotifyOutcome, NotifyError>;
}

/// Optional capability: resolve structured template bindings from a build
/// for channels with richer message templating.
///
/// Part of the plugin contract so the engine can hand every notifier the
/// same collaborators; minimal channels simply ignore it.
pub trait BindingResolver: Send + Sync {
    fn resolve(&self, build: &Build) -> Result<HashMap<String, String>, BindingError>;
}

/// Default binding resolver: the build's substitution map, as-is.
#[derive(Debug, Default, Clone, Copy)]
pub struct SubstitutionBindings;

impl BindingResolver for SubstitutionBindings {
    fn resolve(&self, build: &Build) -> Result<HashMap<String, String>, BindingError> {
        Ok(build.substitutions.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chime_event::BuildStatus;

    #[test]
    fn substitution_bindings_mirror_the_map() {
        let mut substitutions = HashMap::new();
        substitutions.insert("BRANCH_NAME".to_string(), "main".to_string());
        let build = Build {
            id: "b-1".to_string(),
            project_id: String::new(),
            status: BuildStatus::Success,
            trigger_id: None,
            substitutions: substitutions.clone(),
            log_url: String::new(),
            create_time: None,
            finish_time: None,
        };

        let bindings = SubstitutionBindings.resolve(&build).unwrap();
        assert_eq!(bindings, substitutions);
    }
}
