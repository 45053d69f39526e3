// config.rs — Notifier configuration model.
//
// The YAML shape mirrors the upstream notifier config documents:
//
//   apiVersion: chime/v1
//   kind: SlackNotifier
//   metadata:
//     name: example
//   spec:
//     notification:
//       filter: build.status == SUCCESS
//       delivery:
//         webhookUrl:
//           secretRef: webhook-url
//     secrets:
//       - name: webhook-url
//         resource: projects/example/secrets/slack-webhook/versions/latest
//
// Delivery is channel-specific and therefore loosely typed: a map from
// field name to an arbitrary value. A value of the form
// `{secretRef: <name>}` marks a reference into `spec.secrets`; everything
// else is an opaque delivery setting the channel interprets itself.

use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// The delivery map key that marks a value as a secret reference.
pub const SECRET_REF_KEY: &str = "secretRef";

/// Channel-specific delivery descriptor.
pub type DeliveryConfig = HashMap<String, serde_json::Value>;

/// Top-level notifier configuration document.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Schema version, e.g. "chime/v1".
    pub api_version: String,

    /// The notifier kind this config is for, e.g. "SlackNotifier".
    pub kind: String,

    /// Optional instance metadata.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Metadata>,

    /// The notifier spec proper.
    pub spec: Spec,
}

/// Instance metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Metadata {
    /// Human-chosen name for this notifier instance.
    pub name: String,
}

/// The `spec` block: notification behavior plus declared secrets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Spec {
    /// What to notify about and where to deliver it.
    pub notification: Notification,

    /// Secrets the channel may reference from `notification.delivery`.
    #[serde(default)]
    pub secrets: Vec<SecretDeclaration>,
}

/// The `spec.notification` block.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    /// Filter expression source text; compiled once at SetUp.
    pub filter: String,

    /// Channel-specific delivery descriptor.
    #[serde(default)]
    pub delivery: DeliveryConfig,
}

/// One declared secret: a symbolic name mapped to an opaque resource
/// locator in an external secret store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretDeclaration {
    /// Symbolic name, referenced from delivery via `secretRef`.
    pub name: String,

    /// Opaque locator understood by the secret store.
    pub resource: String,
}

impl Config {
    /// Parse a config from YAML text. Does not validate — call
    /// [`Config::validate`] before handing the config to a notifier.
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    /// Read and parse a config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// Structurally validate the config. No I/O.
    ///
    /// Checks:
    /// - the filter source is non-empty
    /// - secret declaration names are unique
    /// - every `secretRef` in delivery resolves to a declaration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.spec.notification.filter.trim().is_empty() {
            return Err(ConfigError::MissingFilter);
        }

        let mut declared = HashSet::new();
        for secret in &self.spec.secrets {
            if !declared.insert(secret.name.as_str()) {
                return Err(ConfigError::DuplicateSecret {
                    name: secret.name.clone(),
                });
            }
        }

        for (field, value) in &self.spec.notification.delivery {
            if let Some(name) = secret_ref_name(value) {
                if !declared.contains(name) {
                    return Err(ConfigError::UnknownSecretRef {
                        field: field.clone(),
                        name: name.to_string(),
                    });
                }
            }
        }

        Ok(())
    }
}

/// If `value` is a `{secretRef: <name>}` map, return the referenced name.
pub fn secret_ref_name(value: &serde_json::Value) -> Option<&str> {
    value.get(SECRET_REF_KEY).and_then(serde_json::Value::as_str)
}
