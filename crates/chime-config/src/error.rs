// error.rs — Error types for configuration loading and validation.

use thiserror::Error;

/// Errors that can occur while loading or validating a notifier config.
///
/// All of these are fatal at SetUp: a notifier with an invalid config must
/// refuse to start rather than silently drop (or pass) every event.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read.
    #[error("failed to read config file '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The config document is not valid YAML or does not match the schema.
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),

    /// `spec.notification.filter` is empty.
    #[error("spec.notification.filter must not be empty")]
    MissingFilter,

    /// A delivery field names a secret ref with no matching declaration.
    #[error("delivery field '{field}' references secret '{name}' which is not declared in spec.secrets")]
    UnknownSecretRef { field: String, name: String },

    /// Two secret declarations share the same name.
    #[error("secret '{name}' is declared more than once in spec.secrets")]
    DuplicateSecret { name: String },
}
