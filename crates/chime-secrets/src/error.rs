// error.rs — Error types for secret resolution.
//
// SecretError covers the structural (no-I/O) stages and is configuration's
// fault; SecretStoreError covers the fetch stage and is the store's fault.
// The engine keeps them apart so startup failures can be alerted on
// correctly, and so only store failures are candidates for retry.

use thiserror::Error;

/// Structural resolution errors — misconfiguration, detected without I/O.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SecretError {
    /// The delivery config has no entry for the requested field.
    #[error("delivery config has no field '{field}'")]
    FieldMissing { field: String },

    /// The delivery field exists but is not a `{{secretRef: <name>}}` value.
    #[error("delivery field '{field}' is not a secret reference")]
    MalformedRef { field: String },

    /// The referenced name has no declaration in `spec.secrets`.
    #[error("no secret declared with name '{name}'")]
    UnknownSecretRef { name: String },
}

/// Secret store access errors — the only I/O failure domain.
#[derive(Debug, Error)]
pub enum SecretStoreError {
    /// The store could not be reached; transient, worth retrying if the
    /// startup policy allows.
    #[error("secret store unavailable: {reason}")]
    Unavailable { reason: String },

    /// The caller is not allowed to read this secret.
    #[error("access denied for secret resource '{resource}'")]
    AccessDenied { resource: String },

    /// No secret exists at the given resource locator.
    #[error("secret resource '{resource}' not found")]
    NotFound { resource: String },

    /// The caller's cancellation token fired during the fetch.
    #[error("secret fetch cancelled")]
    Cancelled,
}
