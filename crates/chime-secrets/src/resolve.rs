// resolve.rs — Structural secret-ref resolution (no I/O).
//
// Two lookups mirror the two ways a config can be wrong before the store
// is ever contacted: the delivery field can be missing/malformed, or the
// referenced declaration can be absent. Keeping these separate from the
// fetch lets SetUp report configuration errors without network access and
// lets the engine retry only the I/O stage.

use chime_config::config::secret_ref_name;
use chime_config::{DeliveryConfig, SecretDeclaration};

use crate::error::SecretError;

/// Symbolic name pointing into `spec.secrets`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SecretRef(pub String);

impl std::fmt::Display for SecretRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque locator understood by a secret store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceLocator(pub String);

impl std::fmt::Display for ResourceLocator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Read the secret reference stored under `delivery[field]`.
pub fn find_secret_ref(
    delivery: &DeliveryConfig,
    field: &str,
) -> Result<SecretRef, SecretError> {
    let value = delivery.get(field).ok_or_else(|| SecretError::FieldMissing {
        field: field.to_string(),
    })?;
    match secret_ref_name(value) {
        Some(name) => Ok(SecretRef(name.to_string())),
        None => Err(SecretError::MalformedRef {
            field: field.to_string(),
        }),
    }
}

/// Map a secret reference to the resource locator declared for it.
pub fn resolve_resource_name(
    secrets: &[SecretDeclaration],
    secret_ref: &SecretRef,
) -> Result<ResourceLocator, SecretError> {
    secrets
        .iter()
        .find(|declaration| declaration.name == secret_ref.0)
        .map(|declaration| ResourceLocator(declaration.resource.clone()))
        .ok_or_else(|| SecretError::UnknownSecretRef {
            name: secret_ref.0.clone(),
        })
}
