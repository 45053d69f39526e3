// store.rs — The SecretStore trait (the only I/O stage of resolution).

use std::collections::HashMap;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::SecretStoreError;
use crate::resolve::ResourceLocator;
use crate::value::SecretValue;

/// An external secret store.
///
/// The one operation that may block on the network. Implementations must
/// honor the cancellation token and return [`SecretStoreError::Cancelled`]
/// promptly rather than hang.
#[async_trait]
pub trait SecretStore: Send + Sync {
    async fn get(
        &self,
        token: &CancellationToken,
        resource: &ResourceLocator,
    ) -> Result<SecretValue, SecretStoreError>;
}

/// Map-backed store for tests and local smoke setups.
#[derive(Debug, Default, Clone)]
pub struct MemorySecretStore {
    entries: HashMap<String, String>,
}

impl MemorySecretStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a secret under the given resource locator.
    pub fn with_secret(
        mut self,
        resource: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.entries.insert(resource.into(), value.into());
        self
    }
}

#[async_trait]
impl SecretStore for MemorySecretStore {
    async fn get(
        &self,
        token: &CancellationToken,
        resource: &ResourceLocator,
    ) -> Result<SecretValue, SecretStoreError> {
        if token.is_cancelled() {
            return Err(SecretStoreError::Cancelled);
        }
        self.entries
            .get(&resource.0)
            .map(SecretValue::new)
            .ok_or_else(|| SecretStoreError::NotFound {
                resource: resource.0.clone(),
            })
    }
}
