//! # chime-secrets
//!
//! Secret resolution for notifier channels, in two failure domains:
//!
//! 1. **Structural** (no I/O): [`find_secret_ref`] reads a secret reference
//!    out of the delivery config; [`resolve_resource_name`] maps it to the
//!    resource locator declared in `spec.secrets`. Both fail fast on
//!    misconfiguration, before any network access.
//! 2. **I/O**: [`SecretStore::get`] fetches the secret's current value.
//!    Provider implementations live outside this workspace; tests and
//!    embedders' smoke setups can use [`MemorySecretStore`].
//!
//! Fetched values are wrapped in [`SecretValue`], which redacts its
//! `Debug`/`Display` output so a secret can't leak through a log line.

pub mod error;
pub mod resolve;
pub mod store;
pub mod value;

pub use error::{SecretError, SecretStoreError};
pub use resolve::{find_secret_ref, resolve_resource_name, ResourceLocator, SecretRef};
pub use store::{MemorySecretStore, SecretStore};
pub use value::SecretValue;
