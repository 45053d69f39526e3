//! # chime-config
//!
//! Declarative configuration for one notifier instance.
//!
//! A config is a YAML document describing which builds are notable
//! (`spec.notification.filter`), where notifications go
//! (`spec.notification.delivery`), and which secrets the channel needs
//! (`spec.secrets`). Validation is purely structural — no I/O — so a broken
//! config is reported before any secret store or network is touched.

pub mod config;
pub mod error;

pub use config::{Config, DeliveryConfig, Metadata, Notification, SecretDeclaration, Spec};
pub use error::ConfigError;
