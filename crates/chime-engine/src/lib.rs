//! # chime-engine
//!
//! The generic notification engine: the contract every delivery-channel
//! plugin satisfies, and the host loop that drives one plugin instance.
//!
//! ## Key components
//!
//! - [`Notifier`] — the plugin contract: one `set_up` (compile filter,
//!   fetch secrets), then `send_notification` per build event
//! - [`BindingResolver`] — optional capability for structured template
//!   bindings, part of the contract but unused by minimal channels
//! - [`EventSource`] — at-least-once supply of build events
//! - [`Engine`] — the host: single `set_up` call, per-event dispatch with
//!   retry/backoff, failure isolation between events
//! - [`RetryPolicy`] — exponential backoff with cap and jitter
//! - [`add_utm_params`] — pure URL annotation for outbound log links
//!
//! The engine holds exactly one notifier instance per process; channel
//! selection happens at build/deploy time, not at runtime.

pub mod engine;
pub mod error;
pub mod notifier;
pub mod retry;
pub mod source;
pub mod utm;

pub use engine::Engine;
pub use error::{
    BindingError, DeliveryError, EngineError, NotifyError, RenderError, SetUpError, SourceError,
};
pub use notifier::{BindingResolver, Notifier, NotifyOutcome, SubstitutionBindings};
pub use retry::RetryPolicy;
pub use source::{ChannelSource, EventSource};
pub use utm::{add_utm_params, UtmMedium};
