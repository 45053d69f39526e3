//! # chime-event
//!
//! The build event model shared by every chime crate.
//!
//! A [`Build`] is an immutable snapshot of a build's state at notification
//! time. It is produced by the upstream build system, delivered to the
//! engine, and consumed read-only — nothing in chime ever mutates one.

pub mod build;

pub use build::{Build, BuildStatus};
