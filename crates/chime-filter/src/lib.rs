//! # chime-filter
//!
//! Compiles a configuration-supplied boolean filter expression into an
//! executable [`Predicate`] over a build event.
//!
//! The filter language is a small, side-effect-free expression language:
//!
//! ```text
//! build.status == SUCCESS
//! build.status in [FAILURE, INTERNAL_ERROR, TIMEOUT]
//! build.substitutions["BRANCH_NAME"] == "main" && !(build.status == WORKING)
//! ```
//!
//! Compilation happens once, at notifier SetUp. Everything that can be
//! wrong with a filter — syntax errors, unknown `build.` fields, unknown
//! status literals — is caught then, so a misconfigured filter aborts
//! startup instead of silently passing or dropping every event at runtime.
//! Evaluation is deterministic, total (absent substitution keys evaluate to
//! the empty string) and allocation-light.

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod predicate;

pub use error::FilterError;
pub use predicate::{compile, Predicate};
