// error.rs — Error types for filter compilation.
//
// All variants are compile-time errors. Evaluation of a compiled predicate
// cannot fail.

use thiserror::Error;

/// Errors produced while compiling a filter expression.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FilterError {
    /// The source text is not a well-formed expression.
    #[error("filter syntax error at offset {pos}: {message}")]
    Syntax { pos: usize, message: String },

    /// The expression reads a `build.` field this engine does not expose.
    #[error("unknown build field 'build.{name}' in filter")]
    UnknownField { name: String },

    /// A bare identifier is not a known build status literal.
    #[error("unknown status literal '{name}' in filter")]
    UnknownStatus { name: String },
}
