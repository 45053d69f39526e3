// predicate.rs — The compiled, executable form of a filter.
//
// A Predicate is owned by the notifier instance that compiled it, set once
// during SetUp and read-only afterwards, so it can be applied from
// concurrent sends without locking.

use chime_event::Build;

use crate::ast::Expr;
use crate::error::FilterError;
use crate::parser::parse;

/// A compiled filter expression.
#[derive(Debug, Clone)]
pub struct Predicate {
    source: String,
    expr: Expr,
}

impl Predicate {
    /// The original filter source text (for log messages).
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Apply the predicate to a build.
    ///
    /// Deterministic, side-effect free and total: a well-typed build can
    /// never make this fail.
    pub fn apply(&self, build: &Build) -> bool {
        self.expr.eval(build)
    }
}

/// Compile filter source text into a [`Predicate`].
///
/// This is the only entry point that can fail. Syntax errors, unknown
/// `build.` fields and unknown status literals are all reported here, at
/// notifier SetUp time.
pub fn compile(source: &str) -> Result<Predicate, FilterError> {
    let expr = parse(source)?;
    Ok(Predicate {
        source: source.to_string(),
        expr,
    })
}
