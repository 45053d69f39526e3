// ast.rs — Compiled expression tree and its evaluator.
//
// Evaluation is total: every operand evaluates to a string (absent
// substitution keys become ""), comparisons compare strings, logical
// operators combine booleans. There is no runtime failure path — anything
// that could go wrong was rejected at compile time.

use chime_event::Build;

/// A `build.` field the filter language exposes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field {
    Id,
    ProjectId,
    TriggerId,
    Status,
    LogUrl,
    /// `build.substitutions["KEY"]` — key fixed at compile time.
    Substitution(String),
}

impl Field {
    /// Evaluate this field against a build. Absent values are "".
    pub fn value<'a>(&self, build: &'a Build) -> &'a str {
        match self {
            Field::Id => &build.id,
            Field::ProjectId => &build.project_id,
            Field::TriggerId => build.trigger_id.as_deref().unwrap_or(""),
            Field::Status => build.status.name(),
            Field::LogUrl => &build.log_url,
            Field::Substitution(key) => build.substitution(key),
        }
    }
}

/// One side of a comparison.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operand {
    Field(Field),
    /// String literal, or a status literal canonicalized to its name.
    Literal(String),
}

impl Operand {
    pub fn value<'a>(&'a self, build: &'a Build) -> &'a str {
        match self {
            Operand::Field(field) => field.value(build),
            Operand::Literal(text) => text,
        }
    }
}

/// A boolean expression over one build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
    /// `lhs == rhs`
    Eq(Operand, Operand),
    /// `lhs != rhs`
    Ne(Operand, Operand),
    /// `lhs in [a, b, ...]`
    In(Operand, Vec<Operand>),
    Not(Box<Expr>),
    And(Box<Expr>, Box<Expr>),
    Or(Box<Expr>, Box<Expr>),
}

impl Expr {
    /// Evaluate against a build. Pure and total.
    pub fn eval(&self, build: &Build) -> bool {
        match self {
            Expr::Eq(lhs, rhs) => lhs.value(build) == rhs.value(build),
            Expr::Ne(lhs, rhs) => lhs.value(build) != rhs.value(build),
            Expr::In(lhs, list) => {
                let needle = lhs.value(build);
                list.iter().any(|item| item.value(build) == needle)
            }
            Expr::Not(inner) => !inner.eval(build),
            Expr::And(a, b) => a.eval(build) && b.eval(build),
            Expr::Or(a, b) => a.eval(build) || b.eval(build),
        }
    }
}
