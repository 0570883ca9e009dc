use thiserror::Error;

use crate::{
    ast::Expr,
    context::Context,
    eval::Value,
    pretty::{render, render_context},
};

pub type Result<T> = std::result::Result<T, TypeError>;

/// Failure of a type check, a normalization or a strict render.
///
/// Each variant carries the context at the failure point, and the message
/// prints that context before the diagnostic.
#[derive(Debug, Clone, Error)]
pub enum TypeError {
    #[error("\n{}Out of bounds: {index}", render_context(.ctx))]
    OutOfBounds { index: usize, ctx: Context },

    #[error(
        "\n{}Expecting a type, found {} : {}",
        render_context(.ctx),
        render(.found, .ctx),
        render(.found_type, .ctx)
    )]
    ExpectingAType {
        found: Expr,
        found_type: Expr,
        ctx: Context,
    },

    #[error(
        "\n{}Expecting a function, found {} : {}",
        render_context(.ctx),
        render(.found, .ctx),
        render(.found_type, .ctx)
    )]
    ExpectingAFunction {
        found: Expr,
        found_type: Expr,
        ctx: Context,
    },

    #[error(
        "\n{}Expecting a {}, found {} : {}",
        render_context(.ctx),
        render(.expected, .ctx),
        render(.found, .ctx),
        render(.found_type, .ctx)
    )]
    ArgumentTypeMismatch {
        expected: Expr,
        found: Expr,
        found_type: Expr,
        ctx: Context,
    },

    /// Raised by the normalizer when an application head is neither a lambda
    /// nor a stuck variable. Checked terms never reach it.
    #[error("\n{}Expecting a lambda, found {}", render_context(.ctx), render(.found, .ctx))]
    ExpectingALambda { found: Expr, ctx: Context },

    #[error("Recursion limit exceeded: more than {limit} nested steps")]
    TooDeep { limit: usize },
}

#[derive(Debug, Clone, Error)]
pub enum EvalError {
    #[error("Out of bounds: {index} (environment holds {len} values)")]
    OutOfBounds { index: usize, len: usize },

    #[error("Expecting a function, found {found}")]
    ExpectingAFunction { found: Value },

    #[error("Expecting {expected}, found {found}")]
    UnexpectedValue { expected: &'static str, found: Value },

    #[error("Recursion limit exceeded: more than {limit} nested steps")]
    TooDeep { limit: usize },
}
