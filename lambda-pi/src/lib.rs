//! Kernel of a small dependently typed lambda calculus over de Bruijn
//! indices: type checking, normalization and evaluation of expression trees.

pub mod ast;
pub mod context;
pub mod error;
pub mod eval;
pub mod normalize;
pub mod pretty;
pub mod seq;
pub mod stack;
pub mod subst;
pub mod typecheck;

pub use ast::{Expr, Name};
pub use context::{Binding, Context};
pub use error::{EvalError, Result, TypeError};
pub use eval::{eval, Environment, Value};
pub use normalize::{reduce, value};
pub use pretty::{show, show_context, Assoc};
pub use stack::MAX_DEPTH;
pub use subst::{instantiate, shift, shift_from, substitute, substitute_at};
pub use typecheck::{is_subexpr, run_type_check, type_check, Derivation};
