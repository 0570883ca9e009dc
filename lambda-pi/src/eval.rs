use std::rc::Rc;

use log::trace;

use crate::{
    ast::Expr,
    error::EvalError,
    seq::Seq,
    stack::{grow, Depth, MAX_DEPTH},
};

/// Runtime values, one slot per binder in scope.
pub type Environment = Seq<Value>;

pub type HostFn = dyn Fn(Value) -> Result<Value, EvalError>;

#[derive(Clone)]
pub enum Value {
    Void,                           // Types and other erased terms
    Int(i64),                       // Host integer
    Pair(Box<Value>, Box<Value>),   // Host tuple
    Closure(Environment, Rc<Expr>), // Shares the body of its `Lam`
    Native(Rc<str>, Rc<HostFn>),
}

impl Value {
    pub fn pair(first: Value, second: Value) -> Self {
        Value::Pair(Box::new(first), Box::new(second))
    }

    /// Wraps a host function. Curried host functions return further natives.
    pub fn native(name: &str, fun: impl Fn(Value) -> Result<Value, EvalError> + 'static) -> Self {
        Value::Native(Rc::from(name), Rc::new(fun))
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn is_void(&self) -> bool {
        matches!(self, Value::Void)
    }

    /// Applies a function value. An absent function yields an absent result.
    pub fn apply(self, arg: Value) -> Result<Value, EvalError> {
        match self {
            Value::Void => Ok(Value::Void),
            Value::Closure(env, body) => eval(&body, &env.cons(arg)),
            Value::Native(name, fun) => {
                trace!("calling host function {}", name);
                fun(arg)
            }
            found @ (Value::Int(_) | Value::Pair(..)) => {
                Err(EvalError::ExpectingAFunction { found })
            }
        }
    }
}

/// Evaluates `expr` without consulting any types.
///
/// `Pi` and `Unknown` have no runtime representation and evaluate to
/// [`Value::Void`]; applying `Void` short-circuits to `Void`. Nesting deeper
/// than [`MAX_DEPTH`] fails with [`EvalError::TooDeep`].
pub fn eval(expr: &Expr, env: &Environment) -> Result<Value, EvalError> {
    let _depth = Depth::enter().ok_or(EvalError::TooDeep { limit: MAX_DEPTH })?;
    grow(|| match expr {
        Expr::App(fun, arg) => {
            let fun = eval(fun, env)?;
            let arg = eval(arg, env)?;
            fun.apply(arg)
        }
        Expr::Lam(_, _, body) => Ok(Value::Closure(env.clone(), body.clone())),
        Expr::Let(_, term, body) => {
            let term = eval(term, env)?;
            eval(body, &env.cons(term))
        }
        Expr::Pi(..) | Expr::Unknown => Ok(Value::Void),
        Expr::Var(index) => env.lookup(*index).cloned().ok_or(EvalError::OutOfBounds {
            index: *index,
            len: env.len(),
        }),
    })
}

/// Closures are equal when they share both the lambda body and the
/// environment; host functions when they are the same allocation.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Void, Value::Void) => true,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Pair(a1, b1), Value::Pair(a2, b2)) => a1 == a2 && b1 == b2,
            (Value::Closure(env1, body1), Value::Closure(env2, body2)) => {
                Rc::ptr_eq(body1, body2) && env1.ptr_eq(env2)
            }
            (Value::Native(_, f1), Value::Native(_, f2)) => Rc::ptr_eq(f1, f2),
            _ => false,
        }
    }
}

impl std::fmt::Debug for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Void => write!(f, "Void"),
            Value::Int(n) => write!(f, "Int({})", n),
            Value::Pair(a, b) => f.debug_tuple("Pair").field(a).field(b).finish(),
            Value::Closure(env, body) => f
                .debug_struct("Closure")
                .field("env_len", &env.len())
                .field("body", body)
                .finish(),
            Value::Native(name, _) => write!(f, "Native({})", name),
        }
    }
}

impl std::fmt::Display for Value {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Value::Void => write!(f, "()"),
            Value::Int(n) => write!(f, "{}", n),
            Value::Pair(a, b) => write!(f, "({}, {})", a, b),
            Value::Closure(_, body) => write!(f, "<closure {}>", body),
            Value::Native(name, _) => write!(f, "<native {}>", name),
        }
    }
}
