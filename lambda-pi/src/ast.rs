use std::hash::{Hash, Hasher};
use std::rc::Rc;

use crate::{context::Context, pretty};

/// Binder name kept for display only.
///
/// Every `Name` compares equal to every other, so the derived equality on
/// [`Expr`] is alpha-equivalence.
#[derive(Debug, Clone)]
pub struct Name(Rc<str>);

impl Name {
    pub fn new(name: &str) -> Self {
        Name(Rc::from(name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl PartialEq for Name {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

impl Eq for Name {}

impl Hash for Name {
    fn hash<H: Hasher>(&self, _state: &mut H) {}
}

impl From<&str> for Name {
    fn from(name: &str) -> Self {
        Name::new(name)
    }
}

impl std::fmt::Display for Name {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Expression tree. Children are shared, so cloning a subtree is O(1).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Expr {
    App(Rc<Expr>, Rc<Expr>),       // Application: f a
    Lam(Name, Rc<Expr>, Rc<Expr>), // Lambda: λ (x : A). b
    Pi(Name, Rc<Expr>, Rc<Expr>),  // Dependent function type: Π (x : A). B
    Let(Name, Rc<Expr>, Rc<Expr>), // Local definition: let x = t in b
    Unknown,                       // Any type: ?
    Var(usize),                    // de Bruijn index
}

impl Expr {
    pub fn var(index: usize) -> Self {
        Expr::Var(index)
    }

    pub fn app(fun: Expr, arg: Expr) -> Self {
        Expr::App(Rc::new(fun), Rc::new(arg))
    }

    /// Left-nested application `fun a₁ a₂ … aₙ`.
    pub fn apps(fun: Expr, args: impl IntoIterator<Item = Expr>) -> Self {
        args.into_iter().fold(fun, Expr::app)
    }

    pub fn lam(name: impl Into<Name>, ty: Expr, body: Expr) -> Self {
        Expr::Lam(name.into(), Rc::new(ty), Rc::new(body))
    }

    pub fn pi(name: impl Into<Name>, domain: Expr, codomain: Expr) -> Self {
        Expr::Pi(name.into(), Rc::new(domain), Rc::new(codomain))
    }

    pub fn let_in(name: impl Into<Name>, term: Expr, body: Expr) -> Self {
        Expr::Let(name.into(), Rc::new(term), Rc::new(body))
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Expr::Unknown)
    }
}

/// Renders against an empty context; free variables print as `#i`.
impl std::fmt::Display for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", pretty::render(self, &Context::new()))
    }
}
