use crate::{
    ast::{Expr, Name},
    pretty,
    seq::Seq,
};

/// One entry of a [`Context`].
///
/// `ty` and `def` are expressed in the scope of the entries below this one;
/// shift them by `index + 1` before using them at the point of lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Binding {
    pub name: Name,
    pub ty: Expr,
    pub def: Option<Expr>,
}

impl Binding {
    pub fn new(name: impl Into<Name>, ty: Expr) -> Self {
        Binding {
            name: name.into(),
            ty,
            def: None,
        }
    }

    pub fn defined(name: impl Into<Name>, ty: Expr, def: Expr) -> Self {
        Binding {
            name: name.into(),
            ty,
            def: Some(def),
        }
    }
}

/// Typing context, newest binding at index 0.
pub type Context = Seq<Binding>;

impl Seq<Binding> {
    pub fn new() -> Self {
        Seq::nil()
    }

    /// Bindings given newest-first, the way `Var` indices count them.
    pub fn from_bindings(bindings: impl IntoIterator<Item = Binding>) -> Self {
        bindings.into_iter().collect()
    }

    /// Enter a `Lam` or `Pi` binder.
    pub fn extend(&self, name: Name, ty: Expr) -> Self {
        self.cons(Binding { name, ty, def: None })
    }

    /// Enter a `Let` binder.
    pub fn define(&self, name: Name, ty: Expr, def: Expr) -> Self {
        self.cons(Binding {
            name,
            ty,
            def: Some(def),
        })
    }
}

impl std::fmt::Display for Seq<Binding> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", pretty::render_context(self))
    }
}
