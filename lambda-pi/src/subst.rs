use std::rc::Rc;

use crate::{ast::Expr, stack::grow};

/// Adds `n` to every free variable of `expr`.
pub fn shift(expr: &Expr, n: isize) -> Expr {
    shift_from(expr, n, 0)
}

/// Adds `n` to every variable of `expr` whose index is at least `cutoff`,
/// raising the cutoff under each binder.
///
/// `n` may be negative; an index that would drop below zero saturates at zero
/// instead, and callers never rely on that case.
pub fn shift_from(expr: &Expr, n: isize, cutoff: usize) -> Expr {
    if n == 0 {
        return expr.clone();
    }
    grow(|| match expr {
        Expr::App(fun, arg) => Expr::App(
            Rc::new(shift_from(fun, n, cutoff)),
            Rc::new(shift_from(arg, n, cutoff)),
        ),
        Expr::Lam(name, ty, body) => Expr::Lam(
            name.clone(),
            Rc::new(shift_from(ty, n, cutoff)),
            Rc::new(shift_from(body, n, cutoff + 1)),
        ),
        Expr::Pi(name, domain, codomain) => Expr::Pi(
            name.clone(),
            Rc::new(shift_from(domain, n, cutoff)),
            Rc::new(shift_from(codomain, n, cutoff + 1)),
        ),
        Expr::Let(name, term, body) => Expr::Let(
            name.clone(),
            Rc::new(shift_from(term, n, cutoff)),
            Rc::new(shift_from(body, n, cutoff + 1)),
        ),
        Expr::Unknown => Expr::Unknown,
        Expr::Var(index) if *index < cutoff => Expr::Var(*index),
        Expr::Var(index) => Expr::Var(index.saturating_add_signed(n)),
    })
}

/// Replaces `Var(0)` in `expr` with `val`.
pub fn substitute(expr: &Expr, val: &Expr) -> Expr {
    substitute_at(expr, val, 0)
}

/// Replaces `Var(i)` in `expr` with `val`. Under a binder the target index
/// grows by one and `val` is shifted up by one, so its free variables keep
/// pointing at the same binders.
pub fn substitute_at(expr: &Expr, val: &Expr, i: usize) -> Expr {
    grow(|| match expr {
        Expr::App(fun, arg) => Expr::App(
            Rc::new(substitute_at(fun, val, i)),
            Rc::new(substitute_at(arg, val, i)),
        ),
        Expr::Lam(name, ty, body) => Expr::Lam(
            name.clone(),
            Rc::new(substitute_at(ty, val, i)),
            Rc::new(substitute_at(body, &shift(val, 1), i + 1)),
        ),
        Expr::Pi(name, domain, codomain) => Expr::Pi(
            name.clone(),
            Rc::new(substitute_at(domain, val, i)),
            Rc::new(substitute_at(codomain, &shift(val, 1), i + 1)),
        ),
        Expr::Let(name, term, body) => Expr::Let(
            name.clone(),
            Rc::new(substitute_at(term, val, i)),
            Rc::new(substitute_at(body, &shift(val, 1), i + 1)),
        ),
        Expr::Var(index) if *index == i => val.clone(),
        Expr::Var(_) | Expr::Unknown => expr.clone(),
    })
}

/// Eliminates the binder of `body` by plugging in `arg`.
///
/// Same result as shifting `arg` in, substituting it for `Var(0)` and shifting
/// the result back out, in one pass. `arg` is only shifted where the bound
/// variable actually occurs.
pub fn instantiate(body: &Expr, arg: &Expr) -> Expr {
    instantiate_at(body, arg, 0)
}

fn instantiate_at(expr: &Expr, arg: &Expr, depth: usize) -> Expr {
    grow(|| match expr {
        Expr::App(fun, val) => Expr::App(
            Rc::new(instantiate_at(fun, arg, depth)),
            Rc::new(instantiate_at(val, arg, depth)),
        ),
        Expr::Lam(name, ty, body) => Expr::Lam(
            name.clone(),
            Rc::new(instantiate_at(ty, arg, depth)),
            Rc::new(instantiate_at(body, arg, depth + 1)),
        ),
        Expr::Pi(name, domain, codomain) => Expr::Pi(
            name.clone(),
            Rc::new(instantiate_at(domain, arg, depth)),
            Rc::new(instantiate_at(codomain, arg, depth + 1)),
        ),
        Expr::Let(name, term, body) => Expr::Let(
            name.clone(),
            Rc::new(instantiate_at(term, arg, depth)),
            Rc::new(instantiate_at(body, arg, depth + 1)),
        ),
        Expr::Var(index) if *index == depth => {
            shift(arg, isize::try_from(depth).unwrap_or(isize::MAX))
        }
        Expr::Var(index) if *index > depth => Expr::Var(index - 1),
        Expr::Var(_) | Expr::Unknown => expr.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(i: usize) -> Expr {
        Expr::var(i)
    }

    fn lam(body: Expr) -> Expr {
        Expr::lam("x", Expr::Unknown, body)
    }

    fn app(fun: Expr, arg: Expr) -> Expr {
        Expr::app(fun, arg)
    }

    mod shift {
        use super::*;

        #[test]
        fn free_variable() {
            // ↑²(#0) = #2
            assert_eq!(shift(&var(0), 2), var(2));
        }

        #[test]
        fn bound_variable_untouched() {
            // ↑¹(λx. x) = λx. x
            let expr = lam(var(0));
            assert_eq!(shift(&expr, 1), expr);
        }

        #[test]
        fn free_variable_under_binder() {
            // ↑¹(λx. x #0) = λx. x #1
            let actual = shift(&lam(app(var(0), var(1))), 1);
            assert_eq!(actual, lam(app(var(0), var(2))));
        }

        #[test]
        fn binder_type_is_outside_the_binder() {
            // ↑¹(λ(x : #0). x) = λ(x : #1). x
            let actual = shift(&Expr::lam("x", var(0), var(0)), 1);
            assert_eq!(actual, Expr::lam("x", var(1), var(0)));
        }

        #[test]
        fn negative_shift() {
            let actual = shift(&app(var(3), lam(var(2))), -1);
            assert_eq!(actual, app(var(2), lam(var(1))));
        }

        #[test]
        fn cutoff_protects_lower_indices() {
            let actual = shift_from(&app(var(0), var(1)), 5, 1);
            assert_eq!(actual, app(var(0), var(6)));
        }

        #[test]
        fn let_body_is_under_a_binder() {
            let actual = shift(&Expr::let_in("y", var(0), var(0)), 1);
            assert_eq!(actual, Expr::let_in("y", var(1), var(0)));
        }
    }

    mod substitute {
        use super::*;

        #[test]
        fn matching_variable() {
            assert_eq!(substitute(&var(0), &Expr::Unknown), Expr::Unknown);
        }

        #[test]
        fn other_variable_untouched() {
            assert_eq!(substitute(&var(1), &Expr::Unknown), var(1));
        }

        #[test]
        fn value_is_shifted_under_binder() {
            // (λx. #1)[#0 := #3] = λx. #4
            let actual = substitute_at(&lam(var(1)), &var(3), 0);
            assert_eq!(actual, lam(var(4)));
        }

        #[test]
        fn no_capture() {
            // (λx. #1)[#0 := #0] must not turn into λx. x
            let actual = substitute(&lam(var(1)), &var(0));
            assert_eq!(actual, lam(var(1)));
            assert_ne!(actual, lam(var(0)));
        }

        #[test]
        fn shift_then_substitute_is_identity_on_closed_terms() {
            let expr = lam(lam(app(var(1), var(0))));
            assert_eq!(substitute(&shift(&expr, 1), &var(7)), expr);
        }
    }

    mod instantiate {
        use super::*;

        #[test]
        fn replaces_bound_variable() {
            assert_eq!(instantiate(&var(0), &var(5)), var(5));
        }

        #[test]
        fn lowers_outer_variables() {
            // body #3 sits under one binder, so it refers to outer #2
            assert_eq!(instantiate(&var(3), &Expr::Unknown), var(2));
        }

        #[test]
        fn argument_keeps_its_meaning_under_binders() {
            // (λy. x y)[x := #4] = λy. #4 y
            let body = lam(app(var(1), var(0)));
            assert_eq!(instantiate(&body, &var(4)), lam(app(var(5), var(0))));
        }

        #[test]
        fn agrees_with_shift_and_substitute() {
            // x occurs at several depths next to free variables
            let body = lam(app(
                app(var(1), lam(app(app(var(2), var(1)), var(4)))),
                var(5),
            ));
            let arg = lam(app(var(0), var(1)));
            let expected = shift(&substitute(&body, &shift(&arg, 1)), -1);
            assert_eq!(instantiate(&body, &arg), expected);
        }
    }
}
