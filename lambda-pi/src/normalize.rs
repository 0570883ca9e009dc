use std::rc::Rc;

use log::debug;

use crate::{
    ast::Expr,
    context::{Binding, Context},
    error::{Result, TypeError},
    stack::{grow, Depth, MAX_DEPTH},
    subst::{instantiate, shift},
};

/// Weak-head normal form of `expr` in `ctx`.
///
/// Variables bound to a definition in `ctx` are unfolded; `Let` is reduced by
/// substituting its definition. An application whose head is stuck on a
/// variable without definition is already in whnf. Each reduction step counts
/// against [`MAX_DEPTH`], so a diverging term ends in `TooDeep`.
pub fn value(expr: &Expr, ctx: &Context) -> Result<Expr> {
    let _depth = Depth::enter().ok_or(TypeError::TooDeep { limit: MAX_DEPTH })?;
    grow(|| match expr {
        Expr::App(fun, arg) => match value(fun, ctx)? {
            Expr::Lam(_, _, body) => value(&instantiate(&body, arg), ctx),
            head @ (Expr::Var(_) | Expr::App(..)) => Ok(Expr::App(Rc::new(head), arg.clone())),
            head => {
                debug!("stuck application head: {}", head);
                Err(TypeError::ExpectingALambda {
                    found: head,
                    ctx: ctx.clone(),
                })
            }
        },
        Expr::Let(_, term, body) => value(&instantiate(body, term), ctx),
        Expr::Var(index) => match ctx.lookup(*index) {
            Some(Binding { def: Some(def), .. }) => value(&shift(def, depth(*index)), ctx),
            _ => Ok(expr.clone()),
        },
        Expr::Lam(..) | Expr::Pi(..) | Expr::Unknown => Ok(expr.clone()),
    })
}

/// Full normal form of `expr` in `ctx`.
pub fn reduce(expr: &Expr, ctx: &Context) -> Result<Expr> {
    let _depth = Depth::enter().ok_or(TypeError::TooDeep { limit: MAX_DEPTH })?;
    grow(|| {
        Ok(match value(expr, ctx)? {
            Expr::App(fun, arg) => {
                Expr::App(Rc::new(reduce(&fun, ctx)?), Rc::new(reduce(&arg, ctx)?))
            }
            Expr::Lam(name, ty, body) => {
                let inner = ctx.extend(name.clone(), (*ty).clone());
                Expr::Lam(name, Rc::new(reduce(&ty, ctx)?), Rc::new(reduce(&body, &inner)?))
            }
            Expr::Pi(name, domain, codomain) => {
                let inner = ctx.extend(name.clone(), (*domain).clone());
                Expr::Pi(
                    name,
                    Rc::new(reduce(&domain, ctx)?),
                    Rc::new(reduce(&codomain, &inner)?),
                )
            }
            whnf => whnf,
        })
    })
}

/// Shift that moves an entry stored at `index` to the scope of the lookup.
pub(crate) fn depth(index: usize) -> isize {
    isize::try_from(index + 1).unwrap_or(isize::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(i: usize) -> Expr {
        Expr::var(i)
    }

    fn id() -> Expr {
        Expr::lam("x", Expr::Unknown, var(0))
    }

    mod value {
        use super::*;

        #[test]
        fn beta() {
            // (λx. x) #3 ⇝ #3
            let actual = value(&Expr::app(id(), var(3)), &Context::new()).unwrap();
            assert_eq!(actual, var(3));
        }

        #[test]
        fn beta_lowers_outer_variables() {
            // (λx. #1) ? ⇝ #0
            let constant = Expr::lam("x", Expr::Unknown, var(1));
            let actual = value(&Expr::app(constant, Expr::Unknown), &Context::new()).unwrap();
            assert_eq!(actual, var(0));
        }

        #[test]
        fn stops_at_weak_head() {
            // λy. (λx. x) y is already whnf
            let expr = Expr::lam("y", Expr::Unknown, Expr::app(id(), var(0)));
            assert_eq!(value(&expr, &Context::new()).unwrap(), expr);
        }

        #[test]
        fn stuck_application() {
            let expr = Expr::apps(var(0), [var(1), var(2)]);
            assert_eq!(value(&expr, &Context::new()).unwrap(), expr);
        }

        #[test]
        fn stuck_head_is_reduced() {
            // #0 ((λx. x) #1) keeps its argument, but ((λx. x) #0) #1 ⇝ #0 #1
            let expr = Expr::app(Expr::app(id(), var(0)), var(1));
            let actual = value(&expr, &Context::new()).unwrap();
            assert_eq!(actual, Expr::app(var(0), var(1)));
        }

        #[test]
        fn let_is_transparent() {
            // let y = #4 in y ⇝ #4
            let expr = Expr::let_in("y", var(4), var(0));
            assert_eq!(value(&expr, &Context::new()).unwrap(), var(4));
        }

        #[test]
        fn unfolds_defined_variable() {
            // [A : ?, f ≡ λx. A] ⊢ f ? ⇝ A
            let ctx = Context::new().extend("A".into(), Expr::Unknown).define(
                "f".into(),
                Expr::Unknown,
                Expr::lam("x", Expr::Unknown, var(1)),
            );
            let actual = value(&Expr::app(var(0), Expr::Unknown), &ctx).unwrap();
            assert_eq!(actual, var(1));
        }

        #[test]
        fn undefined_variable_is_whnf() {
            let ctx = Context::new().extend("A".into(), Expr::Unknown);
            assert_eq!(value(&var(0), &ctx).unwrap(), var(0));
            assert_eq!(value(&var(9), &ctx).unwrap(), var(9));
        }

        #[test]
        fn applying_unknown_fails() {
            let actual = value(&Expr::app(Expr::Unknown, var(0)), &Context::new());
            assert!(matches!(actual, Err(TypeError::ExpectingALambda { .. })));
        }

        #[test]
        fn diverging_term_is_too_deep() {
            // (λx. x x) (λx. x x)
            let omega = Expr::lam("x", Expr::Unknown, Expr::app(var(0), var(0)));
            let actual = value(&Expr::app(omega.clone(), omega), &Context::new());
            assert!(matches!(
                actual,
                Err(TypeError::TooDeep { limit: MAX_DEPTH })
            ));
        }

        #[test]
        fn applying_pi_fails() {
            let pi = Expr::pi("x", Expr::Unknown, var(0));
            let actual = value(&Expr::app(pi, var(0)), &Context::new());
            assert!(matches!(actual, Err(TypeError::ExpectingALambda { .. })));
        }
    }

    mod reduce {
        use super::*;

        #[test]
        fn under_binders() {
            // λy. (λx. x) y ⇝ λy. y
            let expr = Expr::lam("y", Expr::Unknown, Expr::app(id(), var(0)));
            let actual = reduce(&expr, &Context::new()).unwrap();
            assert_eq!(actual, Expr::lam("y", Expr::Unknown, var(0)));
        }

        #[test]
        fn inside_pi() {
            let expr = Expr::pi("a", Expr::app(id(), var(0)), Expr::app(id(), var(1)));
            let actual = reduce(&expr, &Context::new()).unwrap();
            assert_eq!(actual, Expr::pi("a", var(0), var(1)));
        }

        #[test]
        fn stuck_arguments() {
            let expr = Expr::app(var(0), Expr::app(id(), var(1)));
            let actual = reduce(&expr, &Context::new()).unwrap();
            assert_eq!(actual, Expr::app(var(0), var(1)));
        }

        #[test]
        fn definitions_unfold_under_binders() {
            // [T ≡ ?] ⊢ λ(x : T). T ⇝ λ(x : ?). ?
            let ctx = Context::new().define("T".into(), Expr::Unknown, Expr::Unknown);
            let expr = Expr::lam("x", var(0), var(1));
            let actual = reduce(&expr, &ctx).unwrap();
            assert_eq!(actual, Expr::lam("x", Expr::Unknown, Expr::Unknown));
        }

        #[test]
        fn idempotent() {
            let expr = Expr::app(
                Expr::lam("f", Expr::Unknown, Expr::lam("x", Expr::Unknown, Expr::app(var(1), var(0)))),
                id(),
            );
            let once = reduce(&expr, &Context::new()).unwrap();
            let twice = reduce(&once, &Context::new()).unwrap();
            assert_eq!(once, Expr::lam("x", Expr::Unknown, var(0)));
            assert_eq!(once, twice);
        }
    }
}
