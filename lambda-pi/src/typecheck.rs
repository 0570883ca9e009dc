use std::rc::Rc;

use log::{debug, trace};

use crate::{
    ast::{Expr, Name},
    context::Context,
    error::{Result, TypeError},
    normalize::{depth, reduce, value},
    pretty::{render, render_context_inline},
    stack::{grow, Depth, MAX_DEPTH},
    subst::{instantiate, shift},
};

#[path = "subexpr.rs"]
mod subexpr;

pub use subexpr::is_subexpr;

/// One rule application of a type check, with the derivations of its
/// premises as children.
#[derive(Debug, Clone, PartialEq)]
pub struct Derivation {
    pub rule: String,
    pub input: String,
    pub output: String,
    pub children: Vec<Derivation>,
}

impl Derivation {
    fn write_indented(&self, f: &mut std::fmt::Formatter<'_>, level: usize) -> std::fmt::Result {
        writeln!(
            f,
            "{:indent$}{}: {} {}",
            "",
            self.rule,
            self.input,
            self.output,
            indent = level * 2
        )?;
        for child in &self.children {
            child.write_indented(f, level + 1)?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Derivation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.write_indented(f, 0)
    }
}

/// What the checker records for each rule it applies.
trait Trace: Sized {
    fn rule(rule: &str, expr: &Expr, ctx: &Context, ty: &Expr, premises: Vec<Self>) -> Self;
}

/// Records nothing, so a plain check never renders.
impl Trace for () {
    fn rule(_: &str, _: &Expr, _: &Context, _: &Expr, _: Vec<()>) {}
}

impl Trace for Derivation {
    fn rule(rule: &str, expr: &Expr, ctx: &Context, ty: &Expr, premises: Vec<Self>) -> Self {
        Derivation {
            rule: rule.to_string(),
            input: format!("{} ⊢ {} ⇒", render_context_inline(ctx), render(expr, ctx)),
            output: render(ty, ctx),
            children: premises,
        }
    }
}

/// Infers the type of `expr` in `ctx`.
pub fn type_check(expr: &Expr, ctx: &Context) -> Result<Expr> {
    debug!("type_check: {}", render(expr, ctx));
    check::<()>(expr, ctx)
        .map(|(ty, ())| ty)
        .inspect_err(|err| debug!("type_check failed: {}", err))
}

/// Infers the type of `expr` in `ctx` and returns the full derivation.
pub fn run_type_check(expr: &Expr, ctx: &Context) -> Result<Derivation> {
    debug!("run_type_check: {}", render(expr, ctx));
    check::<Derivation>(expr, ctx)
        .map(|(_, tree)| tree)
        .inspect_err(|err| debug!("run_type_check failed: {}", err))
}

fn check<T: Trace>(expr: &Expr, ctx: &Context) -> Result<(Expr, T)> {
    let _depth = Depth::enter().ok_or(TypeError::TooDeep { limit: MAX_DEPTH })?;
    let (ty, tree) = grow(|| match expr {
        Expr::Var(index) => check_var(expr, ctx, *index),
        Expr::Lam(name, ty, body) => check_lam(expr, ctx, name, ty, body),
        Expr::Pi(name, domain, codomain) => check_pi(expr, ctx, name, domain, codomain),
        Expr::Let(name, term, body) => check_let(expr, ctx, name, term, body),
        Expr::Unknown => Ok(check_unknown(expr, ctx)),
        Expr::App(fun, arg) => check_app(expr, ctx, fun, arg),
    })?;
    trace!("{} : {}", render(expr, ctx), render(&ty, ctx));
    Ok((ty, tree))
}

//   Γ(i) = (x : A)
// ─────────────────── (T-Var)
//  Γ ⊢ #i : ↑ⁱ⁺¹ A
fn check_var<T: Trace>(expr: &Expr, ctx: &Context, index: usize) -> Result<(Expr, T)> {
    let Some(binding) = ctx.lookup(index) else {
        return Err(TypeError::OutOfBounds {
            index,
            ctx: ctx.clone(),
        });
    };
    let ty = shift(&binding.ty, depth(index));
    let tree = T::rule("T-Var", expr, ctx, &ty, vec![]);
    Ok((ty, tree))
}

//  Γ ⊢ A : _    Γ, x : A ⊢ b : B
// ─────────────────────────────────── (T-Lam)
//  Γ ⊢ λ (x : A). b : Π (x : A). B
fn check_lam<T: Trace>(
    expr: &Expr,
    ctx: &Context,
    name: &Name,
    ty: &Rc<Expr>,
    body: &Expr,
) -> Result<(Expr, T)> {
    let (_, tree1) = check(ty, ctx)?;
    let inner = ctx.extend(name.clone(), (**ty).clone());
    let (body_type, tree2) = check(body, &inner)?;

    let result = Expr::Pi(name.clone(), ty.clone(), Rc::new(body_type));
    let tree = T::rule("T-Lam", expr, ctx, &result, vec![tree1, tree2]);
    Ok((result, tree))
}

//  Γ ⊢ A : _    Γ, x : A ⊢ B : _
// ──────────────────────────────── (T-Pi)
//     Γ ⊢ Π (x : A). B : ?
fn check_pi<T: Trace>(
    expr: &Expr,
    ctx: &Context,
    name: &Name,
    domain: &Expr,
    codomain: &Expr,
) -> Result<(Expr, T)> {
    let (_, tree1) = check(domain, ctx)?;
    let inner = ctx.extend(name.clone(), domain.clone());
    let (_, tree2) = check(codomain, &inner)?;

    let tree = T::rule("T-Pi", expr, ctx, &Expr::Unknown, vec![tree1, tree2]);
    Ok((Expr::Unknown, tree))
}

//  Γ ⊢ t : A    Γ, x : A ≡ t ⊢ b : B
// ──────────────────────────────────── (T-Let)
//   Γ ⊢ let x = t in b : B[x := t]
fn check_let<T: Trace>(
    expr: &Expr,
    ctx: &Context,
    name: &Name,
    term: &Expr,
    body: &Expr,
) -> Result<(Expr, T)> {
    let (term_type, tree1) = check(term, ctx)?;
    let inner = ctx.define(name.clone(), term_type, term.clone());
    let (body_type, tree2) = check(body, &inner)?;

    // The body type lives under the let binder.
    let result = instantiate(&body_type, term);
    let tree = T::rule("T-Let", expr, ctx, &result, vec![tree1, tree2]);
    Ok((result, tree))
}

// ───────────── (T-Unknown)
//  Γ ⊢ ? : ?
fn check_unknown<T: Trace>(expr: &Expr, ctx: &Context) -> (Expr, T) {
    let tree = T::rule("T-Unknown", expr, ctx, &Expr::Unknown, vec![]);
    (Expr::Unknown, tree)
}

//  Γ ⊢ f : F    F ⇝ Π (x : A). B    Γ ⊢ A : ?    Γ ⊢ a : A'    A ⊒ A'
// ────────────────────────────────────────────────────────────────────── (T-App)
//                        Γ ⊢ f a : B[x := a]
fn check_app<T: Trace>(expr: &Expr, ctx: &Context, fun: &Expr, arg: &Expr) -> Result<(Expr, T)> {
    let (fun_type, tree1) = check(fun, ctx)?;
    let Expr::Pi(_, domain, codomain) = value(&fun_type, ctx)? else {
        return Err(TypeError::ExpectingAFunction {
            found: fun.clone(),
            found_type: fun_type,
            ctx: ctx.clone(),
        });
    };

    let (domain_type, tree2) = check(&domain, ctx)?;
    if !value(&domain_type, ctx)?.is_unknown() {
        return Err(TypeError::ExpectingAType {
            found: (*domain).clone(),
            found_type: domain_type,
            ctx: ctx.clone(),
        });
    }

    let (arg_type, tree3) = check(arg, ctx)?;
    if !conforms(&domain, &arg_type, ctx)? {
        return Err(TypeError::ArgumentTypeMismatch {
            expected: (*domain).clone(),
            found: arg.clone(),
            found_type: arg_type,
            ctx: ctx.clone(),
        });
    }

    let result = instantiate(&codomain, arg);
    let tree = T::rule("T-App", expr, ctx, &result, vec![tree1, tree2, tree3]);
    Ok((result, tree))
}

/// `is_subexpr` on the types as written, then on their normal forms so that
/// definitions in `ctx` are unfolded before giving up.
fn conforms(expected: &Expr, actual: &Expr, ctx: &Context) -> Result<bool> {
    if is_subexpr(expected, actual) {
        return Ok(true);
    }
    Ok(is_subexpr(&reduce(expected, ctx)?, &reduce(actual, ctx)?))
}
