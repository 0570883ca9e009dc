use itertools::Itertools;

use crate::{
    ast::{Expr, Name},
    context::Context,
    error::{Result, TypeError},
    stack::grow,
};

/// Which side of an enclosing operator an expression sits on.
///
/// Applications associate to the left and binder bodies to the right, so an
/// expression only needs parentheses when the hint does not cover it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Assoc {
    Left,
    Right,
    Both,
}

/// Renders `expr` with variable names taken from `ctx`.
pub fn show(expr: &Expr, ctx: &Context, assoc: Option<Assoc>) -> Result<String> {
    Printer { strict: true }.expr(expr, ctx, assoc)
}

/// Renders `ctx` oldest binding first, one per line.
pub fn show_context(ctx: &Context) -> Result<String> {
    Printer { strict: true }.context(ctx)
}

/// Like [`show`], but never fails: variables outside `ctx` print as `#i`,
/// counted from the outermost scope.
pub fn render(expr: &Expr, ctx: &Context) -> String {
    Printer { strict: false }
        .expr(expr, ctx, Some(Assoc::Both))
        .unwrap_or_else(|_| format!("{:?}", expr))
}

pub fn render_context(ctx: &Context) -> String {
    Printer { strict: false }
        .context(ctx)
        .unwrap_or_else(|_| format!("{:?}", ctx))
}

/// Single-line `{x : A, y : B}` form used in derivations.
pub fn render_context_inline(ctx: &Context) -> String {
    let mut entries = Vec::new();
    let mut scope = ctx;
    while let Some((binding, tail)) = scope.split_first() {
        entries.push(format!("{} : {}", binding.name, render(&binding.ty, tail)));
        scope = tail;
    }
    format!("{{{}}}", entries.iter().rev().format(", "))
}

struct Printer {
    strict: bool,
}

impl Printer {
    fn expr(&self, expr: &Expr, ctx: &Context, assoc: Option<Assoc>) -> Result<String> {
        grow(|| match expr {
            Expr::App(fun, arg) => {
                let result = format!(
                    "{} {}",
                    self.expr(fun, ctx, Some(Assoc::Left))?,
                    self.expr(arg, ctx, None)?
                );
                Ok(parenthesize(
                    result,
                    matches!(assoc, Some(Assoc::Left | Assoc::Both)),
                ))
            }
            Expr::Lam(name, ty, body) => self.binder("λ", name, ty, body, ctx, assoc),
            Expr::Pi(name, domain, codomain) => {
                self.binder("Π", name, domain, codomain, ctx, assoc)
            }
            Expr::Let(name, term, body) => {
                let inner = ctx.define(name.clone(), Expr::Unknown, (**term).clone());
                let result = format!(
                    "let {} = {} in {}",
                    name,
                    self.expr(term, ctx, Some(Assoc::Both))?,
                    self.expr(body, &inner, Some(Assoc::Both))?
                );
                Ok(parenthesize(result, right_associative(assoc)))
            }
            Expr::Unknown => Ok("?".to_string()),
            Expr::Var(index) => match ctx.lookup(*index) {
                Some(binding) => Ok(binding.name.to_string()),
                None if self.strict => Err(TypeError::OutOfBounds {
                    index: *index,
                    ctx: ctx.clone(),
                }),
                None => Ok(format!("#{}", index - ctx.len())),
            },
        })
    }

    fn binder(
        &self,
        symbol: &str,
        name: &Name,
        ty: &Expr,
        body: &Expr,
        ctx: &Context,
        assoc: Option<Assoc>,
    ) -> Result<String> {
        let inner = ctx.extend(name.clone(), ty.clone());
        let result = format!(
            "{} ({} : {}). {}",
            symbol,
            name,
            self.expr(ty, ctx, Some(Assoc::Both))?,
            self.expr(body, &inner, Some(Assoc::Both))?
        );
        Ok(parenthesize(result, right_associative(assoc)))
    }

    fn context(&self, ctx: &Context) -> Result<String> {
        let Some((binding, tail)) = ctx.split_first() else {
            return Ok(String::new());
        };
        let mut out = self.context(tail)?;
        out.push_str(&format!(
            "{} : {}",
            binding.name,
            self.expr(&binding.ty, tail, Some(Assoc::Both))?
        ));
        if let Some(def) = &binding.def {
            out.push_str(&format!(" ≡ {}", self.expr(def, tail, Some(Assoc::Both))?));
        }
        out.push('\n');
        Ok(out)
    }
}

fn right_associative(assoc: Option<Assoc>) -> bool {
    matches!(assoc, Some(Assoc::Right | Assoc::Both))
}

fn parenthesize(result: String, bare: bool) -> String {
    if bare {
        result
    } else {
        format!("({})", result)
    }
}
