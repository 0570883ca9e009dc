use crate::{ast::Expr, stack::grow};

/// One-directional compatibility of an expected type with an actual one.
///
/// `Unknown` on the expected side accepts anything; `App`, `Lam` and `Pi`
/// recurse pairwise; every other pairing needs structural equality. The
/// converse does not hold: an actual `Unknown` only satisfies an expected
/// `Unknown`.
pub fn is_subexpr(expected: &Expr, actual: &Expr) -> bool {
    grow(|| match (expected, actual) {
        (Expr::Unknown, _) => true,
        (Expr::App(f1, a1), Expr::App(f2, a2)) => is_subexpr(f1, f2) && is_subexpr(a1, a2),
        (Expr::Lam(_, t1, b1), Expr::Lam(_, t2, b2))
        | (Expr::Pi(_, t1, b1), Expr::Pi(_, t2, b2)) => is_subexpr(t1, t2) && is_subexpr(b1, b2),
        _ => expected == actual,
    })
}
