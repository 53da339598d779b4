//! Guard negation shared by the flip refactorings.

use refract_fmt::{prec, print_expr, print_expr_with_power};
use refract_ir::ast::{ExprKind, UnaryOp};
use refract_ir::{ExprArena, ExprId};

/// Render the logical negation of an expression.
///
/// Prefers the readable form: `!x` loses its bang, comparisons flip
/// their operator, everything else gains a `!` (parenthesized when it
/// binds weaker than unary).
pub(crate) fn negated_text(arena: &ExprArena, id: ExprId) -> String {
    match &arena.expr(id).kind {
        ExprKind::Unary {
            op: UnaryOp::Not,
            arg,
        } => print_expr(arena, *arg),
        ExprKind::Binary { op, lhs, rhs } => match op.negated() {
            Some(flipped) => format!(
                "{} {} {}",
                print_expr_with_power(arena, *lhs, flipped.precedence()),
                flipped.as_str(),
                print_expr_with_power(arena, *rhs, flipped.precedence() + 1),
            ),
            None => bang(arena, id),
        },
        _ => bang(arena, id),
    }
}

fn bang(arena: &ExprArena, id: ExprId) -> String {
    format!("!{}", print_expr_with_power(arena, id, prec::UNARY))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use refract_ir::ast::StmtKind;
    use refract_ir::Module;

    fn negate(source: &str) -> String {
        let module: Module = match refract_parse::parse(source) {
            Ok(module) => module,
            Err(err) => panic!("parse failed: {err}"),
        };
        match &module.arena.stmt(module.body[0]).kind {
            StmtKind::Expr(expr) => negated_text(&module.arena, *expr),
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn drops_a_double_negation() {
        assert_eq!(negate("!isValid;"), "isValid");
    }

    #[test]
    fn flips_comparisons() {
        assert_eq!(negate("a === b;"), "a !== b");
        assert_eq!(negate("count < 10;"), "count >= 10");
    }

    #[test]
    fn wraps_weak_binders() {
        assert_eq!(negate("a && b;"), "!(a && b)");
        assert_eq!(negate("isValid;"), "!isValid");
        assert_eq!(negate("user.isAdmin;"), "!user.isAdmin");
    }

    #[test]
    fn arithmetic_has_no_flipped_operator() {
        assert_eq!(negate("a + b;"), "!(a + b)");
    }
}
