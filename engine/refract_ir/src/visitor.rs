//! Syntax tree traversal.
//!
//! A single `Visitor` trait with `walk_*` free functions. Default
//! implementations traverse children in source order; override a
//! `visit_*` method to observe nodes, and keep calling the matching
//! `walk_*` to continue downward. The visitor mutates its own state
//! only; the tree is immutable.

use crate::ast::{ArrowBody, ExprKind, MemberProp, Pattern, PropKey, StmtKind};
use crate::{ExprArena, ExprId, Module, StmtId};

/// Syntax tree visitor.
pub trait Visitor<'ast> {
    fn visit_module(&mut self, module: &'ast Module) {
        walk_module(self, module);
    }

    fn visit_stmt(&mut self, id: StmtId, arena: &'ast ExprArena) {
        walk_stmt(self, id, arena);
    }

    fn visit_expr(&mut self, id: ExprId, arena: &'ast ExprArena) {
        walk_expr(self, id, arena);
    }

    fn visit_pattern(&mut self, pattern: &'ast Pattern, arena: &'ast ExprArena) {
        walk_pattern(self, pattern, arena);
    }
}

/// Traverse all top-level statements.
pub fn walk_module<'ast, V: Visitor<'ast> + ?Sized>(visitor: &mut V, module: &'ast Module) {
    for &stmt in &module.body {
        visitor.visit_stmt(stmt, &module.arena);
    }
}

/// Traverse the children of a statement.
pub fn walk_stmt<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    id: StmtId,
    arena: &'ast ExprArena,
) {
    match &arena.stmt(id).kind {
        StmtKind::Expr(expr) => visitor.visit_expr(*expr, arena),
        StmtKind::VarDecl(decl) => {
            for declarator in &decl.declarators {
                visitor.visit_pattern(&declarator.pattern, arena);
                if let Some(init) = declarator.init {
                    visitor.visit_expr(init, arena);
                }
            }
        }
        StmtKind::Func(func) => {
            for param in &func.params {
                visitor.visit_pattern(param, arena);
            }
            visitor.visit_stmt(func.body, arena);
        }
        StmtKind::Return(expr) => {
            if let Some(expr) = expr {
                visitor.visit_expr(*expr, arena);
            }
        }
        StmtKind::If { test, cons, alt } => {
            visitor.visit_expr(*test, arena);
            visitor.visit_stmt(*cons, arena);
            if let Some(alt) = alt {
                visitor.visit_stmt(*alt, arena);
            }
        }
        StmtKind::While { test, body } => {
            visitor.visit_expr(*test, arena);
            visitor.visit_stmt(*body, arena);
        }
        StmtKind::Block(stmts) => {
            for &stmt in stmts {
                visitor.visit_stmt(stmt, arena);
            }
        }
        StmtKind::Empty => {}
    }
}

/// Traverse the children of an expression.
pub fn walk_expr<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    id: ExprId,
    arena: &'ast ExprArena,
) {
    match &arena.expr(id).kind {
        ExprKind::Null
        | ExprKind::Bool(_)
        | ExprKind::Num { .. }
        | ExprKind::Str { .. }
        | ExprKind::Ident(_) => {}
        ExprKind::Template { exprs, .. } => {
            for &expr in exprs {
                visitor.visit_expr(expr, arena);
            }
        }
        ExprKind::Member { object, property } => {
            visitor.visit_expr(*object, arena);
            if let MemberProp::Computed(expr) = property {
                visitor.visit_expr(*expr, arena);
            }
        }
        ExprKind::Call { callee, args } => {
            visitor.visit_expr(*callee, arena);
            for &arg in args {
                visitor.visit_expr(arg, arena);
            }
        }
        ExprKind::Unary { arg, .. } => visitor.visit_expr(*arg, arena),
        ExprKind::Binary { lhs, rhs, .. } | ExprKind::Logical { lhs, rhs, .. } => {
            visitor.visit_expr(*lhs, arena);
            visitor.visit_expr(*rhs, arena);
        }
        ExprKind::Assign { target, value, .. } => {
            visitor.visit_expr(*target, arena);
            visitor.visit_expr(*value, arena);
        }
        ExprKind::Cond { test, cons, alt } => {
            visitor.visit_expr(*test, arena);
            visitor.visit_expr(*cons, arena);
            visitor.visit_expr(*alt, arena);
        }
        ExprKind::Arrow { params, body } => {
            for param in params {
                visitor.visit_pattern(param, arena);
            }
            match body {
                ArrowBody::Expr(expr) => visitor.visit_expr(*expr, arena),
                ArrowBody::Block(stmt) => visitor.visit_stmt(*stmt, arena),
            }
        }
        ExprKind::Function { params, body, .. } => {
            for param in params {
                visitor.visit_pattern(param, arena);
            }
            visitor.visit_stmt(*body, arena);
        }
        ExprKind::Object { props } => {
            for prop in props {
                if let PropKey::Computed(key) = &prop.key {
                    visitor.visit_expr(*key, arena);
                }
                visitor.visit_expr(prop.value, arena);
            }
        }
        ExprKind::Array { elements } => {
            for &element in elements {
                visitor.visit_expr(element, arena);
            }
        }
    }
}

/// Traverse the sub-patterns of a binding pattern.
pub fn walk_pattern<'ast, V: Visitor<'ast> + ?Sized>(
    visitor: &mut V,
    pattern: &'ast Pattern,
    arena: &'ast ExprArena,
) {
    match pattern {
        Pattern::Ident(_) => {}
        Pattern::Object(pat) => {
            for prop in &pat.props {
                if let Some(value) = &prop.value {
                    visitor.visit_pattern(value, arena);
                }
            }
        }
        Pattern::Array(pat) => {
            for element in pat.elements.iter().flatten() {
                visitor.visit_pattern(element, arena);
            }
        }
        Pattern::Rest(pat) => visitor.visit_pattern(&pat.arg, arena),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Span;

    struct CountIdents {
        count: usize,
    }

    impl<'ast> Visitor<'ast> for CountIdents {
        fn visit_expr(&mut self, id: ExprId, arena: &'ast ExprArena) {
            if matches!(arena.expr(id).kind, ExprKind::Ident(_)) {
                self.count += 1;
            }
            walk_expr(self, id, arena);
        }
    }

    #[test]
    fn walks_nested_expressions() {
        // send(user.name)
        let mut arena = ExprArena::new();
        let callee = arena.alloc_expr(ExprKind::Ident("send".into()), Span::new(0, 4));
        let object = arena.alloc_expr(ExprKind::Ident("user".into()), Span::new(5, 9));
        let member = arena.alloc_expr(
            ExprKind::Member {
                object,
                property: MemberProp::Ident {
                    name: "name".into(),
                    span: Span::new(10, 14),
                },
            },
            Span::new(5, 14),
        );
        let call = arena.alloc_expr(
            ExprKind::Call {
                callee,
                args: vec![member],
            },
            Span::new(0, 15),
        );
        let stmt = arena.alloc_stmt(StmtKind::Expr(call), Span::new(0, 16));
        let module = Module {
            body: vec![stmt],
            arena,
        };

        let mut counter = CountIdents { count: 0 };
        counter.visit_module(&module);
        // `send` and `user`; the static `.name` key is not an
        // expression node.
        assert_eq!(counter.count, 2);
    }
}
