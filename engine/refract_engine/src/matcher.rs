//! The closest-match protocol.
//!
//! Traversal is top-down; a candidate node is only kept until a
//! deeper candidate containing the selection replaces it, so the
//! innermost eligible construct under the cursor always wins. At most
//! one match is produced per attempt, and "no match" is an ordinary
//! `None`, never an error.

use refract_ir::ast::{ArrowBody, ExprKind, StmtKind};
use refract_ir::visitor::{walk_expr, walk_stmt, Visitor};
use refract_ir::{ExprArena, ExprId, Module, Span, StmtId};

/// Extra context the matcher knows about an expression's position.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExprContext {
    /// The expression sits on the writing side of an assignment.
    pub in_assign_target: bool,
}

/// An accepted expression match with its enclosing context.
#[derive(Debug, Clone)]
pub struct ExprMatch {
    pub id: ExprId,
    pub span: Span,
    /// Enclosing statements, outermost first.
    pub stmt_path: Vec<StmtId>,
    /// Enclosing function body blocks, outermost first.
    pub fn_bodies: Vec<StmtId>,
}

/// An accepted statement match with its enclosing context.
#[derive(Debug, Clone)]
pub struct StmtMatch {
    pub id: StmtId,
    pub span: Span,
    /// Enclosing statements, outermost first, excluding the match.
    pub stmt_path: Vec<StmtId>,
    /// Enclosing function body blocks, outermost first.
    pub fn_bodies: Vec<StmtId>,
}

/// Find the innermost expression containing `target` that satisfies
/// `predicate`.
pub fn find_closest_expr<P>(module: &Module, target: Span, predicate: P) -> Option<ExprMatch>
where
    P: Fn(&ExprArena, ExprId, ExprContext) -> bool,
{
    let mut finder = ExprFinder {
        target,
        predicate,
        stmt_stack: Vec::new(),
        fn_stack: Vec::new(),
        assign_depth: 0,
        found: None,
    };
    finder.visit_module(module);
    finder.found
}

/// Find the innermost statement containing `target` that satisfies
/// `predicate`.
pub fn find_closest_stmt<P>(module: &Module, target: Span, predicate: P) -> Option<StmtMatch>
where
    P: Fn(&ExprArena, StmtId) -> bool,
{
    let mut finder = StmtFinder {
        target,
        predicate,
        stmt_stack: Vec::new(),
        fn_stack: Vec::new(),
        found: None,
    };
    finder.visit_module(module);
    finder.found
}

struct ExprFinder<P> {
    target: Span,
    predicate: P,
    stmt_stack: Vec<StmtId>,
    fn_stack: Vec<StmtId>,
    assign_depth: u32,
    found: Option<ExprMatch>,
}

impl<P> ExprFinder<P>
where
    P: Fn(&ExprArena, ExprId, ExprContext) -> bool,
{
    /// Keep `id` unless an already-found candidate is deeper. Two
    /// candidates always nest (both contain the target), so span
    /// containment decides.
    fn consider(&mut self, id: ExprId, arena: &ExprArena) {
        let span = arena.expr_span(id);
        if !span.contains_span(self.target) {
            return;
        }
        let context = ExprContext {
            in_assign_target: self.assign_depth > 0,
        };
        if !(self.predicate)(arena, id, context) {
            return;
        }
        let deeper = self
            .found
            .as_ref()
            .is_none_or(|found| found.span.contains_span(span));
        if deeper {
            self.found = Some(ExprMatch {
                id,
                span,
                stmt_path: self.stmt_stack.clone(),
                fn_bodies: self.fn_stack.clone(),
            });
        }
    }
}

impl<'ast, P> Visitor<'ast> for ExprFinder<P>
where
    P: Fn(&ExprArena, ExprId, ExprContext) -> bool,
{
    fn visit_stmt(&mut self, id: StmtId, arena: &'ast ExprArena) {
        // Subtrees that cannot contain the target are skipped whole.
        if !arena.stmt_span(id).contains_span(self.target) {
            return;
        }
        self.stmt_stack.push(id);
        if let StmtKind::Func(func) = &arena.stmt(id).kind {
            self.fn_stack.push(func.body);
            self.visit_stmt(func.body, arena);
            self.fn_stack.pop();
        } else {
            walk_stmt(self, id, arena);
        }
        self.stmt_stack.pop();
    }

    fn visit_expr(&mut self, id: ExprId, arena: &'ast ExprArena) {
        self.consider(id, arena);
        match &arena.expr(id).kind {
            ExprKind::Assign { target, value, .. } => {
                self.assign_depth += 1;
                self.visit_expr(*target, arena);
                self.assign_depth -= 1;
                self.visit_expr(*value, arena);
            }
            ExprKind::Function { body, .. } => {
                self.fn_stack.push(*body);
                self.visit_stmt(*body, arena);
                self.fn_stack.pop();
            }
            ExprKind::Arrow {
                body: ArrowBody::Block(body),
                ..
            } => {
                self.fn_stack.push(*body);
                self.visit_stmt(*body, arena);
                self.fn_stack.pop();
            }
            _ => walk_expr(self, id, arena),
        }
    }
}

struct StmtFinder<P> {
    target: Span,
    predicate: P,
    stmt_stack: Vec<StmtId>,
    fn_stack: Vec<StmtId>,
    found: Option<StmtMatch>,
}

impl<'ast, P> Visitor<'ast> for StmtFinder<P>
where
    P: Fn(&ExprArena, StmtId) -> bool,
{
    fn visit_stmt(&mut self, id: StmtId, arena: &'ast ExprArena) {
        let span = arena.stmt_span(id);
        if !span.contains_span(self.target) {
            return;
        }
        if (self.predicate)(arena, id) {
            let deeper = self
                .found
                .as_ref()
                .is_none_or(|found| found.span.contains_span(span));
            if deeper {
                self.found = Some(StmtMatch {
                    id,
                    span,
                    stmt_path: self.stmt_stack.clone(),
                    fn_bodies: self.fn_stack.clone(),
                });
            }
        }
        self.stmt_stack.push(id);
        if let StmtKind::Func(func) = &arena.stmt(id).kind {
            self.fn_stack.push(func.body);
            self.visit_stmt(func.body, arena);
            self.fn_stack.pop();
        } else {
            walk_stmt(self, id, arena);
        }
        self.stmt_stack.pop();
    }

    fn visit_expr(&mut self, id: ExprId, arena: &'ast ExprArena) {
        // Statements nested inside expressions (function bodies) still
        // count; keep walking.
        match &arena.expr(id).kind {
            ExprKind::Function { body, .. } => {
                self.fn_stack.push(*body);
                self.visit_stmt(*body, arena);
                self.fn_stack.pop();
            }
            ExprKind::Arrow {
                body: ArrowBody::Block(body),
                ..
            } => {
                self.fn_stack.push(*body);
                self.visit_stmt(*body, arena);
                self.fn_stack.pop();
            }
            _ => walk_expr(self, id, arena),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(source: &str) -> Module {
        match refract_parse::parse(source) {
            Ok(module) => module,
            Err(err) => panic!("parse failed: {err}"),
        }
    }

    #[test]
    fn cursor_inside_inner_if_matches_inner_statement() {
        let source = "if (a) { if (b) { x(); } }";
        let module = parse(source);
        // Cursor inside the inner `if`'s test: on `b` (offset 13).
        let target = Span::point(13);
        let Some(found) = find_closest_stmt(&module, target, |arena, id| {
            matches!(arena.stmt(id).kind, StmtKind::If { .. })
        }) else {
            panic!("expected a match");
        };
        let inner_start = source.find("if (b)").map(|at| at as u32);
        assert_eq!(Some(found.span.start), inner_start);
    }

    #[test]
    fn innermost_call_wins_for_nested_calls() {
        let source = "outer(inner(value));";
        let module = parse(source);
        // Cursor on `value`.
        let target = Span::point(13);
        let Some(found) = find_closest_expr(&module, target, |arena, id, _| {
            matches!(arena.expr(id).kind, ExprKind::Call { .. })
        }) else {
            panic!("expected a match");
        };
        let Some(inner_start) = source.find("inner(") else {
            panic!("bad fixture");
        };
        assert_eq!(found.span.start, inner_start as u32);
    }

    #[test]
    fn no_match_is_an_ordinary_none() {
        let module = parse("const a = 1;");
        let found = find_closest_expr(&module, Span::point(6), |arena, id, _| {
            matches!(arena.expr(id).kind, ExprKind::Cond { .. })
        });
        assert!(found.is_none());
    }

    #[test]
    fn assign_targets_are_flagged() {
        let module = parse("user.name = value;");
        // Cursor on `user`.
        let found = find_closest_expr(&module, Span::point(1), |arena, id, context| {
            !context.in_assign_target
                && matches!(arena.expr(id).kind, ExprKind::Member { .. })
        });
        assert!(found.is_none());

        // `value` is on the reading side.
        let found = find_closest_expr(&module, Span::point(13), |arena, id, context| {
            !context.in_assign_target && matches!(arena.expr(id).kind, ExprKind::Ident(_))
        });
        assert!(found.is_some());
    }

    #[test]
    fn match_context_records_function_scope() {
        let module = parse("function f() { send(\"Hi\"); }\nsend(\"Hi\");");
        // Cursor on the string inside `f`.
        let Some(found) = find_closest_expr(&module, Span::point(21), |arena, id, _| {
            matches!(arena.expr(id).kind, ExprKind::Str { .. })
        }) else {
            panic!("expected a match");
        };
        assert_eq!(found.fn_bodies.len(), 1);

        // The top-level string has no enclosing function.
        let Some(found) = find_closest_expr(&module, Span::point(35), |arena, id, _| {
            matches!(arena.expr(id).kind, ExprKind::Str { .. })
        }) else {
            panic!("expected a match");
        };
        assert!(found.fn_bodies.is_empty());
    }
}
