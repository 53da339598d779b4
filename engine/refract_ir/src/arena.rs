//! Arena allocation for the flat syntax tree.
//!
//! All expressions and statements of a module live in two contiguous
//! vectors; child references are `ExprId`/`StmtId` indices. The arena
//! also owns span-ignoring structural equality, the comparison the
//! occurrence search is built on.

use std::fmt;

use crate::ast::{
    ArrowBody, Declarator, Expr, ExprKind, MemberProp, ObjectProp, Pattern, PropKey, Stmt,
    StmtKind, VarDecl,
};
use crate::Span;

/// Index of an expression in its arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct ExprId(u32);

impl ExprId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for ExprId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Index of a statement in its arena.
#[derive(Copy, Clone, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct StmtId(u32);

impl StmtId {
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for StmtId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s{}", self.0)
    }
}

/// Contiguous storage for all nodes of a module.
#[derive(Clone, Default, Debug)]
pub struct ExprArena {
    exprs: Vec<Expr>,
    stmts: Vec<Stmt>,
}

/// A parsed buffer: top-level statements plus the arena they live in.
#[derive(Clone, Debug, Default)]
pub struct Module {
    pub body: Vec<StmtId>,
    pub arena: ExprArena,
}

impl ExprArena {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with estimated capacity based on source size.
    pub fn with_capacity(source_len: usize) -> Self {
        ExprArena {
            exprs: Vec::with_capacity(source_len / 20),
            stmts: Vec::with_capacity(source_len / 60),
        }
    }

    pub fn alloc_expr(&mut self, kind: ExprKind, span: Span) -> ExprId {
        let id = ExprId(self.exprs.len() as u32);
        self.exprs.push(Expr::new(kind, span));
        id
    }

    pub fn alloc_stmt(&mut self, kind: StmtKind, span: Span) -> StmtId {
        let id = StmtId(self.stmts.len() as u32);
        self.stmts.push(Stmt::new(kind, span));
        id
    }

    #[inline]
    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id.index()]
    }

    #[inline]
    pub fn stmt(&self, id: StmtId) -> &Stmt {
        &self.stmts[id.index()]
    }

    #[inline]
    pub fn expr_span(&self, id: ExprId) -> Span {
        self.exprs[id.index()].span
    }

    #[inline]
    pub fn stmt_span(&self, id: StmtId) -> Span {
        self.stmts[id.index()].span
    }

    pub fn expr_count(&self) -> usize {
        self.exprs.len()
    }

    pub fn stmt_count(&self) -> usize {
        self.stmts.len()
    }

    /// Span-ignoring structural equality of two expressions.
    ///
    /// String literals compare by cooked value, so `"Hi"` and `'Hi'`
    /// are the same occurrence.
    pub fn same_expr(&self, a: ExprId, b: ExprId) -> bool {
        use ExprKind as K;

        match (&self.expr(a).kind, &self.expr(b).kind) {
            (K::Null, K::Null) => true,
            (K::Bool(x), K::Bool(y)) => x == y,
            (K::Num { raw: x }, K::Num { raw: y }) => x == y,
            (K::Str { value: x, .. }, K::Str { value: y, .. }) => x == y,
            (
                K::Template {
                    quasis: qa,
                    exprs: ea,
                },
                K::Template {
                    quasis: qb,
                    exprs: eb,
                },
            ) => {
                qa.len() == qb.len()
                    && qa.iter().zip(qb).all(|(x, y)| x.raw == y.raw)
                    && self.same_expr_list(ea, eb)
            }
            (K::Ident(x), K::Ident(y)) => x == y,
            (
                K::Member {
                    object: oa,
                    property: pa,
                },
                K::Member {
                    object: ob,
                    property: pb,
                },
            ) => self.same_expr(*oa, *ob) && self.same_member_prop(pa, pb),
            (
                K::Call {
                    callee: ca,
                    args: aa,
                },
                K::Call {
                    callee: cb,
                    args: ab,
                },
            ) => self.same_expr(*ca, *cb) && self.same_expr_list(aa, ab),
            (K::Unary { op: xa, arg: aa }, K::Unary { op: xb, arg: ab }) => {
                xa == xb && self.same_expr(*aa, *ab)
            }
            (
                K::Binary {
                    op: xa,
                    lhs: la,
                    rhs: ra,
                },
                K::Binary {
                    op: xb,
                    lhs: lb,
                    rhs: rb,
                },
            ) => xa == xb && self.same_expr(*la, *lb) && self.same_expr(*ra, *rb),
            (
                K::Logical {
                    op: xa,
                    lhs: la,
                    rhs: ra,
                },
                K::Logical {
                    op: xb,
                    lhs: lb,
                    rhs: rb,
                },
            ) => xa == xb && self.same_expr(*la, *lb) && self.same_expr(*ra, *rb),
            (
                K::Assign {
                    op: xa,
                    target: ta,
                    value: va,
                },
                K::Assign {
                    op: xb,
                    target: tb,
                    value: vb,
                },
            ) => xa == xb && self.same_expr(*ta, *tb) && self.same_expr(*va, *vb),
            (
                K::Cond {
                    test: ta,
                    cons: ca,
                    alt: aa,
                },
                K::Cond {
                    test: tb,
                    cons: cb,
                    alt: ab,
                },
            ) => {
                self.same_expr(*ta, *tb)
                    && self.same_expr(*ca, *cb)
                    && self.same_expr(*aa, *ab)
            }
            (
                K::Arrow {
                    params: pa,
                    body: ba,
                },
                K::Arrow {
                    params: pb,
                    body: bb,
                },
            ) => self.same_pattern_list(pa, pb) && self.same_arrow_body(*ba, *bb),
            (
                K::Function {
                    name: na,
                    params: pa,
                    body: ba,
                },
                K::Function {
                    name: nb,
                    params: pb,
                    body: bb,
                },
            ) => na == nb && self.same_pattern_list(pa, pb) && self.same_stmt(*ba, *bb),
            (K::Object { props: pa }, K::Object { props: pb }) => {
                pa.len() == pb.len()
                    && pa.iter().zip(pb).all(|(x, y)| self.same_object_prop(x, y))
            }
            (K::Array { elements: ea }, K::Array { elements: eb }) => {
                self.same_expr_list(ea, eb)
            }
            _ => false,
        }
    }

    /// Span-ignoring structural equality of two statements.
    pub fn same_stmt(&self, a: StmtId, b: StmtId) -> bool {
        use StmtKind as K;

        match (&self.stmt(a).kind, &self.stmt(b).kind) {
            (K::Expr(x), K::Expr(y)) => self.same_expr(*x, *y),
            (K::VarDecl(x), K::VarDecl(y)) => self.same_var_decl(x, y),
            (K::Func(x), K::Func(y)) => {
                x.name == y.name
                    && x.exported == y.exported
                    && self.same_pattern_list(&x.params, &y.params)
                    && self.same_stmt(x.body, y.body)
            }
            (K::Return(x), K::Return(y)) => match (x, y) {
                (None, None) => true,
                (Some(x), Some(y)) => self.same_expr(*x, *y),
                _ => false,
            },
            (
                K::If {
                    test: ta,
                    cons: ca,
                    alt: aa,
                },
                K::If {
                    test: tb,
                    cons: cb,
                    alt: ab,
                },
            ) => {
                self.same_expr(*ta, *tb)
                    && self.same_stmt(*ca, *cb)
                    && match (aa, ab) {
                        (None, None) => true,
                        (Some(x), Some(y)) => self.same_stmt(*x, *y),
                        _ => false,
                    }
            }
            (K::While { test: ta, body: ba }, K::While { test: tb, body: bb }) => {
                self.same_expr(*ta, *tb) && self.same_stmt(*ba, *bb)
            }
            (K::Block(xs), K::Block(ys)) => {
                xs.len() == ys.len()
                    && xs.iter().zip(ys).all(|(x, y)| self.same_stmt(*x, *y))
            }
            (K::Empty, K::Empty) => true,
            _ => false,
        }
    }

    fn same_expr_list(&self, a: &[ExprId], b: &[ExprId]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| self.same_expr(*x, *y))
    }

    fn same_member_prop(&self, a: &MemberProp, b: &MemberProp) -> bool {
        match (a, b) {
            (MemberProp::Ident { name: x, .. }, MemberProp::Ident { name: y, .. }) => x == y,
            (MemberProp::Computed(x), MemberProp::Computed(y)) => self.same_expr(*x, *y),
            _ => false,
        }
    }

    fn same_arrow_body(&self, a: ArrowBody, b: ArrowBody) -> bool {
        match (a, b) {
            (ArrowBody::Expr(x), ArrowBody::Expr(y)) => self.same_expr(x, y),
            (ArrowBody::Block(x), ArrowBody::Block(y)) => self.same_stmt(x, y),
            _ => false,
        }
    }

    fn same_object_prop(&self, a: &ObjectProp, b: &ObjectProp) -> bool {
        self.same_prop_key(&a.key, &b.key) && self.same_expr(a.value, b.value)
    }

    fn same_prop_key(&self, a: &PropKey, b: &PropKey) -> bool {
        match (a, b) {
            (PropKey::Ident(x), PropKey::Ident(y)) => x == y,
            (PropKey::Str { value: x, .. }, PropKey::Str { value: y, .. }) => x == y,
            (PropKey::Computed(x), PropKey::Computed(y)) => self.same_expr(*x, *y),
            _ => false,
        }
    }

    fn same_var_decl(&self, a: &VarDecl, b: &VarDecl) -> bool {
        a.kind == b.kind
            && a.exported == b.exported
            && a.declarators.len() == b.declarators.len()
            && a.declarators
                .iter()
                .zip(&b.declarators)
                .all(|(x, y)| self.same_declarator(x, y))
    }

    fn same_declarator(&self, a: &Declarator, b: &Declarator) -> bool {
        same_pattern(&a.pattern, &b.pattern)
            && match (a.init, b.init) {
                (None, None) => true,
                (Some(x), Some(y)) => self.same_expr(x, y),
                _ => false,
            }
    }

    fn same_pattern_list(&self, a: &[Pattern], b: &[Pattern]) -> bool {
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| same_pattern(x, y))
    }
}

/// Span-ignoring structural equality of binding patterns.
pub fn same_pattern(a: &Pattern, b: &Pattern) -> bool {
    match (a, b) {
        (Pattern::Ident(x), Pattern::Ident(y)) => x.name == y.name,
        (Pattern::Object(x), Pattern::Object(y)) => {
            x.props.len() == y.props.len()
                && x.props.iter().zip(&y.props).all(|(p, q)| {
                    p.key == q.key
                        && match (&p.value, &q.value) {
                            (None, None) => true,
                            (Some(v), Some(w)) => same_pattern(v, w),
                            _ => false,
                        }
                })
        }
        (Pattern::Array(x), Pattern::Array(y)) => {
            x.elements.len() == y.elements.len()
                && x.elements
                    .iter()
                    .zip(&y.elements)
                    .all(|(p, q)| match (p, q) {
                        (None, None) => true,
                        (Some(v), Some(w)) => same_pattern(v, w),
                        _ => false,
                    })
        }
        (Pattern::Rest(x), Pattern::Rest(y)) => same_pattern(&x.arg, &y.arg),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_expr_ignores_spans_and_quoting() {
        let mut arena = ExprArena::new();
        let a = arena.alloc_expr(
            ExprKind::Str {
                value: "Hi".into(),
                raw: "\"Hi\"".into(),
            },
            Span::new(0, 4),
        );
        let b = arena.alloc_expr(
            ExprKind::Str {
                value: "Hi".into(),
                raw: "'Hi'".into(),
            },
            Span::new(20, 24),
        );
        assert!(arena.same_expr(a, b));
    }

    #[test]
    fn same_expr_compares_structure_recursively() {
        let mut arena = ExprArena::new();
        let obj_a = arena.alloc_expr(ExprKind::Ident("console".into()), Span::new(0, 7));
        let member_a = arena.alloc_expr(
            ExprKind::Member {
                object: obj_a,
                property: MemberProp::Ident {
                    name: "log".into(),
                    span: Span::new(8, 11),
                },
            },
            Span::new(0, 11),
        );
        let obj_b = arena.alloc_expr(ExprKind::Ident("console".into()), Span::new(30, 37));
        let member_b = arena.alloc_expr(
            ExprKind::Member {
                object: obj_b,
                property: MemberProp::Ident {
                    name: "log".into(),
                    span: Span::new(38, 41),
                },
            },
            Span::new(30, 41),
        );
        let member_c = arena.alloc_expr(
            ExprKind::Member {
                object: obj_b,
                property: MemberProp::Ident {
                    name: "warn".into(),
                    span: Span::new(38, 42),
                },
            },
            Span::new(30, 42),
        );

        assert!(arena.same_expr(member_a, member_b));
        assert!(!arena.same_expr(member_a, member_c));
        assert!(!arena.same_expr(member_a, obj_a));
    }
}
