//! Precedence-aware rendering of arena nodes back to source text.

use refract_ir::ast::{
    ArrowBody, ExprKind, MemberProp, ObjectProp, Pattern, PropKey, StmtKind, UnaryOp,
};
use refract_ir::{ExprArena, ExprId, StmtId};

use crate::emitter::Emitter;

use crate::prec;

/// Spaces per nesting level.
const INDENT: usize = 2;

pub(crate) struct Renderer<'a, E: Emitter> {
    arena: &'a ExprArena,
    out: &'a mut E,
}

impl<'a, E: Emitter> Renderer<'a, E> {
    pub(crate) fn new(arena: &'a ExprArena, out: &'a mut E) -> Self {
        Renderer { arena, out }
    }

    pub(crate) fn expr(&mut self, id: ExprId, min_power: u8) {
        if crate::expr_power(self.arena, id) < min_power {
            self.out.emit("(");
            self.expr_unwrapped(id);
            self.out.emit(")");
        } else {
            self.expr_unwrapped(id);
        }
    }

    fn expr_unwrapped(&mut self, id: ExprId) {
        match &self.arena.expr(id).kind {
            ExprKind::Null => self.out.emit("null"),
            ExprKind::Bool(true) => self.out.emit("true"),
            ExprKind::Bool(false) => self.out.emit("false"),
            ExprKind::Num { raw } => self.out.emit(raw),
            ExprKind::Str { raw, .. } => self.out.emit(raw),
            ExprKind::Template { quasis, exprs } => {
                self.out.emit("`");
                for (i, quasi) in quasis.iter().enumerate() {
                    self.out.emit(&quasi.raw);
                    if let Some(&expr) = exprs.get(i) {
                        self.out.emit("${");
                        self.expr(expr, 0);
                        self.out.emit("}");
                    }
                }
                self.out.emit("`");
            }
            ExprKind::Ident(name) => self.out.emit(name),
            ExprKind::Member { object, property } => {
                self.expr(*object, prec::POSTFIX);
                match property {
                    MemberProp::Ident { name, .. } => {
                        self.out.emit(".");
                        self.out.emit(name);
                    }
                    MemberProp::Computed(expr) => {
                        self.out.emit("[");
                        self.expr(*expr, 0);
                        self.out.emit("]");
                    }
                }
            }
            ExprKind::Call { callee, args } => {
                self.expr(*callee, prec::POSTFIX);
                self.out.emit("(");
                for (i, &arg) in args.iter().enumerate() {
                    if i > 0 {
                        self.out.emit(", ");
                    }
                    self.expr(arg, prec::ASSIGN);
                }
                self.out.emit(")");
            }
            ExprKind::Unary { op, arg } => {
                self.out.emit(op.as_str());
                // A nested sign would read as `--`/`++`; parenthesize.
                let min = match op {
                    UnaryOp::Minus | UnaryOp::Plus => prec::UNARY + 1,
                    _ => prec::UNARY,
                };
                self.expr(*arg, min);
            }
            ExprKind::Binary { op, lhs, rhs } => {
                self.expr(*lhs, op.precedence());
                self.out.emit(" ");
                self.out.emit(op.as_str());
                self.out.emit(" ");
                self.expr(*rhs, op.precedence() + 1);
            }
            ExprKind::Logical { op, lhs, rhs } => {
                self.expr(*lhs, op.precedence());
                self.out.emit(" ");
                self.out.emit(op.as_str());
                self.out.emit(" ");
                self.expr(*rhs, op.precedence() + 1);
            }
            ExprKind::Assign { op, target, value } => {
                self.expr(*target, prec::POSTFIX);
                self.out.emit(" ");
                self.out.emit(op.as_str());
                self.out.emit(" ");
                self.expr(*value, prec::ASSIGN);
            }
            ExprKind::Cond { test, cons, alt } => {
                self.expr(*test, prec::COND + 1);
                self.out.emit(" ? ");
                self.expr(*cons, prec::ASSIGN);
                self.out.emit(" : ");
                self.expr(*alt, prec::ASSIGN);
            }
            ExprKind::Arrow { params, body } => {
                if let [Pattern::Ident(pat)] = params.as_slice() {
                    self.out.emit(&pat.name);
                } else {
                    self.out.emit("(");
                    self.params(params);
                    self.out.emit(")");
                }
                self.out.emit(" => ");
                match body {
                    ArrowBody::Expr(expr) => {
                        // An object literal body would read as a block.
                        if matches!(self.arena.expr(*expr).kind, ExprKind::Object { .. }) {
                            self.out.emit("(");
                            self.expr(*expr, prec::ASSIGN);
                            self.out.emit(")");
                        } else {
                            self.expr(*expr, prec::ASSIGN);
                        }
                    }
                    ArrowBody::Block(block) => self.block(*block, 0),
                }
            }
            ExprKind::Function { name, params, body } => {
                self.out.emit("function");
                if let Some(name) = name {
                    self.out.emit(" ");
                    self.out.emit(name);
                }
                self.out.emit("(");
                self.params(params);
                self.out.emit(") ");
                self.block(*body, 0);
            }
            ExprKind::Object { props } => {
                if props.is_empty() {
                    self.out.emit("{}");
                    return;
                }
                self.out.emit("{ ");
                for (i, prop) in props.iter().enumerate() {
                    if i > 0 {
                        self.out.emit(", ");
                    }
                    self.object_prop(prop);
                }
                self.out.emit(" }");
            }
            ExprKind::Array { elements } => {
                self.out.emit("[");
                for (i, &element) in elements.iter().enumerate() {
                    if i > 0 {
                        self.out.emit(", ");
                    }
                    self.expr(element, prec::ASSIGN);
                }
                self.out.emit("]");
            }
        }
    }

    fn object_prop(&mut self, prop: &ObjectProp) {
        let shorthand = prop.shorthand
            && matches!(
                (&prop.key, &self.arena.expr(prop.value).kind),
                (PropKey::Ident(key), ExprKind::Ident(name)) if key == name
            );
        match &prop.key {
            PropKey::Ident(name) => self.out.emit(name),
            PropKey::Str { raw, .. } => self.out.emit(raw),
            PropKey::Computed(expr) => {
                self.out.emit("[");
                self.expr(*expr, 0);
                self.out.emit("]");
            }
        }
        if !shorthand {
            self.out.emit(": ");
            self.expr(prop.value, prec::ASSIGN);
        }
    }

    pub(crate) fn pattern(&mut self, pattern: &Pattern) {
        match pattern {
            Pattern::Ident(pat) => self.out.emit(&pat.name),
            Pattern::Object(pat) => {
                if pat.props.is_empty() {
                    self.out.emit("{}");
                    return;
                }
                self.out.emit("{ ");
                for (i, prop) in pat.props.iter().enumerate() {
                    if i > 0 {
                        self.out.emit(", ");
                    }
                    self.out.emit(&prop.key);
                    if let Some(value) = &prop.value {
                        self.out.emit(": ");
                        self.pattern(value);
                    }
                }
                self.out.emit(" }");
            }
            Pattern::Array(pat) => {
                self.out.emit("[");
                for (i, element) in pat.elements.iter().enumerate() {
                    if i > 0 {
                        self.out.emit(", ");
                    }
                    if let Some(element) = element {
                        self.pattern(element);
                    }
                }
                self.out.emit("]");
            }
            Pattern::Rest(pat) => {
                self.out.emit("...");
                self.pattern(&pat.arg);
            }
        }
    }

    fn params(&mut self, params: &[Pattern]) {
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.out.emit(", ");
            }
            self.pattern(param);
        }
    }

    /// Render a statement. `base` is the column the statement starts
    /// at; continuation lines are indented relative to it.
    pub(crate) fn stmt(&mut self, id: StmtId, base: usize) {
        match &self.arena.stmt(id).kind {
            StmtKind::Expr(expr) => {
                self.expr(*expr, 0);
                self.out.emit(";");
            }
            StmtKind::VarDecl(decl) => {
                if decl.exported {
                    self.out.emit("export ");
                }
                self.out.emit(decl.kind.as_str());
                self.out.emit(" ");
                for (i, declarator) in decl.declarators.iter().enumerate() {
                    if i > 0 {
                        self.out.emit(", ");
                    }
                    self.pattern(&declarator.pattern);
                    if let Some(init) = declarator.init {
                        self.out.emit(" = ");
                        self.expr(init, prec::ASSIGN);
                    }
                }
                self.out.emit(";");
            }
            StmtKind::Func(func) => {
                if func.exported {
                    self.out.emit("export ");
                }
                self.out.emit("function ");
                self.out.emit(&func.name);
                self.out.emit("(");
                self.params(&func.params);
                self.out.emit(") ");
                self.block(func.body, base);
            }
            StmtKind::Return(arg) => {
                self.out.emit("return");
                if let Some(arg) = arg {
                    self.out.emit(" ");
                    self.expr(*arg, 0);
                }
                self.out.emit(";");
            }
            StmtKind::If { test, cons, alt } => {
                self.out.emit("if (");
                self.expr(*test, 0);
                self.out.emit(") ");
                self.stmt_as_branch(*cons, base);
                if let Some(alt) = alt {
                    self.out.emit(" else ");
                    self.stmt_as_branch(*alt, base);
                }
            }
            StmtKind::While { test, body } => {
                self.out.emit("while (");
                self.expr(*test, 0);
                self.out.emit(") ");
                self.stmt_as_branch(*body, base);
            }
            StmtKind::Block(_) => self.block(id, base),
            StmtKind::Empty => self.out.emit(";"),
        }
    }

    /// Render a branch body, bracing bare statements so a rebuilt
    /// `if`/`else` never picks up a dangling-else reading.
    pub(crate) fn stmt_as_branch(&mut self, id: StmtId, base: usize) {
        if matches!(self.arena.stmt(id).kind, StmtKind::Block(_)) {
            self.block(id, base);
        } else {
            self.out.emit("{");
            self.out.emit_newline();
            self.out.emit_indent(base + INDENT);
            self.stmt(id, base + INDENT);
            self.out.emit_newline();
            self.out.emit_indent(base);
            self.out.emit("}");
        }
    }

    /// Render a block statement.
    pub(crate) fn block(&mut self, id: StmtId, base: usize) {
        let StmtKind::Block(stmts) = &self.arena.stmt(id).kind else {
            // Branches always hold blocks in well-formed trees; render
            // the stray statement braced instead of failing.
            self.stmt_as_branch(id, base);
            return;
        };
        if stmts.is_empty() {
            self.out.emit("{}");
            return;
        }
        self.out.emit("{");
        self.out.emit_newline();
        for &stmt in stmts {
            self.out.emit_indent(base + INDENT);
            self.stmt(stmt, base + INDENT);
            self.out.emit_newline();
        }
        self.out.emit_indent(base);
        self.out.emit("}");
    }
}
