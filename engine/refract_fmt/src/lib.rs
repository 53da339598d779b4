//! Subtree printer.
//!
//! Renders any arena expression or statement back to source text with
//! precedence-aware parenthesization. Refactorings use it to build
//! replacement snippets; whole-buffer reprinting is never needed
//! because rewrites are span-anchored edits.

mod emitter;
mod render;

#[cfg(test)]
mod tests;

pub use emitter::{Emitter, StringEmitter};

use refract_ir::ast::{ExprKind, Pattern};
use refract_ir::{ExprArena, ExprId, StmtId};
use render::Renderer;

/// Binding power of expression positions. A child whose own power is
/// lower than its position's minimum gets wrapped in parentheses —
/// both here when rendering and in the engine when splicing rendered
/// snippets into foreign slots.
pub mod prec {
    pub const ASSIGN: u8 = 2;
    pub const COND: u8 = 3;
    pub const UNARY: u8 = 15;
    pub const POSTFIX: u8 = 18;
    pub const PRIMARY: u8 = 20;
}

/// Own binding power of an expression node.
pub fn expr_power(arena: &ExprArena, id: ExprId) -> u8 {
    match &arena.expr(id).kind {
        ExprKind::Assign { .. } | ExprKind::Arrow { .. } => prec::ASSIGN,
        ExprKind::Cond { .. } => prec::COND,
        ExprKind::Binary { op, .. } => op.precedence(),
        ExprKind::Logical { op, .. } => op.precedence(),
        ExprKind::Unary { .. } => prec::UNARY,
        ExprKind::Member { .. } | ExprKind::Call { .. } => prec::POSTFIX,
        _ => prec::PRIMARY,
    }
}

/// Render an expression to source text.
pub fn print_expr(arena: &ExprArena, id: ExprId) -> String {
    let mut out = StringEmitter::new();
    Renderer::new(arena, &mut out).expr(id, 0);
    out.output()
}

/// Render an expression destined for a slot demanding `min_power`,
/// parenthesizing when the expression binds weaker.
pub fn print_expr_with_power(arena: &ExprArena, id: ExprId, min_power: u8) -> String {
    let mut out = StringEmitter::new();
    Renderer::new(arena, &mut out).expr(id, min_power);
    out.output()
}

/// Render a statement to source text.
///
/// `base` is the column the statement starts at; continuation lines of
/// multi-line constructs are indented relative to it.
pub fn print_stmt(arena: &ExprArena, id: StmtId, base: usize) -> String {
    let mut out = StringEmitter::new();
    Renderer::new(arena, &mut out).stmt(id, base);
    out.output()
}

/// Render a statement destined for an `if`/`else` branch position:
/// blocks render as themselves, bare statements get braces so the
/// rebuilt construct cannot change its else-binding.
pub fn print_branch(arena: &ExprArena, id: StmtId, base: usize) -> String {
    let mut out = StringEmitter::new();
    Renderer::new(arena, &mut out).stmt_as_branch(id, base);
    out.output()
}

/// Render a binding pattern to source text.
pub fn print_pattern(arena: &ExprArena, pattern: &Pattern) -> String {
    let mut out = StringEmitter::new();
    Renderer::new(arena, &mut out).pattern(pattern);
    out.output()
}
