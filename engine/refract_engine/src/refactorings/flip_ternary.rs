//! Flip ternary: swap the branches and negate the condition.

use refract_fmt::{prec, print_expr_with_power};
use refract_ir::ast::ExprKind;
use refract_ir::LineIndex;

use crate::command::Command;
use crate::matcher::find_closest_expr;
use crate::refactoring::{Refactoring, TransformResult};
use crate::refactorings::negate::negated_text;
use crate::refactorings::DOES_NOT_PARSE;
use crate::state::{RefactoringState, StateKind};

const NO_TERNARY: &str = "there is no ternary to flip at the current selection";

/// `a ? x : y` becomes `!a ? y : x`.
pub struct FlipTernary;

impl Refactoring for FlipTernary {
    fn command_name(&self) -> &'static str {
        "flip-ternary"
    }

    fn run(&self, state: &RefactoringState) -> Command {
        if !matches!(state.kind, StateKind::New) {
            tracing::warn!(state = ?state.kind, "flip-ternary re-entered unexpectedly");
            return Command::do_nothing();
        }
        let Ok(module) = refract_parse::parse(&state.code) else {
            return Command::show_error(DOES_NOT_PARSE);
        };
        let index = LineIndex::new(&state.code);
        let Some(target) = index.span_of(state.selection) else {
            return Command::show_error(NO_TERNARY);
        };

        let Some(found) = find_closest_expr(&module, target, |arena, id, _| {
            matches!(arena.expr(id).kind, ExprKind::Cond { .. })
        }) else {
            return Command::show_error(NO_TERNARY);
        };
        let arena = &module.arena;
        let ExprKind::Cond { test, cons, alt } = &arena.expr(found.id).kind else {
            return Command::show_error(NO_TERNARY);
        };

        let flipped = format!(
            "{} ? {} : {}",
            negated_text(arena, *test),
            print_expr_with_power(arena, *alt, prec::ASSIGN),
            print_expr_with_power(arena, *cons, prec::ASSIGN),
        );
        let result = TransformResult::replacing_span(&state.code, found.span, &flipped);
        if result.has_code_changed {
            Command::write_with_cursor(result.code, state.selection.start())
        } else {
            Command::show_error(NO_TERNARY)
        }
    }
}
