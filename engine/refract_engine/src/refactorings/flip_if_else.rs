//! Flip if/else: swap the branches and negate the guard.

use refract_fmt::print_branch;
use refract_ir::ast::StmtKind;
use refract_ir::LineIndex;

use crate::command::Command;
use crate::matcher::find_closest_stmt;
use crate::refactoring::{Refactoring, TransformResult};
use crate::refactorings::negate::negated_text;
use crate::refactorings::DOES_NOT_PARSE;
use crate::state::{RefactoringState, StateKind};

const NO_IF: &str = "there is no if statement at the current selection";
const NO_ELSE: &str = "this if statement has no else branch to flip";

/// `if (a) x else y` becomes `if (!a) y else x`.
pub struct FlipIfElse;

impl Refactoring for FlipIfElse {
    fn command_name(&self) -> &'static str {
        "flip-if-else"
    }

    fn run(&self, state: &RefactoringState) -> Command {
        if !matches!(state.kind, StateKind::New) {
            tracing::warn!(state = ?state.kind, "flip-if-else re-entered unexpectedly");
            return Command::do_nothing();
        }
        let Ok(module) = refract_parse::parse(&state.code) else {
            return Command::show_error(DOES_NOT_PARSE);
        };
        let index = LineIndex::new(&state.code);
        let Some(target) = index.span_of(state.selection) else {
            return Command::show_error(NO_IF);
        };

        let Some(found) = find_closest_stmt(&module, target, |arena, id| {
            matches!(arena.stmt(id).kind, StmtKind::If { .. })
        }) else {
            return Command::show_error(NO_IF);
        };
        let arena = &module.arena;
        let StmtKind::If { test, cons, alt } = &arena.stmt(found.id).kind else {
            return Command::show_error(NO_IF);
        };
        // The statement is found but cannot be flipped: a distinct
        // message, not a bare "nothing happened".
        let Some(alt) = alt else {
            return Command::show_error(NO_ELSE);
        };

        let base = index.selection_of(found.span).start().character as usize;
        let flipped = format!(
            "if ({}) {} else {}",
            negated_text(arena, *test),
            print_branch(arena, *alt, base),
            print_branch(arena, *cons, base),
        );
        let result = TransformResult::replacing_span(&state.code, found.span, &flipped);
        if result.has_code_changed {
            Command::write_with_cursor(result.code, state.selection.start())
        } else {
            Command::show_error(NO_IF)
        }
    }
}
