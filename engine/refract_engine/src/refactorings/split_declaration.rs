//! Split declaration: one statement per declarator.

use refract_fmt::{prec, print_expr_with_power, print_pattern};
use refract_ir::ast::StmtKind;
use refract_ir::LineIndex;

use crate::command::Command;
use crate::matcher::find_closest_stmt;
use crate::refactoring::{Refactoring, TransformResult};
use crate::refactorings::DOES_NOT_PARSE;
use crate::state::{RefactoringState, StateKind};

const NO_DECLARATION: &str = "there is no variable declaration at the current selection";
const NOTHING_TO_SPLIT: &str = "this declaration declares a single variable, nothing to split";

/// `let a = 1, b = 2;` becomes two statements.
pub struct SplitDeclaration;

impl Refactoring for SplitDeclaration {
    fn command_name(&self) -> &'static str {
        "split-declaration"
    }

    fn run(&self, state: &RefactoringState) -> Command {
        if !matches!(state.kind, StateKind::New) {
            tracing::warn!(state = ?state.kind, "split-declaration re-entered unexpectedly");
            return Command::do_nothing();
        }
        let Ok(module) = refract_parse::parse(&state.code) else {
            return Command::show_error(DOES_NOT_PARSE);
        };
        let index = LineIndex::new(&state.code);
        let Some(target) = index.span_of(state.selection) else {
            return Command::show_error(NO_DECLARATION);
        };

        let Some(found) = find_closest_stmt(&module, target, |arena, id| {
            matches!(arena.stmt(id).kind, StmtKind::VarDecl(_))
        }) else {
            return Command::show_error(NO_DECLARATION);
        };
        let arena = &module.arena;
        let StmtKind::VarDecl(decl) = &arena.stmt(found.id).kind else {
            return Command::show_error(NO_DECLARATION);
        };
        if decl.declarators.len() < 2 {
            return Command::show_error(NOTHING_TO_SPLIT);
        }

        let base = index.selection_of(found.span).start().character as usize;
        let indent = " ".repeat(base);
        let export = if decl.exported { "export " } else { "" };
        let statements: Vec<String> = decl
            .declarators
            .iter()
            .map(|declarator| {
                let pattern = print_pattern(arena, &declarator.pattern);
                match declarator.init {
                    Some(init) => format!(
                        "{export}{} {pattern} = {};",
                        decl.kind,
                        print_expr_with_power(arena, init, prec::ASSIGN),
                    ),
                    None => format!("{export}{} {pattern};", decl.kind),
                }
            })
            .collect();
        let split = statements.join(&format!("\n{indent}"));

        let result = TransformResult::replacing_span(&state.code, found.span, &split);
        if result.has_code_changed {
            Command::write_with_cursor(result.code, state.selection.start())
        } else {
            Command::show_error(NOTHING_TO_SPLIT)
        }
    }
}
