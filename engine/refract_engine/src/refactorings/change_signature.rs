//! Change signature.
//!
//! Opens the positional-reorder prompt on the function under the
//! cursor, then rewrites the declaration and every call site — across
//! files — with the parameters in their new order. A reorder that
//! would leave a rest parameter anywhere but last is vetoed before
//! any file is touched.

use std::path::PathBuf;

use refract_fmt::{prec, print_expr_with_power, print_pattern};
use refract_ir::ast::{ExprKind, FuncDecl, Pattern, StmtKind};
use refract_ir::visitor::{walk_expr, walk_stmt, Visitor};
use refract_ir::{ExprArena, ExprId, LineIndex, Span, Spanned, StmtId};
use rustc_hash::FxHashMap;

use crate::command::Command;
use crate::editor::{ParamPosition, Update};
use crate::matcher::find_closest_stmt;
use crate::refactoring::Refactoring;
use crate::refactorings::DOES_NOT_PARSE;
use crate::state::{ReferenceCode, RefactoringState, StateKind};

const NO_FUNCTION: &str = "there is no function signature at the current selection";
const NOTHING_TO_REORDER: &str = "this function takes fewer than two parameters";
const REST_MUST_BE_LAST: &str = "a rest parameter has to stay in last position";
const INCOMPLETE_ORDER: &str = "the new parameter order is incomplete";

/// Reorder the parameters of the function under the cursor, updating
/// every reference.
pub struct ChangeSignature;

impl Refactoring for ChangeSignature {
    fn command_name(&self) -> &'static str {
        "change-signature"
    }

    fn run(&self, state: &RefactoringState) -> Command {
        let Ok(module) = refract_parse::parse(&state.code) else {
            return Command::show_error(DOES_NOT_PARSE);
        };
        let index = LineIndex::new(&state.code);
        let Some(target) = index.span_of(state.selection) else {
            return Command::show_error(NO_FUNCTION);
        };

        let Some(found) = find_closest_stmt(&module, target, |arena, id| {
            matches!(arena.stmt(id).kind, StmtKind::Func(_))
        }) else {
            return Command::show_error(NO_FUNCTION);
        };
        let StmtKind::Func(func) = &module.arena.stmt(found.id).kind else {
            return Command::show_error(NO_FUNCTION);
        };
        if func.params.len() < 2 {
            return Command::show_error(NOTHING_TO_REORDER);
        }

        match &state.kind {
            StateKind::New => {
                let positions = func
                    .params
                    .iter()
                    .enumerate()
                    .map(|(at, param)| ParamPosition {
                        label: print_pattern(&module.arena, param),
                        from: at,
                        to: at,
                    })
                    .collect();
                Command::ask_change_signature_positions(
                    positions,
                    index.selection_of(func.name_span),
                )
            }
            StateKind::WithChangeSignaturePositions {
                positions: None, ..
            } => Command::do_nothing(),
            StateKind::WithChangeSignaturePositions {
                positions: Some(positions),
                references,
            } => self.apply_reorder(state, func, positions, references),
            other => {
                tracing::warn!(state = ?other, "change-signature re-entered with unexpected state");
                Command::do_nothing()
            }
        }
    }
}

impl ChangeSignature {
    fn apply_reorder(
        &self,
        state: &RefactoringState,
        func: &FuncDecl,
        positions: &[ParamPosition],
        references: &[ReferenceCode],
    ) -> Command {
        let Some(order) = argument_order(positions, func.params.len()) else {
            return Command::show_error(INCOMPLETE_ORDER);
        };
        // The veto comes before any write: a rest parameter pushed out
        // of last position would not compile.
        let rest_at = func.params.iter().position(Pattern::is_rest);
        if let Some(rest_at) = rest_at {
            let moved_to = order.iter().position(|&from| from == rest_at);
            if moved_to != Some(func.params.len() - 1) {
                return Command::show_error(REST_MUST_BE_LAST);
            }
        }
        if order.iter().enumerate().all(|(to, &from)| to == from) {
            return Command::do_nothing();
        }

        if references.is_empty() {
            let Some(code) = reordered_code(&state.code, &func.name, &order) else {
                return Command::show_error(DOES_NOT_PARSE);
            };
            return Command::write_with_cursor(code, state.selection.start());
        }

        let mut files: FxHashMap<PathBuf, &str> = FxHashMap::default();
        for reference in references {
            files.entry(reference.path.clone()).or_insert(&reference.code);
        }
        let mut updates: Vec<Update> = Vec::with_capacity(files.len());
        let mut skipped: Vec<String> = Vec::new();
        for (path, code) in files {
            match reordered_code(code, &func.name, &order) {
                Some(code) => updates.push(Update { path, code }),
                // A reference file that no longer parses is left
                // alone rather than corrupted.
                None => {
                    tracing::warn!(?path, "skipping unparsable reference file");
                    skipped.push(path.display().to_string());
                }
            }
        }
        let command = Command::write_all(updates);
        if skipped.is_empty() {
            command
        } else {
            command.with_warning(format!(
                "some references were not updated, fix and retry: {}",
                skipped.join(", ")
            ))
        }
    }
}

/// `order[to] = from`, or `None` when the positions do not cover every
/// parameter exactly once.
fn argument_order(positions: &[ParamPosition], param_count: usize) -> Option<Vec<usize>> {
    if positions.len() != param_count {
        return None;
    }
    let mut order = vec![usize::MAX; param_count];
    for position in positions {
        if position.to >= param_count
            || position.from >= param_count
            || order[position.to] != usize::MAX
        {
            return None;
        }
        order[position.to] = position.from;
    }
    Some(order)
}

/// Rewrite one file: reorder the declaration's parameters and every
/// call's arguments.
fn reordered_code(code: &str, name: &str, order: &[usize]) -> Option<String> {
    let module = refract_parse::parse(code).ok()?;
    let mut collector = SignatureSites {
        name,
        edits: Vec::new(),
    };
    collector.visit_module(&module);

    let arena = &module.arena;
    let mut edits: Vec<(Span, String)> = Vec::new();
    for site in collector.edits {
        match site {
            SignatureSite::Declaration(params) => {
                let Some(region) = list_region(params.iter().map(|param| param.span())) else {
                    continue;
                };
                let rendered: Vec<String> = order
                    .iter()
                    .filter_map(|&from| params.get(from))
                    .map(|param| print_pattern(arena, param))
                    .collect();
                edits.push((region, rendered.join(", ")));
            }
            SignatureSite::Call(args) => {
                let Some(region) = list_region(args.iter().map(|&arg| arena.expr_span(arg)))
                else {
                    continue;
                };
                let rendered: Vec<String> = order
                    .iter()
                    .filter_map(|&from| args.get(from))
                    .map(|&arg| print_expr_with_power(arena, arg, prec::ASSIGN))
                    .collect();
                edits.push((region, rendered.join(", ")));
            }
        }
    }
    if edits.is_empty() {
        return None;
    }

    edits.sort_by(|a, b| b.0.start.cmp(&a.0.start));
    let mut next = code.to_owned();
    for (span, text) in edits {
        next.replace_range(span.to_range(), &text);
    }
    Some(next)
}

/// The span from the first element's start to the last element's end.
fn list_region(mut spans: impl Iterator<Item = Span>) -> Option<Span> {
    let first = spans.next()?;
    let last = spans.last().unwrap_or(first);
    Some(first.merge(last))
}

enum SignatureSite<'ast> {
    Declaration(&'ast [Pattern]),
    Call(&'ast [ExprId]),
}

/// Finds the declaration and call sites of one function name.
struct SignatureSites<'a, 'ast> {
    name: &'a str,
    edits: Vec<SignatureSite<'ast>>,
}

impl<'a, 'ast> Visitor<'ast> for SignatureSites<'a, 'ast> {
    fn visit_stmt(&mut self, id: StmtId, arena: &'ast ExprArena) {
        if let StmtKind::Func(func) = &arena.stmt(id).kind {
            if func.name == self.name {
                self.edits.push(SignatureSite::Declaration(&func.params));
            }
        }
        walk_stmt(self, id, arena);
    }

    fn visit_expr(&mut self, id: ExprId, arena: &'ast ExprArena) {
        if let ExprKind::Call { callee, args } = &arena.expr(id).kind {
            if matches!(&arena.expr(*callee).kind, ExprKind::Ident(name) if name == self.name) {
                self.edits.push(SignatureSite::Call(args));
            }
        }
        walk_expr(self, id, arena);
    }
}
