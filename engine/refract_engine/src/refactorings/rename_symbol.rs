//! Rename symbol.
//!
//! Delegates to the host's native rename first; when the host cannot
//! do it, falls back to prompting for a name and rewriting every
//! same-named identifier in the file, bindings included.

use refract_ir::ast::{ExprKind, Pattern, StmtKind};
use refract_ir::visitor::{walk_pattern, walk_stmt, Visitor};
use refract_ir::{ExprArena, LineIndex, Module, Selection, Span, StmtId};

use crate::command::Command;
use crate::editor::{Modification, NativeOp};
use crate::matcher::find_closest_expr;
use crate::occurrences::collect_sites;
use crate::refactoring::Refactoring;
use crate::refactorings::DOES_NOT_PARSE;
use crate::state::{RefactoringState, StateKind};

const NO_SYMBOL: &str = "there is no symbol to rename at the current selection";
const INVALID_NAME: &str = "that is not a valid identifier";

/// Rename the identifier under the cursor.
pub struct RenameSymbol;

impl Refactoring for RenameSymbol {
    fn command_name(&self) -> &'static str {
        "rename-symbol"
    }

    fn run(&self, state: &RefactoringState) -> Command {
        match &state.kind {
            StateKind::New => Command::delegate(NativeOp::RenameSymbol),
            StateKind::CommandNotSupported => match symbol_under_cursor(state) {
                Some((name, _)) => Command::ask_user_input(Some(name)),
                None => Command::show_error(NO_SYMBOL),
            },
            StateKind::UserInputResponse { value: None } => Command::do_nothing(),
            StateKind::UserInputResponse { value: Some(new_name) } => {
                self.apply_rename(state, new_name)
            }
            other => {
                tracing::warn!(state = ?other, "rename-symbol re-entered with unexpected state");
                Command::do_nothing()
            }
        }
    }
}

impl RenameSymbol {
    fn apply_rename(&self, state: &RefactoringState, new_name: &str) -> Command {
        let Some((old_name, read_at)) = symbol_under_cursor(state) else {
            return Command::show_error(NO_SYMBOL);
        };
        if new_name == old_name {
            return Command::do_nothing();
        }
        if !is_valid_identifier(new_name) {
            return Command::show_error(INVALID_NAME);
        }

        // Recompute against the state snapshot; nothing survives from
        // the previous round-trip.
        let Ok(module) = refract_parse::parse(&state.code) else {
            return Command::show_error(DOES_NOT_PARSE);
        };
        let index = LineIndex::new(&state.code);
        let modifications = rename_modifications(&module, &index, &old_name, new_name);
        if modifications.is_empty() {
            return Command::show_error(NO_SYMBOL);
        }

        let get_modifications = move |_current: &str| modifications.clone();
        Command::read_then_write(read_at, Box::new(get_modifications), None)
    }
}

/// The identifier expression under the cursor.
fn symbol_under_cursor(state: &RefactoringState) -> Option<(String, Selection)> {
    let module = refract_parse::parse(&state.code).ok()?;
    let index = LineIndex::new(&state.code);
    let target = index.span_of(state.selection)?;
    let found = find_closest_expr(&module, target, |arena, id, _| {
        matches!(arena.expr(id).kind, ExprKind::Ident(_))
    })?;
    let ExprKind::Ident(name) = &module.arena.expr(found.id).kind else {
        return None;
    };
    Some((name.clone(), index.selection_of(found.span)))
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    chars
        .next()
        .is_some_and(|head| head.is_ascii_alphabetic() || head == '_' || head == '$')
        && chars.all(|ch| ch.is_ascii_alphanumeric() || ch == '_' || ch == '$')
}

/// Every site to rewrite: identifier references, pattern bindings,
/// and function declaration names.
fn rename_modifications(
    module: &Module,
    index: &LineIndex,
    old_name: &str,
    new_name: &str,
) -> Vec<Modification> {
    let mut modifications = Vec::new();

    for site in collect_sites(&module.arena, &module.body) {
        if !matches!(&module.arena.expr(site.id).kind, ExprKind::Ident(name) if name == old_name)
        {
            continue;
        }
        // A shorthand value rename must keep the object's shape:
        // `{ a }` becomes `{ a: b }`.
        match &site.shorthand {
            Some(shorthand) => modifications.push(Modification {
                code: format!("{}: {new_name}", shorthand.key),
                selection: index.selection_of(shorthand.prop_span),
            }),
            None => modifications.push(Modification {
                code: new_name.to_owned(),
                selection: index.selection_of(site.span),
            }),
        }
    }

    let mut bindings = BindingSites {
        old_name,
        spans: Vec::new(),
        expanded: Vec::new(),
    };
    bindings.visit_module(module);
    for span in bindings.spans {
        modifications.push(Modification {
            code: new_name.to_owned(),
            selection: index.selection_of(span),
        });
    }
    for (key, span) in bindings.expanded {
        modifications.push(Modification {
            code: format!("{key}: {new_name}"),
            selection: index.selection_of(span),
        });
    }

    modifications
}

/// Collects binding-position spans of one name.
struct BindingSites<'a> {
    old_name: &'a str,
    /// Plain spans to replace with the new name.
    spans: Vec<Span>,
    /// Shorthand pattern properties to expand to `key: new`.
    expanded: Vec<(String, Span)>,
}

impl<'ast> Visitor<'ast> for BindingSites<'_> {
    fn visit_stmt(&mut self, id: StmtId, arena: &'ast ExprArena) {
        if let StmtKind::Func(func) = &arena.stmt(id).kind {
            if func.name == self.old_name {
                self.spans.push(func.name_span);
            }
        }
        walk_stmt(self, id, arena);
    }

    fn visit_pattern(&mut self, pattern: &'ast Pattern, arena: &'ast ExprArena) {
        match pattern {
            Pattern::Ident(pat) if pat.name == self.old_name => {
                self.spans.push(pat.span);
            }
            Pattern::Object(pat) => {
                for prop in &pat.props {
                    if prop.value.is_none() && prop.key == self.old_name {
                        self.expanded.push((prop.key.clone(), prop.span));
                    }
                }
            }
            _ => {}
        }
        walk_pattern(self, pattern, arena);
    }
}
