//! Inline variable.
//!
//! The inverse of extraction: find the declarator under the cursor,
//! substitute its initializer at every reference in scope, and remove
//! the declaration. Redeclared, reassigned, and exported bindings are
//! vetoed with a distinct message so the user knows why nothing
//! happened.

use refract_fmt::expr_power;
use refract_ir::ast::{Declarator, ExprKind, Pattern, StmtKind, VarDecl};
use refract_ir::visitor::Visitor;
use refract_ir::{ExprArena, LineIndex, Module, Selection, Span, StmtId};

use crate::command::Command;
use crate::editor::Modification;
use crate::matcher::{find_closest_stmt, StmtMatch};
use crate::occurrences::{
    collect_sites, IdentifierReference, ShorthandReference, VariableOccurrences,
};
use crate::refactoring::Refactoring;
use crate::refactorings::DOES_NOT_PARSE;
use crate::state::{RefactoringState, StateKind};

const NO_DECLARATION: &str = "there is no variable declaration at the current selection";
const NO_VALUE: &str = "this variable has no value to inline";
const NO_REFERENCES: &str = "there are no references to this variable";
const IS_REDECLARED: &str =
    "this variable is assigned again later, inlining it would change behavior";
const IS_EXPORTED: &str = "this variable is exported, inlining it would break importers";
const UNSUPPORTED_PATTERN: &str = "this destructuring pattern cannot be inlined";

/// Inline the variable declared under the cursor.
pub struct InlineVariable;

impl Refactoring for InlineVariable {
    fn command_name(&self) -> &'static str {
        "inline-variable"
    }

    fn run(&self, state: &RefactoringState) -> Command {
        if !matches!(state.kind, StateKind::New) {
            tracing::warn!(state = ?state.kind, "inline-variable re-entered unexpectedly");
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
        let StmtKind::VarDecl(decl) = &module.arena.stmt(found.id).kind else {
            return Command::show_error(NO_DECLARATION);
        };

        match build_inlining(&module, &index, &found, decl, target) {
            Ok(occurrences) => {
                if occurrences.is_exported {
                    return Command::show_error(IS_EXPORTED);
                }
                if occurrences.is_redeclared {
                    return Command::show_error(IS_REDECLARED);
                }
                if !occurrences.has_identifiers_to_update() {
                    return Command::show_error(NO_REFERENCES);
                }

                let read_at = occurrences.value_selection;
                let get_modifications = move |value: &str| {
                    let mut modifications = occurrences.update_identifiers_with(value);
                    modifications.push(Modification {
                        code: String::new(),
                        selection: occurrences.code_to_remove_selection,
                    });
                    modifications
                };
                Command::read_then_write(read_at, Box::new(get_modifications), None)
            }
            Err(reason) => Command::show_error(reason),
        }
    }
}

/// Resolve the declarator under the cursor into the occurrence
/// contract, or a veto message.
fn build_inlining(
    module: &Module,
    index: &LineIndex,
    found: &StmtMatch,
    decl: &VarDecl,
    target: Span,
) -> Result<VariableOccurrences, &'static str> {
    let arena = &module.arena;

    let declarator_idx = decl
        .declarators
        .iter()
        .position(|declarator| declarator.span.contains_span(target))
        .or(if decl.declarators.len() == 1 { Some(0) } else { None })
        .ok_or(NO_DECLARATION)?;
    let declarator = &decl.declarators[declarator_idx];
    let init = declarator.init.ok_or(NO_VALUE)?;

    // The bound name, and the property key when the binding came from
    // an object pattern.
    let (name, access_key, removed_prop) = match &declarator.pattern {
        Pattern::Ident(pat) => (pat.name.clone(), None, None),
        Pattern::Object(pat) => {
            let prop_idx = pat
                .props
                .iter()
                .position(|prop| prop.span.contains_span(target))
                .or(if pat.props.len() == 1 { Some(0) } else { None })
                .ok_or(UNSUPPORTED_PATTERN)?;
            let prop = &pat.props[prop_idx];
            let bound = match &prop.value {
                None => prop.key.clone(),
                Some(Pattern::Ident(pat)) => pat.name.clone(),
                Some(_) => return Err(UNSUPPORTED_PATTERN),
            };
            let removed_prop = (pat.props.len() > 1).then_some((pat, prop_idx));
            (bound, Some(prop.key.clone()), removed_prop)
        }
        _ => return Err(UNSUPPORTED_PATTERN),
    };

    let roots = scope_roots(module, found);
    let sites = collect_sites(arena, &roots);

    let mut is_redeclared = false;
    let mut references = Vec::new();
    for site in &sites {
        if !matches!(&arena.expr(site.id).kind, ExprKind::Ident(ident) if *ident == name) {
            continue;
        }
        if site.in_assign_target {
            is_redeclared = true;
            continue;
        }
        if site.span.start < declarator.span.end {
            continue;
        }
        references.push(IdentifierReference {
            selection: index.selection_of(site.span),
            slot_power: site.slot_power,
            shorthand: site.shorthand.as_ref().map(|shorthand| ShorthandReference {
                key: shorthand.key.clone(),
                selection: index.selection_of(shorthand.prop_span),
            }),
        });
    }
    is_redeclared |= has_other_binding(arena, &roots, &name, declarator.span);

    let code_to_remove_selection = match removed_prop {
        Some((pat, prop_idx)) => property_removal_selection(index, pat, prop_idx),
        None => {
            if decl.declarators.len() == 1 {
                declaration_removal_selection(index, arena.stmt_span(found.id))
            } else {
                declarator_removal_selection(index, &decl.declarators, declarator_idx)
            }
        }
    };

    Ok(VariableOccurrences {
        code_to_remove_selection,
        value_selection: index.selection_of(arena.expr_span(init)),
        value_power: expr_power(arena, init),
        access_key,
        is_redeclared,
        is_exported: decl.exported,
        references,
    })
}

/// The statements bounding the search: the enclosing function body,
/// else the whole file.
fn scope_roots(module: &Module, found: &StmtMatch) -> Vec<StmtId> {
    match found.fn_bodies.last() {
        Some(&block) => match &module.arena.stmt(block).kind {
            StmtKind::Block(stmts) => stmts.clone(),
            _ => vec![block],
        },
        None => module.body.clone(),
    }
}

/// Does any other declarator in scope bind the same name?
fn has_other_binding(
    arena: &ExprArena,
    roots: &[StmtId],
    name: &str,
    own_span: Span,
) -> bool {
    struct Bindings<'a> {
        name: &'a str,
        own_span: Span,
        found: bool,
    }

    impl<'ast> refract_ir::visitor::Visitor<'ast> for Bindings<'_> {
        fn visit_stmt(&mut self, id: StmtId, arena: &'ast ExprArena) {
            if let StmtKind::VarDecl(decl) = &arena.stmt(id).kind {
                for declarator in &decl.declarators {
                    if declarator.span == self.own_span {
                        continue;
                    }
                    let mut bound = Vec::new();
                    declarator.pattern.bound_names(&mut bound);
                    if bound.contains(&self.name) {
                        self.found = true;
                    }
                }
            }
            refract_ir::visitor::walk_stmt(self, id, arena);
        }
    }

    let mut visitor = Bindings {
        name,
        own_span,
        found: false,
    };
    for &root in roots {
        visitor.visit_stmt(root, arena);
    }
    visitor.found
}

/// Remove a whole declaration statement, swallowing its line when it
/// stands alone.
fn declaration_removal_selection(index: &LineIndex, span: Span) -> Selection {
    let selection = index.selection_of(span);
    let ends_its_line = index.line_len(selection.end().line) == selection.end().character;
    let starts_its_line = selection.start().character == 0;
    if starts_its_line && ends_its_line {
        selection.extend_to_start_of_next_line()
    } else {
        selection
    }
}

/// Remove one declarator from a multi-declarator statement, including
/// the separating comma.
fn declarator_removal_selection(
    index: &LineIndex,
    declarators: &[Declarator],
    idx: usize,
) -> Selection {
    let span = if idx + 1 < declarators.len() {
        Span::new(declarators[idx].span.start, declarators[idx + 1].span.start)
    } else {
        Span::new(declarators[idx - 1].span.end, declarators[idx].span.end)
    };
    index.selection_of(span)
}

/// Remove one property from a multi-property object pattern.
fn property_removal_selection(
    index: &LineIndex,
    pattern: &refract_ir::ast::ObjectPat,
    idx: usize,
) -> Selection {
    let props = &pattern.props;
    let span = if idx + 1 < props.len() {
        Span::new(props[idx].span.start, props[idx + 1].span.start)
    } else {
        Span::new(props[idx - 1].span.end, props[idx].span.end)
    };
    index.selection_of(span)
}
