//! Extract variable.
//!
//! The occurrence-model backbone: match the expression under the
//! cursor, find every structurally equivalent occurrence in scope,
//! optionally ask whether to replace one or all, then insert one
//! declaration and rewrite the chosen occurrences in a single
//! read-then-write batch.

use refract_fmt::{prec, print_expr_with_power};
use refract_ir::ast::{ExprKind, MemberProp};
use refract_ir::{LineIndex, Module, Position, Selection};

use crate::command::Command;
use crate::editor::{Choice, Modification};
use crate::occurrences::{
    find_extraction_site, free_variable_name, inferred_variable_name, ExtractionSite,
};
use crate::refactoring::Refactoring;
use crate::refactorings::DOES_NOT_PARSE;
use crate::state::{RefactoringState, StateKind};

const NO_EXTRACTABLE_CODE: &str = "there is no extractable code at the current selection";
const NOT_A_PROPERTY_ACCESS: &str =
    "only a property access can be extracted through destructuring";

/// Extract the expression under the cursor into a `const` declaration.
pub struct ExtractVariable {
    destructure: bool,
}

impl ExtractVariable {
    pub fn new() -> Self {
        ExtractVariable { destructure: false }
    }

    /// Extract a property access as `const { key } = owner;`.
    pub fn with_destructuring() -> Self {
        ExtractVariable { destructure: true }
    }
}

impl Default for ExtractVariable {
    fn default() -> Self {
        Self::new()
    }
}

impl Refactoring for ExtractVariable {
    fn command_name(&self) -> &'static str {
        if self.destructure {
            "extract-variable-destructure"
        } else {
            "extract-variable"
        }
    }

    fn run(&self, state: &RefactoringState) -> Command {
        let Ok(module) = refract_parse::parse(&state.code) else {
            return Command::show_error(DOES_NOT_PARSE);
        };
        let index = LineIndex::new(&state.code);
        let Some(target) = index.span_of(state.selection) else {
            return Command::show_error(NO_EXTRACTABLE_CODE);
        };
        let Some(site) = find_extraction_site(&module, &index, target) else {
            return Command::show_error(NO_EXTRACTABLE_CODE);
        };

        match &state.kind {
            StateKind::New => {
                if site.others.is_empty() {
                    self.build_batch(&module, &index, &site, false)
                } else {
                    Command::ask_user_choice(vec![
                        Choice::new(format!(
                            "Replace all {} occurrences",
                            site.others.len() + 1
                        )),
                        Choice::new("Replace this occurrence only"),
                    ])
                }
            }
            StateKind::UserChoiceResponse { choice: None } => Command::do_nothing(),
            StateKind::UserChoiceResponse {
                choice: Some(choice),
            } => self.build_batch(&module, &index, &site, *choice == 0),
            other => {
                tracing::warn!(state = ?other, "extract-variable re-entered with unexpected state");
                Command::do_nothing()
            }
        }
    }
}

impl ExtractVariable {
    /// Build the read-then-write batch for the chosen occurrences.
    fn build_batch(
        &self,
        module: &Module,
        index: &LineIndex,
        site: &ExtractionSite,
        all: bool,
    ) -> Command {
        let arena = &module.arena;
        let anchor = site.insertion_anchor(index, arena, all);
        let indent = " ".repeat(anchor.character as usize);

        // The declaration template; the extracted value itself comes
        // from the snapshot read at apply time.
        let (name, declaration) = if self.destructure {
            let ExprKind::Member {
                object,
                property: MemberProp::Ident { name: key, .. },
            } = &arena.expr(site.selected.id).kind
            else {
                return Command::show_error(NOT_A_PROPERTY_ACCESS);
            };
            let owner = print_expr_with_power(arena, *object, prec::POSTFIX);
            let name = free_variable_name(module, key);
            let pattern = if name == *key {
                format!("{{ {key} }}")
            } else {
                format!("{{ {key}: {name} }}")
            };
            (name, DeclarationTemplate::Fixed(format!(
                "const {pattern} = {owner};\n{indent}"
            )))
        } else {
            let name = free_variable_name(module, &inferred_variable_name(arena, site.selected.id));
            (
                name.clone(),
                DeclarationTemplate::FromRead {
                    name,
                    indent: indent.clone(),
                },
            )
        };

        let replacements: Vec<Modification> = site
            .chosen(all)
            .into_iter()
            .map(|occurrence| occurrence.reference_modification(index, &name))
            .collect();

        let insertion_at = Selection::cursor_at(anchor);
        let cursor = Position::new(anchor.line, anchor.character + "const ".len() as u32);
        let read_at = site.selected.selection;

        let get_modifications = move |extracted: &str| {
            let mut modifications = vec![Modification {
                code: declaration.render(extracted),
                selection: insertion_at,
            }];
            modifications.extend(replacements.iter().cloned());
            modifications
        };

        Command::read_then_write(read_at, Box::new(get_modifications), Some(cursor))
    }
}

/// How the inserted declaration uses the text read from the buffer.
enum DeclarationTemplate {
    /// Destructuring ignores the read: the owner is printed from the
    /// tree.
    Fixed(String),
    /// Plain extraction splices the read text as the value.
    FromRead { name: String, indent: String },
}

impl DeclarationTemplate {
    fn render(&self, extracted: &str) -> String {
        match self {
            DeclarationTemplate::Fixed(code) => code.clone(),
            DeclarationTemplate::FromRead { name, indent } => {
                format!("const {name} = {extracted};\n{indent}")
            }
        }
    }
}
