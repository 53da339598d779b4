//! The refactoring catalogue.
//!
//! Each refactoring is a thin, pure consumer of the match protocol,
//! the occurrence model, and the command vocabulary. None of them
//! touch the editor; they only describe effects.

mod change_signature;
mod extract_variable;
mod flip_if_else;
mod flip_ternary;
mod inline_variable;
mod move_statement;
mod negate;
mod rename_symbol;
mod split_declaration;

pub use change_signature::ChangeSignature;
pub use extract_variable::ExtractVariable;
pub use flip_if_else::FlipIfElse;
pub use flip_ternary::FlipTernary;
pub use inline_variable::InlineVariable;
pub use move_statement::MoveStatement;
pub use rename_symbol::RenameSymbol;
pub use split_declaration::SplitDeclaration;

use crate::refactoring::Refactoring;

/// Message for buffers the parser rejects.
pub(crate) const DOES_NOT_PARSE: &str = "this file does not parse, fix syntax errors first";

/// Look a refactoring up by its command name.
pub fn by_name(name: &str) -> Option<Box<dyn Refactoring>> {
    let refactoring: Box<dyn Refactoring> = match name {
        "extract-variable" => Box::new(ExtractVariable::new()),
        "extract-variable-destructure" => Box::new(ExtractVariable::with_destructuring()),
        "inline-variable" => Box::new(InlineVariable),
        "flip-ternary" => Box::new(FlipTernary),
        "flip-if-else" => Box::new(FlipIfElse),
        "split-declaration" => Box::new(SplitDeclaration),
        "move-statement-up" => Box::new(MoveStatement::up()),
        "move-statement-down" => Box::new(MoveStatement::down()),
        "rename-symbol" => Box::new(RenameSymbol),
        "change-signature" => Box::new(ChangeSignature),
        _ => return None,
    };
    Some(refactoring)
}

/// Every command name, for host help output.
pub fn command_names() -> &'static [&'static str] {
    &[
        "extract-variable",
        "extract-variable-destructure",
        "inline-variable",
        "flip-ternary",
        "flip-if-else",
        "split-declaration",
        "move-statement-up",
        "move-statement-down",
        "rename-symbol",
        "change-signature",
    ]
}
