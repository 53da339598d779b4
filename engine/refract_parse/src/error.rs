//! Parse errors.

use refract_lexer::LexError;

/// Failure to turn a buffer into a module.
///
/// The engine never surfaces these verbatim; refactorings translate
/// them into a short "this file does not parse" message.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(transparent)]
    Lex(#[from] LexError),

    #[error("expected {expected} but found {found} at offset {offset}")]
    Unexpected {
        expected: String,
        found: &'static str,
        offset: u32,
    },

    #[error("invalid assignment target at offset {offset}")]
    InvalidAssignTarget { offset: u32 },

    #[error("rest parameter must be last at offset {offset}")]
    RestNotLast { offset: u32 },
}
