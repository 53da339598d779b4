//! Recursive descent parser for the JavaScript subset.
//!
//! Produces a flat [`Module`] over an `ExprArena`. The parser is
//! whole-buffer and fail-fast: refactorings reparse per attempt, so
//! there is no incremental state and the first error wins.

mod cursor;
mod error;
mod grammar;

#[cfg(test)]
mod tests;

pub use cursor::Cursor;
pub use error::ParseError;

use refract_ir::{ExprArena, Module};
use refract_lexer::TokenKind;

/// Parser state.
pub struct Parser {
    cursor: Cursor,
    arena: ExprArena,
}

impl Parser {
    /// Create a parser over a lexed token stream.
    pub fn new(tokens: Vec<refract_lexer::Token>, source_len: usize) -> Self {
        Parser {
            cursor: Cursor::new(tokens),
            arena: ExprArena::with_capacity(source_len),
        }
    }

    /// Parse all top-level statements.
    pub fn parse_module(mut self) -> Result<Module, ParseError> {
        let mut body = Vec::new();
        while !self.cursor.is_at_end() {
            body.push(self.parse_stmt()?);
        }
        Ok(Module {
            body,
            arena: self.arena,
        })
    }

    #[inline]
    fn check(&self, kind: &TokenKind) -> bool {
        self.cursor.check(kind)
    }

    #[inline]
    fn eat(&mut self, kind: &TokenKind) -> bool {
        self.cursor.eat(kind)
    }
}

/// Parse a buffer into a module.
pub fn parse(source: &str) -> Result<Module, ParseError> {
    let tokens = refract_lexer::lex(source)?;
    tracing::trace!(tokens = tokens.len(), bytes = source.len(), "parsing buffer");
    Parser::new(tokens, source.len()).parse_module()
}
