//! Binding pattern and parameter list parsing.

use refract_ir::ast::{ArrayPat, IdentPat, ObjectPat, ObjectPatProp, Pattern, RestPat};
use refract_lexer::TokenKind;

use crate::{ParseError, Parser};

impl Parser {
    /// Parse a comma-separated parameter list up to and including the
    /// closing `)`. A rest parameter must be last.
    pub(crate) fn parse_params(&mut self) -> Result<Vec<Pattern>, ParseError> {
        let mut params = Vec::new();
        while !self.check(&TokenKind::RParen) {
            let param = self.parse_pattern()?;
            let is_rest = param.is_rest();
            params.push(param);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
            if is_rest {
                return Err(ParseError::RestNotLast {
                    offset: self.cursor.current_span().start,
                });
            }
        }
        self.cursor.expect(&TokenKind::RParen)?;
        Ok(params)
    }

    /// Parse a binding pattern.
    pub(crate) fn parse_pattern(&mut self) -> Result<Pattern, ParseError> {
        let token = self.cursor.current().clone();
        match token.kind {
            TokenKind::Ident(name) => {
                self.cursor.advance();
                Ok(Pattern::Ident(IdentPat {
                    name,
                    span: token.span,
                }))
            }
            TokenKind::DotDotDot => {
                self.cursor.advance();
                let arg = self.parse_pattern()?;
                let span = token.span.merge(refract_ir::Spanned::span(&arg));
                Ok(Pattern::Rest(RestPat {
                    arg: Box::new(arg),
                    span,
                }))
            }
            TokenKind::LBrace => self.parse_object_pattern(),
            TokenKind::LBracket => self.parse_array_pattern(),
            _ => Err(ParseError::Unexpected {
                expected: "binding pattern".to_owned(),
                found: token.kind.describe(),
                offset: token.span.start,
            }),
        }
    }

    /// `{ a, b: { c } }`
    fn parse_object_pattern(&mut self) -> Result<Pattern, ParseError> {
        let start = self.cursor.expect(&TokenKind::LBrace)?;
        let mut props = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            let (key, key_span) = self.cursor.expect_ident()?;
            let value = if self.eat(&TokenKind::Colon) {
                Some(self.parse_pattern()?)
            } else {
                None
            };
            let span = value
                .as_ref()
                .map_or(key_span, |pattern| key_span.merge(refract_ir::Spanned::span(pattern)));
            props.push(ObjectPatProp { key, value, span });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.cursor.expect(&TokenKind::RBrace)?;
        Ok(Pattern::Object(ObjectPat {
            props,
            span: start.merge(end),
        }))
    }

    /// `[a, , ...rest]`
    fn parse_array_pattern(&mut self) -> Result<Pattern, ParseError> {
        let start = self.cursor.expect(&TokenKind::LBracket)?;
        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            if self.eat(&TokenKind::Comma) {
                // A hole.
                elements.push(None);
                continue;
            }
            elements.push(Some(self.parse_pattern()?));
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.cursor.expect(&TokenKind::RBracket)?;
        Ok(Pattern::Array(ArrayPat {
            elements,
            span: start.merge(end),
        }))
    }
}
