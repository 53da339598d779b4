//! Statement parsing.

use refract_ir::ast::{Declarator, FuncDecl, StmtKind, VarDecl, VarKind};
use refract_ir::{Span, Spanned, StmtId};
use refract_lexer::TokenKind;

use crate::{ParseError, Parser};

impl Parser {
    /// Parse one statement.
    pub(crate) fn parse_stmt(&mut self) -> Result<StmtId, ParseError> {
        let token = self.cursor.current().clone();
        match token.kind {
            TokenKind::Export => {
                self.cursor.advance();
                match self.cursor.current_kind() {
                    TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                        self.parse_var_decl(token.span, true)
                    }
                    TokenKind::Function => self.parse_func_decl(token.span, true),
                    _ => Err(ParseError::Unexpected {
                        expected: "declaration after `export`".to_owned(),
                        found: self.cursor.current_kind().describe(),
                        offset: self.cursor.current_span().start,
                    }),
                }
            }
            TokenKind::Var | TokenKind::Let | TokenKind::Const => {
                self.parse_var_decl(token.span, false)
            }
            TokenKind::Function => self.parse_func_decl(token.span, false),
            TokenKind::Return => {
                self.cursor.advance();
                let arg = if self.check(&TokenKind::Semi)
                    || self.check(&TokenKind::RBrace)
                    || self.cursor.is_at_end()
                {
                    None
                } else {
                    Some(self.parse_expr()?)
                };
                self.eat(&TokenKind::Semi);
                let span = Span::new(token.span.start, self.cursor.prev_end());
                Ok(self.arena.alloc_stmt(StmtKind::Return(arg), span))
            }
            TokenKind::If => self.parse_if(token.span),
            TokenKind::While => {
                self.cursor.advance();
                self.cursor.expect(&TokenKind::LParen)?;
                let test = self.parse_expr()?;
                self.cursor.expect(&TokenKind::RParen)?;
                let body = self.parse_stmt()?;
                let span = token.span.merge(self.arena.stmt_span(body));
                Ok(self.arena.alloc_stmt(StmtKind::While { test, body }, span))
            }
            TokenKind::LBrace => self.parse_block(),
            TokenKind::Semi => {
                self.cursor.advance();
                Ok(self.arena.alloc_stmt(StmtKind::Empty, token.span))
            }
            _ => {
                let expr = self.parse_expr()?;
                self.eat(&TokenKind::Semi);
                let span = Span::new(
                    self.arena.expr_span(expr).start,
                    self.cursor.prev_end(),
                );
                Ok(self.arena.alloc_stmt(StmtKind::Expr(expr), span))
            }
        }
    }

    /// `{ stmt* }`
    pub(crate) fn parse_block(&mut self) -> Result<StmtId, ParseError> {
        let start = self.cursor.expect(&TokenKind::LBrace)?;
        let mut stmts = Vec::new();
        while !self.check(&TokenKind::RBrace) && !self.cursor.is_at_end() {
            stmts.push(self.parse_stmt()?);
        }
        let end = self.cursor.expect(&TokenKind::RBrace)?;
        Ok(self
            .arena
            .alloc_stmt(StmtKind::Block(stmts), start.merge(end)))
    }

    fn parse_if(&mut self, start: Span) -> Result<StmtId, ParseError> {
        self.cursor.expect(&TokenKind::If)?;
        self.cursor.expect(&TokenKind::LParen)?;
        let test = self.parse_expr()?;
        self.cursor.expect(&TokenKind::RParen)?;
        let cons = self.parse_stmt()?;
        let alt = if self.eat(&TokenKind::Else) {
            Some(self.parse_stmt()?)
        } else {
            None
        };
        let end = alt.map_or_else(
            || self.arena.stmt_span(cons),
            |alt| self.arena.stmt_span(alt),
        );
        Ok(self
            .arena
            .alloc_stmt(StmtKind::If { test, cons, alt }, start.merge(end)))
    }

    /// `var`/`let`/`const` declaration, possibly exported.
    fn parse_var_decl(&mut self, start: Span, exported: bool) -> Result<StmtId, ParseError> {
        let kind = match self.cursor.advance().kind {
            TokenKind::Var => VarKind::Var,
            TokenKind::Let => VarKind::Let,
            _ => VarKind::Const,
        };
        let mut declarators = Vec::new();
        loop {
            let pattern = self.parse_pattern()?;
            let init = if self.eat(&TokenKind::Eq) {
                Some(self.parse_expr()?)
            } else {
                None
            };
            let span = init.map_or_else(
                || pattern.span(),
                |init| pattern.span().merge(self.arena.expr_span(init)),
            );
            declarators.push(Declarator {
                pattern,
                init,
                span,
            });
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        self.eat(&TokenKind::Semi);
        let span = Span::new(start.start, self.cursor.prev_end());
        Ok(self.arena.alloc_stmt(
            StmtKind::VarDecl(VarDecl {
                kind,
                declarators,
                exported,
            }),
            span,
        ))
    }

    /// `function name(params) { ... }`, possibly exported.
    fn parse_func_decl(&mut self, start: Span, exported: bool) -> Result<StmtId, ParseError> {
        self.cursor.expect(&TokenKind::Function)?;
        let (name, name_span) = self.cursor.expect_ident()?;
        self.cursor.expect(&TokenKind::LParen)?;
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        let span = start.merge(self.arena.stmt_span(body));
        Ok(self.arena.alloc_stmt(
            StmtKind::Func(FuncDecl {
                name,
                name_span,
                params,
                body,
                exported,
            }),
            span,
        ))
    }
}
