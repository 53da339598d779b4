//! Expression parsing.

use refract_ir::ast::{
    ArrowBody, AssignOp, BinaryOp, ExprKind, LogicalOp, MemberProp, ObjectProp, PropKey,
    TemplateQuasi, UnaryOp,
};
use refract_ir::{ExprId, Span};
use refract_lexer::TokenKind;

use crate::cursor::Cursor;
use crate::{ParseError, Parser};

/// A binary-position operator: plain or short-circuiting.
#[derive(Copy, Clone)]
enum InfixOp {
    Bin(BinaryOp),
    Logic(LogicalOp),
}

impl InfixOp {
    const fn precedence(self) -> u8 {
        match self {
            InfixOp::Bin(op) => op.precedence(),
            InfixOp::Logic(op) => op.precedence(),
        }
    }
}

fn infix_op(kind: &TokenKind) -> Option<InfixOp> {
    let op = match kind {
        TokenKind::EqEq => InfixOp::Bin(BinaryOp::EqEq),
        TokenKind::NotEq => InfixOp::Bin(BinaryOp::NotEq),
        TokenKind::EqEqEq => InfixOp::Bin(BinaryOp::EqEqEq),
        TokenKind::NotEqEq => InfixOp::Bin(BinaryOp::NotEqEq),
        TokenKind::Lt => InfixOp::Bin(BinaryOp::Lt),
        TokenKind::LtEq => InfixOp::Bin(BinaryOp::LtEq),
        TokenKind::Gt => InfixOp::Bin(BinaryOp::Gt),
        TokenKind::GtEq => InfixOp::Bin(BinaryOp::GtEq),
        TokenKind::Plus => InfixOp::Bin(BinaryOp::Add),
        TokenKind::Minus => InfixOp::Bin(BinaryOp::Sub),
        TokenKind::Star => InfixOp::Bin(BinaryOp::Mul),
        TokenKind::Slash => InfixOp::Bin(BinaryOp::Div),
        TokenKind::Percent => InfixOp::Bin(BinaryOp::Rem),
        TokenKind::AndAnd => InfixOp::Logic(LogicalOp::And),
        TokenKind::OrOr => InfixOp::Logic(LogicalOp::Or),
        _ => return None,
    };
    Some(op)
}

fn assign_op(kind: &TokenKind) -> Option<AssignOp> {
    match kind {
        TokenKind::Eq => Some(AssignOp::Assign),
        TokenKind::PlusEq => Some(AssignOp::AddAssign),
        TokenKind::MinusEq => Some(AssignOp::SubAssign),
        _ => None,
    }
}

impl Parser {
    /// Parse a full expression (assignment level).
    pub(crate) fn parse_expr(&mut self) -> Result<ExprId, ParseError> {
        let lhs = self.parse_cond()?;
        let Some(op) = assign_op(self.cursor.current_kind()) else {
            return Ok(lhs);
        };
        if !matches!(
            self.arena.expr(lhs).kind,
            ExprKind::Ident(_) | ExprKind::Member { .. }
        ) {
            return Err(ParseError::InvalidAssignTarget {
                offset: self.arena.expr_span(lhs).start,
            });
        }
        self.cursor.advance();
        let value = self.parse_expr()?;
        let span = self.arena.expr_span(lhs).merge(self.arena.expr_span(value));
        Ok(self.arena.alloc_expr(
            ExprKind::Assign {
                op,
                target: lhs,
                value,
            },
            span,
        ))
    }

    /// Ternary conditional, or anything tighter.
    fn parse_cond(&mut self) -> Result<ExprId, ParseError> {
        let test = self.parse_infix(0)?;
        if !self.eat(&TokenKind::Question) {
            return Ok(test);
        }
        let cons = self.parse_expr()?;
        self.cursor.expect(&TokenKind::Colon)?;
        let alt = self.parse_expr()?;
        let span = self.arena.expr_span(test).merge(self.arena.expr_span(alt));
        Ok(self
            .arena
            .alloc_expr(ExprKind::Cond { test, cons, alt }, span))
    }

    /// Precedence climbing over binary and logical operators.
    fn parse_infix(&mut self, min_precedence: u8) -> Result<ExprId, ParseError> {
        let mut lhs = self.parse_unary()?;
        while let Some(op) = infix_op(self.cursor.current_kind()) {
            let precedence = op.precedence();
            if precedence < min_precedence {
                break;
            }
            self.cursor.advance();
            let rhs = self.parse_infix(precedence + 1)?;
            let span = self.arena.expr_span(lhs).merge(self.arena.expr_span(rhs));
            let kind = match op {
                InfixOp::Bin(op) => ExprKind::Binary { op, lhs, rhs },
                InfixOp::Logic(op) => ExprKind::Logical { op, lhs, rhs },
            };
            lhs = self.arena.alloc_expr(kind, span);
        }
        Ok(lhs)
    }

    fn parse_unary(&mut self) -> Result<ExprId, ParseError> {
        let op = match self.cursor.current_kind() {
            TokenKind::Bang => Some(UnaryOp::Not),
            TokenKind::Minus => Some(UnaryOp::Minus),
            TokenKind::Plus => Some(UnaryOp::Plus),
            TokenKind::TypeOf => Some(UnaryOp::TypeOf),
            _ => None,
        };
        let Some(op) = op else {
            return self.parse_postfix();
        };
        let op_span = self.cursor.advance().span;
        let arg = self.parse_unary()?;
        let span = op_span.merge(self.arena.expr_span(arg));
        Ok(self.arena.alloc_expr(ExprKind::Unary { op, arg }, span))
    }

    /// Member access and calls.
    fn parse_postfix(&mut self) -> Result<ExprId, ParseError> {
        let mut expr = self.parse_primary()?;
        loop {
            if self.eat(&TokenKind::Dot) {
                let (name, name_span) = self.cursor.expect_ident()?;
                let span = self.arena.expr_span(expr).merge(name_span);
                expr = self.arena.alloc_expr(
                    ExprKind::Member {
                        object: expr,
                        property: MemberProp::Ident {
                            name,
                            span: name_span,
                        },
                    },
                    span,
                );
            } else if self.eat(&TokenKind::LBracket) {
                let property = self.parse_expr()?;
                let end = self.cursor.expect(&TokenKind::RBracket)?;
                let span = self.arena.expr_span(expr).merge(end);
                expr = self.arena.alloc_expr(
                    ExprKind::Member {
                        object: expr,
                        property: MemberProp::Computed(property),
                    },
                    span,
                );
            } else if self.check(&TokenKind::LParen) {
                self.cursor.advance();
                let args = self.parse_call_args()?;
                let end = self.cursor.expect(&TokenKind::RParen)?;
                let span = self.arena.expr_span(expr).merge(end);
                expr = self
                    .arena
                    .alloc_expr(ExprKind::Call { callee: expr, args }, span);
            } else {
                return Ok(expr);
            }
        }
    }

    fn parse_call_args(&mut self) -> Result<Vec<ExprId>, ParseError> {
        let mut args = Vec::new();
        if self.check(&TokenKind::RParen) {
            return Ok(args);
        }
        loop {
            args.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma) {
                return Ok(args);
            }
        }
    }

    fn parse_primary(&mut self) -> Result<ExprId, ParseError> {
        let token = self.cursor.current().clone();
        match token.kind {
            TokenKind::Num(raw) => {
                self.cursor.advance();
                Ok(self.arena.alloc_expr(ExprKind::Num { raw }, token.span))
            }
            TokenKind::Str { value, raw } => {
                self.cursor.advance();
                Ok(self
                    .arena
                    .alloc_expr(ExprKind::Str { value, raw }, token.span))
            }
            TokenKind::Template(raw) => {
                self.cursor.advance();
                self.parse_template(&raw, token.span)
            }
            TokenKind::True => {
                self.cursor.advance();
                Ok(self.arena.alloc_expr(ExprKind::Bool(true), token.span))
            }
            TokenKind::False => {
                self.cursor.advance();
                Ok(self.arena.alloc_expr(ExprKind::Bool(false), token.span))
            }
            TokenKind::Null => {
                self.cursor.advance();
                Ok(self.arena.alloc_expr(ExprKind::Null, token.span))
            }
            TokenKind::Ident(name) => {
                if matches!(self.cursor.peek(1), TokenKind::Arrow) {
                    return self.parse_single_param_arrow();
                }
                self.cursor.advance();
                Ok(self.arena.alloc_expr(ExprKind::Ident(name), token.span))
            }
            TokenKind::LParen => {
                if self.cursor.arrow_follows_paren_group() {
                    return self.parse_paren_arrow();
                }
                self.cursor.advance();
                let expr = self.parse_expr()?;
                self.cursor.expect(&TokenKind::RParen)?;
                Ok(expr)
            }
            TokenKind::Function => self.parse_function_expr(),
            TokenKind::LBrace => self.parse_object_literal(),
            TokenKind::LBracket => self.parse_array_literal(),
            _ => Err(ParseError::Unexpected {
                expected: "expression".to_owned(),
                found: token.kind.describe(),
                offset: token.span.start,
            }),
        }
    }

    /// `x => body`
    fn parse_single_param_arrow(&mut self) -> Result<ExprId, ParseError> {
        let (name, name_span) = self.cursor.expect_ident()?;
        let params = vec![refract_ir::ast::Pattern::Ident(refract_ir::ast::IdentPat {
            name,
            span: name_span,
        })];
        self.cursor.expect(&TokenKind::Arrow)?;
        let (body, end) = self.parse_arrow_body()?;
        Ok(self
            .arena
            .alloc_expr(ExprKind::Arrow { params, body }, name_span.merge(end)))
    }

    /// `(a, { b }) => body`
    fn parse_paren_arrow(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.expect(&TokenKind::LParen)?;
        let params = self.parse_params()?;
        self.cursor.expect(&TokenKind::Arrow)?;
        let (body, end) = self.parse_arrow_body()?;
        Ok(self
            .arena
            .alloc_expr(ExprKind::Arrow { params, body }, start.merge(end)))
    }

    /// Arrow body plus its end offset.
    fn parse_arrow_body(&mut self) -> Result<(ArrowBody, Span), ParseError> {
        if self.check(&TokenKind::LBrace) {
            let block = self.parse_block()?;
            let span = self.arena.stmt_span(block);
            Ok((ArrowBody::Block(block), span))
        } else {
            let expr = self.parse_expr()?;
            let span = self.arena.expr_span(expr);
            Ok((ArrowBody::Expr(expr), span))
        }
    }

    /// `function name?(params) { ... }` in expression position.
    fn parse_function_expr(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.expect(&TokenKind::Function)?;
        let name = if self.cursor.check_ident() {
            Some(self.cursor.expect_ident()?.0)
        } else {
            None
        };
        self.cursor.expect(&TokenKind::LParen)?;
        let params = self.parse_params()?;
        let body = self.parse_block()?;
        let span = start.merge(self.arena.stmt_span(body));
        Ok(self
            .arena
            .alloc_expr(ExprKind::Function { name, params, body }, span))
    }

    fn parse_object_literal(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.expect(&TokenKind::LBrace)?;
        let mut props = Vec::new();
        while !self.check(&TokenKind::RBrace) {
            props.push(self.parse_object_prop()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.cursor.expect(&TokenKind::RBrace)?;
        Ok(self
            .arena
            .alloc_expr(ExprKind::Object { props }, start.merge(end)))
    }

    fn parse_object_prop(&mut self) -> Result<ObjectProp, ParseError> {
        let token = self.cursor.current().clone();
        match token.kind {
            TokenKind::Ident(name) => {
                self.cursor.advance();
                if self.eat(&TokenKind::Colon) {
                    let value = self.parse_expr()?;
                    let span = token.span.merge(self.arena.expr_span(value));
                    Ok(ObjectProp {
                        key: PropKey::Ident(name),
                        value,
                        shorthand: false,
                        span,
                    })
                } else {
                    // Shorthand `{ a }`: the value is an identifier
                    // reference spanning the key.
                    let value = self
                        .arena
                        .alloc_expr(ExprKind::Ident(name.clone()), token.span);
                    Ok(ObjectProp {
                        key: PropKey::Ident(name),
                        value,
                        shorthand: true,
                        span: token.span,
                    })
                }
            }
            TokenKind::Str { value: key, raw } => {
                self.cursor.advance();
                self.cursor.expect(&TokenKind::Colon)?;
                let value = self.parse_expr()?;
                let span = token.span.merge(self.arena.expr_span(value));
                Ok(ObjectProp {
                    key: PropKey::Str { value: key, raw },
                    value,
                    shorthand: false,
                    span,
                })
            }
            TokenKind::LBracket => {
                self.cursor.advance();
                let key = self.parse_expr()?;
                self.cursor.expect(&TokenKind::RBracket)?;
                self.cursor.expect(&TokenKind::Colon)?;
                let value = self.parse_expr()?;
                let span = token.span.merge(self.arena.expr_span(value));
                Ok(ObjectProp {
                    key: PropKey::Computed(key),
                    value,
                    shorthand: false,
                    span,
                })
            }
            _ => Err(ParseError::Unexpected {
                expected: "object property".to_owned(),
                found: token.kind.describe(),
                offset: token.span.start,
            }),
        }
    }

    fn parse_array_literal(&mut self) -> Result<ExprId, ParseError> {
        let start = self.cursor.expect(&TokenKind::LBracket)?;
        let mut elements = Vec::new();
        while !self.check(&TokenKind::RBracket) {
            elements.push(self.parse_expr()?);
            if !self.eat(&TokenKind::Comma) {
                break;
            }
        }
        let end = self.cursor.expect(&TokenKind::RBracket)?;
        Ok(self
            .arena
            .alloc_expr(ExprKind::Array { elements }, start.merge(end)))
    }

    /// Split a raw template literal into quasis and parsed
    /// interpolations.
    ///
    /// Inner chunks are re-lexed with spans shifted to absolute
    /// offsets, then parsed by temporarily swapping the cursor, so the
    /// arena sees one consistent coordinate space.
    fn parse_template(&mut self, raw: &str, span: Span) -> Result<ExprId, ParseError> {
        let bytes = raw.as_bytes();
        let mut quasis = Vec::new();
        let mut exprs = Vec::new();

        // Skip the opening and closing backticks.
        let mut quasi_start = 1;
        let mut i = 1;
        let last = bytes.len() - 1;
        while i < last {
            if bytes[i] == b'\\' {
                i += 2;
                continue;
            }
            if bytes[i] == b'$' && bytes.get(i + 1) == Some(&b'{') {
                quasis.push(TemplateQuasi {
                    raw: raw[quasi_start..i].to_owned(),
                    span: Span::new(span.start + quasi_start as u32, span.start + i as u32),
                });
                let chunk_start = i + 2;
                let mut depth = 1usize;
                let mut j = chunk_start;
                while j < last && depth > 0 {
                    match bytes[j] {
                        b'{' => depth += 1,
                        b'}' => depth -= 1,
                        _ => {}
                    }
                    if depth == 0 {
                        break;
                    }
                    j += 1;
                }
                exprs.push(self.parse_template_chunk(
                    &raw[chunk_start..j],
                    span.start + chunk_start as u32,
                )?);
                i = j + 1;
                quasi_start = i;
            } else {
                i += 1;
            }
        }
        quasis.push(TemplateQuasi {
            raw: raw[quasi_start..last].to_owned(),
            span: Span::new(span.start + quasi_start as u32, span.start + last as u32),
        });

        Ok(self.arena.alloc_expr(ExprKind::Template { quasis, exprs }, span))
    }

    /// Parse one `${...}` chunk at an absolute base offset.
    fn parse_template_chunk(&mut self, chunk: &str, base: u32) -> Result<ExprId, ParseError> {
        let tokens = refract_lexer::lex(chunk)?
            .into_iter()
            .map(|mut token| {
                token.span = Span::new(token.span.start + base, token.span.end + base);
                token
            })
            .collect();

        let saved = std::mem::replace(&mut self.cursor, Cursor::new(tokens));
        let result = self.parse_expr().and_then(|expr| {
            if self.cursor.is_at_end() {
                Ok(expr)
            } else {
                Err(ParseError::Unexpected {
                    expected: "end of interpolation".to_owned(),
                    found: self.cursor.current_kind().describe(),
                    offset: self.cursor.current_span().start,
                })
            }
        });
        self.cursor = saved;
        result
    }
}
