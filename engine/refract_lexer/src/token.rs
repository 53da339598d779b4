//! Cooked tokens.

use refract_ir::Span;

use crate::cook::cook_string;
use crate::RawToken;

/// A lexed token with its byte span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

/// Token kinds after cooking. Literal-bearing kinds own their text so
/// the parser never reaches back into the raw buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    Ident(String),
    Num(String),
    Str { value: String, raw: String },
    /// Whole template literal, backticks included.
    Template(String),

    Var,
    Let,
    Const,
    Function,
    Return,
    If,
    Else,
    While,
    True,
    False,
    Null,
    TypeOf,
    Export,

    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Comma,
    Semi,
    Colon,
    Dot,
    DotDotDot,
    Question,
    Arrow,

    Eq,
    EqEq,
    EqEqEq,
    Bang,
    NotEq,
    NotEqEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Plus,
    PlusEq,
    Minus,
    MinusEq,
    Star,
    Slash,
    Percent,
    AndAnd,
    OrOr,

    Eof,
}

impl TokenKind {
    /// Short human-readable description for parse errors.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenKind::Ident(_) => "identifier",
            TokenKind::Num(_) => "number",
            TokenKind::Str { .. } => "string",
            TokenKind::Template(_) => "template literal",
            TokenKind::Var => "`var`",
            TokenKind::Let => "`let`",
            TokenKind::Const => "`const`",
            TokenKind::Function => "`function`",
            TokenKind::Return => "`return`",
            TokenKind::If => "`if`",
            TokenKind::Else => "`else`",
            TokenKind::While => "`while`",
            TokenKind::True => "`true`",
            TokenKind::False => "`false`",
            TokenKind::Null => "`null`",
            TokenKind::TypeOf => "`typeof`",
            TokenKind::Export => "`export`",
            TokenKind::LParen => "`(`",
            TokenKind::RParen => "`)`",
            TokenKind::LBrace => "`{`",
            TokenKind::RBrace => "`}`",
            TokenKind::LBracket => "`[`",
            TokenKind::RBracket => "`]`",
            TokenKind::Comma => "`,`",
            TokenKind::Semi => "`;`",
            TokenKind::Colon => "`:`",
            TokenKind::Dot => "`.`",
            TokenKind::DotDotDot => "`...`",
            TokenKind::Question => "`?`",
            TokenKind::Arrow => "`=>`",
            TokenKind::Eq => "`=`",
            TokenKind::EqEq => "`==`",
            TokenKind::EqEqEq => "`===`",
            TokenKind::Bang => "`!`",
            TokenKind::NotEq => "`!=`",
            TokenKind::NotEqEq => "`!==`",
            TokenKind::Lt => "`<`",
            TokenKind::LtEq => "`<=`",
            TokenKind::Gt => "`>`",
            TokenKind::GtEq => "`>=`",
            TokenKind::Plus => "`+`",
            TokenKind::PlusEq => "`+=`",
            TokenKind::Minus => "`-`",
            TokenKind::MinusEq => "`-=`",
            TokenKind::Star => "`*`",
            TokenKind::Slash => "`/`",
            TokenKind::Percent => "`%`",
            TokenKind::AndAnd => "`&&`",
            TokenKind::OrOr => "`||`",
            TokenKind::Eof => "end of input",
        }
    }
}

/// Convert a raw logos token plus its slice into a cooked kind.
pub(crate) fn cook(raw: RawToken, slice: &str) -> TokenKind {
    match raw {
        RawToken::Ident => TokenKind::Ident(slice.to_owned()),
        RawToken::Num => TokenKind::Num(slice.to_owned()),
        RawToken::Str => TokenKind::Str {
            value: cook_string(slice),
            raw: slice.to_owned(),
        },
        RawToken::Template => TokenKind::Template(slice.to_owned()),
        RawToken::Var => TokenKind::Var,
        RawToken::Let => TokenKind::Let,
        RawToken::Const => TokenKind::Const,
        RawToken::Function => TokenKind::Function,
        RawToken::Return => TokenKind::Return,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::While => TokenKind::While,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Null => TokenKind::Null,
        RawToken::TypeOf => TokenKind::TypeOf,
        RawToken::Export => TokenKind::Export,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::LBrace => TokenKind::LBrace,
        RawToken::RBrace => TokenKind::RBrace,
        RawToken::LBracket => TokenKind::LBracket,
        RawToken::RBracket => TokenKind::RBracket,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Semi => TokenKind::Semi,
        RawToken::Colon => TokenKind::Colon,
        RawToken::Dot => TokenKind::Dot,
        RawToken::DotDotDot => TokenKind::DotDotDot,
        RawToken::Question => TokenKind::Question,
        RawToken::Arrow => TokenKind::Arrow,
        RawToken::Eq => TokenKind::Eq,
        RawToken::EqEq => TokenKind::EqEq,
        RawToken::EqEqEq => TokenKind::EqEqEq,
        RawToken::Bang => TokenKind::Bang,
        RawToken::NotEq => TokenKind::NotEq,
        RawToken::NotEqEq => TokenKind::NotEqEq,
        RawToken::Lt => TokenKind::Lt,
        RawToken::LtEq => TokenKind::LtEq,
        RawToken::Gt => TokenKind::Gt,
        RawToken::GtEq => TokenKind::GtEq,
        RawToken::Plus => TokenKind::Plus,
        RawToken::PlusEq => TokenKind::PlusEq,
        RawToken::Minus => TokenKind::Minus,
        RawToken::MinusEq => TokenKind::MinusEq,
        RawToken::Star => TokenKind::Star,
        RawToken::Slash => TokenKind::Slash,
        RawToken::Percent => TokenKind::Percent,
        RawToken::AndAnd => TokenKind::AndAnd,
        RawToken::OrOr => TokenKind::OrOr,
    }
}
