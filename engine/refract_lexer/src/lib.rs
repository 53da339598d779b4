//! Lexer for the JavaScript subset using logos.
//!
//! Produces a flat `Vec<Token>` with byte spans; the parser slices
//! string values out of the cooked token kinds, never out of the raw
//! buffer.

use logos::Logos;
use refract_ir::Span;

mod cook;
mod token;

pub use cook::cook_string;
pub use token::{Token, TokenKind};

/// Lexing failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LexError {
    #[error("unexpected character at offset {offset}")]
    UnexpectedChar { offset: u32 },
    #[error("unterminated template literal starting at offset {offset}")]
    UnterminatedTemplate { offset: u32 },
}

/// Raw token from logos (before cooking).
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*(?:[^*]|\*+[^*/])*\*+/")]
enum RawToken {
    #[token("var")]
    Var,
    #[token("let")]
    Let,
    #[token("const")]
    Const,
    #[token("function")]
    Function,
    #[token("return")]
    Return,
    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,
    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,
    #[token("typeof")]
    TypeOf,
    #[token("export")]
    Export,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semi,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("...")]
    DotDotDot,
    #[token("?")]
    Question,
    #[token("=>")]
    Arrow,

    #[token("=")]
    Eq,
    #[token("==")]
    EqEq,
    #[token("===")]
    EqEqEq,
    #[token("!")]
    Bang,
    #[token("!=")]
    NotEq,
    #[token("!==")]
    NotEqEq,
    #[token("<")]
    Lt,
    #[token("<=")]
    LtEq,
    #[token(">")]
    Gt,
    #[token(">=")]
    GtEq,
    #[token("+")]
    Plus,
    #[token("+=")]
    PlusEq,
    #[token("-")]
    Minus,
    #[token("-=")]
    MinusEq,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,

    #[regex(r"[A-Za-z_$][A-Za-z0-9_$]*")]
    Ident,

    #[regex(r"[0-9]+(\.[0-9]+)?")]
    Num,

    #[regex(r#""(?:[^"\\\n]|\\.)*""#)]
    #[regex(r"'(?:[^'\\\n]|\\.)*'")]
    Str,

    #[token("`", template_literal)]
    Template,
}

/// Consume a template literal body up to its closing backtick.
///
/// Tracks `${ ... }` nesting so braces inside interpolations do not
/// terminate the scan. Nested templates inside interpolations are out
/// of the subset.
fn template_literal(lex: &mut logos::Lexer<'_, RawToken>) -> bool {
    let bytes = lex.remainder().as_bytes();
    let mut i = 0;
    let mut depth = 0usize;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'$' if bytes.get(i + 1) == Some(&b'{') => {
                depth += 1;
                i += 2;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                i += 1;
            }
            b'`' if depth == 0 => {
                lex.bump(i + 1);
                return true;
            }
            _ => i += 1,
        }
    }
    false
}

/// Lex a buffer into cooked tokens, terminated by `TokenKind::Eof`.
pub fn lex(source: &str) -> Result<Vec<Token>, LexError> {
    let mut tokens = Vec::with_capacity(source.len() / 4);
    let mut lexer = RawToken::lexer(source);

    while let Some(raw) = lexer.next() {
        let span = Span::from_range(lexer.span());
        let raw = match raw {
            Ok(raw) => raw,
            Err(()) => {
                // A lone backtick only fails inside `template_literal`.
                if lexer.slice().starts_with('`') {
                    return Err(LexError::UnterminatedTemplate { offset: span.start });
                }
                return Err(LexError::UnexpectedChar { offset: span.start });
            }
        };
        let kind = token::cook(raw, lexer.slice());
        tokens.push(Token { kind, span });
    }

    tokens.push(Token {
        kind: TokenKind::Eof,
        span: Span::point(source.len() as u32),
    });
    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let Ok(tokens) = lex(source) else {
            panic!("lexing failed for {source:?}");
        };
        tokens.into_iter().map(|token| token.kind).collect()
    }

    #[test]
    fn lexes_declaration() {
        assert_eq!(
            kinds("const hello = \"Hello\";"),
            vec![
                TokenKind::Const,
                TokenKind::Ident("hello".into()),
                TokenKind::Eq,
                TokenKind::Str {
                    value: "Hello".into(),
                    raw: "\"Hello\"".into(),
                },
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn longest_operator_wins() {
        assert_eq!(
            kinds("a === b == c = d"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::EqEqEq,
                TokenKind::Ident("b".into()),
                TokenKind::EqEq,
                TokenKind::Ident("c".into()),
                TokenKind::Eq,
                TokenKind::Ident("d".into()),
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn skips_comments() {
        assert_eq!(
            kinds("a; // trailing\n/* block\n comment */ b;"),
            vec![
                TokenKind::Ident("a".into()),
                TokenKind::Semi,
                TokenKind::Ident("b".into()),
                TokenKind::Semi,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn template_with_interpolation_is_one_token() {
        let source = "`Hi ${first} ${last({ ok: true })}!`";
        assert_eq!(
            kinds(source),
            vec![TokenKind::Template(source.into()), TokenKind::Eof]
        );
    }

    #[test]
    fn unterminated_template_errors() {
        assert_eq!(
            lex("`oops"),
            Err(LexError::UnterminatedTemplate { offset: 0 })
        );
    }

    #[test]
    fn single_quotes_cook_to_same_value() {
        let Ok(tokens) = lex("'Hi'") else {
            panic!("lexing failed");
        };
        assert_eq!(
            tokens[0].kind,
            TokenKind::Str {
                value: "Hi".into(),
                raw: "'Hi'".into(),
            }
        );
    }

    #[test]
    fn spans_are_byte_offsets() {
        let Ok(tokens) = lex("let x = 10;") else {
            panic!("lexing failed");
        };
        assert_eq!(tokens[0].span, Span::new(0, 3));
        assert_eq!(tokens[3].span, Span::new(8, 10));
    }
}
