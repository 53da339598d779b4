//! Binding patterns.
//!
//! Patterns appear as declaration targets and function parameters.
//! They are deliberately not expressions: a declaration-target
//! identifier can never be picked up by an expression matcher.

use crate::{Span, Spanned};

/// A binding pattern.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum Pattern {
    /// Plain identifier binding: `x`.
    Ident(IdentPat),
    /// Object destructuring: `{ a, b: c }`.
    Object(ObjectPat),
    /// Array destructuring: `[a, , b]`.
    Array(ArrayPat),
    /// Rest element: `...rest`. Only valid in final position.
    Rest(RestPat),
}

impl Pattern {
    /// Collect every name this pattern binds, in source order.
    pub fn bound_names<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            Pattern::Ident(pat) => out.push(&pat.name),
            Pattern::Object(pat) => {
                for prop in &pat.props {
                    match &prop.value {
                        Some(value) => value.bound_names(out),
                        None => out.push(&prop.key),
                    }
                }
            }
            Pattern::Array(pat) => {
                for element in pat.elements.iter().flatten() {
                    element.bound_names(out);
                }
            }
            Pattern::Rest(pat) => pat.arg.bound_names(out),
        }
    }

    /// Whether this pattern is a rest element.
    pub const fn is_rest(&self) -> bool {
        matches!(self, Pattern::Rest(_))
    }
}

impl Spanned for Pattern {
    fn span(&self) -> Span {
        match self {
            Pattern::Ident(pat) => pat.span,
            Pattern::Object(pat) => pat.span,
            Pattern::Array(pat) => pat.span,
            Pattern::Rest(pat) => pat.span,
        }
    }
}

/// Identifier binding.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct IdentPat {
    pub name: String,
    pub span: Span,
}

/// Object destructuring pattern.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ObjectPat {
    pub props: Vec<ObjectPatProp>,
    pub span: Span,
}

/// One property of an object pattern. `value: None` is the shorthand
/// form `{ a }`, binding the key itself.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ObjectPatProp {
    pub key: String,
    pub value: Option<Pattern>,
    pub span: Span,
}

/// Array destructuring pattern. `None` elements are holes.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ArrayPat {
    pub elements: Vec<Option<Pattern>>,
    pub span: Span,
}

/// Rest element.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct RestPat {
    pub arg: Box<Pattern>,
    pub span: Span,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bound_names_walks_nested_patterns() {
        // { a, b: { c }, ...rest }
        let pattern = Pattern::Object(ObjectPat {
            props: vec![
                ObjectPatProp {
                    key: "a".into(),
                    value: None,
                    span: Span::DUMMY,
                },
                ObjectPatProp {
                    key: "b".into(),
                    value: Some(Pattern::Object(ObjectPat {
                        props: vec![ObjectPatProp {
                            key: "c".into(),
                            value: None,
                            span: Span::DUMMY,
                        }],
                        span: Span::DUMMY,
                    })),
                    span: Span::DUMMY,
                },
            ],
            span: Span::DUMMY,
        });

        let mut names = Vec::new();
        pattern.bound_names(&mut names);
        assert_eq!(names, vec!["a", "c"]);
    }
}
