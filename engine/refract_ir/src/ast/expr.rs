//! Expression nodes.

use crate::{ExprId, Span, Spanned, StmtId};

use super::operators::{AssignOp, BinaryOp, LogicalOp, UnaryOp};
use super::patterns::Pattern;

/// Expression node.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Expr {
    pub kind: ExprKind,
    pub span: Span,
}

impl Expr {
    pub fn new(kind: ExprKind, span: Span) -> Self {
        Expr { kind, span }
    }
}

impl std::fmt::Debug for Expr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl Spanned for Expr {
    fn span(&self) -> Span {
        self.span
    }
}

/// Expression kinds.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum ExprKind {
    Null,
    Bool(bool),
    /// Numeric literal; the raw source text is authoritative.
    Num {
        raw: String,
    },
    /// String literal with cooked value and raw text (quotes included).
    Str {
        value: String,
        raw: String,
    },
    /// Template literal: quasis and interpolated expressions
    /// interleave, starting and ending with a quasi.
    Template {
        quasis: Vec<TemplateQuasi>,
        exprs: Vec<ExprId>,
    },
    Ident(String),
    Member {
        object: ExprId,
        property: MemberProp,
    },
    Call {
        callee: ExprId,
        args: Vec<ExprId>,
    },
    Unary {
        op: UnaryOp,
        arg: ExprId,
    },
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Logical {
        op: LogicalOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    Assign {
        op: AssignOp,
        target: ExprId,
        value: ExprId,
    },
    /// Ternary conditional.
    Cond {
        test: ExprId,
        cons: ExprId,
        alt: ExprId,
    },
    Arrow {
        params: Vec<Pattern>,
        body: ArrowBody,
    },
    /// Function expression.
    Function {
        name: Option<String>,
        params: Vec<Pattern>,
        body: StmtId,
    },
    Object {
        props: Vec<ObjectProp>,
    },
    Array {
        elements: Vec<ExprId>,
    },
}

/// One raw fragment of a template literal.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TemplateQuasi {
    /// Fragment text as written (no backticks, no `${`).
    pub raw: String,
    pub span: Span,
}

/// Member access: a static name or a computed expression.
///
/// A static property name is not an expression node, so an expression
/// matcher can never accept the `b` of `a.b` on its own.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum MemberProp {
    Ident { name: String, span: Span },
    Computed(ExprId),
}

/// An arrow function body: a bare expression or a block.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub enum ArrowBody {
    Expr(ExprId),
    Block(StmtId),
}

/// One property of an object literal.
///
/// The shorthand form `{ a }` is stored with an identifier value
/// expression spanning the key, so reference searches still see it;
/// printers collapse it back when `shorthand` is set.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct ObjectProp {
    pub key: PropKey,
    pub value: ExprId,
    pub shorthand: bool,
    pub span: Span,
}

/// An object literal property key. Static keys are not expression
/// nodes (same reasoning as [`MemberProp`]).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum PropKey {
    Ident(String),
    Str { value: String, raw: String },
    Computed(ExprId),
}
