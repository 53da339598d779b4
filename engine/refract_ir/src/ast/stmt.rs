//! Statement nodes.

use crate::{ExprId, Span, Spanned, StmtId};

use super::patterns::Pattern;

/// Statement node.
#[derive(Clone, Eq, PartialEq, Hash)]
pub struct Stmt {
    pub kind: StmtKind,
    pub span: Span,
}

impl Stmt {
    pub fn new(kind: StmtKind, span: Span) -> Self {
        Stmt { kind, span }
    }
}

impl std::fmt::Debug for Stmt {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?} @ {:?}", self.kind, self.span)
    }
}

impl Spanned for Stmt {
    fn span(&self) -> Span {
        self.span
    }
}

/// Statement kinds.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum StmtKind {
    /// Expression statement.
    Expr(ExprId),
    /// `var` / `let` / `const` declaration.
    VarDecl(VarDecl),
    /// Function declaration.
    Func(FuncDecl),
    Return(Option<ExprId>),
    If {
        test: ExprId,
        cons: StmtId,
        alt: Option<StmtId>,
    },
    While {
        test: ExprId,
        body: StmtId,
    },
    Block(Vec<StmtId>),
    /// A bare `;`.
    Empty,
}

/// A variable declaration statement.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct VarDecl {
    pub kind: VarKind,
    pub declarators: Vec<Declarator>,
    pub exported: bool,
}

/// Declaration keyword.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum VarKind {
    Var,
    Let,
    Const,
}

impl VarKind {
    pub const fn as_str(self) -> &'static str {
        match self {
            VarKind::Var => "var",
            VarKind::Let => "let",
            VarKind::Const => "const",
        }
    }
}

impl std::fmt::Display for VarKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One `pattern = init` of a declaration.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Declarator {
    pub pattern: Pattern,
    pub init: Option<ExprId>,
    pub span: Span,
}

/// A function declaration statement.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct FuncDecl {
    pub name: String,
    /// Span of the name token, for cursor targeting.
    pub name_span: Span,
    pub params: Vec<Pattern>,
    /// Always a `StmtKind::Block`.
    pub body: StmtId,
    pub exported: bool,
}
