//! Parser tests.

use pretty_assertions::assert_eq;
use refract_ir::ast::{
    ArrowBody, BinaryOp, ExprKind, MemberProp, Pattern, StmtKind, VarKind,
};
use refract_ir::{Module, Span};

use crate::{parse, ParseError};

fn parse_ok(source: &str) -> Module {
    match parse(source) {
        Ok(module) => module,
        Err(err) => panic!("parse failed for {source:?}: {err}"),
    }
}

fn first_expr(module: &Module) -> refract_ir::ExprId {
    match &module.arena.stmt(module.body[0]).kind {
        StmtKind::Expr(expr) => *expr,
        other => panic!("expected expression statement, got {other:?}"),
    }
}

#[test]
fn parses_call_on_member() {
    let module = parse_ok("console.log(\"Hello\");");
    let call = first_expr(&module);
    let ExprKind::Call { callee, args } = &module.arena.expr(call).kind else {
        panic!("expected call");
    };
    let ExprKind::Member { object, property } = &module.arena.expr(*callee).kind else {
        panic!("expected member callee");
    };
    assert_eq!(
        module.arena.expr(*object).kind,
        ExprKind::Ident("console".into())
    );
    let MemberProp::Ident { name, .. } = property else {
        panic!("expected static property");
    };
    assert_eq!(name, "log");
    assert_eq!(args.len(), 1);
    let ExprKind::Str { value, raw } = &module.arena.expr(args[0]).kind else {
        panic!("expected string argument");
    };
    assert_eq!(value, "Hello");
    assert_eq!(raw, "\"Hello\"");
    // Span covers the argument exactly: `"Hello"`.
    assert_eq!(module.arena.expr_span(args[0]), Span::new(12, 19));
}

#[test]
fn precedence_mul_binds_tighter_than_add() {
    let module = parse_ok("a + b * c;");
    let expr = first_expr(&module);
    let ExprKind::Binary { op, lhs, rhs } = &module.arena.expr(expr).kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::Add);
    assert_eq!(module.arena.expr(*lhs).kind, ExprKind::Ident("a".into()));
    let ExprKind::Binary { op: inner, .. } = &module.arena.expr(*rhs).kind else {
        panic!("expected nested binary");
    };
    assert_eq!(*inner, BinaryOp::Mul);
}

#[test]
fn subtraction_is_left_associative() {
    let module = parse_ok("a - b - c;");
    let expr = first_expr(&module);
    let ExprKind::Binary { op, lhs, .. } = &module.arena.expr(expr).kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::Sub);
    assert!(matches!(
        module.arena.expr(*lhs).kind,
        ExprKind::Binary {
            op: BinaryOp::Sub,
            ..
        }
    ));
}

#[test]
fn parses_ternary() {
    let module = parse_ok("isValid ? doSomething() : doNothing();");
    let expr = first_expr(&module);
    assert!(matches!(
        module.arena.expr(expr).kind,
        ExprKind::Cond { .. }
    ));
}

#[test]
fn parses_declaration_list_with_destructuring() {
    let module = parse_ok("const { a, b: c } = source, n = 1;");
    let StmtKind::VarDecl(decl) = &module.arena.stmt(module.body[0]).kind else {
        panic!("expected declaration");
    };
    assert_eq!(decl.kind, VarKind::Const);
    assert!(!decl.exported);
    assert_eq!(decl.declarators.len(), 2);
    let Pattern::Object(pat) = &decl.declarators[0].pattern else {
        panic!("expected object pattern");
    };
    assert_eq!(pat.props.len(), 2);
    assert_eq!(pat.props[0].key, "a");
    assert!(pat.props[0].value.is_none());
    assert_eq!(pat.props[1].key, "b");
    assert!(pat.props[1].value.is_some());
}

#[test]
fn parses_exported_declarations() {
    let module = parse_ok("export const total = 0;\nexport function run() {}");
    let StmtKind::VarDecl(decl) = &module.arena.stmt(module.body[0]).kind else {
        panic!("expected declaration");
    };
    assert!(decl.exported);
    let StmtKind::Func(func) = &module.arena.stmt(module.body[1]).kind else {
        panic!("expected function");
    };
    assert!(func.exported);
    assert_eq!(func.name, "run");
}

#[test]
fn parses_if_else_chain() {
    let module = parse_ok("if (a) { x(); } else { y(); }");
    let StmtKind::If { alt, .. } = &module.arena.stmt(module.body[0]).kind else {
        panic!("expected if");
    };
    assert!(alt.is_some());
}

#[test]
fn parses_arrow_functions() {
    let module = parse_ok("const f = x => x + 1;\nconst g = (a, b) => { return a; };");
    let StmtKind::VarDecl(decl) = &module.arena.stmt(module.body[0]).kind else {
        panic!("expected declaration");
    };
    let Some(init) = decl.declarators[0].init else {
        panic!("expected initializer");
    };
    let ExprKind::Arrow { params, body } = &module.arena.expr(init).kind else {
        panic!("expected arrow");
    };
    assert_eq!(params.len(), 1);
    assert!(matches!(body, ArrowBody::Expr(_)));

    let StmtKind::VarDecl(decl) = &module.arena.stmt(module.body[1]).kind else {
        panic!("expected declaration");
    };
    let Some(init) = decl.declarators[0].init else {
        panic!("expected initializer");
    };
    let ExprKind::Arrow { params, body } = &module.arena.expr(init).kind else {
        panic!("expected arrow");
    };
    assert_eq!(params.len(), 2);
    assert!(matches!(body, ArrowBody::Block(_)));
}

#[test]
fn parses_parenthesized_expression_not_as_arrow() {
    let module = parse_ok("(a + b) * c;");
    let expr = first_expr(&module);
    let ExprKind::Binary { op, .. } = &module.arena.expr(expr).kind else {
        panic!("expected binary");
    };
    assert_eq!(*op, BinaryOp::Mul);
}

#[test]
fn parses_template_interpolations() {
    let module = parse_ok("`Hi ${user.name}!`;");
    let expr = first_expr(&module);
    let ExprKind::Template { quasis, exprs } = &module.arena.expr(expr).kind else {
        panic!("expected template");
    };
    assert_eq!(quasis.len(), 2);
    assert_eq!(quasis[0].raw, "Hi ");
    assert_eq!(quasis[1].raw, "!");
    assert_eq!(exprs.len(), 1);
    let ExprKind::Member { object, .. } = &module.arena.expr(exprs[0]).kind else {
        panic!("expected member interpolation");
    };
    // Inner spans are absolute: `user` starts after "`Hi ${".
    assert_eq!(module.arena.expr_span(*object), Span::new(6, 10));
}

#[test]
fn parses_object_literal_shorthand() {
    let module = parse_ok("send({ name, id: 1 });");
    let call = first_expr(&module);
    let ExprKind::Call { args, .. } = &module.arena.expr(call).kind else {
        panic!("expected call");
    };
    let ExprKind::Object { props } = &module.arena.expr(args[0]).kind else {
        panic!("expected object literal");
    };
    assert!(props[0].shorthand);
    assert_eq!(
        module.arena.expr(props[0].value).kind,
        ExprKind::Ident("name".into())
    );
    assert!(!props[1].shorthand);
}

#[test]
fn rest_param_must_be_last() {
    assert!(matches!(
        parse("function f(...rest, a) {}"),
        Err(ParseError::RestNotLast { .. })
    ));
    assert!(parse("function f(a, ...rest) {}").is_ok());
}

#[test]
fn missing_semicolons_are_tolerated() {
    assert!(parse("const a = 1\nconst b = 2\n").is_ok());
}

#[test]
fn reports_unexpected_token() {
    assert!(matches!(
        parse("const = 1;"),
        Err(ParseError::Unexpected { .. })
    ));
}

#[test]
fn statement_spans_include_semicolon() {
    let module = parse_ok("const a = 1;");
    assert_eq!(module.arena.stmt_span(module.body[0]), Span::new(0, 12));
}
