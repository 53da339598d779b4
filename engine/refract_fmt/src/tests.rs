//! Printer tests: parse a snippet, render it back, compare.

use pretty_assertions::assert_eq;
use refract_ir::ast::StmtKind;
use refract_ir::Module;

use crate::{print_expr, print_stmt};

fn parse(source: &str) -> Module {
    match refract_parse::parse(source) {
        Ok(module) => module,
        Err(err) => panic!("parse failed for {source:?}: {err}"),
    }
}

/// Parse a single expression statement and render the expression.
fn round_trip_expr(source: &str) -> String {
    let module = parse(source);
    match &module.arena.stmt(module.body[0]).kind {
        StmtKind::Expr(expr) => print_expr(&module.arena, *expr),
        other => panic!("expected expression statement, got {other:?}"),
    }
}

fn round_trip_stmt(source: &str) -> String {
    let module = parse(source);
    print_stmt(&module.arena, module.body[0], 0)
}

#[test]
fn renders_literals_verbatim() {
    assert_eq!(round_trip_expr("\"Hello\";"), "\"Hello\"");
    assert_eq!(round_trip_expr("'Hello';"), "'Hello'");
    assert_eq!(round_trip_expr("12.5;"), "12.5");
    assert_eq!(round_trip_expr("null;"), "null");
}

#[test]
fn renders_calls_and_members() {
    assert_eq!(
        round_trip_expr("console.log(\"Hi\", user.name);"),
        "console.log(\"Hi\", user.name)"
    );
    assert_eq!(round_trip_expr("items[0].value;"), "items[0].value");
}

#[test]
fn preserves_precedence_with_parens() {
    assert_eq!(round_trip_expr("(a + b) * c;"), "(a + b) * c");
    assert_eq!(round_trip_expr("a + b * c;"), "a + b * c");
    assert_eq!(round_trip_expr("(a || b) && c;"), "(a || b) && c");
    assert_eq!(round_trip_expr("!(a && b);"), "!(a && b)");
}

#[test]
fn renders_ternary() {
    assert_eq!(
        round_trip_expr("isValid ? save() : discard();"),
        "isValid ? save() : discard()"
    );
}

#[test]
fn renders_template_with_interpolation() {
    assert_eq!(
        round_trip_expr("`Hi ${user.name}!`;"),
        "`Hi ${user.name}!`"
    );
}

#[test]
fn renders_arrows() {
    assert_eq!(round_trip_expr("x => x + 1;"), "x => x + 1");
    assert_eq!(
        round_trip_expr("(a, b) => send(a, b);"),
        "(a, b) => send(a, b)"
    );
}

#[test]
fn renders_object_with_shorthand() {
    assert_eq!(
        round_trip_expr("send({ name, id: 1 });"),
        "send({ name, id: 1 })"
    );
}

#[test]
fn renders_declarations() {
    assert_eq!(
        round_trip_stmt("const { a, b: c } = source;"),
        "const { a, b: c } = source;"
    );
    assert_eq!(
        round_trip_stmt("export let total = 0, count = 1;"),
        "export let total = 0, count = 1;"
    );
}

#[test]
fn renders_if_else_with_indentation() {
    assert_eq!(
        round_trip_stmt("if (a) { x(); } else { y(); }"),
        "if (a) {\n  x();\n} else {\n  y();\n}"
    );
}

#[test]
fn renders_function_with_rest_param() {
    assert_eq!(
        round_trip_stmt("function join(first, ...rest) { return rest; }"),
        "function join(first, ...rest) {\n  return rest;\n}"
    );
}

#[test]
fn nested_blocks_indent_relative_to_base() {
    let module = parse("if (a) { if (b) { x(); } }");
    let rendered = print_stmt(&module.arena, module.body[0], 4);
    assert_eq!(rendered, "if (a) {\n      if (b) {\n        x();\n      }\n    }");
}
