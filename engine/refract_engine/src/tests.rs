//! End-to-end scenarios: a refactoring, the interpreter, and a
//! scripted editor.

use pretty_assertions::assert_eq;
use refract_ir::{Position, Selection};

use crate::command::Command;
use crate::editor::{Editor, ParamPosition};
use crate::interpreter::execute;
use crate::refactoring::Refactoring;
use crate::refactorings::{
    ChangeSignature, ExtractVariable, FlipIfElse, FlipTernary, InlineVariable, MoveStatement,
    RenameSymbol, SplitDeclaration,
};
use crate::state::RefactoringState;
use crate::testing::ScriptedEditor;

fn run(refactoring: &dyn Refactoring, editor: &mut ScriptedEditor) {
    if let Err(err) = execute(refactoring, editor) {
        panic!("interpreter failed: {err}");
    }
}

#[test]
fn extracts_string_under_cursor() {
    // Cursor in the middle of "Hello".
    let mut editor = ScriptedEditor::with_cursor("console.log(\"Hello\");", 0, 16);
    run(&ExtractVariable::new(), &mut editor);

    assert_eq!(editor.code(), "const hello = \"Hello\";\nconsole.log(hello);");
    assert_eq!(editor.effects, vec!["read-then-write"]);
    assert!(editor.errors.is_empty());
    // Cursor lands on the new variable's name.
    assert_eq!(editor.cursor, Some(Position::new(0, 6)));
}

#[test]
fn extract_replaces_all_occurrences_on_request() {
    let source = "console.log(\"Hi\");\nsend(\"Hi\");\n";
    let mut editor =
        ScriptedEditor::with_cursor(source, 0, 14).answering_choice(Some(0));
    run(&ExtractVariable::new(), &mut editor);

    assert_eq!(
        editor.code(),
        "const hi = \"Hi\";\nconsole.log(hi);\nsend(hi);\n"
    );
    assert_eq!(editor.effects, vec!["read-then-write"]);
}

#[test]
fn extract_replaces_only_selected_occurrence_on_request() {
    let source = "console.log(\"Hi\");\nsend(\"Hi\");\n";
    let mut editor =
        ScriptedEditor::with_cursor(source, 0, 14).answering_choice(Some(1));
    run(&ExtractVariable::new(), &mut editor);

    assert_eq!(
        editor.code(),
        "const hi = \"Hi\";\nconsole.log(hi);\nsend(\"Hi\");\n"
    );
}

#[test]
fn extract_cancel_leaves_buffer_untouched() {
    let source = "console.log(\"Hi\");\nsend(\"Hi\");\n";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 14).answering_choice(None);
    run(&ExtractVariable::new(), &mut editor);

    assert_eq!(editor.code(), source);
    assert!(editor.effects.is_empty());
    assert!(editor.errors.is_empty());
}

#[test]
fn extract_resolves_name_collisions_with_numeric_suffix() {
    let source = "const hello = 1;\nconsole.log(\"Hello\");\n";
    let mut editor = ScriptedEditor::with_cursor(source, 1, 14);
    run(&ExtractVariable::new(), &mut editor);

    assert_eq!(
        editor.code(),
        "const hello = 1;\nconst hello2 = \"Hello\";\nconsole.log(hello2);\n"
    );
}

#[test]
fn extract_through_destructuring_keeps_trailing_access_intact() {
    // Extracting `b` out of `a.b.c`: the `.c` must survive the batch.
    let source = "use(a.b.c);\n";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 6);
    run(&ExtractVariable::with_destructuring(), &mut editor);

    assert_eq!(editor.code(), "const { b } = a;\nuse(b.c);\n");
    assert_eq!(editor.effects, vec!["read-then-write"]);
}

#[test]
fn extract_indents_declaration_to_match_scope() {
    let source = "function greet() {\n  console.log(\"Hello\");\n}\n";
    let mut editor = ScriptedEditor::with_cursor(source, 1, 17);
    run(&ExtractVariable::new(), &mut editor);

    assert_eq!(
        editor.code(),
        "function greet() {\n  const hello = \"Hello\";\n  console.log(hello);\n}\n"
    );
}

#[test]
fn no_match_shows_error_and_never_writes() {
    let source = "const a = 1;\n";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 3);
    run(&FlipTernary, &mut editor);

    assert_eq!(editor.code(), source);
    assert!(editor.effects.is_empty());
    assert_eq!(editor.errors.len(), 1);
}

#[test]
fn flip_ternary_swaps_branches_and_negates() {
    let source = "const status = isValid ? \"ok\" : \"ko\";\n";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 18);
    run(&FlipTernary, &mut editor);

    assert_eq!(
        editor.code(),
        "const status = !isValid ? \"ko\" : \"ok\";\n"
    );
}

#[test]
fn flip_if_else_flips_the_innermost_if() {
    let source = "if (a) { if (b) { x(); } else { y(); } }";
    // Cursor on the inner test `b`.
    let mut editor = ScriptedEditor::with_cursor(source, 0, 13);
    run(&FlipIfElse, &mut editor);

    // Continuation lines indent relative to the inner if's column.
    assert_eq!(
        editor.code(),
        "if (a) { if (!b) {\n           y();\n         } else {\n           x();\n         } }"
    );
}

#[test]
fn flip_braces_an_else_if_branch() {
    let source = "if (a) { x(); } else if (b) { y(); }";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 4);
    run(&FlipIfElse, &mut editor);

    // The else-if moves into the guard position braced, so the inner
    // else cannot rebind.
    assert_eq!(
        editor.code(),
        "if (!a) {\n  if (b) {\n    y();\n  }\n} else {\n  x();\n}"
    );
}

#[test]
fn flip_if_without_else_reports_why() {
    let source = "if (a) { x(); }";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 4);
    run(&FlipIfElse, &mut editor);

    assert_eq!(editor.code(), source);
    assert_eq!(
        editor.errors,
        vec!["this if statement has no else branch to flip".to_owned()]
    );
}

#[test]
fn inline_variable_substitutes_and_removes_declaration() {
    let source = "const hello = \"Hello\";\nconsole.log(hello);\n";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 8);
    run(&InlineVariable, &mut editor);

    assert_eq!(editor.code(), "console.log(\"Hello\");\n");
}

#[test]
fn inline_variable_parenthesizes_weak_values() {
    let source = "const total = a + b;\nsend(total * 2);\n";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 8);
    run(&InlineVariable, &mut editor);

    assert_eq!(editor.code(), "send((a + b) * 2);\n");
}

#[test]
fn inline_vetoes_reassigned_variables() {
    let source = "let a = 1;\nsend(a);\na = 2;\n";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 4);
    run(&InlineVariable, &mut editor);

    assert_eq!(editor.code(), source);
    assert_eq!(editor.errors.len(), 1);
    assert!(editor.errors[0].contains("assigned again"));
}

#[test]
fn inline_vetoes_exported_variables() {
    let source = "export const config = 1;\nsend(config);\n";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 14);
    run(&InlineVariable, &mut editor);

    assert_eq!(editor.code(), source);
    assert_eq!(editor.errors.len(), 1);
    assert!(editor.errors[0].contains("exported"));
}

#[test]
fn inline_destructured_property_goes_through_its_owner() {
    let source = "const { name } = user;\nsend(name);\n";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 9);
    run(&InlineVariable, &mut editor);

    assert_eq!(editor.code(), "send(user.name);\n");
}

#[test]
fn split_declaration_gives_each_declarator_a_statement() {
    let source = "let a = 1, b = 2;\n";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 5);
    run(&SplitDeclaration, &mut editor);

    assert_eq!(editor.code(), "let a = 1;\nlet b = 2;\n");
}

#[test]
fn split_single_declarator_reports_why() {
    let source = "let a = 1;\n";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 5);
    run(&SplitDeclaration, &mut editor);

    assert_eq!(editor.code(), source);
    assert_eq!(editor.errors.len(), 1);
    assert!(editor.errors[0].contains("nothing to split"));
}

#[test]
fn move_statement_up_swaps_with_previous_sibling() {
    let source = "const a = 1;\nconst b = 2;\n";
    let mut editor = ScriptedEditor::with_cursor(source, 1, 6);
    run(&MoveStatement::up(), &mut editor);

    assert_eq!(editor.code(), "const b = 2;\nconst a = 1;\n");
    assert_eq!(editor.cursor, Some(Position::new(0, 6)));
}

#[test]
fn move_statement_down_carries_multi_line_statements() {
    let source = "function f() {\n  x();\n}\nconst a = 1;\n";
    // Cursor on the function header: the whole declaration moves.
    let mut editor = ScriptedEditor::with_cursor(source, 0, 3);
    run(&MoveStatement::down(), &mut editor);

    assert_eq!(editor.code(), "const a = 1;\nfunction f() {\n  x();\n}\n");
    assert_eq!(editor.cursor, Some(Position::new(1, 3)));
}

#[test]
fn move_statement_at_boundary_does_nothing() {
    let source = "const a = 1;\nconst b = 2;\n";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 3);
    run(&MoveStatement::up(), &mut editor);

    assert_eq!(editor.code(), source);
    assert!(editor.effects.is_empty());
    assert!(editor.errors.is_empty());
}

#[test]
fn rename_delegates_when_the_host_can_do_it() {
    let source = "const user = 1;\nsend(user);\n";
    let mut editor = ScriptedEditor::with_cursor(source, 1, 6).supporting_delegate();
    run(&RenameSymbol, &mut editor);

    assert_eq!(editor.code(), source);
    assert_eq!(editor.effects, vec!["delegate"]);
}

#[test]
fn rename_falls_back_to_prompt_when_unsupported() {
    let source = "const user = 1;\nsend(user);\n";
    let mut editor =
        ScriptedEditor::with_cursor(source, 1, 6).answering_input(Some("client"));
    run(&RenameSymbol, &mut editor);

    assert_eq!(editor.code(), "const client = 1;\nsend(client);\n");
    assert_eq!(editor.effects, vec!["read-then-write"]);
}

#[test]
fn rename_cancel_does_nothing() {
    let source = "const user = 1;\nsend(user);\n";
    let mut editor = ScriptedEditor::with_cursor(source, 1, 6).answering_input(None);
    run(&RenameSymbol, &mut editor);

    assert_eq!(editor.code(), source);
    assert!(editor.effects.is_empty());
}

#[test]
fn rename_expands_shorthand_properties() {
    let source = "const name = get();\nsend({ name });\n";
    // Cursor on the shorthand reference.
    let mut editor =
        ScriptedEditor::with_cursor(source, 1, 8).answering_input(Some("label"));
    run(&RenameSymbol, &mut editor);

    assert_eq!(editor.code(), "const label = get();\nsend({ name: label });\n");
}

#[test]
fn change_signature_reorders_declaration_and_references() {
    let source = "function add(a, b) { return a - b; }\nadd(first, second);\n";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 14)
        .answering_positions(Some(vec![
            ParamPosition {
                label: "a".into(),
                from: 0,
                to: 1,
            },
            ParamPosition {
                label: "b".into(),
                from: 1,
                to: 0,
            },
        ]))
        .with_reference("main.js", Selection::from_coords(0, 9, 0, 12));
    run(&ChangeSignature, &mut editor);

    assert_eq!(
        editor.code(),
        "function add(b, a) { return a - b; }\nadd(second, first);\n"
    );
    assert_eq!(editor.effects, vec!["write-in"]);
}

#[test]
fn change_signature_updates_other_files() {
    let source = "function add(a, b) { return a - b; }\n";
    let other = "add(one, two);\nconst c = add(3, 4);\n";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 14)
        .with_file("lib.js", other)
        .answering_positions(Some(vec![
            ParamPosition {
                label: "a".into(),
                from: 0,
                to: 1,
            },
            ParamPosition {
                label: "b".into(),
                from: 1,
                to: 0,
            },
        ]))
        .with_reference("main.js", Selection::from_coords(0, 9, 0, 12))
        .with_reference("lib.js", Selection::from_coords(0, 0, 0, 3));
    run(&ChangeSignature, &mut editor);

    assert_eq!(editor.code(), "function add(b, a) { return a - b; }\n");
    assert_eq!(
        editor.file("lib.js"),
        Some("add(two, one);\nconst c = add(4, 3);\n")
    );
}

#[test]
fn change_signature_warns_about_unparsable_reference_files() {
    let source = "function add(a, b) { return a - b; }\n";
    let broken = "add(one,,,\n";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 14)
        .with_file("broken.js", broken)
        .answering_positions(Some(vec![
            ParamPosition {
                label: "a".into(),
                from: 0,
                to: 1,
            },
            ParamPosition {
                label: "b".into(),
                from: 1,
                to: 0,
            },
        ]))
        .with_reference("main.js", Selection::from_coords(0, 9, 0, 12))
        .with_reference("broken.js", Selection::from_coords(0, 0, 0, 3));
    run(&ChangeSignature, &mut editor);

    // Partial success: the good file is rewritten, the bad one is
    // reported, not corrupted.
    assert_eq!(editor.code(), "function add(b, a) { return a - b; }\n");
    assert_eq!(editor.file("broken.js"), Some(broken));
    assert_eq!(editor.errors.len(), 1);
    assert!(editor.errors[0].contains("broken.js"));
}

#[test]
fn change_signature_vetoes_non_final_rest_parameter() {
    let source = "function join(first, ...rest) { return rest; }\njoin(1, 2, 3);\n";
    let mut editor = ScriptedEditor::with_cursor(source, 0, 15)
        .answering_positions(Some(vec![
            ParamPosition {
                label: "first".into(),
                from: 0,
                to: 1,
            },
            ParamPosition {
                label: "...rest".into(),
                from: 1,
                to: 0,
            },
        ]))
        .with_reference("main.js", Selection::from_coords(0, 9, 0, 13));
    run(&ChangeSignature, &mut editor);

    assert_eq!(editor.code(), source);
    assert!(editor.effects.iter().all(|&effect| effect != "write"
        && effect != "write-in"
        && effect != "read-then-write"));
    assert_eq!(editor.errors.len(), 1);
    assert!(editor.errors[0].contains("rest parameter"));
}

#[test]
fn change_signature_cancel_does_nothing() {
    let source = "function add(a, b) { return a + b; }\n";
    let mut editor =
        ScriptedEditor::with_cursor(source, 0, 14).answering_positions(None);
    run(&ChangeSignature, &mut editor);

    assert_eq!(editor.code(), source);
    assert!(editor.effects.is_empty());
    assert!(editor.errors.is_empty());
}

#[test]
fn then_run_continues_with_a_fresh_state() {
    struct WriteMarker {
        marker: &'static str,
        then: Option<&'static str>,
    }

    impl Refactoring for WriteMarker {
        fn command_name(&self) -> &'static str {
            "write-marker"
        }

        fn run(&self, state: &RefactoringState) -> Command {
            let command = Command::write(format!("{}{}", state.code, self.marker));
            match self.then {
                Some(marker) => command.then(Box::new(WriteMarker {
                    marker,
                    then: None,
                })),
                None => command,
            }
        }
    }

    let mut editor = ScriptedEditor::with_cursor("", 0, 0);
    let chained = WriteMarker {
        marker: "a",
        then: Some("b"),
    };
    run(&chained, &mut editor);

    // The continuation saw the first write's result: fresh state.
    assert_eq!(editor.code(), "ab");
    assert_eq!(editor.effects, vec!["write", "write"]);
}
