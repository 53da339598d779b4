//! The command interpreter.
//!
//! An explicit trampoline: evaluate `(refactoring, state) -> command`,
//! perform the command's effect through the editor, and either stop
//! (terminal command), re-enter the same refactoring with an answer
//! state, or continue with a `then_run` continuation against a fresh
//! state. Exactly one terminal effect is applied per pass; the editor
//! never sees an intermediate state.

use crate::command::{Command, CommandKind};
use crate::editor::{DelegateOutcome, Editor, EditorError};
use crate::refactoring::Refactoring;
use crate::state::{ReferenceCode, RefactoringState, StateKind};

/// What one dispatched command means for the loop.
enum Flow {
    /// Terminal effect done; run the continuation if one is attached.
    Done,
    /// Re-enter the same refactoring with this answer.
    Reenter(StateKind),
}

/// Run one refactoring to completion against an editor.
pub fn execute(
    refactoring: &dyn Refactoring,
    editor: &mut dyn Editor,
) -> Result<(), EditorError> {
    let mut chained: Option<Box<dyn Refactoring>> = None;
    let mut state = RefactoringState::initial(editor);

    loop {
        let current: &dyn Refactoring = chained.as_deref().unwrap_or(refactoring);
        let command = current.run(&state);
        tracing::debug!(
            refactoring = current.command_name(),
            command = command.kind.name(),
            "dispatching command"
        );

        let Command {
            kind,
            warning,
            then_run,
        } = command;
        match dispatch(kind, editor)? {
            Flow::Done => {
                // Partial success: the effect applied, the message is
                // informational.
                if let Some(warning) = warning {
                    editor.show_error(&warning);
                }
                match then_run {
                    Some(next) => {
                        chained = Some(next);
                        state = RefactoringState::initial(editor);
                    }
                    None => return Ok(()),
                }
            }
            Flow::Reenter(kind) => {
                state = state.reenter(kind);
            }
        }
    }
}

/// Perform one command's effect.
fn dispatch(kind: CommandKind, editor: &mut dyn Editor) -> Result<Flow, EditorError> {
    match kind {
        CommandKind::DoNothing => Ok(Flow::Done),
        CommandKind::ShowError { reason } => {
            editor.show_error(&reason);
            Ok(Flow::Done)
        }
        CommandKind::Write { code, cursor } => {
            editor.write(&code, cursor)?;
            Ok(Flow::Done)
        }
        CommandKind::WriteAll { updates } => {
            // Targets are disjoint files; no ordering is guaranteed or
            // needed, so a plain sweep is enough.
            for update in updates {
                editor.write_in(&update.path, &update.code)?;
            }
            Ok(Flow::Done)
        }
        CommandKind::ReadThenWrite {
            selection,
            get_modifications,
            cursor,
        } => {
            editor.read_then_write(selection, get_modifications.as_ref(), cursor)?;
            Ok(Flow::Done)
        }
        CommandKind::Delegate { op } => match editor.delegate(op)? {
            DelegateOutcome::Done => Ok(Flow::Done),
            DelegateOutcome::NotSupported => {
                tracing::debug!(?op, "host does not support operation, re-entering");
                Ok(Flow::Reenter(StateKind::CommandNotSupported))
            }
        },
        CommandKind::AskUserInput { default_value } => {
            let value = editor.ask_user_input(default_value.as_deref());
            Ok(Flow::Reenter(StateKind::UserInputResponse { value }))
        }
        CommandKind::AskUserChoice { choices } => {
            let choice = editor.ask_user_choice(&choices);
            Ok(Flow::Reenter(StateKind::UserChoiceResponse { choice }))
        }
        CommandKind::AskChangeSignaturePositions {
            positions,
            selection,
        } => {
            let chosen = editor.ask_for_positions(&positions);
            let references = if chosen.is_some() {
                let mut sites = Vec::new();
                for reference in editor.selection_references(selection)? {
                    let code = editor.code_of(&reference.path)?;
                    sites.push(ReferenceCode {
                        path: reference.path,
                        selection: reference.selection,
                        code,
                    });
                }
                sites
            } else {
                Vec::new()
            };
            Ok(Flow::Reenter(StateKind::WithChangeSignaturePositions {
                positions: chosen,
                references,
            }))
        }
    }
}
