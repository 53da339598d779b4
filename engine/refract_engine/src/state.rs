//! Refactoring state.
//!
//! The state carries the buffer snapshot a refactoring runs against
//! plus the answer to whatever the interpreter last asked. States are
//! replaced, never mutated.

use std::path::PathBuf;

use refract_ir::Selection;

use crate::editor::{Editor, ParamPosition};

/// Input to one pure `run` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefactoringState {
    pub code: String,
    pub selection: Selection,
    pub kind: StateKind,
}

impl RefactoringState {
    /// Fresh state from the editor's current buffer.
    pub fn initial(editor: &dyn Editor) -> Self {
        RefactoringState {
            code: editor.code().to_owned(),
            selection: editor.selection(),
            kind: StateKind::New,
        }
    }

    /// Same buffer snapshot, new tag. Used by the interpreter when an
    /// interactive command re-enters the refactoring.
    #[must_use]
    pub fn reenter(self, kind: StateKind) -> Self {
        RefactoringState { kind, ..self }
    }

    /// Convenience for tests and hosts: a `New` state from raw parts.
    pub fn new(code: impl Into<String>, selection: Selection) -> Self {
        RefactoringState {
            code: code.into(),
            selection,
            kind: StateKind::New,
        }
    }
}

/// What the interpreter is answering with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateKind {
    /// First entry.
    New,
    /// The host could not perform the delegated operation; run the
    /// fallback path.
    CommandNotSupported,
    /// Answer to `AskUserInput`. `None` means cancelled.
    UserInputResponse { value: Option<String> },
    /// Answer to `AskUserChoice`: index into the presented choices.
    /// `None` means cancelled.
    UserChoiceResponse { choice: Option<usize> },
    /// Answer to `AskChangeSignaturePositions`: the chosen ordering
    /// (`None` on cancel) plus every reference site with its file
    /// contents.
    WithChangeSignaturePositions {
        positions: Option<Vec<ParamPosition>>,
        references: Vec<ReferenceCode>,
    },
}

/// A reference site paired with its file's contents, read by the
/// interpreter so the refactoring stays pure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceCode {
    pub path: PathBuf,
    pub selection: Selection,
    pub code: String,
}
