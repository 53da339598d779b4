//! The editor seam.
//!
//! Hosts implement [`Editor`]; the interpreter is its only caller.
//! Prompt methods return `Option` — an absent value is a cancellation,
//! which flows back to the refactoring through the state channel and
//! is never an error.

use std::path::{Path, PathBuf};

use refract_ir::{LineIndex, Position, Selection};

/// Host I/O failure. Refactoring outcomes are never expressed this
/// way; only the host's own plumbing is.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    #[error("could not read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("could not write {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("selection {selection} is outside the buffer")]
    InvalidSelection { selection: Selection },
}

/// A single text edit: replace `selection` with `code`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Modification {
    pub code: String,
    pub selection: Selection,
}

/// A whole-buffer replacement for one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Update {
    pub path: PathBuf,
    pub code: String,
}

/// A cross-file reference site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub path: PathBuf,
    pub selection: Selection,
}

/// One entry of a choice prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    pub label: String,
}

impl Choice {
    pub fn new(label: impl Into<String>) -> Self {
        Choice {
            label: label.into(),
        }
    }
}

/// One parameter slot in a change-signature prompt: where it is now
/// and where the user wants it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamPosition {
    pub label: String,
    pub from: usize,
    pub to: usize,
}

/// A native operation the host may know how to perform itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeOp {
    RenameSymbol,
}

/// Whether the host performed a delegated operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelegateOutcome {
    Done,
    NotSupported,
}

/// The text-editor adapter the interpreter drives.
///
/// One refactoring runs against one buffer at a time; methods block
/// until their effect (or prompt) completes.
pub trait Editor {
    /// Current buffer contents.
    fn code(&self) -> &str;

    /// Current cursor or selection.
    fn selection(&self) -> Selection;

    /// Read another file.
    fn code_of(&self, path: &Path) -> Result<String, EditorError>;

    /// Replace the whole buffer, optionally moving the cursor.
    fn write(&mut self, code: &str, cursor: Option<Position>) -> Result<(), EditorError>;

    /// Replace the whole contents of another file.
    fn write_in(&mut self, path: &Path, code: &str) -> Result<(), EditorError>;

    /// Read the text at `selection`, compute edits from that one
    /// snapshot, and apply them in a single batch.
    fn read_then_write(
        &mut self,
        selection: Selection,
        get_modifications: &dyn Fn(&str) -> Vec<Modification>,
        cursor: Option<Position>,
    ) -> Result<(), EditorError>;

    /// Ask the host to perform a native operation.
    fn delegate(&mut self, op: NativeOp) -> Result<DelegateOutcome, EditorError>;

    /// Surface a short user-facing message.
    fn show_error(&mut self, reason: &str);

    /// Prompt for free text. `None` means the user cancelled.
    fn ask_user_input(&mut self, default_value: Option<&str>) -> Option<String>;

    /// Prompt for a pick; returns the index into `choices`, `None` on
    /// cancel.
    fn ask_user_choice(&mut self, choices: &[Choice]) -> Option<usize>;

    /// Open a positional-reorder prompt. `None` on cancel.
    fn ask_for_positions(&mut self, initial: &[ParamPosition]) -> Option<Vec<ParamPosition>>;

    /// Every reference site of the symbol at `selection`, including
    /// ones in the current file.
    fn selection_references(
        &mut self,
        selection: Selection,
    ) -> Result<Vec<Reference>, EditorError>;
}

/// Apply a batch of edits to one buffer.
///
/// All selections address the same snapshot of `code`; edits are
/// spliced back-to-front so earlier offsets stay valid. Shared by the
/// in-memory and file-backed hosts.
pub fn apply_modifications(
    code: &str,
    modifications: &[Modification],
) -> Result<String, EditorError> {
    let index = LineIndex::new(code);
    let mut spans = Vec::with_capacity(modifications.len());
    for modification in modifications {
        let span = index.span_of(modification.selection).ok_or(
            EditorError::InvalidSelection {
                selection: modification.selection,
            },
        )?;
        spans.push((span, modification.code.as_str()));
    }
    // Later edits first. At equal starts the wider edit goes first,
    // so a point insertion ends up before, not inside, a replacement
    // starting at the same offset.
    spans.sort_by(|a, b| b.0.start.cmp(&a.0.start).then(b.0.end.cmp(&a.0.end)));

    let mut next = code.to_owned();
    for (span, text) in spans {
        next.replace_range(span.to_range(), text);
    }
    Ok(next)
}
