//! The command vocabulary.
//!
//! A command is a data value describing one desired editor effect,
//! interpreted separately from its construction. The set is closed;
//! dispatch is an exhaustive match in the interpreter.

use refract_ir::{Position, Selection};

use crate::editor::{Choice, Modification, NativeOp, ParamPosition, Update};
use crate::refactoring::Refactoring;

/// Edit computation for `ReadThenWrite`: from the text read at the
/// command's selection to a batch of modifications, all addressing
/// that same snapshot.
pub type GetModifications = Box<dyn Fn(&str) -> Vec<Modification>>;

/// An editor effect, optionally followed by another refactoring run
/// against a fresh state once the effect completes.
///
/// A `warning` marks partial success: the effect is still applied,
/// and the non-fatal message is surfaced alongside it.
pub struct Command {
    pub kind: CommandKind,
    pub warning: Option<String>,
    pub then_run: Option<Box<dyn Refactoring>>,
}

/// The closed set of effects.
pub enum CommandKind {
    /// No effect. Also the value a refactoring answers a cancelled
    /// prompt with.
    DoNothing,
    /// Surface a short user-facing message and stop.
    ShowError { reason: String },
    /// Replace the buffer, optionally moving the cursor.
    Write {
        code: String,
        cursor: Option<Position>,
    },
    /// Replace several files; disjoint targets, no ordering guarantee.
    WriteAll { updates: Vec<Update> },
    /// Read at `selection`, compute edits from that snapshot, apply
    /// them in one batch.
    ReadThenWrite {
        selection: Selection,
        get_modifications: GetModifications,
        cursor: Option<Position>,
    },
    /// Ask the host to perform a native operation; an unsupported
    /// answer re-enters the refactoring for its fallback path.
    Delegate { op: NativeOp },
    /// Prompt for free text.
    AskUserInput { default_value: Option<String> },
    /// Prompt for a pick.
    AskUserChoice { choices: Vec<Choice> },
    /// Open the positional-reorder prompt, then collect cross-file
    /// references of `selection`.
    AskChangeSignaturePositions {
        positions: Vec<ParamPosition>,
        selection: Selection,
    },
}

impl Command {
    pub fn new(kind: CommandKind) -> Self {
        Command {
            kind,
            warning: None,
            then_run: None,
        }
    }

    /// Attach a continuation executed against a fresh state after this
    /// command's effect completes.
    #[must_use]
    pub fn then(mut self, next: Box<dyn Refactoring>) -> Self {
        self.then_run = Some(next);
        self
    }

    /// Attach a non-fatal message to surface alongside the effect.
    #[must_use]
    pub fn with_warning(mut self, warning: impl Into<String>) -> Self {
        self.warning = Some(warning.into());
        self
    }

    pub fn do_nothing() -> Self {
        Command::new(CommandKind::DoNothing)
    }

    pub fn show_error(reason: impl Into<String>) -> Self {
        Command::new(CommandKind::ShowError {
            reason: reason.into(),
        })
    }

    pub fn write(code: impl Into<String>) -> Self {
        Command::new(CommandKind::Write {
            code: code.into(),
            cursor: None,
        })
    }

    pub fn write_with_cursor(code: impl Into<String>, cursor: Position) -> Self {
        Command::new(CommandKind::Write {
            code: code.into(),
            cursor: Some(cursor),
        })
    }

    pub fn write_all(updates: Vec<Update>) -> Self {
        Command::new(CommandKind::WriteAll { updates })
    }

    pub fn read_then_write(
        selection: Selection,
        get_modifications: GetModifications,
        cursor: Option<Position>,
    ) -> Self {
        Command::new(CommandKind::ReadThenWrite {
            selection,
            get_modifications,
            cursor,
        })
    }

    pub fn delegate(op: NativeOp) -> Self {
        Command::new(CommandKind::Delegate { op })
    }

    pub fn ask_user_input(default_value: Option<String>) -> Self {
        Command::new(CommandKind::AskUserInput { default_value })
    }

    pub fn ask_user_choice(choices: Vec<Choice>) -> Self {
        Command::new(CommandKind::AskUserChoice { choices })
    }

    pub fn ask_change_signature_positions(
        positions: Vec<ParamPosition>,
        selection: Selection,
    ) -> Self {
        Command::new(CommandKind::AskChangeSignaturePositions {
            positions,
            selection,
        })
    }
}

impl CommandKind {
    /// Stable name for logs and tests.
    pub const fn name(&self) -> &'static str {
        match self {
            CommandKind::DoNothing => "do-nothing",
            CommandKind::ShowError { .. } => "show-error",
            CommandKind::Write { .. } => "write",
            CommandKind::WriteAll { .. } => "write-all",
            CommandKind::ReadThenWrite { .. } => "read-then-write",
            CommandKind::Delegate { .. } => "delegate",
            CommandKind::AskUserInput { .. } => "ask-user-input",
            CommandKind::AskUserChoice { .. } => "ask-user-choice",
            CommandKind::AskChangeSignaturePositions { .. } => "ask-change-signature-positions",
        }
    }
}

impl std::fmt::Debug for CommandKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandKind::ShowError { reason } => {
                write!(f, "show-error({reason:?})")
            }
            CommandKind::Write { cursor, .. } => write!(f, "write(cursor: {cursor:?})"),
            CommandKind::WriteAll { updates } => {
                write!(f, "write-all({} files)", updates.len())
            }
            CommandKind::ReadThenWrite { selection, .. } => {
                write!(f, "read-then-write({selection:?})")
            }
            CommandKind::Delegate { op } => write!(f, "delegate({op:?})"),
            CommandKind::AskUserChoice { choices } => {
                write!(f, "ask-user-choice({} choices)", choices.len())
            }
            other => f.write_str(other.name()),
        }
    }
}

impl std::fmt::Debug for Command {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", self.kind)?;
        if let Some(warning) = &self.warning {
            write!(f, " + warning({warning:?})")?;
        }
        if self.then_run.is_some() {
            write!(f, " + then-run")?;
        }
        Ok(())
    }
}
