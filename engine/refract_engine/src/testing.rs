//! Test support: a scripted in-memory editor.
//!
//! Hosts prompts with canned answers and records every effect, so
//! interpreter runs can be asserted end to end without a real editor.
//! Automated callers substitute canned immediate responses for
//! prompts; this is that caller.

use std::collections::VecDeque;
use std::path::{Path, PathBuf};

use refract_ir::{LineIndex, Position, Selection};
use rustc_hash::FxHashMap;

use crate::editor::{
    apply_modifications, Choice, DelegateOutcome, Editor, EditorError, Modification, NativeOp,
    ParamPosition, Reference,
};

/// In-memory editor with scripted prompt answers.
pub struct ScriptedEditor {
    code: String,
    selection: Selection,
    /// Path of the buffer itself; `write_in` on it updates `code`.
    own_path: PathBuf,
    files: FxHashMap<PathBuf, String>,
    choice_answers: VecDeque<Option<usize>>,
    input_answers: VecDeque<Option<String>>,
    position_answers: VecDeque<Option<Vec<ParamPosition>>>,
    delegate_supported: bool,
    references: Vec<Reference>,
    /// Messages surfaced through `show_error`.
    pub errors: Vec<String>,
    /// Terminal effects in order: "write", "write-in", "read-then-write".
    pub effects: Vec<&'static str>,
    /// Last cursor an effect carried.
    pub cursor: Option<Position>,
}

impl ScriptedEditor {
    pub fn new(code: impl Into<String>, selection: Selection) -> Self {
        ScriptedEditor {
            code: code.into(),
            selection,
            own_path: PathBuf::from("main.js"),
            files: FxHashMap::default(),
            choice_answers: VecDeque::new(),
            input_answers: VecDeque::new(),
            position_answers: VecDeque::new(),
            delegate_supported: false,
            references: Vec::new(),
            errors: Vec::new(),
            effects: Vec::new(),
            cursor: None,
        }
    }

    /// Place the cursor at `line:character` with no selection.
    pub fn with_cursor(code: impl Into<String>, line: u32, character: u32) -> Self {
        Self::new(
            code,
            Selection::cursor_at(Position::new(line, character)),
        )
    }

    #[must_use]
    pub fn with_file(mut self, path: impl Into<PathBuf>, code: impl Into<String>) -> Self {
        self.files.insert(path.into(), code.into());
        self
    }

    #[must_use]
    pub fn answering_choice(mut self, answer: Option<usize>) -> Self {
        self.choice_answers.push_back(answer);
        self
    }

    #[must_use]
    pub fn answering_input(mut self, answer: Option<&str>) -> Self {
        self.input_answers.push_back(answer.map(str::to_owned));
        self
    }

    #[must_use]
    pub fn answering_positions(mut self, answer: Option<Vec<ParamPosition>>) -> Self {
        self.position_answers.push_back(answer);
        self
    }

    #[must_use]
    pub fn supporting_delegate(mut self) -> Self {
        self.delegate_supported = true;
        self
    }

    #[must_use]
    pub fn with_reference(mut self, path: impl Into<PathBuf>, selection: Selection) -> Self {
        self.references.push(Reference {
            path: path.into(),
            selection,
        });
        self
    }

    /// Contents of a secondary file after the run.
    pub fn file(&self, path: impl AsRef<Path>) -> Option<&str> {
        self.files.get(path.as_ref()).map(String::as_str)
    }
}

impl Editor for ScriptedEditor {
    fn code(&self) -> &str {
        &self.code
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn code_of(&self, path: &Path) -> Result<String, EditorError> {
        if path == self.own_path {
            return Ok(self.code.clone());
        }
        self.files.get(path).cloned().ok_or_else(|| EditorError::Read {
            path: path.to_owned(),
            source: std::io::Error::from(std::io::ErrorKind::NotFound),
        })
    }

    fn write(&mut self, code: &str, cursor: Option<Position>) -> Result<(), EditorError> {
        self.effects.push("write");
        code.clone_into(&mut self.code);
        self.cursor = cursor;
        Ok(())
    }

    fn write_in(&mut self, path: &Path, code: &str) -> Result<(), EditorError> {
        self.effects.push("write-in");
        if path == self.own_path {
            code.clone_into(&mut self.code);
        } else {
            self.files.insert(path.to_owned(), code.to_owned());
        }
        Ok(())
    }

    fn read_then_write(
        &mut self,
        selection: Selection,
        get_modifications: &dyn Fn(&str) -> Vec<Modification>,
        cursor: Option<Position>,
    ) -> Result<(), EditorError> {
        self.effects.push("read-then-write");
        let index = LineIndex::new(&self.code);
        let span = index
            .span_of(selection)
            .ok_or(EditorError::InvalidSelection { selection })?;
        let read = self.code[span.to_range()].to_owned();
        let modifications = get_modifications(&read);
        self.code = apply_modifications(&self.code, &modifications)?;
        self.cursor = cursor;
        Ok(())
    }

    fn delegate(&mut self, _op: NativeOp) -> Result<DelegateOutcome, EditorError> {
        if self.delegate_supported {
            self.effects.push("delegate");
            Ok(DelegateOutcome::Done)
        } else {
            Ok(DelegateOutcome::NotSupported)
        }
    }

    fn show_error(&mut self, reason: &str) {
        self.errors.push(reason.to_owned());
    }

    fn ask_user_input(&mut self, _default_value: Option<&str>) -> Option<String> {
        self.input_answers.pop_front().flatten()
    }

    fn ask_user_choice(&mut self, _choices: &[Choice]) -> Option<usize> {
        self.choice_answers.pop_front().flatten()
    }

    fn ask_for_positions(&mut self, _initial: &[ParamPosition]) -> Option<Vec<ParamPosition>> {
        self.position_answers.pop_front().flatten()
    }

    fn selection_references(
        &mut self,
        _selection: Selection,
    ) -> Result<Vec<Reference>, EditorError> {
        Ok(self.references.clone())
    }
}
