//! File-backed editor adapter.
//!
//! Prompts are answered from command-line flags, which makes the CLI
//! the canned-response automated caller the engine expects. Buffers
//! are edited in memory and flushed (or printed) once the run
//! completes.

use std::path::{Path, PathBuf};

use refract_engine::editor::{
    apply_modifications, Choice, DelegateOutcome, Editor, EditorError, Modification, NativeOp,
    ParamPosition, Reference,
};
use refract_ir::{LineIndex, Position, Selection};

use crate::cli::{Answer, Args};

/// Editor over one file on disk.
pub struct FileEditor {
    path: PathBuf,
    code: String,
    selection: Selection,
    write_back: bool,
    choice: Answer<usize>,
    input: Answer<String>,
    order: Answer<Vec<usize>>,
    /// Other files touched by `write_in`.
    updates: Vec<(PathBuf, String)>,
    /// Whether any terminal effect changed a buffer.
    changed: bool,
    /// Messages surfaced through `show_error`.
    errors: Vec<String>,
}

impl FileEditor {
    /// Read the target file and set up the scripted answers.
    pub fn open(args: &Args) -> Result<Self, EditorError> {
        let code = std::fs::read_to_string(&args.path).map_err(|source| EditorError::Read {
            path: args.path.clone(),
            source,
        })?;
        Ok(FileEditor {
            path: args.path.clone(),
            code,
            selection: args.selection,
            write_back: args.write_back,
            choice: args.choice.clone(),
            input: args.input.clone(),
            order: args.order.clone(),
            updates: Vec::new(),
            changed: false,
            errors: Vec::new(),
        })
    }

    /// Flush results: write files back with `--write`, print to
    /// stdout otherwise. Returns `false` when an error message was
    /// surfaced.
    pub fn finish(self) -> Result<bool, EditorError> {
        for reason in &self.errors {
            eprintln!("error: {reason}");
        }
        if self.changed {
            if self.write_back {
                write_file(&self.path, &self.code)?;
                for (path, code) in &self.updates {
                    write_file(path, code)?;
                }
            } else {
                print!("{}", self.code);
                for (path, code) in &self.updates {
                    println!("--- {} ---", path.display());
                    print!("{code}");
                }
            }
        }
        Ok(self.errors.is_empty())
    }
}

fn write_file(path: &Path, code: &str) -> Result<(), EditorError> {
    std::fs::write(path, code).map_err(|source| EditorError::Write {
        path: path.to_owned(),
        source,
    })
}

impl Editor for FileEditor {
    fn code(&self) -> &str {
        &self.code
    }

    fn selection(&self) -> Selection {
        self.selection
    }

    fn code_of(&self, path: &Path) -> Result<String, EditorError> {
        if path == self.path {
            return Ok(self.code.clone());
        }
        std::fs::read_to_string(path).map_err(|source| EditorError::Read {
            path: path.to_owned(),
            source,
        })
    }

    fn write(&mut self, code: &str, _cursor: Option<Position>) -> Result<(), EditorError> {
        code.clone_into(&mut self.code);
        self.changed = true;
        Ok(())
    }

    fn write_in(&mut self, path: &Path, code: &str) -> Result<(), EditorError> {
        if path == self.path {
            code.clone_into(&mut self.code);
        } else {
            self.updates.push((path.to_owned(), code.to_owned()));
        }
        self.changed = true;
        Ok(())
    }

    fn read_then_write(
        &mut self,
        selection: Selection,
        get_modifications: &dyn Fn(&str) -> Vec<Modification>,
        _cursor: Option<Position>,
    ) -> Result<(), EditorError> {
        let index = LineIndex::new(&self.code);
        let span = index
            .span_of(selection)
            .ok_or(EditorError::InvalidSelection { selection })?;
        let read = self.code[span.to_range()].to_owned();
        let modifications = get_modifications(&read);
        self.code = apply_modifications(&self.code, &modifications)?;
        self.changed = true;
        Ok(())
    }

    fn delegate(&mut self, op: NativeOp) -> Result<DelegateOutcome, EditorError> {
        // The CLI has no native editor operations; refactorings take
        // their fallback paths.
        tracing::debug!(?op, "delegate unsupported in CLI host");
        Ok(DelegateOutcome::NotSupported)
    }

    fn show_error(&mut self, reason: &str) {
        self.errors.push(reason.to_owned());
    }

    fn ask_user_input(&mut self, _default_value: Option<&str>) -> Option<String> {
        match &self.input {
            Answer::Value(value) => Some(value.clone()),
            Answer::Cancel | Answer::Unset => None,
        }
    }

    fn ask_user_choice(&mut self, choices: &[Choice]) -> Option<usize> {
        match self.choice {
            Answer::Value(choice) if choice < choices.len() => Some(choice),
            Answer::Value(_) | Answer::Cancel => None,
            // Unanswered picks default to the first choice, which is
            // the replace-all style option.
            Answer::Unset => Some(0),
        }
    }

    fn ask_for_positions(&mut self, initial: &[ParamPosition]) -> Option<Vec<ParamPosition>> {
        match &self.order {
            Answer::Value(order) if order.len() == initial.len() => Some(
                order
                    .iter()
                    .enumerate()
                    .map(|(to, &from)| ParamPosition {
                        label: initial
                            .get(from)
                            .map_or_else(String::new, |position| position.label.clone()),
                        from,
                        to,
                    })
                    .collect(),
            ),
            Answer::Value(_) | Answer::Cancel | Answer::Unset => None,
        }
    }

    fn selection_references(
        &mut self,
        selection: Selection,
    ) -> Result<Vec<Reference>, EditorError> {
        // The CLI resolves references within the target file itself;
        // a language-server host would search the project.
        Ok(vec![Reference {
            path: self.path.clone(),
            selection,
        }])
    }
}
