//! The refactoring contract.

use refract_ir::Span;

use crate::command::Command;
use crate::state::RefactoringState;

/// A refactoring: a pure function from state to command.
///
/// Implementations never touch the editor and never fail — every
/// outcome, including "nothing here to refactor", is a command.
pub trait Refactoring {
    /// Stable kebab-case identifier, used by hosts and logs.
    fn command_name(&self) -> &'static str;

    /// Compute the next command for `state`. Pure: no I/O.
    fn run(&self, state: &RefactoringState) -> Command;
}

/// The uniform applied/not-applicable signal of one rewrite attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformResult {
    pub code: String,
    pub has_code_changed: bool,
}

impl TransformResult {
    /// The attempt did not apply; the code is handed back untouched.
    pub fn unchanged(code: impl Into<String>) -> Self {
        TransformResult {
            code: code.into(),
            has_code_changed: false,
        }
    }

    /// Replace `span` of `code` with `text`.
    pub fn replacing_span(code: &str, span: Span, text: &str) -> Self {
        let mut next = code.to_owned();
        next.replace_range(span.to_range(), text);
        TransformResult {
            has_code_changed: next != code,
            code: next,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn replacing_span_flags_change() {
        let result = TransformResult::replacing_span("a + b;", Span::new(0, 1), "total");
        assert_eq!(result.code, "total + b;");
        assert!(result.has_code_changed);

        let result = TransformResult::replacing_span("a + b;", Span::new(0, 1), "a");
        assert!(!result.has_code_changed);
    }
}
