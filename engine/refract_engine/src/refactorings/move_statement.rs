//! Move statement up/down.
//!
//! Statement-level reordering: swap the statement under the cursor
//! with its previous or next sibling, keeping the cursor on the moved
//! statement. Hitting the top or bottom of the block is an ordinary
//! do-nothing, not an error.

use refract_ir::ast::StmtKind;
use refract_ir::{LineIndex, Module, Position, StmtId};

use crate::command::Command;
use crate::matcher::{find_closest_stmt, StmtMatch};
use crate::refactoring::Refactoring;
use crate::refactorings::DOES_NOT_PARSE;
use crate::state::{RefactoringState, StateKind};

const NO_STATEMENT: &str = "there is no statement to move at the current selection";

#[derive(Copy, Clone, Eq, PartialEq, Debug)]
enum Direction {
    Up,
    Down,
}

/// Swap the statement under the cursor with a sibling.
pub struct MoveStatement {
    direction: Direction,
}

impl MoveStatement {
    pub fn up() -> Self {
        MoveStatement {
            direction: Direction::Up,
        }
    }

    pub fn down() -> Self {
        MoveStatement {
            direction: Direction::Down,
        }
    }
}

impl Refactoring for MoveStatement {
    fn command_name(&self) -> &'static str {
        match self.direction {
            Direction::Up => "move-statement-up",
            Direction::Down => "move-statement-down",
        }
    }

    fn run(&self, state: &RefactoringState) -> Command {
        if !matches!(state.kind, StateKind::New) {
            tracing::warn!(state = ?state.kind, "move-statement re-entered unexpectedly");
            return Command::do_nothing();
        }
        let Ok(module) = refract_parse::parse(&state.code) else {
            return Command::show_error(DOES_NOT_PARSE);
        };
        let index = LineIndex::new(&state.code);
        let Some(target) = index.span_of(state.selection) else {
            return Command::show_error(NO_STATEMENT);
        };

        let Some(found) = find_closest_stmt(&module, target, |_, _| true) else {
            return Command::show_error(NO_STATEMENT);
        };
        let (siblings, moved) = reorderable_unit(&module, &found);
        let Some(at) = siblings.iter().position(|&sibling| sibling == moved) else {
            return Command::show_error(NO_STATEMENT);
        };

        let other = match self.direction {
            // At the boundary there is nowhere to go; that is fine.
            Direction::Up if at == 0 => return Command::do_nothing(),
            Direction::Down if at + 1 == siblings.len() => return Command::do_nothing(),
            Direction::Up => siblings[at - 1],
            Direction::Down => siblings[at + 1],
        };

        let (first, second) = match self.direction {
            Direction::Up => (other, moved),
            Direction::Down => (moved, other),
        };
        let Some(swap) = swap_statement_lines(&state.code, &index, &module, first, second)
        else {
            return Command::do_nothing();
        };

        // The moved statement is the second chunk going up, the first
        // chunk going down; each travels a different distance when the
        // chunks differ in height.
        let cursor = match self.direction {
            Direction::Up => state.selection.remove_lines(swap.start_delta).start(),
            Direction::Down => state.selection.add_lines(swap.end_delta).start(),
        };
        Command::write_with_cursor(swap.code, cursor)
    }
}

/// Climb from the innermost match to the statement that actually has
/// reorderable siblings: the child of the nearest enclosing block (or
/// of the file itself).
fn reorderable_unit(module: &Module, found: &StmtMatch) -> (Vec<StmtId>, StmtId) {
    let mut child = found.id;
    for &ancestor in found.stmt_path.iter().rev() {
        if let StmtKind::Block(stmts) = &module.arena.stmt(ancestor).kind {
            return (stmts.clone(), child);
        }
        child = ancestor;
    }
    (module.body.clone(), child)
}

/// Result of swapping two statement chunks.
struct Swap {
    code: String,
    /// Lines the second chunk moved towards the start.
    start_delta: u32,
    /// Lines the first chunk moved towards the end.
    end_delta: u32,
}

/// Swap the full-line chunks of two adjacent statements, preserving
/// whatever separates them.
fn swap_statement_lines(
    code: &str,
    index: &LineIndex,
    module: &Module,
    first: StmtId,
    second: StmtId,
) -> Option<Swap> {
    let first_sel = index.selection_of(module.arena.stmt_span(first));
    let second_sel = index.selection_of(module.arena.stmt_span(second));

    let first_start = index.offset_of(Position::new(first_sel.start().line, 0))? as usize;
    let first_end = line_end_offset(code, index, first_sel.end().line);
    let second_start = index.offset_of(Position::new(second_sel.start().line, 0))? as usize;
    let second_end = line_end_offset(code, index, second_sel.end().line);

    // Statements sharing a line cannot be swapped as line chunks.
    if first_end > second_start {
        return None;
    }

    let first_chunk = &code[first_start..first_end];
    let gap = &code[first_end..second_start];
    let mut second_chunk = code[second_start..second_end].to_owned();
    // The last line of a buffer may lack its newline; normalize so
    // the swap cannot glue two statements together.
    if !second_chunk.ends_with('\n') {
        second_chunk.push('\n');
    }

    let mut next = String::with_capacity(code.len() + 1);
    next.push_str(&code[..first_start]);
    next.push_str(&second_chunk);
    next.push_str(gap);
    next.push_str(first_chunk);
    next.push_str(&code[second_end..]);
    if !code.ends_with('\n') && next.ends_with('\n') {
        next.pop();
    }

    Some(Swap {
        code: next,
        start_delta: second_sel.start().line - first_sel.start().line,
        end_delta: second_sel.end().line - first_sel.end().line,
    })
}

/// Offset just past `line`'s newline (or the buffer end).
fn line_end_offset(code: &str, index: &LineIndex, line: u32) -> usize {
    index
        .offset_of(Position::new(line + 1, 0))
        .map_or(code.len(), |offset| offset as usize)
}
