//! Refract IR - source geometry and syntax tree types.
//!
//! This crate contains the core data structures of the Refract
//! refactoring engine:
//! - Byte [`Span`]s for tree locations
//! - [`Position`]/[`Selection`] for the editor-facing geometry
//! - [`LineIndex`], the translation seam between the two
//! - Syntax tree nodes for the JavaScript subset the engine rewrites
//! - [`ExprArena`] flat storage with span-ignoring deep equality
//! - [`visitor`] traversal
//!
//! # Design
//!
//! - **Flatten**: no `Box<Expr>` chains; children are `ExprId(u32)`
//!   indices into the module's arena.
//! - **Value semantics**: geometry types are `Copy`, compare
//!   structurally, and every operation returns a new value.
//! - **No positions in equality**: occurrence matching compares
//!   structure through [`ExprArena::same_expr`], never spans.

/// Compile-time assertion that a type has a specific size.
///
/// Used to prevent accidental size regressions in frequently-allocated
/// types.
#[macro_export]
macro_rules! static_assert_size {
    ($ty:ty, $size:expr) => {
        const _: [(); $size] = [(); ::std::mem::size_of::<$ty>()];
    };
}

mod arena;
pub mod ast;
mod line_index;
mod position;
mod selection;
mod span;
pub mod visitor;

pub use arena::{same_pattern, ExprArena, ExprId, Module, StmtId};
pub use line_index::LineIndex;
pub use position::Position;
pub use selection::Selection;
pub use span::{Span, SpanError, Spanned};

// Size assertions to prevent accidental regressions
#[cfg(target_pointer_width = "64")]
mod size_asserts {
    use super::{Position, Selection, Span};
    crate::static_assert_size!(Span, 8);
    crate::static_assert_size!(Position, 8);
    crate::static_assert_size!(Selection, 16);
}
