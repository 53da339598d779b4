//! Refract CLI internals.
//!
//! The binary stays thin: parse arguments, build a [`FileEditor`],
//! hand both to the engine's interpreter, flush the result.

pub mod cli;
pub mod file_editor;

pub use cli::{parse_args, Args};
pub use file_editor::FileEditor;
