//! Template engine: placeholder extraction, validation, rendering, highlighting.
//!
//! Everything here is pure and takes plain strings, slices and maps; nothing
//! touches the store.

pub mod parser;
pub mod render;
pub mod vars;

pub use parser::{Segment, extract_variables, placeholders_body};
pub use render::{insert_placeholder, render, unresolved};
pub use vars::{
    ValidationError, VariableList, effective_variables, sample_value, sync_samples, undeclared,
    unused,
};

/// Lossless literal/placeholder partition of `body` for syntax highlighting.
pub fn highlight(body: &str) -> Vec<Segment<'_>> {
    parser::parse(body)
}
