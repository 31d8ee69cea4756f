//! # Webpad Buffer
//!
//! Rope-backed text storage for a single document, with line/column
//! positions and literal forward search.
//!
//! This crate is deliberately small: it owns the text and nothing else.
//! File I/O, encodings, highlighting and completion all live a layer up,
//! and undo history is left to the text widget hosting the editor.

mod buffer;
mod position;

pub use buffer::TextBuffer;
pub use position::Position;

/// Result type for buffer operations
pub type BufferResult<T> = Result<T, BufferError>;

/// Errors that can occur during buffer operations
#[derive(Debug, thiserror::Error)]
pub enum BufferError {
    #[error("index {index} is out of bounds (length {len})")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("line {line} is out of bounds (buffer has {len} lines)")]
    LineOutOfBounds { line: usize, len: usize },

    #[error("position {position} is out of bounds")]
    PositionOutOfBounds { position: Position },
}
