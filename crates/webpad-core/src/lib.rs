//! # Webpad Core
//!
//! Editor state and the operations behind every UI action.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌────────────────────────────────────────────────────────┐
//! │                     EditorSession                      │
//! │  ┌──────────┐ ┌────────────┐ ┌──────────┐ ┌─────────┐ │
//! │  │ Document │ │ StyleLayer │ │ WordBook │ │  Theme  │ │
//! │  └────┬─────┘ └─────┬──────┘ └──────────┘ └─────────┘ │
//! │       │             │                                  │
//! │   TextBuffer     tokenize()                            │
//! │  (webpad-buffer) (webpad-syntax)                       │
//! └────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Learning: Module Organization
//!
//! Rust modules map to files:
//! - `mod foo;` looks for `foo.rs` or `foo/mod.rs`
//! - `pub use` re-exports items so callers write `webpad_core::Key`
//!   instead of `webpad_core::session::Key`

pub mod complete;
pub mod config;
pub mod document;
pub mod event;
pub mod highlight;
pub mod preview;
pub mod session;
pub mod theme;

pub use complete::{SuggestionChoice, SuggestionOutcome, SuggestionPrompt, WordBook};
pub use config::Config;
pub use document::{Document, FILE_EXTENSIONS};
pub use event::{EditorEvent, EventBus, EventStream};
pub use highlight::{style_for, HighlightStyle, StyleLayer, StyleRange};
pub use session::{Dispatch, EditorSession, FindOutcome, Key};
pub use theme::{Color, Theme};

use std::path::PathBuf;

/// Result type for core operations
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors that can occur in core operations
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Buffer error: {0}")]
    Buffer(#[from] webpad_buffer::BufferError),

    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Unknown encoding label: {0}")]
    UnknownEncoding(String),

    #[error("{}: bytes are not valid {encoding}", path.display())]
    Decode { encoding: String, path: PathBuf },

    #[error("Text contains characters {encoding} cannot represent")]
    Encode { encoding: String },

    #[error("Document has no file path yet; save it under a name first")]
    NoFilePath,

    #[error("Invalid operation: {0}")]
    InvalidOperation(String),
}
