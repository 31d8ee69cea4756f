//! Positions within a text buffer.
//!
//! ## Learning: Two Coordinate Systems
//!
//! The buffer exposes two ways to address text:
//! - **Char indices**: a single `usize` counting chars from the start.
//!   All edit primitives take these.
//! - **Line/column pairs**: what humans (and status lines) read.
//!
//! `Position` is the second kind. Conversions between the two live on
//! [`TextBuffer`](crate::TextBuffer) because they need the line index.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A line/column location in a buffer.
///
/// Both fields are 0-indexed. `Display` renders them 1-indexed, which is
/// the convention users expect in a status line.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Position {
    /// Line number (0-indexed)
    pub line: usize,
    /// Column as a char offset into the line (0-indexed)
    pub column: usize,
}

impl Position {
    /// The start of the buffer.
    pub const ZERO: Self = Self { line: 0, column: 0 };

    /// Creates a position at the given line and column.
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }

    /// Returns true if this position comes before `other` in document order.
    pub fn is_before(&self, other: &Position) -> bool {
        self < other
    }

    /// Returns true if this position comes after `other` in document order.
    pub fn is_after(&self, other: &Position) -> bool {
        self > other
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed for human consumption
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}
