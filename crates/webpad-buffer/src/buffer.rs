//! Rope-backed text storage.
//!
//! ## Why Rope?
//!
//! The session retokenizes the whole buffer after every keystroke, but the
//! edits themselves should stay cheap on large files. A rope gives us:
//! - O(log n) insert/delete at any char index
//! - Built-in line addressing (positions and the status line need it)
//! - Cheap `Clone` when a caller wants a snapshot
//!
//! ## Learning: Char Indices vs Byte Indices
//!
//! Every edit primitive here takes **char** indices, because that is what
//! a caret naturally counts. Tokenizer spans are **byte** ranges into a
//! snapshot string. [`TextBuffer::char_to_byte`] and
//! [`TextBuffer::byte_to_char`] bridge the two; both are O(log n) on the
//! rope, never a linear rescan.

use ropey::Rope;
use std::borrow::Cow;
use std::ops::Range;

use crate::{BufferError, BufferResult, Position};

/// Text storage for a single document.
///
/// The buffer knows nothing about files, encodings or highlighting; it
/// stores chars and answers questions about them. Undo history is
/// deliberately not implemented here: that concern belongs to whatever
/// text widget hosts the session.
#[derive(Debug, Clone)]
pub struct TextBuffer {
    /// The rope holding the text content
    rope: Rope,

    /// Whether the buffer has unsaved changes
    modified: bool,
}

impl TextBuffer {
    /// Creates a new empty buffer.
    ///
    /// # Example
    /// ```
    /// use webpad_buffer::TextBuffer;
    ///
    /// let buffer = TextBuffer::new();
    /// assert!(buffer.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            modified: false,
        }
    }

    /// Creates a buffer holding `text`, marked unmodified.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            modified: false,
        }
    }

    // ==================== Content Access ====================

    /// Returns the full text.
    ///
    /// Borrows directly from the rope when the content is contiguous;
    /// otherwise allocates once.
    pub fn text(&self) -> Cow<'_, str> {
        Cow::from(&self.rope)
    }

    /// Returns the text in a char range.
    pub fn slice(&self, range: Range<usize>) -> BufferResult<Cow<'_, str>> {
        if range.start > range.end || range.end > self.len_chars() {
            return Err(BufferError::IndexOutOfBounds {
                index: range.end,
                len: self.len_chars(),
            });
        }
        Ok(Cow::from(self.rope.slice(range)))
    }

    /// Returns one line of text, including its terminator (if any).
    pub fn line(&self, line: usize) -> BufferResult<Cow<'_, str>> {
        if line >= self.len_lines() {
            return Err(BufferError::LineOutOfBounds {
                line,
                len: self.len_lines(),
            });
        }
        Ok(Cow::from(self.rope.line(line)))
    }

    /// Returns the char at `index`, or `None` past the end.
    pub fn char_at(&self, index: usize) -> Option<char> {
        self.rope.get_char(index)
    }

    /// Number of chars in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Number of bytes in the buffer (UTF-8).
    pub fn len_bytes(&self) -> usize {
        self.rope.len_bytes()
    }

    /// Number of lines. An empty buffer has one (empty) line.
    pub fn len_lines(&self) -> usize {
        self.rope.len_lines()
    }

    /// Length of a line in chars, excluding its terminator.
    pub fn line_len(&self, line: usize) -> BufferResult<usize> {
        let text = self.line(line)?;
        let mut len = text.chars().count();
        if text.ends_with('\n') {
            len -= 1;
            if text.ends_with("\r\n") {
                len -= 1;
            }
        }
        Ok(len)
    }

    /// Returns true if the buffer contains no text.
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    // ==================== Editing ====================

    /// Inserts text at a char index.
    pub fn insert(&mut self, index: usize, text: &str) -> BufferResult<()> {
        if index > self.len_chars() {
            return Err(BufferError::IndexOutOfBounds {
                index,
                len: self.len_chars(),
            });
        }
        self.rope.insert(index, text);
        self.modified = true;
        Ok(())
    }

    /// Inserts a single char at a char index.
    pub fn insert_char(&mut self, index: usize, ch: char) -> BufferResult<()> {
        if index > self.len_chars() {
            return Err(BufferError::IndexOutOfBounds {
                index,
                len: self.len_chars(),
            });
        }
        self.rope.insert_char(index, ch);
        self.modified = true;
        Ok(())
    }

    /// Deletes a char range, returning the removed text.
    pub fn delete(&mut self, range: Range<usize>) -> BufferResult<String> {
        if range.start > range.end || range.end > self.len_chars() {
            return Err(BufferError::IndexOutOfBounds {
                index: range.end,
                len: self.len_chars(),
            });
        }
        let removed: String = self.rope.slice(range.clone()).into();
        self.rope.remove(range);
        self.modified = true;
        Ok(removed)
    }

    /// Replaces a char range with new text, returning the removed text.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> BufferResult<String> {
        let start = range.start;
        let removed = self.delete(range)?;
        self.insert(start, text)?;
        Ok(removed)
    }

    /// Replaces the entire content in one operation.
    pub fn set_text(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
        self.modified = true;
    }

    // ==================== Position Conversion ====================

    /// Converts a line/column position to a char index.
    ///
    /// The column may sit one past the last char of the line, which is
    /// where an insertion at line end happens.
    pub fn position_to_char(&self, position: Position) -> BufferResult<usize> {
        if position.line >= self.len_lines() {
            return Err(BufferError::PositionOutOfBounds { position });
        }
        if position.column > self.line_len(position.line)? {
            return Err(BufferError::PositionOutOfBounds { position });
        }
        Ok(self.rope.line_to_char(position.line) + position.column)
    }

    /// Converts a char index to a line/column position.
    pub fn char_to_position(&self, index: usize) -> BufferResult<Position> {
        if index > self.len_chars() {
            return Err(BufferError::IndexOutOfBounds {
                index,
                len: self.len_chars(),
            });
        }
        let line = self.rope.char_to_line(index);
        let column = index - self.rope.line_to_char(line);
        Ok(Position { line, column })
    }

    /// Converts a char index to the byte index of the same boundary.
    pub fn char_to_byte(&self, index: usize) -> BufferResult<usize> {
        if index > self.len_chars() {
            return Err(BufferError::IndexOutOfBounds {
                index,
                len: self.len_chars(),
            });
        }
        Ok(self.rope.char_to_byte(index))
    }

    /// Converts a byte index (on a char boundary) to a char index.
    pub fn byte_to_char(&self, index: usize) -> BufferResult<usize> {
        if index > self.len_bytes() {
            return Err(BufferError::IndexOutOfBounds {
                index,
                len: self.len_bytes(),
            });
        }
        Ok(self.rope.byte_to_char(index))
    }

    // ==================== Search ====================

    /// Finds the first literal occurrence of `needle` at or after the
    /// char index `from`. Returns the match as a char range.
    ///
    /// No wraparound: when nothing matches between `from` and the end of
    /// the buffer, returns `None` even if an earlier occurrence exists.
    pub fn find_from(&self, needle: &str, from: usize) -> Option<Range<usize>> {
        if needle.is_empty() || from > self.len_chars() {
            return None;
        }
        let text = self.text();
        let from_byte = self.rope.char_to_byte(from);
        let offset = text[from_byte..].find(needle)?;
        let start = self.rope.byte_to_char(from_byte + offset);
        Some(start..start + needle.chars().count())
    }

    // ==================== State ====================

    /// Returns true if the buffer changed since the last [`mark_saved`].
    ///
    /// [`mark_saved`]: TextBuffer::mark_saved
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Clears the modified flag. Called after a successful save.
    pub fn mark_saved(&mut self) {
        self.modified = false;
    }
}

impl Default for TextBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&str> for TextBuffer {
    fn from(text: &str) -> Self {
        Self::from_text(text)
    }
}

impl From<String> for TextBuffer {
    fn from(text: String) -> Self {
        Self::from_text(&text)
    }
}
