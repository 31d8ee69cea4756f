//! Style ranges and the repaint pass.
//!
//! ## Why Full Repaint?
//!
//! The layer never adjusts ranges incrementally. Each repaint throws
//! everything away and restyles the buffer from a fresh token stream:
//! O(n) per keystroke, offsets that are always true, and no incremental
//! bookkeeping to get wrong. For the file sizes this editor targets,
//! the full pass is well under a frame.

use std::ops::Range;
use webpad_syntax::{Language, TokenCategory, tokenize};

/// How a styled range renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HighlightStyle {
    Keyword,
    String,
    Comment,
    /// The most recent find result
    Match,
}

/// A styled byte range into the current buffer snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleRange {
    pub style: HighlightStyle,
    pub span: Range<usize>,
}

/// Maps a token category onto its display style.
///
/// Keywords and names share one style; numbers, punctuation and plain
/// text render unstyled.
pub fn style_for(category: TokenCategory) -> Option<HighlightStyle> {
    match category {
        TokenCategory::Keyword | TokenCategory::Name => Some(HighlightStyle::Keyword),
        TokenCategory::String => Some(HighlightStyle::String),
        TokenCategory::Comment => Some(HighlightStyle::Comment),
        TokenCategory::Number | TokenCategory::Punctuation | TokenCategory::Text => None,
    }
}

/// The styled ranges of one document, rebuilt on every repaint.
///
/// Syntax ranges come out of [`rebuild`](StyleLayer::rebuild) sorted and
/// non-overlapping, because tokens are. A match range added afterwards
/// may overlap them; renderers paint it last.
#[derive(Debug, Clone, Default)]
pub struct StyleLayer {
    ranges: Vec<StyleRange>,
}

impl StyleLayer {
    pub fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Clears every existing range and restyles `text`.
    ///
    /// Match ranges are dropped along with the syntax ones: the edit
    /// that triggered the repaint has already invalidated their offsets.
    pub fn rebuild(&mut self, text: &str, language: Language) {
        self.ranges.clear();
        for token in tokenize(text, language) {
            if let Some(style) = style_for(token.category) {
                self.ranges.push(StyleRange {
                    style,
                    span: token.span,
                });
            }
        }
        tracing::trace!(ranges = self.ranges.len(), %language, "styles rebuilt");
    }

    /// Records the highlight for a find result.
    pub fn add_match(&mut self, span: Range<usize>) {
        self.ranges.push(StyleRange {
            style: HighlightStyle::Match,
            span,
        });
    }

    /// All current ranges, syntax first, matches last.
    pub fn ranges(&self) -> &[StyleRange] {
        &self.ranges
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }
}
