//! Prefix completion over per-language word lists.
//!
//! The surface itself (a popup, a list widget) belongs to the shell.
//! This module owns the vocabulary and the request/response types the
//! session exchanges with that surface: the session hands out a
//! [`SuggestionPrompt`], the shell answers with a [`SuggestionChoice`].

use webpad_syntax::Language;

/// Built-in JavaScript suggestions, in display order.
const JAVASCRIPT_WORDS: &[&str] = &[
    "function",
    "var",
    "let",
    "const",
    "if",
    "else",
    "for",
    "while",
    "return",
    "document",
    "getElementById",
    "querySelector",
];

/// Built-in CSS suggestions, in display order.
const CSS_WORDS: &[&str] = &[
    "color",
    "background",
    "margin",
    "padding",
    "border",
    "display",
    "flex",
    "grid",
    "position",
    "width",
    "height",
];

/// Built-in HTML suggestions, in display order.
const HTML_WORDS: &[&str] = &[
    "div", "span", "a", "p", "h1", "h2", "h3", "ul", "li", "img",
];

/// The suggestion vocabulary: one ordered word list per language.
///
/// Order matters. Matches surface in list order, so the common words
/// sit at the front; config may append extra words at the end.
#[derive(Debug, Clone)]
pub struct WordBook {
    html: Vec<String>,
    css: Vec<String>,
    javascript: Vec<String>,
}

impl WordBook {
    /// The built-in vocabulary.
    pub fn builtin() -> Self {
        let owned = |words: &[&str]| words.iter().map(|w| w.to_string()).collect();
        Self {
            html: owned(HTML_WORDS),
            css: owned(CSS_WORDS),
            javascript: owned(JAVASCRIPT_WORDS),
        }
    }

    /// Appends extra words to one language's list, keeping order.
    ///
    /// Words the list already has are skipped, so a configured extra
    /// that repeats a built-in never surfaces twice.
    pub fn extend(&mut self, language: Language, words: impl IntoIterator<Item = String>) {
        let list = self.list_mut(language);
        for word in words {
            if !list.contains(&word) {
                list.push(word);
            }
        }
    }

    /// The full word list for a language.
    pub fn words(&self, language: Language) -> &[String] {
        match language {
            Language::Html => &self.html,
            Language::Css => &self.css,
            Language::JavaScript => &self.javascript,
        }
    }

    /// All words starting with `prefix`, in list order.
    ///
    /// An empty prefix matches nothing: the surface only ever opens for
    /// a word the user has started typing.
    pub fn suggest(&self, prefix: &str, language: Language) -> Vec<&str> {
        if prefix.is_empty() {
            return Vec::new();
        }
        self.words(language)
            .iter()
            .filter(|word| word.starts_with(prefix))
            .map(|word| word.as_str())
            .collect()
    }

    fn list_mut(&mut self, language: Language) -> &mut Vec<String> {
        match language {
            Language::Html => &mut self.html,
            Language::Css => &mut self.css,
            Language::JavaScript => &mut self.javascript,
        }
    }
}

impl Default for WordBook {
    fn default() -> Self {
        Self::builtin()
    }
}

/// The word being typed: everything between the last whitespace and the
/// cursor. `line_to_cursor` is the cursor's line, cut at the cursor.
pub fn current_word(line_to_cursor: &str) -> &str {
    line_to_cursor
        .rsplit(char::is_whitespace)
        .next()
        .unwrap_or("")
}

/// Like [`current_word`], for the moment right after the trigger char
/// was typed: one trailing `.` is not part of the word.
pub fn word_before_trigger(line_to_cursor: &str) -> &str {
    current_word(line_to_cursor.strip_suffix('.').unwrap_or(line_to_cursor))
}

/// A request to show the completion surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuggestionPrompt {
    /// The word the matches complete
    pub word: String,
    /// Matching words, in vocabulary order
    pub matches: Vec<String>,
}

/// The shell's answer to a [`SuggestionPrompt`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SuggestionChoice {
    /// The user picked `matches[index]`
    Picked(usize),
    /// The surface was closed without a pick
    Dismissed,
}

/// What became of a suggestion prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuggestionOutcome {
    /// The word was inserted into the document
    Accepted(String),
    Dismissed,
}
