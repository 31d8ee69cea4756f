//! The editor session: every operation a UI would wire to a widget.
//!
//! ## Learning: State in One Place
//!
//! Editors accumulate state fast (text, cursor, styles, prompts,
//! vocabulary). Holding all of it in one struct keeps every operation
//! an ordinary `&mut self` method: no globals, no hidden channels, and
//! a test can drive the session exactly the way a UI event loop would.
//!
//! ## Why Request/Response Prompts?
//!
//! The completion popup is modeled as data, not as a callback. A `.`
//! keystroke RETURNS a [`SuggestionPrompt`]; the caller shows it
//! however it likes and reports back a [`SuggestionChoice`]. The
//! session never blocks on the UI, and the whole exchange is testable
//! without a display server.

use std::borrow::Cow;
use std::ops::Range;
use std::path::{Path, PathBuf};

use webpad_buffer::Position;
use webpad_syntax::Language;

use crate::complete::{
    word_before_trigger, SuggestionChoice, SuggestionOutcome, SuggestionPrompt, WordBook,
};
use crate::config::Config;
use crate::document::Document;
use crate::event::{EditorEvent, EventBus};
use crate::highlight::StyleLayer;
use crate::preview;
use crate::theme::Theme;
use crate::{CoreError, CoreResult};

// ==================== Keys and Dispatch ====================

/// A keystroke as the session understands it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// A typed character, including `.` which may trigger completion
    Char(char),
    Backspace,
    Enter,
}

/// What the session asks of its caller after a keystroke.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatch {
    /// The key was consumed; nothing further to do
    Handled,
    /// Show this prompt and answer via [`EditorSession::resolve_suggestion`]
    Suggest(SuggestionPrompt),
}

/// The result of a find operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FindOutcome {
    Found {
        /// Byte span of the match, aligned with [`StyleLayer`] ranges
        span: Range<usize>,
        /// Where the match starts, for scrolling a view to it
        at: Position,
    },
    /// Nothing at or after the cursor; the cursor did not move
    NotFound,
}

// ==================== Session ====================

/// All editor state behind the keystroke, search and file operations.
#[derive(Debug)]
pub struct EditorSession {
    document: Document,
    /// Char index into the buffer
    cursor: usize,
    styles: StyleLayer,
    words: WordBook,
    theme: Theme,
    pending: Option<SuggestionPrompt>,
    events: EventBus,
    config: Config,
}

impl EditorSession {
    /// A session with an empty HTML scratch document.
    pub fn new(config: Config) -> Self {
        let mut words = WordBook::builtin();
        for (key, list) in &config.completion.extra_words {
            match language_key(key) {
                Some(language) => words.extend(language, list.iter().cloned()),
                None => tracing::warn!(key, "unknown language in [completion.extra_words]"),
            }
        }
        let theme = Theme::from_config(&config.theme);
        Self {
            document: Document::new(Language::Html),
            cursor: 0,
            styles: StyleLayer::new(),
            words,
            theme,
            pending: None,
            events: EventBus::default(),
            config,
        }
    }

    // ==================== Files ====================

    /// Opens a file with the configured default encoding.
    pub fn open(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let label = self.config.files.encoding.clone();
        self.open_with_encoding(path, &label)
    }

    /// Opens a file, decoding it with the named encoding.
    pub fn open_with_encoding(
        &mut self,
        path: impl AsRef<Path>,
        encoding_label: &str,
    ) -> CoreResult<()> {
        let path = path.as_ref();
        self.document = Document::open(path, encoding_label)?;
        self.cursor = 0;
        self.pending = None;
        self.repaint();
        self.events.emit(EditorEvent::DocumentOpened {
            path: path.to_path_buf(),
            language: self.document.language(),
        });
        Ok(())
    }

    /// Saves to the document's existing path.
    pub fn save(&mut self) -> CoreResult<()> {
        let path = self.document.save()?;
        self.events.emit(EditorEvent::DocumentSaved { path });
        Ok(())
    }

    /// Saves to a new path and adopts it.
    pub fn save_as(&mut self, path: impl AsRef<Path>) -> CoreResult<()> {
        let path = path.as_ref();
        self.document.save_as(path)?;
        self.events.emit(EditorEvent::DocumentSaved {
            path: path.to_path_buf(),
        });
        Ok(())
    }

    // ==================== Keystrokes ====================

    /// Feeds one keystroke through the session.
    ///
    /// A `.` typed after a word may return [`Dispatch::Suggest`]; the
    /// prompt stays pending until Backspace or Enter dismisses it or
    /// [`Self::resolve_suggestion`] answers it.
    pub fn handle_key(&mut self, key: Key) -> CoreResult<Dispatch> {
        match key {
            Key::Char(ch) => {
                self.document.buffer_mut().insert_char(self.cursor, ch)?;
                self.cursor += 1;
                self.events.emit(EditorEvent::DocumentChanged);
                self.repaint();
                if ch == '.' {
                    if let Some(prompt) = self.suggestion_at_cursor()? {
                        self.pending = Some(prompt.clone());
                        return Ok(Dispatch::Suggest(prompt));
                    }
                }
                Ok(Dispatch::Handled)
            }
            Key::Backspace => {
                self.pending = None;
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.document.buffer_mut().delete(self.cursor..self.cursor + 1)?;
                    self.events.emit(EditorEvent::DocumentChanged);
                    self.repaint();
                }
                Ok(Dispatch::Handled)
            }
            Key::Enter => {
                self.pending = None;
                self.document.buffer_mut().insert_char(self.cursor, '\n')?;
                self.cursor += 1;
                self.events.emit(EditorEvent::DocumentChanged);
                self.repaint();
                Ok(Dispatch::Handled)
            }
        }
    }

    fn suggestion_at_cursor(&self) -> CoreResult<Option<SuggestionPrompt>> {
        let buffer = self.document.buffer();
        let position = buffer.char_to_position(self.cursor)?;
        let line_start = self.cursor - position.column;
        let prefix = buffer.slice(line_start..self.cursor)?;
        let word = word_before_trigger(&prefix);
        if word.is_empty() {
            return Ok(None);
        }
        let matches: Vec<String> = self
            .words
            .suggest(word, self.document.language())
            .into_iter()
            .map(str::to_string)
            .collect();
        if matches.is_empty() {
            return Ok(None);
        }
        Ok(Some(SuggestionPrompt {
            word: word.to_string(),
            matches,
        }))
    }

    /// Answers the pending prompt.
    ///
    /// Accepting replaces everything from the start of the line to the
    /// cursor with the chosen word plus a trailing space. With no
    /// prompt pending, any answer resolves to a dismissal.
    pub fn resolve_suggestion(
        &mut self,
        choice: SuggestionChoice,
    ) -> CoreResult<SuggestionOutcome> {
        let Some(prompt) = self.pending.take() else {
            return Ok(SuggestionOutcome::Dismissed);
        };
        let index = match choice {
            SuggestionChoice::Dismissed => return Ok(SuggestionOutcome::Dismissed),
            SuggestionChoice::Picked(index) => index,
        };
        let word = prompt.matches.get(index).ok_or_else(|| {
            CoreError::InvalidOperation(format!(
                "suggestion index {index} out of range ({} matches)",
                prompt.matches.len()
            ))
        })?;
        let position = self.document.buffer().char_to_position(self.cursor)?;
        let line_start = self.cursor - position.column;
        let replacement = format!("{word} ");
        self.document
            .buffer_mut()
            .replace(line_start..self.cursor, &replacement)?;
        self.cursor = line_start + replacement.chars().count();
        self.events.emit(EditorEvent::DocumentChanged);
        self.repaint();
        Ok(SuggestionOutcome::Accepted(word.clone()))
    }

    // ==================== Search ====================

    /// Finds the first occurrence of `needle` at or after the cursor.
    ///
    /// A hit highlights the match and parks the cursor after it, so
    /// repeating the search walks forward. The search never wraps.
    pub fn find(&mut self, needle: &str) -> CoreResult<FindOutcome> {
        if needle.is_empty() {
            self.events.emit(EditorEvent::SearchFinished { found: false });
            return Ok(FindOutcome::NotFound);
        }
        let Some(chars) = self.document.buffer().find_from(needle, self.cursor) else {
            tracing::debug!(needle, "no match");
            self.events.emit(EditorEvent::SearchFinished { found: false });
            return Ok(FindOutcome::NotFound);
        };
        let buffer = self.document.buffer();
        let span = buffer.char_to_byte(chars.start)?..buffer.char_to_byte(chars.end)?;
        let at = buffer.char_to_position(chars.start)?;
        self.styles.add_match(span.clone());
        self.cursor = chars.end;
        self.events.emit(EditorEvent::SearchFinished { found: true });
        Ok(FindOutcome::Found { span, at })
    }

    /// Replaces every occurrence of `from` with `to`, rewriting the
    /// whole buffer in one step. Returns how many occurrences went.
    ///
    /// Matching is literal. An empty `from` is a no-op.
    pub fn replace_all(&mut self, from: &str, to: &str) -> usize {
        if from.is_empty() {
            return 0;
        }
        let snapshot = self.document.buffer().text().into_owned();
        let count = snapshot.matches(from).count();
        if count == 0 {
            return 0;
        }
        let rewritten = snapshot.replace(from, to);
        self.document.buffer_mut().set_text(&rewritten);
        // The rewrite can shrink the text out from under the cursor
        self.cursor = self.cursor.min(self.document.buffer().len_chars());
        self.events.emit(EditorEvent::DocumentChanged);
        self.repaint();
        tracing::debug!(from, to, count, "replaced all occurrences");
        count
    }

    // ==================== Highlighting ====================

    /// Rebuilds the style layer from the current text.
    ///
    /// Every mutation funnels through here, so styles never go stale.
    pub fn repaint(&mut self) {
        let text = self.document.buffer().text();
        self.styles.rebuild(&text, self.document.language());
        self.events.emit(EditorEvent::HighlightsRebuilt {
            ranges: self.styles.len(),
        });
    }

    /// Switches the active language and restyles the buffer.
    pub fn set_language(&mut self, language: Language) {
        self.document.set_language(language);
        self.repaint();
        self.events.emit(EditorEvent::LanguageChanged { language });
    }

    // ==================== Previews ====================

    /// Writes the buffer verbatim to a temp page and opens a browser.
    pub fn run_html(&mut self) -> CoreResult<PathBuf> {
        let page = self.document.buffer().text().into_owned();
        self.launch(&page)
    }

    /// Wraps the buffer in a script page and opens a browser.
    pub fn run_javascript(&mut self) -> CoreResult<PathBuf> {
        let page = preview::javascript_page(&self.document.buffer().text());
        self.launch(&page)
    }

    fn launch(&mut self, page: &str) -> CoreResult<PathBuf> {
        let path = preview::write_preview(page)?;
        preview::open_in_browser(&path)?;
        self.events.emit(EditorEvent::PreviewLaunched { path: path.clone() });
        Ok(path)
    }

    // ==================== State access ====================

    /// Replaces the whole buffer, parking the cursor at the end.
    pub fn set_text(&mut self, text: &str) {
        self.document.buffer_mut().set_text(text);
        self.cursor = self.document.buffer().len_chars();
        self.pending = None;
        self.events.emit(EditorEvent::DocumentChanged);
        self.repaint();
    }

    pub fn set_cursor(&mut self, position: Position) -> CoreResult<()> {
        self.cursor = self.document.buffer().position_to_char(position)?;
        Ok(())
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn text(&self) -> Cow<'_, str> {
        self.document.buffer().text()
    }

    pub fn language(&self) -> Language {
        self.document.language()
    }

    /// The cursor as a char index.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn cursor_position(&self) -> CoreResult<Position> {
        Ok(self.document.buffer().char_to_position(self.cursor)?)
    }

    pub fn styles(&self) -> &StyleLayer {
        &self.styles
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn words(&self) -> &WordBook {
        &self.words
    }

    pub fn pending_suggestion(&self) -> Option<&SuggestionPrompt> {
        self.pending.as_ref()
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn is_modified(&self) -> bool {
        self.document.is_modified()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }
}

impl Default for EditorSession {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

fn language_key(key: &str) -> Option<Language> {
    match key.to_ascii_lowercase().as_str() {
        "html" => Some(Language::Html),
        "css" => Some(Language::Css),
        "javascript" | "js" => Some(Language::JavaScript),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::highlight::{HighlightStyle, StyleRange};
    use proptest::prelude::*;

    fn session() -> EditorSession {
        EditorSession::default()
    }

    fn type_str(session: &mut EditorSession, text: &str) {
        for ch in text.chars() {
            session.handle_key(Key::Char(ch)).unwrap();
        }
    }

    // ==================== Completion ====================

    #[test]
    fn test_dot_after_word_prompts() {
        let mut s = session();
        s.set_language(Language::JavaScript);
        type_str(&mut s, "fu");
        let dispatch = s.handle_key(Key::Char('.')).unwrap();
        match dispatch {
            Dispatch::Suggest(prompt) => {
                assert_eq!(prompt.word, "fu");
                assert_eq!(prompt.matches, vec!["function".to_string()]);
            }
            Dispatch::Handled => panic!("expected a suggestion prompt"),
        }
        assert!(s.pending_suggestion().is_some());
    }

    #[test]
    fn test_accept_rewrites_line_start_to_cursor() {
        let mut s = session();
        s.set_language(Language::JavaScript);
        type_str(&mut s, "fu.");
        let outcome = s.resolve_suggestion(SuggestionChoice::Picked(0)).unwrap();
        assert_eq!(outcome, SuggestionOutcome::Accepted("function".to_string()));
        assert_eq!(s.text(), "function ");
        assert_eq!(s.cursor(), 9);
        assert!(s.pending_suggestion().is_none());
    }

    #[test]
    fn test_accept_swallows_everything_before_the_word() {
        // Acceptance spans from the line start, not the word start
        let mut s = session();
        s.set_language(Language::JavaScript);
        type_str(&mut s, "if fu.");
        s.resolve_suggestion(SuggestionChoice::Picked(0)).unwrap();
        assert_eq!(s.text(), "function ");
    }

    #[test]
    fn test_dot_without_word_stays_quiet() {
        let mut s = session();
        s.set_language(Language::JavaScript);
        let dispatch = s.handle_key(Key::Char('.')).unwrap();
        assert_eq!(dispatch, Dispatch::Handled);
        assert!(s.pending_suggestion().is_none());
    }

    #[test]
    fn test_backspace_dismisses_prompt() {
        let mut s = session();
        s.set_language(Language::JavaScript);
        type_str(&mut s, "fu.");
        assert!(s.pending_suggestion().is_some());
        s.handle_key(Key::Backspace).unwrap();
        assert!(s.pending_suggestion().is_none());
        assert_eq!(s.text(), "fu");
        let outcome = s.resolve_suggestion(SuggestionChoice::Picked(0)).unwrap();
        assert_eq!(outcome, SuggestionOutcome::Dismissed);
    }

    #[test]
    fn test_enter_dismisses_prompt() {
        let mut s = session();
        s.set_language(Language::JavaScript);
        type_str(&mut s, "fu.");
        s.handle_key(Key::Enter).unwrap();
        assert!(s.pending_suggestion().is_none());
        assert_eq!(s.text(), "fu.\n");
    }

    #[test]
    fn test_picked_index_out_of_range_is_an_error() {
        let mut s = session();
        s.set_language(Language::JavaScript);
        type_str(&mut s, "fu.");
        let err = s.resolve_suggestion(SuggestionChoice::Picked(7)).unwrap_err();
        assert!(matches!(err, CoreError::InvalidOperation(_)));
    }

    #[test]
    fn test_extra_words_from_config() {
        let mut config = Config::default();
        config
            .completion
            .extra_words
            .insert("js".to_string(), vec!["querySelector".to_string()]);
        config
            .completion
            .extra_words
            .insert("python".to_string(), vec!["def".to_string()]);
        let s = EditorSession::new(config);
        assert_eq!(
            s.words().suggest("query", Language::JavaScript),
            vec!["querySelector"]
        );
        // The unknown "python" key is ignored
        assert!(s.words().suggest("def", Language::Html).is_empty());
    }

    // ==================== Search ====================

    #[test]
    fn test_find_miss_leaves_cursor_alone() {
        let mut s = session();
        s.set_text("hello");
        let before = s.cursor();
        assert_eq!(s.find("zz").unwrap(), FindOutcome::NotFound);
        assert_eq!(s.cursor(), before);
    }

    #[test]
    fn test_find_empty_needle_is_not_found() {
        let mut s = session();
        s.set_text("hello");
        assert_eq!(s.find("").unwrap(), FindOutcome::NotFound);
    }

    #[test]
    fn test_find_moves_cursor_and_highlights() {
        let mut s = session();
        s.set_text("ab hello cd");
        s.set_cursor(Position::ZERO).unwrap();
        let outcome = s.find("hello").unwrap();
        assert_eq!(
            outcome,
            FindOutcome::Found {
                span: 3..8,
                at: Position::new(0, 3),
            }
        );
        assert_eq!(s.cursor(), 8);
        assert!(s.styles().ranges().contains(&StyleRange {
            style: HighlightStyle::Match,
            span: 3..8,
        }));
    }

    #[test]
    fn test_find_again_walks_forward() {
        let mut s = session();
        s.set_text("aa aa");
        s.set_cursor(Position::ZERO).unwrap();
        assert!(matches!(
            s.find("aa").unwrap(),
            FindOutcome::Found { span, .. } if span == (0..2)
        ));
        assert!(matches!(
            s.find("aa").unwrap(),
            FindOutcome::Found { span, .. } if span == (3..5)
        ));
        // Past the last match the search stops; it never wraps
        assert_eq!(s.find("aa").unwrap(), FindOutcome::NotFound);
    }

    #[test]
    fn test_find_spans_are_byte_offsets() {
        let mut s = session();
        s.set_text("é hello");
        s.set_cursor(Position::ZERO).unwrap();
        let outcome = s.find("hello").unwrap();
        // The two-byte é pushes the byte span past the char index
        assert_eq!(
            outcome,
            FindOutcome::Found {
                span: 3..8,
                at: Position::new(0, 2),
            }
        );
    }

    // ==================== Replace ====================

    #[test]
    fn test_replace_all_rewrites_every_occurrence() {
        let mut s = session();
        s.set_text("<p>old</p><p>old</p>");
        assert_eq!(s.replace_all("old", "new"), 2);
        assert_eq!(s.text(), "<p>new</p><p>new</p>");
        // Replacing back restores the original text
        assert_eq!(s.replace_all("new", "old"), 2);
        assert_eq!(s.text(), "<p>old</p><p>old</p>");
    }

    #[test]
    fn test_replace_all_without_match_changes_nothing() {
        let mut s = session();
        s.set_text("abc");
        assert_eq!(s.replace_all("zz", "yy"), 0);
        assert_eq!(s.text(), "abc");
    }

    #[test]
    fn test_replace_all_empty_from_is_a_noop() {
        let mut s = session();
        s.set_text("abc");
        assert_eq!(s.replace_all("", "x"), 0);
        assert_eq!(s.text(), "abc");
    }

    #[test]
    fn test_replace_all_clamps_cursor_to_shrunk_text() {
        let mut s = session();
        s.set_text("aaaa");
        assert_eq!(s.cursor(), 4);
        assert_eq!(s.replace_all("aa", "b"), 2);
        assert_eq!(s.text(), "bb");
        assert_eq!(s.cursor(), 2);
    }

    // ==================== Highlighting ====================

    #[test]
    fn test_typing_repaints() {
        let mut s = session();
        s.set_language(Language::JavaScript);
        type_str(&mut s, "let");
        assert!(s.styles().ranges().contains(&StyleRange {
            style: HighlightStyle::Keyword,
            span: 0..3,
        }));
    }

    #[test]
    fn test_set_language_restyles() {
        let mut s = session();
        s.set_text("return");
        // Bare words are plain content in HTML
        assert!(s.styles().is_empty());
        s.set_language(Language::JavaScript);
        assert_eq!(
            s.styles().ranges(),
            &[StyleRange {
                style: HighlightStyle::Keyword,
                span: 0..6,
            }]
        );
    }

    #[test]
    fn test_repaint_drops_search_highlights() {
        let mut s = session();
        s.set_text("find me");
        s.set_cursor(Position::ZERO).unwrap();
        s.find("me").unwrap();
        assert!(!s.styles().is_empty());
        s.handle_key(Key::Char('x')).unwrap();
        let still_matched = s
            .styles()
            .ranges()
            .iter()
            .any(|r| r.style == HighlightStyle::Match);
        assert!(!still_matched);
    }

    // ==================== Files ====================

    #[test]
    fn test_open_sets_language_and_styles() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("style.css");
        std::fs::write(&path, "p { color: red; }").unwrap();
        let mut s = session();
        s.open(&path).unwrap();
        assert_eq!(s.language(), Language::Css);
        assert_eq!(s.cursor(), 0);
        assert!(!s.styles().is_empty());
    }

    #[test]
    fn test_save_round_trip_through_session() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.js");
        let mut s = session();
        s.set_text("let x = 1;\n");
        s.save_as(&path).unwrap();
        assert!(!s.is_modified());

        let mut reloaded = session();
        reloaded.open(&path).unwrap();
        assert_eq!(reloaded.text(), "let x = 1;\n");
        assert_eq!(reloaded.language(), Language::JavaScript);
    }

    // ==================== Events ====================

    #[tokio::test]
    async fn test_events_reach_subscribers() {
        let mut s = session();
        let mut stream = s.events().subscribe();
        s.handle_key(Key::Char('x')).unwrap();
        assert!(matches!(
            stream.next().await,
            Some(EditorEvent::DocumentChanged)
        ));
        assert!(matches!(
            stream.next().await,
            Some(EditorEvent::HighlightsRebuilt { .. })
        ));
    }

    // ==================== Properties ====================

    proptest! {
        // Segments, from and to draw on disjoint alphabets, so the only
        // occurrences of either pattern are the separators and the two
        // rewrites cannot collide with surrounding text.
        #[test]
        fn prop_replace_all_then_inverse_restores_text(
            segments in proptest::collection::vec("[a-c ]{0,8}", 1..6),
            from in "[x-z]{1,4}",
            to in "[0-9]{1,4}",
        ) {
            let original = segments.join(from.as_str());
            let mut s = session();
            s.set_text(&original);
            prop_assert_eq!(s.replace_all(&from, &to), segments.len() - 1);
            s.replace_all(&to, &from);
            prop_assert_eq!(s.text(), original.as_str());
        }
    }
}
