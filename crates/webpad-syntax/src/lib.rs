//! # Webpad Syntax
//!
//! Tokenizers for the three languages the editor understands: HTML, CSS
//! and JavaScript.
//!
//! ## Why Hand-Written Scanners?
//!
//! The language set is closed and small, and the consumer is a
//! highlighter, not a compiler. A flat byte-walking scanner per grammar
//! gives O(n) tokenization with zero parser infrastructure, and it never
//! fails: any input, including invalid or unfinished code, produces a
//! token stream covering every byte.
//!
//! ```
//! use webpad_syntax::{tokenize, Language, TokenCategory};
//!
//! let text = "let x = 1;";
//! let first = tokenize(text, Language::JavaScript).next().unwrap();
//! assert_eq!(first.category, TokenCategory::Keyword);
//! assert_eq!(first.lexeme(text), "let");
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;
use std::path::Path;

mod grammar;
mod scan;

pub use scan::Tokens;

/// The languages the editor supports. A closed set: anything else maps
/// onto [`Language::Html`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    #[default]
    Html,
    Css,
    JavaScript,
}

impl Language {
    /// All supported languages, in selector order.
    pub const ALL: [Language; 3] = [Language::Html, Language::Css, Language::JavaScript];

    /// Parses a language name. Unknown names fall back to HTML rather
    /// than erroring, so a stale or misspelled selector value still
    /// highlights something sensible.
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        if name.eq_ignore_ascii_case("css") {
            Language::Css
        } else if name.eq_ignore_ascii_case("javascript") || name.eq_ignore_ascii_case("js") {
            Language::JavaScript
        } else {
            Language::Html
        }
    }

    /// Detects the language from a file extension (without the dot).
    /// Unknown extensions fall back to HTML.
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_ascii_lowercase().as_str() {
            "css" => Language::Css,
            "js" | "mjs" => Language::JavaScript,
            _ => Language::Html,
        }
    }

    /// Detects the language from a file path.
    pub fn from_path(path: &Path) -> Self {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(Self::from_extension)
            .unwrap_or(Language::Html)
    }

    /// Human-readable name, as shown in the language selector.
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Html => "HTML",
            Language::Css => "CSS",
            Language::JavaScript => "JavaScript",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What a token is, as far as highlighting cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenCategory {
    /// Reserved words, CSS properties and at-rules, attribute names
    Keyword,
    /// Identifiers, tag names, selectors
    Name,
    /// Quoted literals, including unterminated ones
    String,
    /// Line and block comments, delimiters included
    Comment,
    /// Numeric literals, unit suffix included
    Number,
    /// Operators, brackets and other single-char syntax
    Punctuation,
    /// Everything else: whitespace, markup content, unclassified chars
    Text,
}

/// One scanned token: a category and the byte range it covers.
///
/// Spans index into the exact string that was tokenized and always lie
/// on char boundaries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub category: TokenCategory,
    pub span: Range<usize>,
}

impl Token {
    /// The token's text within the snapshot it was scanned from.
    pub fn lexeme<'t>(&self, text: &'t str) -> &'t str {
        &text[self.span.clone()]
    }
}

/// Tokenizes `text` under the given language's grammar.
///
/// The returned iterator is lazy and finite, covers the whole input in
/// order with no gaps or overlaps, and never errors. Tokenizing the same
/// text twice yields the same stream; call again (or clone the iterator)
/// to restart.
pub fn tokenize(text: &str, language: Language) -> Tokens<'_> {
    Tokens::new(text, language)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn lexemes_of(text: &str, language: Language, category: TokenCategory) -> Vec<String> {
        tokenize(text, language)
            .filter(|t| t.category == category)
            .map(|t| t.lexeme(text).to_string())
            .collect()
    }

    fn assert_covers(text: &str, language: Language) {
        let mut expected = 0;
        for token in tokenize(text, language) {
            assert_eq!(
                token.span.start, expected,
                "gap or overlap at byte {expected} in {language}: {text:?}"
            );
            assert!(token.span.end > token.span.start);
            assert!(text.get(token.span.clone()).is_some(), "span off boundary");
            expected = token.span.end;
        }
        assert_eq!(expected, text.len());
    }

    #[test]
    fn test_div_element_names_and_content() {
        let text = "<div>hello</div>";
        assert_eq!(
            lexemes_of(text, Language::Html, TokenCategory::Name),
            ["div", "div"]
        );
        assert_eq!(
            lexemes_of(text, Language::Html, TokenCategory::Text),
            ["hello"]
        );
        assert_covers(text, Language::Html);
    }

    #[test]
    fn test_html_attributes_and_strings() {
        let text = r#"<a href="x.html" id=main>link</a>"#;
        assert_eq!(
            lexemes_of(text, Language::Html, TokenCategory::Name),
            ["a", "a"]
        );
        let keywords = lexemes_of(text, Language::Html, TokenCategory::Keyword);
        assert!(keywords.contains(&"href".to_string()));
        assert_eq!(
            lexemes_of(text, Language::Html, TokenCategory::String),
            [r#""x.html""#]
        );
        assert_covers(text, Language::Html);
    }

    #[test]
    fn test_html_comment() {
        let text = "a <!-- note --> b";
        assert_eq!(
            lexemes_of(text, Language::Html, TokenCategory::Comment),
            ["<!-- note -->"]
        );
        assert_covers(text, Language::Html);
    }

    #[test]
    fn test_js_keywords_and_numbers() {
        let text = "function add(n) { return n + 10; }";
        assert_eq!(
            lexemes_of(text, Language::JavaScript, TokenCategory::Keyword),
            ["function", "return"]
        );
        assert_eq!(
            lexemes_of(text, Language::JavaScript, TokenCategory::Number),
            ["10"]
        );
        assert_covers(text, Language::JavaScript);
    }

    #[test]
    fn test_js_comments() {
        let text = "let a = 1; // tail\n/* block\nspans lines */ let b";
        assert_eq!(
            lexemes_of(text, Language::JavaScript, TokenCategory::Comment),
            ["// tail", "/* block\nspans lines */"]
        );
        assert_covers(text, Language::JavaScript);
    }

    #[test]
    fn test_js_template_string() {
        let text = "let s = `a ${b} c`;";
        assert_eq!(
            lexemes_of(text, Language::JavaScript, TokenCategory::String),
            ["`a ${b} c`"]
        );
    }

    #[test]
    fn test_unterminated_string_runs_to_end() {
        let text = "let s = \"oops";
        assert_eq!(
            lexemes_of(text, Language::JavaScript, TokenCategory::String),
            ["\"oops"]
        );
        assert_covers(text, Language::JavaScript);
    }

    #[test]
    fn test_css_properties_and_values() {
        let text = ".btn { color: #fff; margin: 10px; }";
        let keywords = lexemes_of(text, Language::Css, TokenCategory::Keyword);
        assert_eq!(keywords, ["color", "margin"]);
        assert_eq!(
            lexemes_of(text, Language::Css, TokenCategory::Number),
            ["10px"]
        );
        let names = lexemes_of(text, Language::Css, TokenCategory::Name);
        assert!(names.contains(&"btn".to_string()));
        assert!(names.contains(&"#fff".to_string()));
        assert_covers(text, Language::Css);
    }

    #[test]
    fn test_css_at_rule_and_comment() {
        let text = "@media screen { /* none */ }";
        assert_eq!(
            lexemes_of(text, Language::Css, TokenCategory::Keyword),
            ["@media"]
        );
        assert_eq!(
            lexemes_of(text, Language::Css, TokenCategory::Comment),
            ["/* none */"]
        );
    }

    #[test]
    fn test_tokenize_is_idempotent() {
        let text = "<p class=\"x\">hi</p>";
        let first: Vec<_> = tokenize(text, Language::Html).collect();
        let second: Vec<_> = tokenize(text, Language::Html).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_cloned_iterator_resumes_independently() {
        let text = "let x = 'y';";
        let mut stream = tokenize(text, Language::JavaScript);
        stream.next();
        stream.next();
        let forked = stream.clone();
        assert_eq!(stream.collect::<Vec<_>>(), forked.collect::<Vec<_>>());
    }

    #[test]
    fn test_unknown_names_fall_back_to_html() {
        assert_eq!(Language::from_name("python"), Language::Html);
        assert_eq!(Language::from_name(""), Language::Html);
        assert_eq!(Language::from_name("JS"), Language::JavaScript);
        assert_eq!(Language::from_name("CSS"), Language::Css);
        assert_eq!(Language::from_extension("rs"), Language::Html);
        assert_eq!(Language::from_path(Path::new("app.js")), Language::JavaScript);
        assert_eq!(Language::from_path(Path::new("README")), Language::Html);
    }

    #[test]
    fn test_empty_input_yields_no_tokens() {
        assert_eq!(tokenize("", Language::Html).count(), 0);
        assert_eq!(tokenize("", Language::JavaScript).count(), 0);
    }

    proptest! {
        #[test]
        fn prop_tokens_cover_any_input(text in ".{0,120}", pick in 0u8..3) {
            let language = Language::ALL[pick as usize];
            assert_covers(&text, language);
        }

        #[test]
        fn prop_tokens_cover_weblike_input(
            text in r#"[a-z0-9<>/="'`@#%{}();:,.\n \-]{0,120}"#,
            pick in 0u8..3,
        ) {
            let language = Language::ALL[pick as usize];
            assert_covers(&text, language);
            let again: Vec<_> = tokenize(&text, language).collect();
            prop_assert_eq!(tokenize(&text, language).collect::<Vec<_>>(), again);
        }
    }
}
