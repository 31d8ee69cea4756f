//! The byte-walking scanner behind [`tokenize`](crate::tokenize).
//!
//! ## Learning: Why Bytes, Not Chars?
//!
//! Every construct that starts or ends a token in these grammars is
//! ASCII (`<`, `"`, `/`, digits, ...), so the scanner walks `&[u8]` and
//! only falls back to char iteration for runs of non-ASCII text. Spans
//! always land on char boundaries: multi-byte chars are either consumed
//! whole in a text run or sit inside a token delimited by ASCII bytes.

use crate::grammar::Grammar;
use crate::{Language, Token, TokenCategory};

/// A lazy token stream over a text snapshot.
///
/// Produced by [`tokenize`](crate::tokenize). The stream is finite and
/// contiguous: the first span starts at byte 0, each span begins where
/// the previous one ended, and the last one ends at `text.len()`.
/// Cloning snapshots the scanner mid-stream; calling `tokenize` again
/// restarts from the beginning.
#[derive(Debug, Clone)]
pub struct Tokens<'a> {
    text: &'a str,
    grammar: &'static Grammar,
    pos: usize,
    /// Markup only: currently between `<` and `>`
    in_tag: bool,
    /// Markup only: the next identifier is the element name
    tag_name_pending: bool,
}

impl<'a> Tokens<'a> {
    pub(crate) fn new(text: &'a str, language: Language) -> Self {
        Self {
            text,
            grammar: Grammar::of(language),
            pos: 0,
            in_tag: false,
            tag_name_pending: false,
        }
    }

    fn bytes(&self) -> &'a [u8] {
        self.text.as_bytes()
    }

    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn emit(&mut self, category: TokenCategory, end: usize) -> Token {
        debug_assert!(end > self.pos, "scanner must always advance");
        let span = self.pos..end;
        self.pos = end;
        Token { category, span }
    }

    // ==================== Code Scanning ====================

    fn next_code(&mut self) -> Token {
        let start = self.pos;
        let b = self.bytes()[start];
        let g = self.grammar;

        // Comments take priority over punctuation so `/` is not eaten
        if let Some(open) = g.line_comment {
            if self.rest().starts_with(open) {
                let end = match self.rest().find('\n') {
                    Some(i) => start + i,
                    None => self.text.len(),
                };
                return self.emit(TokenCategory::Comment, end);
            }
        }
        if let Some((open, close)) = g.block_comment {
            if self.rest().starts_with(open) {
                return self.scan_to_close(start + open.len(), close, TokenCategory::Comment);
            }
        }
        if b == b'"' || (b == b'\'' && g.single_quotes) || (b == b'`' && g.backticks) {
            let end = self.scan_string(start, b);
            return self.emit(TokenCategory::String, end);
        }
        if b.is_ascii_digit() {
            let end = self.scan_number(start);
            return self.emit(TokenCategory::Number, end);
        }
        if g.at_keywords && b == b'@' && self.peek_at(start + 1, |c| c.is_ascii_alphabetic()) {
            let end = self.scan_ident(start + 1);
            return self.emit(TokenCategory::Keyword, end);
        }
        if g.hash_idents && b == b'#' && self.peek_at(start + 1, |c| c.is_ascii_alphanumeric()) {
            // Hex colors and id selectors
            let end = self.scan_ident(start + 1);
            return self.emit(TokenCategory::Name, end);
        }
        if g.dash_idents
            && b == b'-'
            && self.peek_at(start + 1, |c| c.is_ascii_alphabetic() || c == b'-')
        {
            let end = self.scan_ident(start + 1);
            return self.emit(self.keyword_or_name(start, end), end);
        }
        if self.is_ident_start(b) {
            let end = self.scan_ident(start + 1);
            return self.emit(self.keyword_or_name(start, end), end);
        }
        if b.is_ascii_whitespace() {
            let end = self.scan_while(start, |c| c.is_ascii_whitespace());
            return self.emit(TokenCategory::Text, end);
        }
        if b.is_ascii_punctuation() {
            return self.emit(TokenCategory::Punctuation, start + 1);
        }
        let end = self.scan_plain(start);
        self.emit(TokenCategory::Text, end)
    }

    // ==================== Markup Scanning ====================

    fn next_markup(&mut self) -> Token {
        let start = self.pos;
        if self.in_tag {
            return self.next_in_tag();
        }

        if let Some((open, close)) = self.grammar.block_comment {
            if self.rest().starts_with(open) {
                return self.scan_to_close(start + open.len(), close, TokenCategory::Comment);
            }
        }
        if self.bytes()[start] == b'<' {
            let mut end = start + 1;
            if matches!(self.bytes().get(end).copied(), Some(b'/' | b'!')) {
                end += 1;
            }
            self.in_tag = true;
            self.tag_name_pending = true;
            return self.emit(TokenCategory::Punctuation, end);
        }
        // Plain content runs to the next tag opener
        let end = match self.rest().find('<') {
            Some(i) => start + i,
            None => self.text.len(),
        };
        self.emit(TokenCategory::Text, end)
    }

    fn next_in_tag(&mut self) -> Token {
        let start = self.pos;
        let b = self.bytes()[start];

        if b == b'>' {
            self.in_tag = false;
            return self.emit(TokenCategory::Punctuation, start + 1);
        }
        if b == b'"' || b == b'\'' {
            let end = self.scan_string(start, b);
            return self.emit(TokenCategory::String, end);
        }
        if b.is_ascii_whitespace() {
            let end = self.scan_while(start, |c| c.is_ascii_whitespace());
            return self.emit(TokenCategory::Text, end);
        }
        if b.is_ascii_alphabetic() || b == b'_' {
            let end = self.scan_while(start + 1, |c| {
                c.is_ascii_alphanumeric() || c == b'_' || c == b'-' || c == b':'
            });
            // First identifier after `<` is the element name, the rest
            // are attribute names
            let category = if self.tag_name_pending {
                self.tag_name_pending = false;
                TokenCategory::Name
            } else {
                TokenCategory::Keyword
            };
            return self.emit(category, end);
        }
        if b.is_ascii_digit() {
            let end = self.scan_number(start);
            return self.emit(TokenCategory::Number, end);
        }
        if b.is_ascii_punctuation() {
            return self.emit(TokenCategory::Punctuation, start + 1);
        }
        let end = self.scan_plain(start);
        self.emit(TokenCategory::Text, end)
    }

    // ==================== Shared Helpers ====================

    fn peek_at(&self, index: usize, pred: impl Fn(u8) -> bool) -> bool {
        self.bytes().get(index).copied().is_some_and(pred)
    }

    fn is_ident_start(&self, b: u8) -> bool {
        b.is_ascii_alphabetic() || b == b'_' || (self.grammar.dollar_idents && b == b'$')
    }

    fn is_ident_continue(&self, b: u8) -> bool {
        b.is_ascii_alphanumeric()
            || b == b'_'
            || (self.grammar.dollar_idents && b == b'$')
            || (self.grammar.dash_idents && b == b'-')
    }

    fn keyword_or_name(&self, start: usize, end: usize) -> TokenCategory {
        let word = &self.text[start..end];
        if self.grammar.keywords.binary_search(&word).is_ok() {
            TokenCategory::Keyword
        } else {
            TokenCategory::Name
        }
    }

    fn scan_ident(&self, mut from: usize) -> usize {
        let bytes = self.bytes();
        while from < bytes.len() && self.is_ident_continue(bytes[from]) {
            from += 1;
        }
        from
    }

    fn scan_number(&self, start: usize) -> usize {
        let percent = self.grammar.percent_numbers;
        self.scan_while(start + 1, |c| {
            c.is_ascii_alphanumeric() || c == b'.' || c == b'_' || (percent && c == b'%')
        })
    }

    /// Scans a quoted string from its opening quote; the returned end
    /// includes the closing quote, or is `text.len()` when unterminated.
    fn scan_string(&self, start: usize, quote: u8) -> usize {
        let bytes = self.bytes();
        let mut i = start + 1;
        while i < bytes.len() {
            let b = bytes[i];
            if self.grammar.string_escapes && b == b'\\' {
                i += 2;
                continue;
            }
            if b == quote {
                return i + 1;
            }
            i += 1;
        }
        bytes.len()
    }

    /// Scans a block body from `body` to just past `close`, or to the
    /// end of input when the closer never appears.
    fn scan_to_close(&mut self, body: usize, close: &str, category: TokenCategory) -> Token {
        let end = match self.text[body..].find(close) {
            Some(i) => body + i + close.len(),
            None => self.text.len(),
        };
        self.emit(category, end)
    }

    fn scan_while(&self, mut from: usize, pred: impl Fn(u8) -> bool) -> usize {
        let bytes = self.bytes();
        while from < bytes.len() && pred(bytes[from]) {
            from += 1;
        }
        from
    }

    /// Consumes a run of chars no other rule claims: non-ASCII text and
    /// ASCII control chars. Walks chars, not bytes, so spans never split
    /// a code point.
    fn scan_plain(&self, start: usize) -> usize {
        let mut end = start;
        for c in self.text[start..].chars() {
            let claimed = c.is_ascii()
                && (c.is_ascii_whitespace()
                    || c.is_ascii_punctuation()
                    || c.is_ascii_alphanumeric());
            if claimed {
                break;
            }
            end += c.len_utf8();
        }
        end
    }
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.pos >= self.text.len() {
            return None;
        }
        Some(if self.grammar.markup {
            self.next_markup()
        } else {
            self.next_code()
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::{Language, TokenCategory, tokenize};

    #[test]
    fn test_tag_state_resets_after_close() {
        let text = "<p>a</p><p>b</p>";
        let names: Vec<_> = tokenize(text, Language::Html)
            .filter(|t| t.category == TokenCategory::Name)
            .map(|t| t.lexeme(text).to_string())
            .collect();
        assert_eq!(names, ["p", "p", "p", "p"]);
    }

    #[test]
    fn test_escaped_quote_stays_in_string() {
        let text = r"let s = 'a\'b';";
        let strings: Vec<_> = tokenize(text, Language::JavaScript)
            .filter(|t| t.category == TokenCategory::String)
            .map(|t| t.lexeme(text).to_string())
            .collect();
        assert_eq!(strings, [r"'a\'b'"]);
    }

    #[test]
    fn test_scanner_always_advances_on_controls() {
        // A NUL byte fits no rule; it must still be consumed
        let text = "a\u{0}b";
        let total: usize = tokenize(text, Language::JavaScript)
            .map(|t| t.span.len())
            .sum();
        assert_eq!(total, text.len());
    }
}
