//! Per-language scanner tables.
//!
//! One static [`Grammar`] per supported language. The scanner in
//! [`crate::scan`] is generic over these flags; the tables are the only
//! thing that differs between languages.

use crate::Language;

/// Static description of one language's surface syntax.
#[derive(Debug)]
pub(crate) struct Grammar {
    /// Words classified as keywords. Must stay sorted: the scanner
    /// looks them up with a binary search.
    pub keywords: &'static [&'static str],
    /// Line comment opener, if the language has one
    pub line_comment: Option<&'static str>,
    /// Block comment delimiters
    pub block_comment: Option<(&'static str, &'static str)>,
    /// Single-quoted strings allowed
    pub single_quotes: bool,
    /// Backtick template strings allowed
    pub backticks: bool,
    /// Backslash escapes inside strings
    pub string_escapes: bool,
    /// Tag-oriented scanning (angle brackets, attributes)
    pub markup: bool,
    /// `@ident` scans as a single keyword token
    pub at_keywords: bool,
    /// `#` starts hex colors and id selectors
    pub hash_idents: bool,
    /// `-` may join identifiers (`font-family`, `-webkit-box`)
    pub dash_idents: bool,
    /// `$` is an identifier char
    pub dollar_idents: bool,
    /// `%` may terminate a number (`50%`)
    pub percent_numbers: bool,
}

impl Grammar {
    pub(crate) fn of(language: Language) -> &'static Grammar {
        match language {
            Language::Html => &HTML,
            Language::Css => &CSS,
            Language::JavaScript => &JAVASCRIPT,
        }
    }
}

/// JavaScript reserved words plus the literals worth lighting up.
const JS_KEYWORDS: &[&str] = &[
    "async",
    "await",
    "break",
    "case",
    "catch",
    "class",
    "const",
    "continue",
    "debugger",
    "default",
    "delete",
    "do",
    "else",
    "export",
    "extends",
    "false",
    "finally",
    "for",
    "function",
    "get",
    "if",
    "import",
    "in",
    "instanceof",
    "let",
    "new",
    "null",
    "of",
    "return",
    "set",
    "static",
    "super",
    "switch",
    "this",
    "throw",
    "true",
    "try",
    "typeof",
    "undefined",
    "var",
    "void",
    "while",
    "with",
    "yield",
];

/// Common CSS property names. Values and selectors scan as plain names.
const CSS_KEYWORDS: &[&str] = &[
    "align-items",
    "animation",
    "background",
    "border",
    "border-radius",
    "bottom",
    "box-shadow",
    "clear",
    "color",
    "content",
    "cursor",
    "display",
    "flex",
    "flex-direction",
    "flex-wrap",
    "float",
    "font-family",
    "font-size",
    "font-weight",
    "gap",
    "grid",
    "height",
    "justify-content",
    "left",
    "letter-spacing",
    "line-height",
    "margin",
    "max-height",
    "max-width",
    "min-height",
    "min-width",
    "opacity",
    "outline",
    "overflow",
    "padding",
    "position",
    "right",
    "text-align",
    "text-decoration",
    "top",
    "transform",
    "transition",
    "vertical-align",
    "visibility",
    "white-space",
    "width",
    "z-index",
];

static HTML: Grammar = Grammar {
    // Tag and attribute names are positional in markup, not table-driven
    keywords: &[],
    line_comment: None,
    block_comment: Some(("<!--", "-->")),
    single_quotes: true,
    backticks: false,
    string_escapes: false,
    markup: true,
    at_keywords: false,
    hash_idents: false,
    dash_idents: true,
    dollar_idents: false,
    percent_numbers: false,
};

static CSS: Grammar = Grammar {
    keywords: CSS_KEYWORDS,
    line_comment: None,
    block_comment: Some(("/*", "*/")),
    single_quotes: true,
    backticks: false,
    string_escapes: true,
    markup: false,
    at_keywords: true,
    hash_idents: true,
    dash_idents: true,
    dollar_idents: false,
    percent_numbers: true,
};

static JAVASCRIPT: Grammar = Grammar {
    keywords: JS_KEYWORDS,
    line_comment: Some("//"),
    block_comment: Some(("/*", "*/")),
    single_quotes: true,
    backticks: true,
    string_escapes: true,
    markup: false,
    at_keywords: false,
    hash_idents: false,
    dash_idents: false,
    dollar_idents: true,
    percent_numbers: false,
};
