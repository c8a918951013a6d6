use std::fmt;

use serde::Serialize;

/// Source location for error reporting.
///
/// Both fields are 1-based and point at the first character of the
/// construct they describe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Span {
    pub line: usize,
    pub column: usize,
}

impl Span {
    #[must_use]
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Reserved word (see [`KEYWORDS`]).
    Keyword,
    /// Name that is not a reserved word.
    Identifier,
    /// Integer or decimal literal.
    Number,
    /// Double-quoted literal, quotes included in the lexeme.
    String,
    /// One of [`MULTI_CHAR_OPERATORS`] or [`SINGLE_CHAR_OPERATORS`].
    Operator,
    /// One of [`DELIMITERS`].
    Delimiter,
    /// Comment text. The lexer skips comments, so `tokenize` never
    /// yields this kind.
    Comment,
}

impl TokenKind {
    /// Lowercase name used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Keyword => "keyword",
            Self::Identifier => "identifier",
            Self::Number => "number",
            Self::String => "string",
            Self::Operator => "operator",
            Self::Delimiter => "delimiter",
            Self::Comment => "comment",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A single token with its kind, source text, and location.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub span: Span,
}

impl Token {
    #[must_use]
    pub fn is(&self, kind: TokenKind, lexeme: &str) -> bool {
        self.kind == kind && self.lexeme == lexeme
    }

    #[must_use]
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.is(TokenKind::Keyword, keyword)
    }

    #[must_use]
    pub fn is_delimiter(&self, delimiter: &str) -> bool {
        self.is(TokenKind::Delimiter, delimiter)
    }

    #[must_use]
    pub fn is_operator(&self) -> bool {
        self.kind == TokenKind::Operator
    }

    /// Number, string, or one of the boolean keywords.
    #[must_use]
    pub fn is_literal(&self) -> bool {
        match self.kind {
            TokenKind::Number | TokenKind::String => true,
            TokenKind::Keyword => self.lexeme == "true" || self.lexeme == "false",
            _ => false,
        }
    }
}

/// Reserved words.
pub const KEYWORDS: [&str; 15] = [
    "if", "else", "while", "for", "return", "break", "continue", "int", "float", "bool", "string",
    "void", "true", "false", "function",
];

/// Two-character operators, tried before the single-character set.
pub const MULTI_CHAR_OPERATORS: [&str; 13] = [
    "==", "!=", "<=", ">=", "&&", "||", "++", "--", "+=", "-=", "*=", "/=", "%=",
];

pub const SINGLE_CHAR_OPERATORS: [char; 15] = [
    '+', '-', '*', '/', '%', '=', '<', '>', '!', '&', '|', '^', '~', '?', ':',
];

pub const DELIMITERS: [char; 9] = ['(', ')', '{', '}', '[', ']', ',', ';', '.'];

#[must_use]
pub fn is_keyword(word: &str) -> bool {
    KEYWORDS.contains(&word)
}
