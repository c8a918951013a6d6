use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::token::{
    DELIMITERS, MULTI_CHAR_OPERATORS, SINGLE_CHAR_OPERATORS, Span, Token, TokenKind, is_keyword,
};

/// Classifies a lexer error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LexErrorKind {
    /// `/*` without a matching `*/`.
    UnterminatedBlockComment,
    /// Newline or end of input before the closing `"`.
    UnterminatedString,
    /// Numeral immediately followed by letters; holds the whole run.
    InvalidNumber(String),
    /// Character that cannot start any token.
    UnrecognizedSymbol(char),
}

impl fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedBlockComment => write!(f, "unterminated block comment"),
            Self::UnterminatedString => write!(f, "unterminated string"),
            Self::InvalidNumber(text) => write!(f, "invalid number: '{text}'"),
            Self::UnrecognizedSymbol(ch) => write!(f, "unrecognized symbol: '{ch}'"),
        }
    }
}

/// Error produced during lexing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct LexError {
    pub kind: LexErrorKind,
    pub span: Span,
}

impl LexError {
    /// Human readable message without the location suffix.
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Per-file identifier statistics gathered while lexing.
///
/// Keyed by name only; the lexer knows nothing about scopes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RawSymbol {
    pub name: String,
    pub occurrences: usize,
    pub first_seen: Span,
}

/// Everything a single lexing pass produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct LexOutput {
    pub tokens: Vec<Token>,
    pub errors: Vec<LexError>,
    /// Sorted by name.
    pub symbols: Vec<RawSymbol>,
}

impl LexOutput {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Tokenize a source string.
///
/// Never fails: lexical problems are collected in
/// [`LexOutput::errors`] and scanning resumes right after the
/// offending run or character. Comments and whitespace produce
/// no tokens.
#[must_use]
pub fn tokenize(input: &str) -> LexOutput {
    Lexer::new(input).tokenize()
}

struct Lexer<'a> {
    input: &'a str,
    pos: usize,
    line: usize,
    col: usize,
    tokens: Vec<Token>,
    errors: Vec<LexError>,
    symbols: BTreeMap<String, RawSymbol>,
}

impl<'a> Lexer<'a> {
    fn new(input: &'a str) -> Self {
        let start = if input.starts_with('\u{FEFF}') {
            '\u{FEFF}'.len_utf8()
        } else {
            0
        };
        Self {
            input,
            pos: start,
            line: 1,
            col: 1,
            tokens: Vec::new(),
            errors: Vec::new(),
            symbols: BTreeMap::new(),
        }
    }

    fn tokenize(mut self) -> LexOutput {
        while let Some(ch) = self.peek() {
            let start = self.span();

            match ch {
                ' ' | '\t' | '\r' | '\n' => self.advance(),
                '/' if self.peek_at(1) == Some('/') => self.skip_line_comment(),
                '/' if self.peek_at(1) == Some('*') => self.skip_block_comment(start),
                '"' => self.read_string(start),
                c if c.is_ascii_digit() => self.read_number(start),
                c if is_ident_start(c) => self.read_word(start),
                c => self.read_symbol(c, start),
            }
        }

        LexOutput {
            tokens: self.tokens,
            errors: self.errors,
            symbols: self.symbols.into_values().collect(),
        }
    }

    const fn span(&self) -> Span {
        Span {
            line: self.line,
            column: self.col,
        }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.pos..].chars().next()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input[self.pos..].chars().nth(offset)
    }

    fn advance(&mut self) {
        if let Some(ch) = self.peek() {
            if ch == '\n' {
                self.line += 1;
                self.col = 1;
            } else {
                self.col += 1;
            }
            self.pos += ch.len_utf8();
        }
    }

    fn advance_while(&mut self, pred: impl Fn(char) -> bool) {
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
    }

    fn push_token(&mut self, kind: TokenKind, lexeme: &str, span: Span) {
        self.tokens.push(Token {
            kind,
            lexeme: lexeme.to_string(),
            span,
        });
    }

    fn push_error(&mut self, kind: LexErrorKind, span: Span) {
        self.errors.push(LexError { kind, span });
    }

    fn skip_line_comment(&mut self) {
        self.advance_while(|c| c != '\n');
    }

    fn skip_block_comment(&mut self, start: Span) {
        self.advance(); // skip /
        self.advance(); // skip *

        loop {
            match self.peek() {
                None => {
                    self.push_error(LexErrorKind::UnterminatedBlockComment, start);
                    return;
                }
                Some('*') if self.peek_at(1) == Some('/') => {
                    self.advance();
                    self.advance();
                    return;
                }
                Some(_) => self.advance(),
            }
        }
    }

    fn read_string(&mut self, start: Span) {
        let begin = self.pos;
        self.advance(); // skip opening quote

        loop {
            match self.peek() {
                None | Some('\n') => {
                    self.push_error(LexErrorKind::UnterminatedString, start);
                    return;
                }
                Some('\\') => {
                    // the escaped character stays in the lexeme verbatim
                    self.advance();
                    match self.peek() {
                        None | Some('\n') => {
                            self.push_error(LexErrorKind::UnterminatedString, start);
                            return;
                        }
                        Some(_) => self.advance(),
                    }
                }
                Some('"') => {
                    self.advance();
                    let lexeme = &self.input[begin..self.pos];
                    self.push_token(TokenKind::String, lexeme, start);
                    return;
                }
                Some(_) => self.advance(),
            }
        }
    }

    fn read_number(&mut self, start: Span) {
        let begin = self.pos;
        self.advance_while(|c| c.is_ascii_digit());

        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
            self.advance_while(|c| c.is_ascii_digit());
        }
        let numeral_end = self.pos;

        if self.peek().is_some_and(is_ident_start) {
            self.advance_while(is_ident_continue);
            let junk = self.input[begin..self.pos].to_string();
            self.push_error(LexErrorKind::InvalidNumber(junk), start);
        }

        let numeral = &self.input[begin..numeral_end];
        self.push_token(TokenKind::Number, numeral, start);
    }

    fn read_word(&mut self, start: Span) {
        let begin = self.pos;
        self.advance_while(is_ident_continue);
        let word = &self.input[begin..self.pos];

        if is_keyword(word) {
            self.push_token(TokenKind::Keyword, word, start);
            return;
        }

        self.push_token(TokenKind::Identifier, word, start);
        self.symbols
            .entry(word.to_string())
            .and_modify(|sym| sym.occurrences += 1)
            .or_insert_with(|| RawSymbol {
                name: word.to_string(),
                occurrences: 1,
                first_seen: start,
            });
    }

    fn read_symbol(&mut self, ch: char, start: Span) {
        // maximal munch: two-character operators first
        if let Some(next) = self.peek_at(1) {
            let pair: String = [ch, next].iter().collect();
            if MULTI_CHAR_OPERATORS.contains(&pair.as_str()) {
                self.advance();
                self.advance();
                self.push_token(TokenKind::Operator, &pair, start);
                return;
            }
        }

        let kind = if SINGLE_CHAR_OPERATORS.contains(&ch) {
            Some(TokenKind::Operator)
        } else if DELIMITERS.contains(&ch) {
            Some(TokenKind::Delimiter)
        } else {
            None
        };

        let begin = self.pos;
        self.advance();
        match kind {
            Some(kind) => {
                let lexeme = &self.input[begin..self.pos];
                self.push_token(kind, lexeme, start);
            }
            None => self.push_error(LexErrorKind::UnrecognizedSymbol(ch), start),
        }
    }
}

const fn is_ident_start(ch: char) -> bool {
    ch.is_ascii_alphabetic() || ch == '_'
}

const fn is_ident_continue(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}
