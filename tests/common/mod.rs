#![allow(dead_code)]

use minic::{ParseOutput, Token, TokenKind, parse, tokenize};

/// Tokenize input that must be lexically clean.
pub fn lex_clean(input: &str) -> Vec<Token> {
    let lexed = tokenize(input);
    assert!(
        lexed.errors.is_empty(),
        "unexpected lex errors for {input:?}: {:?}",
        lexed.errors
    );
    lexed.tokens
}

pub fn parse_input(input: &str) -> ParseOutput {
    parse(&lex_clean(input))
}

pub fn kinds_and_lexemes(tokens: &[Token]) -> Vec<(TokenKind, &str)> {
    tokens.iter().map(|t| (t.kind, t.lexeme.as_str())).collect()
}

pub fn scopes_of<'a>(out: &'a ParseOutput, name: &str) -> Vec<&'a str> {
    out.declarations
        .iter()
        .filter(|d| d.name == name)
        .map(|d| d.scope.as_str())
        .collect()
}
