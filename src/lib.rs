//! Lexer, scope-aware parser, and symbol table builder for a small
//! C-like teaching language.
//!
//! The language has typed variable declarations, `if`/`else`, blocks,
//! and flat expression statements. Analysis never stops at the first
//! problem: lexical, syntax, and semantic errors are all collected.
//!
//! # Quick start
//!
//! ```
//! use minic::{DeclaredType, analyze};
//!
//! let analysis = analyze("int x = 1; if (x >= 0) { int x = 2; }");
//! assert!(analysis.is_clean());
//!
//! let decls = analysis.declarations();
//! assert_eq!(decls.len(), 2);
//! assert_eq!(decls[0].declared_type, DeclaredType::Int);
//! assert_eq!(decls[0].scope, "global");
//! ```
//!
//! ## Running the stages separately
//!
//! ```
//! use minic::{enrich, parse, tokenize};
//!
//! let lexed = tokenize("int x = 1; int x = 2;");
//! assert!(lexed.errors.is_empty());
//!
//! let parsed = parse(&lexed.tokens);
//! assert_eq!(parsed.declarations.len(), 1);
//! assert_eq!(parsed.semantic_errors.len(), 1);
//!
//! let table = enrich(&lexed.symbols, &parsed.declarations);
//! assert_eq!(table[0].occurrences, 2);
//! ```

// Allow noisy pedantic lints that don't add value for
// a library crate.
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions
)]

pub mod lexer;
pub mod parser;
pub mod report;
pub mod scope;
pub mod symbols;
pub mod token;

use serde::Serialize;

pub use lexer::{LexError, LexErrorKind, LexOutput, RawSymbol, tokenize};
pub use parser::{
    Declaration, DeclaredType, Expected, ParseOutput, SemanticError, SemanticErrorKind,
    SyntaxError, SyntaxErrorKind, parse,
};
pub use scope::{GLOBAL_SCOPE, ScopeStack, UNNAMED_BLOCK};
pub use symbols::{SymbolRow, enrich};
pub use token::{Span, Token, TokenKind};

/// Any problem found while analyzing a source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "category", rename_all = "lowercase")]
pub enum Diagnostic {
    /// A lexer error.
    #[error("{0}")]
    Lex(#[from] LexError),
    /// A parser error.
    #[error("{0}")]
    Syntax(#[from] SyntaxError),
    /// A declaration bookkeeping error.
    #[error("{0}")]
    Semantic(#[from] SemanticError),
}

impl Diagnostic {
    #[must_use]
    pub const fn span(&self) -> Span {
        match self {
            Self::Lex(e) => e.span,
            Self::Syntax(e) => e.span,
            Self::Semantic(e) => e.span,
        }
    }

    #[must_use]
    pub const fn category(&self) -> &'static str {
        match self {
            Self::Lex(_) => "lexical",
            Self::Syntax(_) => "syntax",
            Self::Semantic(_) => "semantic",
        }
    }

    /// Message without the location suffix.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Lex(e) => e.message(),
            Self::Syntax(e) => e.message(),
            Self::Semantic(e) => e.message(),
        }
    }
}

/// Result of running the whole pipeline over one source text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Analysis {
    pub tokens: Vec<Token>,
    pub lex_errors: Vec<LexError>,
    pub raw_symbols: Vec<RawSymbol>,
    /// `None` when lexing failed and the parser was not run.
    pub parse: Option<ParseOutput>,
    /// Merged symbol table; just the raw symbols as untyped rows
    /// when the parser was not run.
    pub symbols: Vec<SymbolRow>,
}

impl Analysis {
    #[must_use]
    pub const fn parsed(&self) -> bool {
        self.parse.is_some()
    }

    #[must_use]
    pub fn syntax_errors(&self) -> &[SyntaxError] {
        self.parse
            .as_ref()
            .map(|p| p.errors.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn declarations(&self) -> &[Declaration] {
        self.parse
            .as_ref()
            .map(|p| p.declarations.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn semantic_errors(&self) -> &[SemanticError] {
        self.parse
            .as_ref()
            .map(|p| p.semantic_errors.as_slice())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.lex_errors.len() + self.syntax_errors().len() + self.semantic_errors().len()
    }

    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.error_count() == 0
    }

    /// All errors: lexical first, then syntax, then semantic, each
    /// group in the order it was found.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        self.lex_errors
            .iter()
            .cloned()
            .map(Diagnostic::from)
            .chain(self.syntax_errors().iter().cloned().map(Diagnostic::from))
            .chain(self.semantic_errors().iter().cloned().map(Diagnostic::from))
            .collect()
    }
}

/// Tokenize, parse, and build the symbol table in one step.
///
/// The parser only runs on a lexically clean token stream.
#[must_use]
pub fn analyze(source: &str) -> Analysis {
    let LexOutput {
        tokens,
        errors: lex_errors,
        symbols: raw_symbols,
    } = tokenize(source);

    if !lex_errors.is_empty() {
        let symbols = raw_symbols.iter().map(SymbolRow::untyped).collect();
        return Analysis {
            tokens,
            lex_errors,
            raw_symbols,
            parse: None,
            symbols,
        };
    }

    let parsed = parse(&tokens);
    let symbols = enrich(&raw_symbols, &parsed.declarations);
    Analysis {
        tokens,
        lex_errors,
        raw_symbols,
        parse: Some(parsed),
        symbols,
    }
}
