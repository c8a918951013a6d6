//! Plain-text rendering of an analysis: token list, per-kind counts,
//! error panels, and the symbol table.

use std::fmt::Write as _;

use crate::parser::{DeclaredType, SemanticError};
use crate::symbols::SymbolRow;
use crate::token::{Token, TokenKind};
use crate::{Analysis, Diagnostic};

/// Number of tokens of each kind, in order of first appearance.
#[must_use]
pub fn token_counts(tokens: &[Token]) -> Vec<(TokenKind, usize)> {
    let mut counts: Vec<(TokenKind, usize)> = Vec::new();
    for token in tokens {
        match counts.iter_mut().find(|(kind, _)| *kind == token.kind) {
            Some((_, n)) => *n += 1,
            None => counts.push((token.kind, 1)),
        }
    }
    counts
}

/// One-line summary, e.g. `5 tokens • 0 errors • 1 symbols`.
#[must_use]
pub fn summary_line(analysis: &Analysis) -> String {
    format!(
        "{} tokens \u{2022} {} errors \u{2022} {} symbols",
        analysis.tokens.len(),
        analysis.error_count(),
        analysis.symbols.len()
    )
}

/// Token list with one `line:column  kind  lexeme` row per token,
/// followed by the per-kind counts.
#[must_use]
pub fn format_tokens(tokens: &[Token]) -> String {
    let mut out = String::new();
    let width = tokens
        .iter()
        .map(|t| t.span.to_string().len())
        .max()
        .unwrap_or(0);

    for token in tokens {
        let _ = writeln!(
            out,
            "{:<width$}  {:<10}  {}",
            token.span.to_string(),
            token.kind,
            token.lexeme
        );
    }

    let counts = token_counts(tokens);
    if !counts.is_empty() {
        out.push('\n');
        for (kind, n) in counts {
            let _ = writeln!(out, "{kind}: {n}");
        }
    }

    out
}

/// One `line:column: category error: message` row per diagnostic.
#[must_use]
pub fn format_diagnostics(diagnostics: &[Diagnostic]) -> String {
    let mut out = String::new();
    for diag in diagnostics {
        let _ = writeln!(
            out,
            "{}: {} error: {}",
            diag.span(),
            diag.category(),
            diag.message()
        );
        if let Diagnostic::Semantic(SemanticError {
            previous: Some(previous),
            ..
        }) = diag
        {
            let _ = writeln!(out, "  first declared at {previous}");
        }
    }
    out
}

/// Aligned table: name, count, first position, type, scope, value.
/// Undeclared identifiers show `-` in the typed columns.
#[must_use]
pub fn format_symbol_table(rows: &[SymbolRow]) -> String {
    const HEADER: [&str; 6] = ["name", "count", "first", "type", "scope", "value"];

    let cells: Vec<[String; 6]> = rows
        .iter()
        .map(|row| {
            [
                row.name.clone(),
                row.occurrences.to_string(),
                format!("L{}, C{}", row.first_seen.line, row.first_seen.column),
                row.declared_type
                    .map_or("-", DeclaredType::as_str)
                    .to_string(),
                row.scope.clone().unwrap_or_else(|| "-".to_string()),
                row.initial_value.clone().unwrap_or_else(|| "-".to_string()),
            ]
        })
        .collect();

    let mut widths = HEADER.map(str::len);
    for line in &cells {
        for (width, cell) in widths.iter_mut().zip(line) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    write_row(&mut out, &HEADER, &widths);
    for line in &cells {
        write_row(&mut out, line, &widths);
    }
    out
}

fn write_row<S: AsRef<str>>(out: &mut String, cells: &[S], widths: &[usize]) {
    let mut line = String::new();
    for (i, (cell, &width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str(" | ");
        }
        let _ = write!(line, "{:<width$}", cell.as_ref());
    }
    out.push_str(line.trim_end());
    out.push('\n');
}

/// Full report with every section of an analysis.
#[must_use]
pub fn format_report(analysis: &Analysis) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}", summary_line(analysis));

    out.push_str("\n== tokens ==\n");
    out.push_str(&format_tokens(&analysis.tokens));

    out.push_str("\n== errors ==\n");
    let diagnostics = analysis.diagnostics();
    if diagnostics.is_empty() {
        out.push_str("none\n");
    } else {
        out.push_str(&format_diagnostics(&diagnostics));
    }
    if !analysis.parsed() {
        out.push_str("syntax analysis skipped: fix lexical errors first\n");
    }

    out.push_str("\n== symbols ==\n");
    if analysis.symbols.is_empty() {
        out.push_str("no identifiers found\n");
    } else {
        out.push_str(&format_symbol_table(&analysis.symbols));
    }

    out
}
