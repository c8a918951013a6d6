//! Final symbol table: the lexer's per-file identifier counts merged
//! with the parser's typed, scoped declarations.

use serde::Serialize;

use crate::lexer::RawSymbol;
use crate::parser::{Declaration, DeclaredType};
use crate::token::Span;

/// One row of the merged symbol table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SymbolRow {
    pub name: String,
    pub occurrences: usize,
    pub first_seen: Span,
    /// `None` for identifiers that are used but never declared.
    pub declared_type: Option<DeclaredType>,
    pub scope: Option<String>,
    pub initial_value: Option<String>,
}

impl SymbolRow {
    /// Row for an identifier with no declaration.
    #[must_use]
    pub fn untyped(raw: &RawSymbol) -> Self {
        Self {
            name: raw.name.clone(),
            occurrences: raw.occurrences,
            first_seen: raw.first_seen,
            declared_type: None,
            scope: None,
            initial_value: None,
        }
    }

    #[must_use]
    pub const fn is_declared(&self) -> bool {
        self.declared_type.is_some()
    }
}

/// Merge raw symbols with declarations.
///
/// Declaration rows come first, in declaration order, borrowing the
/// count and first position of the raw symbol with the same name (or
/// their own position and a count of 1). Raw symbols never declared
/// anywhere follow in name order as untyped rows.
#[must_use]
pub fn enrich(raw: &[RawSymbol], declarations: &[Declaration]) -> Vec<SymbolRow> {
    let mut rows: Vec<SymbolRow> = declarations
        .iter()
        .map(|decl| {
            let seen = raw.iter().find(|sym| sym.name == decl.name);
            SymbolRow {
                name: decl.name.clone(),
                occurrences: seen.map_or(1, |sym| sym.occurrences),
                first_seen: seen.map_or(decl.span, |sym| sym.first_seen),
                declared_type: Some(decl.declared_type),
                scope: Some(decl.scope.clone()),
                initial_value: decl.initial_value.clone(),
            }
        })
        .collect();

    rows.extend(
        raw.iter()
            .filter(|sym| !declarations.iter().any(|decl| decl.name == sym.name))
            .map(SymbolRow::untyped),
    );

    rows
}
